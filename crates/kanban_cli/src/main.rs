//! Board CLI.
//!
//! # Responsibility
//! - Load a board snapshot (endpoint or JSON file) and print its columns.
//! - Read and update the persisted grouping/sorting preference.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kanban_core::db::{open_db, Connection};
use kanban_core::{
    init_logging, load_preference, render_text, save_preference, BoardService, BoardSource,
    BoardState, GroupKey, HttpBoardSource, JsonFileBoardSource, PreferenceStore, SortKey,
    SqlitePreferenceStore, DEFAULT_BOARD_URL,
};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "kanban_board.sqlite3";

/// Kanban board viewer
#[derive(Parser, Debug)]
#[command(name = "kanban")]
#[command(about = "Group and sort board tickets into columns")]
#[command(version)]
struct Cli {
    /// SQLite file holding the stored preference
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (logging is off when unset)
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, default_value = kanban_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the board and print one block per column
    Show {
        /// Board endpoint URL
        #[arg(long, default_value = DEFAULT_BOARD_URL, conflicts_with = "file")]
        url: String,

        /// Read the board from a JSON file instead of the endpoint
        #[arg(long)]
        file: Option<PathBuf>,

        /// Change grouping before rendering: status|user|priority
        #[arg(long)]
        group: Option<GroupKey>,

        /// Change ordering before rendering: priority|title
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Print the stored preference
    Prefs,

    /// Update the stored preference
    Set {
        /// status|user|priority
        #[arg(long)]
        group: Option<GroupKey>,

        /// priority|title
        #[arg(long)]
        sort: Option<SortKey>,
    },

    /// Print core linkage info (ping + version)
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(&cli.log_level, log_dir).context("Failed to initialize logging")?;
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

    match cli.command {
        Commands::Show {
            url,
            file,
            group,
            sort,
        } => match file {
            Some(path) => show(&db_path, JsonFileBoardSource::new(path), group, sort),
            None => {
                let source =
                    HttpBoardSource::new(url).context("Failed to create HTTP client")?;
                show(&db_path, source, group, sort)
            }
        },
        Commands::Prefs => {
            let conn = open_preference_db(&db_path)?;
            let preference = load_preference(&SqlitePreferenceStore::new(&conn));
            println!("grouping={}", preference.group_key);
            println!("sorting={}", preference.sort_key);
            Ok(())
        }
        Commands::Set { group, sort } => {
            let conn = open_preference_db(&db_path)?;
            let store = SqlitePreferenceStore::new(&conn);
            let mut preference = load_preference(&store);
            preference.group_key = group.unwrap_or(preference.group_key);
            preference.sort_key = sort.unwrap_or(preference.sort_key);
            save_preference(&store, &preference).context("Failed to save preference")?;
            println!(
                "saved grouping={} sorting={}",
                preference.group_key, preference.sort_key
            );
            Ok(())
        }
        Commands::Info => {
            println!("kanban_core ping={}", kanban_core::ping());
            println!("kanban_core version={}", kanban_core::core_version());
            Ok(())
        }
    }
}

fn show(
    db_path: &Path,
    source: impl BoardSource,
    group: Option<GroupKey>,
    sort: Option<SortKey>,
) -> Result<()> {
    let conn = open_preference_db(db_path)?;
    let mut service = BoardService::new(source, SqlitePreferenceStore::new(&conn));
    apply_changes(&mut service, group, sort)?;

    if let BoardState::Unavailable(message) = service.load() {
        anyhow::bail!("Board data unavailable: {message}");
    }

    let partition = service.partition().context("Failed to build board")?;
    print!("{}", render_text(&partition));
    Ok(())
}

fn apply_changes<S: BoardSource, P: PreferenceStore>(
    service: &mut BoardService<S, P>,
    group: Option<GroupKey>,
    sort: Option<SortKey>,
) -> Result<()> {
    if let Some(group_key) = group {
        service
            .set_group_key(group_key)
            .context("Failed to save grouping")?;
    }
    if let Some(sort_key) = sort {
        service
            .set_sort_key(sort_key)
            .context("Failed to save ordering")?;
    }
    Ok(())
}

fn open_preference_db(path: &Path) -> Result<Connection> {
    open_db(path).with_context(|| format!("Failed to open board DB `{}`", path.display()))
}
