//! FFI board API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board loading and preference changes to Dart via FRB.
//! - Flatten core results into plain envelopes the UI can render directly.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - A board envelope carries columns only when `state == "ready"` and
//!   partitioning succeeded.

use kanban_core::db::open_db;
use kanban_core::{
    core_version as core_version_inner, decode_snapshot, init_logging as init_logging_inner,
    load_preference, ping as ping_inner, BoardService, BoardSource, BoardState, GroupKey,
    HttpBoardSource, Partition, Preference, SortKey, SqlitePreferenceStore, StaticBoardSource,
    WorkItem, DEFAULT_BOARD_URL,
};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BOARD_DB_FILE_NAME: &str = "kanban_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns empty string on success, error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCard {
    pub id: String,
    pub title: String,
    pub user_id: String,
    pub priority: u8,
    pub priority_label: String,
    pub tags: Vec<String>,
}

/// One column on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumnView {
    pub label: String,
    pub cards: Vec<BoardCard>,
}

/// Board envelope for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardResponse {
    pub ok: bool,
    /// `ready` or `unavailable`.
    pub state: String,
    /// Active grouping wire name (`status|user|priority`).
    pub grouping: String,
    /// Active sorting wire name (`priority|title`).
    pub sorting: String,
    pub columns: Vec<BoardColumnView>,
    pub message: String,
}

/// Preference envelope returned by preference calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceResponse {
    pub ok: bool,
    pub grouping: String,
    pub sorting: String,
    pub message: String,
}

/// Fetches the board from `source_url` (or the default endpoint) and
/// partitions it with the stored preference.
///
/// # FFI contract
/// - Blocking network call; do not invoke on the UI thread.
/// - Never panics; fetch failures yield `state = "unavailable"`.
#[flutter_rust_bridge::frb]
pub fn board_fetch(source_url: Option<String>) -> BoardResponse {
    let url = source_url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BOARD_URL.to_string());
    let db_path = resolve_board_db_path();
    match HttpBoardSource::new(url) {
        Ok(source) => render_board(&db_path, source),
        Err(err) => unavailable_response(current_preference(&db_path), err.to_string()),
    }
}

/// Partitions an already fetched `{tickets, users}` JSON payload with the
/// stored preference.
#[flutter_rust_bridge::frb(sync)]
pub fn board_from_json(snapshot_json: String) -> BoardResponse {
    board_from_json_at(&resolve_board_db_path(), &snapshot_json)
}

/// Returns the stored preference (defaults when absent or unreadable).
#[flutter_rust_bridge::frb(sync)]
pub fn board_preference() -> PreferenceResponse {
    preference_response(
        current_preference(&resolve_board_db_path()),
        "Preference loaded.",
    )
}

/// Persists a new grouping key (`status|user|priority`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_grouping(grouping: String) -> PreferenceResponse {
    set_grouping_at(&resolve_board_db_path(), &grouping)
}

/// Persists a new sorting key (`priority|title`).
#[flutter_rust_bridge::frb(sync)]
pub fn board_set_sorting(sorting: String) -> PreferenceResponse {
    set_sorting_at(&resolve_board_db_path(), &sorting)
}

fn board_from_json_at(db_path: &Path, snapshot_json: &str) -> BoardResponse {
    match decode_snapshot(snapshot_json) {
        Ok(snapshot) => render_board(db_path, StaticBoardSource::new(snapshot)),
        Err(err) => unavailable_response(current_preference(db_path), err.to_string()),
    }
}

fn set_grouping_at(db_path: &Path, grouping: &str) -> PreferenceResponse {
    match grouping.parse::<GroupKey>() {
        Ok(group_key) => {
            update_preference(db_path, |preference| preference.group_key = group_key)
        }
        Err(err) => preference_failure(err.to_string()),
    }
}

fn set_sorting_at(db_path: &Path, sorting: &str) -> PreferenceResponse {
    match sorting.parse::<SortKey>() {
        Ok(sort_key) => update_preference(db_path, |preference| preference.sort_key = sort_key),
        Err(err) => preference_failure(err.to_string()),
    }
}

fn render_board(db_path: &Path, source: impl BoardSource) -> BoardResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!(
                "event=ffi_board module=ffi status=error error_code={} error={err}",
                err.code()
            );
            return unavailable_response(
                Preference::default(),
                format!("board DB open failed: {err}"),
            );
        }
    };

    let mut service = BoardService::new(source, SqlitePreferenceStore::new(&conn));
    let preference = service.preference();
    if let BoardState::Unavailable(message) = service.load() {
        return unavailable_response(preference, message.clone());
    }

    match service.partition() {
        Ok(partition) => {
            let columns = to_column_views(partition);
            let message = format!("Loaded {} column(s).", columns.len());
            BoardResponse {
                ok: true,
                state: "ready".to_string(),
                grouping: preference.group_key.as_str().to_string(),
                sorting: preference.sort_key.as_str().to_string(),
                columns,
                message,
            }
        }
        Err(err) => BoardResponse {
            ok: false,
            state: "ready".to_string(),
            grouping: preference.group_key.as_str().to_string(),
            sorting: preference.sort_key.as_str().to_string(),
            columns: Vec::new(),
            message: format!("board partition failed: {err}"),
        },
    }
}

fn update_preference(db_path: &Path, apply: impl FnOnce(&mut Preference)) -> PreferenceResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return preference_failure(format!("board DB open failed: {err}")),
    };

    let store = SqlitePreferenceStore::new(&conn);
    let mut service = BoardService::new(StaticBoardSource::default(), store);
    let mut preference = service.preference();
    apply(&mut preference);
    match service.set_preference(preference) {
        Ok(()) => preference_response(preference, "Preference saved."),
        Err(err) => preference_failure(format!("preference save failed: {err}")),
    }
}

fn current_preference(db_path: &Path) -> Preference {
    match open_db(db_path) {
        Ok(conn) => load_preference(&SqlitePreferenceStore::new(&conn)),
        Err(err) => {
            warn!("event=ffi_preference module=ffi status=error fallback=default error={err}");
            Preference::default()
        }
    }
}

fn unavailable_response(preference: Preference, message: String) -> BoardResponse {
    BoardResponse {
        ok: false,
        state: "unavailable".to_string(),
        grouping: preference.group_key.as_str().to_string(),
        sorting: preference.sort_key.as_str().to_string(),
        columns: Vec::new(),
        message,
    }
}

fn preference_response(preference: Preference, message: &str) -> PreferenceResponse {
    PreferenceResponse {
        ok: true,
        grouping: preference.group_key.as_str().to_string(),
        sorting: preference.sort_key.as_str().to_string(),
        message: message.to_string(),
    }
}

fn preference_failure(message: String) -> PreferenceResponse {
    let fallback = Preference::default();
    PreferenceResponse {
        ok: false,
        grouping: fallback.group_key.as_str().to_string(),
        sorting: fallback.sort_key.as_str().to_string(),
        message,
    }
}

fn to_column_views(partition: Partition) -> Vec<BoardColumnView> {
    partition
        .into_columns()
        .into_iter()
        .map(|column| BoardColumnView {
            label: column.label,
            cards: column.items.into_iter().map(to_card).collect(),
        })
        .collect()
}

fn to_card(item: WorkItem) -> BoardCard {
    BoardCard {
        priority: item.priority.value(),
        priority_label: item.priority.label().to_string(),
        id: item.id,
        title: item.title,
        user_id: item.user_id,
        tags: item.tags,
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("KANBAN_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}
