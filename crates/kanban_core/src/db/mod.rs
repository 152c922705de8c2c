//! SQLite store for board-local state.
//!
//! # Responsibility
//! - Open the preference database and bring its schema up to date.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Preferences are not read or written before migrations succeed.
//! - The store never creates directories; a missing parent is reported.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

/// Preference store open/migration failures.
#[derive(Debug)]
pub enum DbError {
    /// Parent directory of the database file does not exist.
    MissingDirectory(PathBuf),
    Sqlite(rusqlite::Error),
    /// File was written by a newer build with more migrations.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Stable code used in `db_open` log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDirectory(_) => "db_dir_missing",
            Self::Sqlite(_) => "db_sqlite",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDirectory(dir) => {
                write!(f, "board store directory `{}` does not exist", dir.display())
            }
            Self::Sqlite(err) => write!(f, "board store sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "board store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingDirectory(_) | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
