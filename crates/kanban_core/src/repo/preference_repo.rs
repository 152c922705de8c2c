//! Preference key-value store contracts and implementations.
//!
//! # Responsibility
//! - Persist the board preference under a fixed key.
//! - Restore it at startup, treating unreadable data as absent.
//!
//! # Invariants
//! - `load_preference` never fails; bad or missing data yields defaults.
//! - Stored values are always produced by `Preference::encode`.

use crate::db::DbError;
use crate::model::preference::{InvalidPreference, Preference, PREFERENCE_STORAGE_KEY};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Preference persistence errors.
#[derive(Debug)]
pub enum PreferenceError {
    InvalidPreference(InvalidPreference),
    Db(DbError),
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPreference(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "preference store failed: {err}"),
        }
    }
}

impl Error for PreferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPreference(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<InvalidPreference> for PreferenceError {
    fn from(value: InvalidPreference) -> Self {
        Self::InvalidPreference(value)
    }
}

impl From<DbError> for PreferenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PreferenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value store used for board preferences.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> PreferenceResult<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        (**self).write(key, value)
    }
}

/// Restores the stored preference, or defaults when absent or unreadable.
pub fn load_preference(store: &impl PreferenceStore) -> Preference {
    let raw = match store.read(PREFERENCE_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=preference_load module=repo status=ok source=default");
            return Preference::default();
        }
        Err(err) => {
            warn!(
                "event=preference_load module=repo status=error fallback=default error={}",
                err
            );
            return Preference::default();
        }
    };

    match Preference::decode(&raw) {
        Ok(preference) => {
            info!(
                "event=preference_load module=repo status=ok source=store grouping={} sorting={}",
                preference.group_key, preference.sort_key
            );
            preference
        }
        Err(err) => {
            warn!(
                "event=preference_load module=repo status=discarded fallback=default error={}",
                err
            );
            Preference::default()
        }
    }
}

/// Writes the preference under the fixed storage key.
pub fn save_preference(
    store: &impl PreferenceStore,
    preference: &Preference,
) -> PreferenceResult<()> {
    store.write(PREFERENCE_STORAGE_KEY, &preference.encode())?;
    info!(
        "event=preference_save module=repo status=ok grouping={} sorting={}",
        preference.group_key, preference.sort_key
    );
    Ok(())
}

/// SQLite-backed preference store over the `preferences` table.
pub struct SqlitePreferenceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceStore for SqlitePreferenceStore<'_> {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, now_epoch_ms()],
        )?;
        Ok(())
    }
}

/// Process-local store; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
