//! Board use-case service.
//!
//! # Responsibility
//! - Track the snapshot load state (loading, unavailable, ready).
//! - Read the preference once at construction and persist every change.
//! - Partition the ready snapshot with the active preference.
//!
//! # Invariants
//! - The partitioner only ever sees a complete snapshot.
//! - A failed fetch leaves the service `Unavailable`; no stale data is shown.
//! - The in-memory preference changes only after it was persisted.

use crate::board::partition::{partition, BoardError, Partition};
use crate::model::preference::{GroupKey, Preference, SortKey};
use crate::model::work_item::BoardSnapshot;
use crate::repo::preference_repo::{
    load_preference, save_preference, PreferenceError, PreferenceStore,
};
use crate::source::board_source::BoardSource;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Board service errors.
#[derive(Debug)]
pub enum ServiceError {
    /// Partition requested before a snapshot is available.
    NotReady,
    Board(BoardError),
    Preference(PreferenceError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "board data is not available"),
            Self::Board(err) => write!(f, "{err}"),
            Self::Preference(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotReady => None,
            Self::Board(err) => Some(err),
            Self::Preference(err) => Some(err),
        }
    }
}

impl From<BoardError> for ServiceError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<PreferenceError> for ServiceError {
    fn from(value: PreferenceError) -> Self {
        Self::Preference(value)
    }
}

/// Snapshot availability as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    Loading,
    /// Fetch failed; carries a display message.
    Unavailable(String),
    Ready(BoardSnapshot),
}

impl BoardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Unavailable(_) => "unavailable",
            Self::Ready(_) => "ready",
        }
    }
}

/// Use-case service wrapping one board source and one preference store.
pub struct BoardService<S: BoardSource, P: PreferenceStore> {
    source: S,
    store: P,
    preference: Preference,
    state: BoardState,
}

impl<S: BoardSource, P: PreferenceStore> BoardService<S, P> {
    /// Creates a service in `Loading` state with the stored preference.
    pub fn new(source: S, store: P) -> Self {
        let preference = load_preference(&store);
        Self {
            source,
            store,
            preference,
            state: BoardState::Loading,
        }
    }

    /// Fetches the snapshot once and records the outcome.
    pub fn load(&mut self) -> &BoardState {
        self.state = match self.source.fetch_snapshot() {
            Ok(snapshot) => BoardState::Ready(snapshot),
            Err(err) => BoardState::Unavailable(err.to_string()),
        };
        &self.state
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn preference(&self) -> Preference {
        self.preference
    }

    pub fn set_group_key(&mut self, group_key: GroupKey) -> ServiceResult<()> {
        self.set_preference(Preference::new(group_key, self.preference.sort_key))
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> ServiceResult<()> {
        self.set_preference(Preference::new(self.preference.group_key, sort_key))
    }

    /// Replaces the preference, persisting it first when it changed.
    pub fn set_preference(&mut self, preference: Preference) -> ServiceResult<()> {
        if preference == self.preference {
            return Ok(());
        }
        save_preference(&self.store, &preference)?;
        self.preference = preference;
        Ok(())
    }

    /// Partitions the ready snapshot with the active preference.
    ///
    /// # Errors
    /// - `NotReady` while loading or after a failed fetch.
    /// - `Board` when partitioning fails (unknown actor reference).
    pub fn partition(&self) -> ServiceResult<Partition> {
        let BoardState::Ready(snapshot) = &self.state else {
            return Err(ServiceError::NotReady);
        };

        partition(
            &snapshot.items,
            &snapshot.actors,
            self.preference.group_key,
            self.preference.sort_key,
        )
        .map_err(|err| {
            warn!(
                "event=board_partition module=service status=error grouping={} error={}",
                self.preference.group_key, err
            );
            ServiceError::from(err)
        })
    }
}
