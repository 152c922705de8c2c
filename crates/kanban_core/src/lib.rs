//! Core domain logic for the kanban board.
//! This crate owns grouping/sorting rules and the board's persisted state.

pub mod board;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod source;

pub use board::partition::{partition, BoardColumn, BoardError, BoardResult, Partition};
pub use board::render::{render_card, render_text};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::preference::{
    GroupKey, InvalidPreference, ParseKeyError, Preference, SortKey, PREFERENCE_STORAGE_KEY,
};
pub use model::work_item::{Actor, BoardSnapshot, Priority, PriorityOutOfRange, WorkItem};
pub use repo::preference_repo::{
    load_preference, save_preference, MemoryPreferenceStore, PreferenceError, PreferenceResult,
    PreferenceStore, SqlitePreferenceStore,
};
pub use service::board_service::{BoardService, BoardState, ServiceError, ServiceResult};
pub use source::board_source::{
    decode_snapshot, BoardSource, HttpBoardSource, JsonFileBoardSource, SourceError,
    SourceResult, StaticBoardSource, DEFAULT_BOARD_URL,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
