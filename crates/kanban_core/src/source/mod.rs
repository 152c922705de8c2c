//! Snapshot data sources (HTTP endpoint, JSON file, in-memory).

pub mod board_source;
