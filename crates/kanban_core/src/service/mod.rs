//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate snapshot loading, preference persistence and partitioning.
//! - Keep CLI/FFI layers decoupled from source and storage details.

pub mod board_service;
