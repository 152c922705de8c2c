//! Persistence contracts for board-local state.
//!
//! # Responsibility
//! - Define the key-value store the board preference lives in.
//! - Keep SQLite details out of the service layer.
//!
//! # Invariants
//! - Unreadable stored state degrades to defaults; it never reaches the user.

pub mod preference_repo;
