//! Board domain model.
//!
//! # Responsibility
//! - Define the snapshot records (work items, actors) and the display
//!   preference used to project them into columns.
//!
//! # Invariants
//! - Snapshot records are immutable inputs for one render cycle.
//! - Only priority has a closed label set; status and actor labels are open.

pub mod preference;
pub mod work_item;
