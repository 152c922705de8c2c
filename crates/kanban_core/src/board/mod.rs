//! Board projection: partitioning a snapshot into columns and rendering it.
//!
//! # Responsibility
//! - Turn a flat snapshot into an ordered, keyed set of columns.
//! - Keep projection pure; no I/O happens here.
//!
//! # Invariants
//! - A partition is always rebuilt from inputs, never patched in place.

pub mod partition;
pub mod render;
