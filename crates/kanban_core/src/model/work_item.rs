//! Work item and actor domain model.
//!
//! # Responsibility
//! - Define the records a board renders: work items and the actors owning them.
//! - Own the closed priority scale and its display labels.
//!
//! # Invariants
//! - `WorkItem::priority` is always inside the 0..=4 scale; out-of-range input
//!   is rejected at the source boundary, never clamped.
//! - A snapshot is complete: items and actors come from one fetch.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Closed, ordered priority scale shared by every board.
///
/// Ordering follows the numeric value, so `Urgent` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum Priority {
    NoPriority = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Priority; 5] = [
        Priority::Urgent,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::NoPriority,
    ];

    /// Maps a raw wire value onto the scale.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::NoPriority),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            4 => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Column/card label for this priority.
    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NoPriority => "No priority",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.value()
    }
}

impl TryFrom<i64> for Priority {
    type Error = PriorityOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(PriorityOutOfRange(value))
    }
}

/// Raw priority value outside the 0..=4 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityOutOfRange(pub i64);

impl Display for PriorityOutOfRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "priority {} is outside the 0..=4 scale", self.0)
    }
}

impl Error for PriorityOutOfRange {}

/// One ticket shown as a card on the board.
///
/// Serialized with the field names of the board endpoint (`userId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: String,
    pub title: String,
    /// Free-form labels; absent on older payloads.
    #[serde(default, rename = "tag")]
    pub tags: Vec<String>,
    /// Reference to the owning `Actor::id`.
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Open status vocabulary, e.g. `Todo`, `In progress`, `Done`.
    pub status: String,
    pub priority: Priority,
}

impl WorkItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: impl Into<String>,
        priority: Priority,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: Vec::new(),
            user_id: user_id.into(),
            status: status.into(),
            priority,
        }
    }
}

/// A person who may own work items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            available: true,
        }
    }
}

fn default_available() -> bool {
    true
}

/// Complete board payload from one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(rename = "tickets")]
    pub items: Vec<WorkItem>,
    #[serde(rename = "users")]
    pub actors: Vec<Actor>,
}

impl BoardSnapshot {
    pub fn new(items: Vec<WorkItem>, actors: Vec<Actor>) -> Self {
        Self { items, actors }
    }
}

#[cfg(test)]
mod tests {
    use super::{Priority, WorkItem};

    #[test]
    fn labels_follow_fixed_scale() {
        let labels = Priority::ALL.map(Priority::label);
        assert_eq!(labels, ["Urgent", "High", "Medium", "Low", "No priority"]);
    }

    #[test]
    fn from_value_rejects_out_of_range() {
        assert_eq!(Priority::from_value(4), Some(Priority::Urgent));
        assert_eq!(Priority::from_value(5), None);
        assert_eq!(Priority::from_value(-1), None);
    }

    #[test]
    fn priority_orders_by_value() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Low > Priority::NoPriority);
    }

    #[test]
    fn work_item_uses_endpoint_field_names() {
        let item = WorkItem::new("CAM-1", "Fix bug", "Todo", Priority::High, "usr-1");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["userId"], "usr-1");
        assert_eq!(json["priority"], 3);
        assert_eq!(json["tag"], serde_json::json!([]));
    }
}
