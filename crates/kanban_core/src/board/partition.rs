//! Grouping and ordering of work items into board columns.
//!
//! # Responsibility
//! - Bucket a snapshot's items by status, owning actor, or priority label.
//! - Order every bucket by descending priority or by collated title.
//!
//! # Invariants
//! - Every input item lands in exactly one column; nothing is dropped.
//! - Columns appear in first-seen order of their label in the input.
//! - Sorting is stable: equal keys keep their input order.
//! - The caller's slices are never mutated.

use crate::model::preference::{GroupKey, SortKey};
use crate::model::work_item::{Actor, WorkItem};
use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Partitioning failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// An item's owner does not match any known actor while grouping by actor.
    UnknownActorReference { item_id: String, actor_id: String },
    /// Title collation data could not be loaded.
    Collation(String),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownActorReference { item_id, actor_id } => {
                write!(f, "item {item_id} references unknown actor {actor_id}")
            }
            Self::Collation(message) => write!(f, "title collation unavailable: {message}"),
        }
    }
}

impl Error for BoardError {}

/// One board column: a group label and its ordered items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    pub label: String,
    pub items: Vec<WorkItem>,
}

/// Ordered mapping from group label to ordered items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    columns: Vec<BoardColumn>,
}

impl Partition {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total number of items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|column| column.items.len()).sum()
    }

    /// Column labels in board order.
    pub fn labels(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.label.as_str())
            .collect()
    }

    /// Items of one column, if the label exists.
    pub fn get(&self, label: &str) -> Option<&[WorkItem]> {
        self.columns
            .iter()
            .find(|column| column.label == label)
            .map(|column| column.items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WorkItem])> {
        self.columns
            .iter()
            .map(|column| (column.label.as_str(), column.items.as_slice()))
    }

    pub fn into_columns(self) -> Vec<BoardColumn> {
        self.columns
    }
}

/// Groups and orders `items` into board columns.
///
/// # Errors
/// - `UnknownActorReference` when `group_key` is `Actor` and an item's
///   `user_id` has no matching actor. No partial partition is returned.
/// - `Collation` when `sort_key` is `Title` and collation data is unavailable.
pub fn partition(
    items: &[WorkItem],
    actors: &[Actor],
    group_key: GroupKey,
    sort_key: SortKey,
) -> BoardResult<Partition> {
    let mut columns = group_items(items, actors, group_key)?;

    match sort_key {
        SortKey::Priority => {
            for column in &mut columns {
                column
                    .items
                    .sort_by(|left, right| right.priority.cmp(&left.priority));
            }
        }
        SortKey::Title => {
            let collator = title_collator()?;
            for column in &mut columns {
                column
                    .items
                    .sort_by(|left, right| collator.compare(&left.title, &right.title));
            }
        }
    }

    debug!(
        "event=board_partition module=board status=ok grouping={} sorting={} items={} columns={}",
        group_key,
        sort_key,
        items.len(),
        columns.len()
    );

    Ok(Partition { columns })
}

fn group_items(
    items: &[WorkItem],
    actors: &[Actor],
    group_key: GroupKey,
) -> BoardResult<Vec<BoardColumn>> {
    let actor_names = actor_name_index(actors);
    let mut columns: Vec<BoardColumn> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = group_label(item, &actor_names, group_key)?;
        match positions.get(label) {
            Some(&index) => columns[index].items.push(item.clone()),
            None => {
                positions.insert(label.to_string(), columns.len());
                columns.push(BoardColumn {
                    label: label.to_string(),
                    items: vec![item.clone()],
                });
            }
        }
    }

    Ok(columns)
}

fn group_label<'a>(
    item: &'a WorkItem,
    actor_names: &HashMap<&str, &'a str>,
    group_key: GroupKey,
) -> BoardResult<&'a str> {
    match group_key {
        GroupKey::Status => Ok(item.status.as_str()),
        GroupKey::Priority => Ok(item.priority.label()),
        GroupKey::Actor => actor_names
            .get(item.user_id.as_str())
            .copied()
            .ok_or_else(|| BoardError::UnknownActorReference {
                item_id: item.id.clone(),
                actor_id: item.user_id.clone(),
            }),
    }
}

// First actor wins on duplicate ids.
fn actor_name_index(actors: &[Actor]) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(actors.len());
    for actor in actors {
        index
            .entry(actor.id.as_str())
            .or_insert(actor.name.as_str());
    }
    index
}

fn title_collator() -> BoardResult<Collator> {
    Collator::try_new(&locale!("en").into(), CollatorOptions::new())
        .map_err(|err| BoardError::Collation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{actor_name_index, partition, BoardError};
    use crate::model::preference::{GroupKey, SortKey};
    use crate::model::work_item::{Actor, Priority, WorkItem};

    #[test]
    fn duplicate_actor_ids_resolve_to_first_entry() {
        let actors = vec![Actor::new("u1", "Alice"), Actor::new("u1", "Shadow")];
        let index = actor_name_index(&actors);
        assert_eq!(index.get("u1"), Some(&"Alice"));
    }

    #[test]
    fn unknown_actor_is_not_checked_when_grouping_by_status() {
        let items = vec![WorkItem::new("T1", "X", "Todo", Priority::High, "u404")];
        let result = partition(&items, &[], GroupKey::Status, SortKey::Priority).unwrap();
        assert_eq!(result.labels(), vec!["Todo"]);
    }

    #[test]
    fn unknown_actor_error_names_item_and_reference() {
        let items = vec![WorkItem::new("T1", "X", "Todo", Priority::High, "u404")];
        let err = partition(&items, &[], GroupKey::Actor, SortKey::Title).unwrap_err();
        assert_eq!(err.to_string(), "item T1 references unknown actor u404");
        assert!(matches!(err, BoardError::UnknownActorReference { .. }));
    }
}
