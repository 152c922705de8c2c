//! Plain-text board renderer.
//!
//! One block per column in partition order; each card lists id, title and
//! priority label.

use crate::board::partition::Partition;
use crate::model::work_item::WorkItem;
use std::fmt::Write;

/// Renders a partition as text columns.
pub fn render_text(partition: &Partition) -> String {
    if partition.is_empty() {
        return "(no tickets)\n".to_string();
    }

    let mut out = String::new();
    for (index, (label, items)) in partition.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{label} ({})", items.len());
        for item in items {
            let _ = writeln!(out, "{}", render_card(item));
        }
    }
    out
}

/// Renders one card line.
pub fn render_card(item: &WorkItem) -> String {
    format!("  [{}] {} ({})", item.id, item.title, item.priority.label())
}
