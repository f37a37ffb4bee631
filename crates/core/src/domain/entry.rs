// Queue Entry Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entry identifier (generated by the store, never reused)
pub type EntryId = String;

/// One pending coffee debt
///
/// `position` is zero-based. Across all current entries the positions are
/// exactly `0..count` with no gaps or duplicates; sorting by position gives
/// the authoritative queue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub name: String,
    pub reason: String,
    pub added_at: DateTime<Utc>,
    pub position: i64,
}

impl QueueEntry {
    /// Render as `"{name} ({MM/DD} : {reason})"`
    pub fn render(&self) -> String {
        format!(
            "{} ({} : {})",
            self.name,
            self.added_at.format("%m/%d"),
            self.reason
        )
    }
}

/// Marker rendered for a queue with no entries
pub const EMPTY_QUEUE: &str = "EMPTY";

/// Render an ordered queue, one entry per line, or `EMPTY`
pub fn render_queue(entries: &[QueueEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_QUEUE.to_string();
    }
    entries
        .iter()
        .map(QueueEntry::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(name: &str, reason: &str, position: i64) -> QueueEntry {
        QueueEntry {
            id: format!("id-{}", position),
            name: name.to_string(),
            reason: reason.to_string(),
            added_at: Utc.with_ymd_and_hms(2024, 3, 7, 9, 30, 0).unwrap(),
            position,
        }
    }

    #[test]
    fn test_render_entry() {
        assert_eq!(entry("Alice", "late", 0).render(), "Alice (03/07 : late)");
    }

    #[test]
    fn test_render_queue() {
        assert_eq!(render_queue(&[]), "EMPTY");

        let queue = vec![entry("Bob", "meeting", 0), entry("Alice", "late", 1)];
        assert_eq!(
            render_queue(&queue),
            "Bob (03/07 : meeting)\nAlice (03/07 : late)"
        );
    }
}
