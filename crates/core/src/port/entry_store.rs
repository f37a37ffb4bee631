// Entry Store Port (Interface)

use crate::domain::{DomainError, QueueEntry};
use crate::error::{AppError, Result};
use async_trait::async_trait;

/// Durable, ordered collection of queue entries
///
/// Implementations own id/timestamp assignment and re-sequencing. Every
/// mutating call must be atomic: the bounds check and the position shift
/// see the same stored order, even under concurrent callers.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries, ascending by position
    async fn list(&self) -> Result<Vec<QueueEntry>>;

    /// Number of entries
    async fn count(&self) -> Result<usize>;

    /// Add at the tail (position = max + 1, or 0 when empty)
    async fn append(&self, name: &str, reason: &str) -> Result<QueueEntry>;

    /// Add at `index` (`0..=count`), shifting entries at `>= index` up by one
    ///
    /// # Errors
    /// - `DomainError::InvalidIndex` when `index` is out of range
    async fn insert_at(&self, index: i64, name: &str, reason: &str) -> Result<QueueEntry>;

    /// Remove the entry at `index` (`0..count`), closing the gap
    ///
    /// # Errors
    /// - `DomainError::InvalidIndex` when `index` is out of range or the queue is empty
    async fn remove_at(&self, index: i64) -> Result<QueueEntry>;

    /// Remove all entries, returning them in queue order
    async fn clear(&self) -> Result<Vec<QueueEntry>>;

    /// Remove the head entry
    ///
    /// # Errors
    /// - `DomainError::EmptyQueue` when there is nothing to remove
    async fn remove_head(&self) -> Result<QueueEntry> {
        match self.remove_at(0).await {
            Err(AppError::Domain(DomainError::InvalidIndex(_))) => {
                Err(DomainError::EmptyQueue.into())
            }
            other => other,
        }
    }

    /// Entry at position 0, if any
    async fn head(&self) -> Result<Option<QueueEntry>> {
        Ok(self.list().await?.into_iter().next())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::IndexError;
    use crate::port::{IdProvider, TimeProvider};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// In-memory store: vector order is queue order
    pub struct InMemoryEntryStore {
        entries: Mutex<Vec<QueueEntry>>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    }

    impl InMemoryEntryStore {
        pub fn new(id_provider: Arc<dyn IdProvider>, time_provider: Arc<dyn TimeProvider>) -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                id_provider,
                time_provider,
            }
        }

        fn new_entry(&self, name: &str, reason: &str) -> QueueEntry {
            QueueEntry {
                id: self.id_provider.generate_id(),
                name: name.to_string(),
                reason: reason.to_string(),
                added_at: self.time_provider.now(),
                position: 0,
            }
        }
    }

    fn resequence(entries: &mut [QueueEntry]) {
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.position = i as i64;
        }
    }

    #[async_trait]
    impl EntryStore for InMemoryEntryStore {
        async fn list(&self) -> Result<Vec<QueueEntry>> {
            Ok(self.entries.lock().await.clone())
        }

        async fn count(&self) -> Result<usize> {
            Ok(self.entries.lock().await.len())
        }

        async fn append(&self, name: &str, reason: &str) -> Result<QueueEntry> {
            let mut entries = self.entries.lock().await;
            let mut entry = self.new_entry(name, reason);
            entry.position = entries.len() as i64;
            entries.push(entry.clone());
            Ok(entry)
        }

        async fn insert_at(&self, index: i64, name: &str, reason: &str) -> Result<QueueEntry> {
            let mut entries = self.entries.lock().await;
            let slot = IndexError::check(index, entries.len() + 1).map_err(DomainError::from)?;
            entries.insert(slot, self.new_entry(name, reason));
            resequence(&mut entries);
            Ok(entries[slot].clone())
        }

        async fn remove_at(&self, index: i64) -> Result<QueueEntry> {
            let mut entries = self.entries.lock().await;
            let slot = IndexError::check(index, entries.len()).map_err(DomainError::from)?;
            let removed = entries.remove(slot);
            resequence(&mut entries);
            Ok(removed)
        }

        async fn clear(&self) -> Result<Vec<QueueEntry>> {
            Ok(std::mem::take(&mut *self.entries.lock().await))
        }
    }
}
