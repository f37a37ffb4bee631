// SQLite EntryStore Implementation

use crate::error::map_sqlx_error;
use crate::timestamp;
use crate::transaction::begin_write;
use async_trait::async_trait;
use chrono::SubsecRound;
use coffeeq_core::domain::{DomainError, IndexError, QueueEntry};
use coffeeq_core::error::Result;
use coffeeq_core::port::{EntryStore, IdProvider, TimeProvider};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Queue entries in `queue_entries`, ordered by the `position` column
///
/// Each mutation is one `BEGIN IMMEDIATE` transaction, so the count/shift/insert
/// sequence always sees the order it modifies, even against writers on other
/// connections. Writers in this process are additionally serialized by
/// `write_lock`. Share one instance (behind `Arc`) per database.
pub struct SqliteEntryStore {
    pool: SqlitePool,
    write_lock: Mutex<()>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteEntryStore {
    pub fn new(
        pool: SqlitePool,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
            id_provider,
            time_provider,
        }
    }

    fn new_entry(&self, name: &str, reason: &str, position: i64) -> QueueEntry {
        QueueEntry {
            id: self.id_provider.generate_id(),
            name: name.to_string(),
            reason: reason.to_string(),
            // Stored at millisecond precision
            added_at: self.time_provider.now().trunc_subsecs(3),
            position,
        }
    }
}

async fn count_in(tx: &mut Transaction<'_, Sqlite>) -> Result<usize> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries")
        .fetch_one(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;
    Ok(count as usize)
}

async fn insert_row(tx: &mut Transaction<'_, Sqlite>, entry: &QueueEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO queue_entries (id, name, reason, added_at, position)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.name)
    .bind(&entry.reason)
    .bind(timestamp::encode(entry.added_at))
    .bind(entry.position)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

/// Move every entry at `position >= from` by `delta` (+1 or -1)
///
/// Rows pass through negative positions first so the unique index on
/// `position` holds after every statement.
async fn shift_from(tx: &mut Transaction<'_, Sqlite>, from: i64, delta: i64) -> Result<u64> {
    let moved = sqlx::query(
        "UPDATE queue_entries SET position = -(position + ?) - 1 WHERE position >= ?",
    )
    .bind(delta)
    .bind(from)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?
    .rows_affected();

    sqlx::query("UPDATE queue_entries SET position = -(position + 1) WHERE position < 0")
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

    Ok(moved)
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn list(&self) -> Result<Vec<QueueEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT id, name, reason, added_at, position FROM queue_entries ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn count(&self) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count as usize)
    }

    async fn append(&self, name: &str, reason: &str) -> Result<QueueEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;

        let next: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(position) + 1, 0) FROM queue_entries")
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        let entry = self.new_entry(name, reason, next);
        insert_row(&mut tx, &entry).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(entry)
    }

    async fn insert_at(&self, index: i64, name: &str, reason: &str) -> Result<QueueEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;

        let count = count_in(&mut tx).await?;
        let slot = IndexError::check(index, count + 1).map_err(DomainError::from)? as i64;

        let moved = shift_from(&mut tx, slot, 1).await?;
        let entry = self.new_entry(name, reason, slot);
        insert_row(&mut tx, &entry).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(position = slot, moved, "Inserted entry");
        Ok(entry)
    }

    async fn remove_at(&self, index: i64) -> Result<QueueEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;

        let count = count_in(&mut tx).await?;
        let slot = IndexError::check(index, count).map_err(DomainError::from)? as i64;

        let row: EntryRow = sqlx::query_as(
            "SELECT id, name, reason, added_at, position FROM queue_entries WHERE position = ?",
        )
        .bind(slot)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM queue_entries WHERE id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let moved = shift_from(&mut tx, slot + 1, -1).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(position = slot, moved, "Removed entry");
        row.into_entry()
    }

    async fn clear(&self) -> Result<Vec<QueueEntry>> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;

        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT id, name, reason, added_at, position FROM queue_entries ORDER BY position ASC",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM queue_entries")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        rows.into_iter().map(EntryRow::into_entry).collect()
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct EntryRow {
    id: String,
    name: String,
    reason: String,
    added_at: String,
    position: i64,
}

impl EntryRow {
    fn into_entry(self) -> Result<QueueEntry> {
        Ok(QueueEntry {
            added_at: timestamp::decode(&self.added_at)?,
            id: self.id,
            name: self.name,
            reason: self.reason,
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use coffeeq_core::error::AppError;
    use coffeeq_core::port::id_provider::UuidProvider;
    use coffeeq_core::port::time_provider::SystemTimeProvider;

    async fn setup_store() -> SqliteEntryStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteEntryStore::new(pool, Arc::new(UuidProvider), Arc::new(SystemTimeProvider))
    }

    async fn names(store: &SqliteEntryStore) -> Vec<String> {
        store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    async fn assert_contiguous(store: &SqliteEntryStore) {
        let positions: Vec<i64> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|e| e.position)
            .collect();
        let expected: Vec<i64> = (0..positions.len() as i64).collect();
        assert_eq!(positions, expected);
    }

    #[tokio::test]
    async fn test_append_assigns_dense_positions() {
        let store = setup_store().await;
        for name in ["a", "b", "c"] {
            store.append(name, "reason").await.unwrap();
        }

        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(names(&store).await, vec!["a", "b", "c"]);
        assert_contiguous(&store).await;
    }

    #[tokio::test]
    async fn test_insert_shifts_tail() {
        let store = setup_store().await;
        for name in ["a", "b", "c"] {
            store.append(name, "reason").await.unwrap();
        }

        let inserted = store.insert_at(1, "x", "cut in").await.unwrap();
        assert_eq!(inserted.position, 1);
        assert_eq!(names(&store).await, vec!["a", "x", "b", "c"]);
        assert_contiguous(&store).await;

        // Index == count appends
        store.insert_at(4, "z", "last").await.unwrap();
        assert_eq!(names(&store).await, vec!["a", "x", "b", "c", "z"]);
        assert_contiguous(&store).await;
    }

    #[tokio::test]
    async fn test_insert_then_remove_restores_list() {
        let store = setup_store().await;
        for name in ["a", "b", "c"] {
            store.append(name, "reason").await.unwrap();
        }
        let before = store.list().await.unwrap();

        store.insert_at(0, "x", "cut in").await.unwrap();
        let removed = store.remove_at(0).await.unwrap();

        assert_eq!(removed.name, "x");
        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_out_of_range() {
        let store = setup_store().await;
        store.append("a", "reason").await.unwrap();

        for index in [1, -1, 99] {
            let err = store.remove_at(index).await.unwrap_err();
            assert!(matches!(
                err,
                AppError::Domain(DomainError::InvalidIndex(IndexError::OutOfRange { .. }))
            ));
        }
        assert!(store.insert_at(2, "x", "too far").await.is_err());
        assert_eq!(names(&store).await, vec!["a"]);
    }

    #[tokio::test]
    async fn test_remove_head_rebases_positions() {
        let store = setup_store().await;
        for name in ["a", "b", "c"] {
            store.append(name, "reason").await.unwrap();
        }

        let head = store.remove_head().await.unwrap();
        assert_eq!(head.name, "a");
        assert_eq!(names(&store).await, vec!["b", "c"]);
        assert_contiguous(&store).await;
    }

    #[tokio::test]
    async fn test_remove_head_on_empty_queue() {
        let store = setup_store().await;
        let err = store.remove_head().await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::EmptyQueue)));
    }

    #[tokio::test]
    async fn test_clear_returns_entries_in_order() {
        let store = setup_store().await;
        for name in ["a", "b", "a"] {
            store.append(name, "reason").await.unwrap();
        }

        let cleared = store.clear().await.unwrap();
        let cleared: Vec<_> = cleared.into_iter().map(|e| e.name).collect();
        assert_eq!(cleared, vec!["a", "b", "a"]);
        assert_eq!(store.count().await.unwrap(), 0);

        // Idempotent
        assert!(store.clear().await.unwrap().is_empty());
        // Positions restart at zero
        assert_eq!(store.append("c", "reason").await.unwrap().position, 0);
    }

    #[tokio::test]
    async fn test_duplicate_names_have_distinct_ids() {
        let store = setup_store().await;
        let first = store.append("a", "one").await.unwrap();
        let second = store.append("a", "two").await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_remove_interior_entry() {
        let store = setup_store().await;
        for name in ["a", "b", "c", "d"] {
            store.append(name, "reason").await.unwrap();
        }

        let removed = store.remove_at(1).await.unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(removed.position, 1);
        assert_eq!(names(&store).await, vec!["a", "c", "d"]);
        assert_contiguous(&store).await;
    }

    #[tokio::test]
    async fn test_interior_insert_then_remove_restores_list() {
        let store = setup_store().await;
        for name in ["a", "b", "c", "d"] {
            store.append(name, "reason").await.unwrap();
        }
        let before = store.list().await.unwrap();

        store.insert_at(2, "x", "cut in").await.unwrap();
        assert_eq!(names(&store).await, vec!["a", "b", "x", "c", "d"]);
        assert_contiguous(&store).await;

        assert_eq!(store.remove_at(2).await.unwrap().name, "x");
        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_returned_entries_match_stored_rows() {
        let store = setup_store().await;
        let appended = store.append("a", "late").await.unwrap();
        let inserted = store.insert_at(0, "b", "meeting").await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed[0], inserted);
        assert_eq!(listed[1].added_at, appended.added_at);
        assert_eq!(listed[1].id, appended.id);
    }
}
