// SQLite AuditLog Implementation

use crate::error::map_sqlx_error;
use crate::timestamp;
use crate::transaction::begin_write;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coffeeq_core::domain::{LogAction, LogRecord, Retention};
use coffeeq_core::error::{AppError, Result};
use coffeeq_core::port::AuditLog;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Audit records in `audit_logs`
pub struct SqliteAuditLog {
    pool: SqlitePool,
    /// Serializes prune-then-insert against other appends
    write_lock: Mutex<()>,
}

impl SqliteAuditLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Mutex::new(()),
        }
    }
}

async fn insert_row(tx: &mut Transaction<'_, Sqlite>, record: &LogRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, username, reason, occurred_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(record.action.as_str())
    .bind(&record.username)
    .bind(&record.reason)
    .bind(timestamp::encode(record.occurred_at))
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

async fn delete_before(tx: &mut Transaction<'_, Sqlite>, cutoff: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM audit_logs WHERE occurred_at < ?")
        .bind(timestamp::encode(cutoff))
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;
    Ok(result.rows_affected())
}

#[async_trait]
impl AuditLog for SqliteAuditLog {
    async fn insert(&self, record: &LogRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;
        insert_row(&mut tx, record).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;
        let pruned = delete_before(&mut tx, cutoff).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(pruned)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
        let rows: Vec<LogRow> = sqlx::query_as(
            r#"
            SELECT id, action, username, reason, occurred_at
            FROM audit_logs
            WHERE occurred_at >= ?
            ORDER BY occurred_at ASC, rowid ASC
            "#,
        )
        .bind(timestamp::encode(since))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(LogRow::into_record).collect()
    }

    async fn append(&self, record: &LogRecord, retention: Retention) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = begin_write(&self.pool).await?;

        // A DELETE aborted by a constraint or trigger rolls back only itself
        let cutoff = retention.cutoff(record.occurred_at);
        match delete_before(&mut tx, cutoff).await {
            Ok(0) => {}
            Ok(pruned) => debug!(pruned, cutoff = %cutoff, "Pruned expired audit records"),
            Err(e) => warn!(error = ?e, "Audit prune failed (continuing with append)"),
        }

        insert_row(&mut tx, record).await?;
        tx.commit().await.map_err(map_sqlx_error)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct LogRow {
    id: String,
    action: String,
    username: String,
    reason: String,
    occurred_at: String,
}

impl LogRow {
    fn into_record(self) -> Result<LogRecord> {
        let action: LogAction = self.action.parse().map_err(AppError::Database)?;
        Ok(LogRecord {
            occurred_at: timestamp::decode(&self.occurred_at)?,
            id: self.id,
            action,
            username: self.username,
            reason: self.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use chrono::{Duration, TimeZone};

    async fn setup_log() -> SqliteAuditLog {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteAuditLog::new(pool)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_append_prunes_older_than_window() {
        let log = setup_log().await;

        let stale = LogRecord::new("old", LogAction::Add, "Alice", "late", now() - Duration::days(31));
        log.insert(&stale).await.unwrap();

        let fresh = LogRecord::new("new", LogAction::Shoot, "Alice", "", now());
        log.append(&fresh, Retention::default()).await.unwrap();

        // Look further back than the window to prove the row is gone
        let all = log.list_since(now() - Duration::days(365)).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], fresh);
    }

    #[tokio::test]
    async fn test_list_since_is_chronological() {
        let log = setup_log().await;

        // Inserted out of time order; ties keep insertion order
        let records = [
            LogRecord::new("b", LogAction::Clear, "Bob", "", now()),
            LogRecord::new("a", LogAction::Add, "Alice", "late", now() - Duration::hours(1)),
            LogRecord::new("c", LogAction::Clear, "Alice", "", now()),
        ];
        for record in &records {
            log.insert(record).await.unwrap();
        }

        let listed = log.list_since(now() - Duration::days(30)).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_list_since_excludes_older_records() {
        let log = setup_log().await;
        log.insert(&LogRecord::new("x", LogAction::Remove, "Bob", "", now() - Duration::days(40)))
            .await
            .unwrap();

        assert!(log
            .list_since(now() - Duration::days(30))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(log.prune_before(now() - Duration::days(30)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_survives_failed_prune() {
        let log = setup_log().await;
        sqlx::query(
            "CREATE TRIGGER block_prune BEFORE DELETE ON audit_logs \
             BEGIN SELECT RAISE(ABORT, 'prune blocked'); END",
        )
        .execute(&log.pool)
        .await
        .unwrap();

        let stale = LogRecord::new("old", LogAction::Add, "Alice", "late", now() - Duration::days(31));
        log.insert(&stale).await.unwrap();
        assert!(log.prune_before(now() - Duration::days(30)).await.is_err());

        let fresh = LogRecord::new("new", LogAction::Insert, "Bob", "meeting", now());
        log.append(&fresh, Retention::default()).await.unwrap();

        let all = log.list_since(now() - Duration::days(365)).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["old", "new"]);
    }
}
