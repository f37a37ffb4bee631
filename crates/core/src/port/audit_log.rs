// Audit Log Port (Interface)

use crate::domain::{LogRecord, Retention};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Append-only action log with rolling retention
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Store one record as-is
    async fn insert(&self, record: &LogRecord) -> Result<()>;

    /// Delete records older than `cutoff`
    ///
    /// # Returns
    /// Number of records deleted
    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    /// Records with `occurred_at >= since`, oldest first (insertion order on ties)
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>>;

    /// Prune past the retention window, then insert
    ///
    /// The prune is best-effort: a failure is logged and the insert still
    /// happens. The insert failure is returned.
    async fn append(&self, record: &LogRecord, retention: Retention) -> Result<()> {
        let cutoff = retention.cutoff(record.occurred_at);
        match self.prune_before(cutoff).await {
            Ok(0) => {}
            Ok(pruned) => tracing::debug!(pruned, cutoff = %cutoff, "Pruned expired audit records"),
            Err(e) => tracing::warn!(error = ?e, "Audit prune failed (continuing with append)"),
        }
        self.insert(record).await
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory audit log
    #[derive(Default)]
    pub struct InMemoryAuditLog {
        records: Mutex<Vec<LogRecord>>,
    }

    impl InMemoryAuditLog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every stored record, including ones outside any window
        pub fn all(&self) -> Vec<LogRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AuditLog for InMemoryAuditLog {
        async fn insert(&self, record: &LogRecord) -> Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.occurred_at >= cutoff);
            Ok((before - records.len()) as u64)
        }

        async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
            let mut found: Vec<LogRecord> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.occurred_at >= since)
                .cloned()
                .collect();
            // Stable sort keeps insertion order among equal timestamps
            found.sort_by_key(|r| r.occurred_at);
            Ok(found)
        }
    }

    /// Audit log that stores records but cannot delete them
    #[derive(Default)]
    pub struct UnprunableAuditLog {
        inner: InMemoryAuditLog,
    }

    impl UnprunableAuditLog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn all(&self) -> Vec<LogRecord> {
            self.inner.all()
        }
    }

    #[async_trait]
    impl AuditLog for UnprunableAuditLog {
        async fn insert(&self, record: &LogRecord) -> Result<()> {
            self.inner.insert(record).await
        }

        async fn prune_before(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
            Err(AppError::Database("prune unavailable".to_string()))
        }

        async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
            self.inner.list_since(since).await
        }
    }

    /// Audit log whose writes always fail (for best-effort logging tests)
    pub struct FailingAuditLog;

    #[async_trait]
    impl AuditLog for FailingAuditLog {
        async fn insert(&self, _record: &LogRecord) -> Result<()> {
            Err(AppError::Database("audit log unavailable".to_string()))
        }

        async fn prune_before(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
            Err(AppError::Database("audit log unavailable".to_string()))
        }

        async fn list_since(&self, _since: DateTime<Utc>) -> Result<Vec<LogRecord>> {
            Ok(Vec::new())
        }
    }
}
