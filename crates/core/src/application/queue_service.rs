// Queue Service - the command algebra over EntryStore + AuditLog

use crate::domain::{DomainError, LogAction, LogRecord, QueueEntry, Retention, Roster};
use crate::error::Result;
use crate::port::{AuditLog, EntryStore, IdProvider, TimeProvider};
use std::sync::Arc;
use tracing::{info, warn};

/// Queue Service
///
/// Store mutations are mandatory; audit appends are best-effort. A failed
/// append is logged and never undoes or masks the mutation that preceded it.
pub struct QueueService {
    entries: Arc<dyn EntryStore>,
    audit: Arc<dyn AuditLog>,
    roster: Roster,
    retention: Retention,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl QueueService {
    pub fn new(
        entries: Arc<dyn EntryStore>,
        audit: Arc<dyn AuditLog>,
        roster: Roster,
        retention: Retention,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            entries,
            audit,
            roster,
            retention,
            id_provider,
            time_provider,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Current queue, head first
    pub async fn snapshot(&self) -> Result<Vec<QueueEntry>> {
        self.entries.list().await
    }

    /// Append `name` to the tail
    pub async fn add(&self, name: &str, reason: &str) -> Result<QueueEntry> {
        self.check_member(name, reason)?;

        let entry = self.entries.append(name, reason).await?;
        info!(name = %entry.name, position = entry.position, "Added to queue");

        self.record(LogAction::Add, &entry.name, &entry.reason).await;
        Ok(entry)
    }

    /// Put `name` at zero-based `index`, pushing later entries back
    pub async fn insert(&self, index: i64, name: &str, reason: &str) -> Result<QueueEntry> {
        self.check_member(name, reason)?;

        let entry = self.entries.insert_at(index, name, reason).await?;
        info!(name = %entry.name, position = entry.position, "Inserted into queue");

        self.record(LogAction::Insert, &entry.name, &entry.reason).await;
        Ok(entry)
    }

    /// Remove the entry at zero-based `index`
    pub async fn remove(&self, index: i64) -> Result<QueueEntry> {
        let removed = self.entries.remove_at(index).await?;
        info!(name = %removed.name, index, "Removed from queue");

        self.record(LogAction::Remove, &removed.name, "").await;
        Ok(removed)
    }

    /// Remove the head; the returned entry is the one paying
    pub async fn shoot(&self) -> Result<QueueEntry> {
        let shot = self.entries.remove_head().await?;
        info!(name = %shot.name, "Shot head of queue");

        self.record(LogAction::Shoot, &shot.name, "").await;
        Ok(shot)
    }

    /// Empty the queue, one `clear` record per removed entry in queue order
    pub async fn clear(&self) -> Result<Vec<QueueEntry>> {
        let removed = self.entries.clear().await?;
        info!(cleared = removed.len(), "Cleared queue");

        for entry in &removed {
            self.record(LogAction::Clear, &entry.name, "").await;
        }
        Ok(removed)
    }

    /// Current head without mutating anything
    pub async fn show(&self) -> Result<QueueEntry> {
        self.entries
            .head()
            .await?
            .ok_or_else(|| DomainError::EmptyQueue.into())
    }

    /// Records inside the retention window, oldest first
    pub async fn history(&self) -> Result<Vec<LogRecord>> {
        let since = self.retention.cutoff(self.time_provider.now());
        self.audit.list_since(since).await
    }

    fn check_member(&self, name: &str, reason: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(DomainError::MissingArgument("name").into());
        }
        if !self.roster.contains(name) {
            return Err(DomainError::NotInRoster(name.to_string()).into());
        }
        if reason.trim().is_empty() {
            return Err(DomainError::MissingArgument("reason").into());
        }
        Ok(())
    }

    async fn record(&self, action: LogAction, username: &str, reason: &str) {
        let record = LogRecord::new(
            self.id_provider.generate_id(),
            action,
            username,
            reason,
            self.time_provider.now(),
        );

        if let Err(e) = self.audit.append(&record, self.retention).await {
            warn!(error = ?e, action = %action, username, "Audit append failed");
        }
    }
}
