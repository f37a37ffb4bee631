//! Shared wiring for the integration tests

use chrono::{DateTime, TimeZone, Utc};
use coffeeq_core::application::{CommandRouter, QueueService};
use coffeeq_core::domain::{Retention, Roster};
use coffeeq_core::port::id_provider::UuidProvider;
use coffeeq_core::port::time_provider::mocks::ManualClock;
use coffeeq_core::port::{AuditLog, EntryStore};
use coffeeq_infra_sqlite::{create_pool, run_migrations, SqliteAuditLog, SqliteEntryStore};
use std::sync::Arc;

/// Fully wired queue over one SQLite database
pub struct Harness {
    pub router: CommandRouter,
    pub service: Arc<QueueService>,
    pub entries: Arc<dyn EntryStore>,
    pub audit: Arc<dyn AuditLog>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap()
}

impl Harness {
    pub async fn new(database_url: &str, roster: &[&str]) -> Harness {
        let pool = create_pool(database_url).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(ManualClock::new(start_time()));
        let ids = Arc::new(UuidProvider);
        let entries: Arc<dyn EntryStore> =
            Arc::new(SqliteEntryStore::new(pool.clone(), ids.clone(), clock.clone()));
        let audit: Arc<dyn AuditLog> = Arc::new(SqliteAuditLog::new(pool));

        let service = Arc::new(QueueService::new(
            entries.clone(),
            audit.clone(),
            Roster::new(roster),
            Retention::default(),
            ids,
            clock.clone(),
        ));

        Harness {
            router: CommandRouter::new(service.clone()),
            service,
            entries,
            audit,
            clock,
        }
    }

    pub async fn in_memory(roster: &[&str]) -> Harness {
        Harness::new("sqlite::memory:", roster).await
    }

    /// Queue names head first
    pub async fn names(&self) -> Vec<String> {
        self.entries
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    /// Positions are exactly 0..count
    pub async fn assert_contiguous(&self) {
        let positions: Vec<i64> = self
            .entries
            .list()
            .await
            .unwrap()
            .iter()
            .map(|e| e.position)
            .collect();
        let expected: Vec<i64> = (0..positions.len() as i64).collect();
        assert_eq!(positions, expected, "positions must be dense and ordered");
    }
}
