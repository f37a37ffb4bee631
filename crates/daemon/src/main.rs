//! Coffee Queue - Main Entry Point
//! Slash-command webhook backed by SQLite

mod logging;
mod settings;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Import workspace crates
use coffeeq_api_webhook::{WebhookServer, WebhookServerConfig};
use coffeeq_core::application::{CommandRouter, QueueService};
use coffeeq_core::domain::{Retention, Roster};
use coffeeq_core::port::id_provider::UuidProvider;
use coffeeq_core::port::time_provider::SystemTimeProvider;
use coffeeq_infra_sqlite::{create_pool, run_migrations, SqliteAuditLog, SqliteEntryStore};
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load()?;

    // 2. Initialize logging
    let _log_guard = logging::init_logging(settings.log_format)?;
    info!("Coffee Queue v{} starting...", VERSION);

    let roster = Roster::new(&settings.roster);
    if roster.is_empty() {
        warn!("Roster is empty: every add/insert will be rejected (set COFFEEQ_ROSTER)");
    }
    info!(members = roster.len(), "Roster loaded");

    // 3. Initialize database
    info!(database_url = %settings.database_url, "Initializing database...");
    ensure_parent_dir(&settings.database_url)?;
    let pool = create_pool(&settings.database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let entries = Arc::new(SqliteEntryStore::new(
        pool.clone(),
        id_provider.clone(),
        time_provider.clone(),
    ));
    let audit = Arc::new(SqliteAuditLog::new(pool.clone()));

    let service = Arc::new(QueueService::new(
        entries,
        audit,
        roster,
        Retention::days(settings.log_retention_days),
        id_provider,
        time_provider,
    ));
    let router = Arc::new(CommandRouter::new(service));

    // 5. Serve until Ctrl+C
    let server = WebhookServer::new(
        WebhookServerConfig {
            host: settings.host.clone(),
            port: settings.port,
        },
        router,
    );

    info!("Press Ctrl+C to shutdown");
    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = ?e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received. Exiting gracefully...");
        })
        .await
        .context("Webhook server failed")?;

    pool.close().await;
    info!("Shutdown complete.");

    Ok(())
}

/// Create the directory holding a file database
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if path.contains(":memory:") {
        return Ok(());
    }
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
