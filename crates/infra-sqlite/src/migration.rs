// Schema migrations

use coffeeq_core::error::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::map_sqlx_error;
use crate::transaction::begin_write;

/// Ordered (version, name, sql); versions are applied once, lowest first
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "initial schema",
    include_str!("../migrations/001_initial_schema.sql"),
)];

/// Bring the schema up to the latest version
///
/// Each pending migration runs in its own write transaction together with
/// its `schema_version` row, so a failed migration leaves no trace.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(map_sqlx_error)?;

    for &(version, name, sql) in MIGRATIONS {
        let mut tx = begin_write(pool).await?;

        // Re-read under the write lock; another process may have migrated
        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version WHERE version = ?")
            .bind(version)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if applied > 0 {
            debug!(version, "Migration already applied");
            continue;
        }

        info!(version, name, "Applying migration");
        sqlx::raw_sql(sql)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
    }

    Ok(())
}
