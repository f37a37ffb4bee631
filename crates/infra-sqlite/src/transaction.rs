// Write transactions

use crate::error::map_sqlx_error;
use coffeeq_core::error::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Begin a transaction that holds the database write lock from its first statement
///
/// A deferred transaction that reads before writing cannot upgrade once
/// another connection has committed (WAL returns `SQLITE_BUSY_SNAPSHOT`
/// without consulting the busy timeout). `BEGIN IMMEDIATE` waits on the busy
/// timeout instead, so every read inside sees the latest commit.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(map_sqlx_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use std::time::Duration;

    #[tokio::test]
    async fn test_second_writer_waits_for_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.db");
        let pool = create_pool(path.to_str().unwrap()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let mut first = begin_write(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO queue_entries (id, name, reason, added_at, position) \
             VALUES ('a', 'Alice', 'late', '2024-03-07T09:00:00.000Z', 0)",
        )
        .execute(&mut *first)
        .await
        .unwrap();

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move {
                let mut second = begin_write(&pool).await.unwrap();
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries")
                    .fetch_one(&mut *second)
                    .await
                    .unwrap();
                second.commit().await.unwrap();
                count
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        first.commit().await.unwrap();

        // The second transaction started after the first committed
        assert_eq!(waiter.await.unwrap(), 1);
    }
}
