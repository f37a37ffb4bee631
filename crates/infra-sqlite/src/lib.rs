// Coffee Queue Infrastructure - SQLite Adapter
// Implements: EntryStore, AuditLog

mod audit_log;
mod connection;
mod entry_store;
mod error;
mod migration;
mod timestamp;
mod transaction;

pub use audit_log::SqliteAuditLog;
pub use connection::create_pool;
pub use entry_store::SqliteEntryStore;
pub use migration::run_migrations;

// Note: sqlx::Error conversion is handled by a helper (error::map_sqlx_error)
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
