// Audit Log Domain Model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default rolling retention window for audit records
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Action recorded against the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Add,
    Remove,
    Insert,
    Shoot,
    Clear,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Add => "add",
            LogAction::Remove => "remove",
            LogAction::Insert => "insert",
            LogAction::Shoot => "shoot",
            LogAction::Clear => "clear",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(LogAction::Add),
            "remove" => Ok(LogAction::Remove),
            "insert" => Ok(LogAction::Insert),
            "shoot" => Ok(LogAction::Shoot),
            "clear" => Ok(LogAction::Clear),
            other => Err(format!("unknown log action: {}", other)),
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub action: LogAction,
    /// Subject of the action (may no longer be queued)
    pub username: String,
    /// Empty when the action carries no reason
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(
        id: impl Into<String>,
        action: LogAction,
        username: impl Into<String>,
        reason: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            action,
            username: username.into(),
            reason: reason.into(),
            occurred_at,
        }
    }

    /// Render as `"[{timestamp}] - {action} - {username}[ - {reason}]"`
    pub fn render(&self) -> String {
        let mut line = format!(
            "[{}] - {} - {}",
            self.occurred_at.format("%Y-%m-%d %H:%M:%S"),
            self.action,
            self.username
        );
        if !self.reason.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.reason);
        }
        line
    }
}

/// Retention policy for the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    window: Duration,
}

impl Retention {
    pub fn days(days: i64) -> Self {
        Self {
            window: Duration::days(days),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Oldest instant still inside the window
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self::days(DEFAULT_RETENTION_DAYS)
    }
}
