// Timestamp column encoding

use chrono::{DateTime, SecondsFormat, Utc};
use coffeeq_core::error::{AppError, Result};

/// Fixed-width RFC 3339 (`2024-03-07T09:30:00.000Z`), so text order is time order
pub(crate) fn encode(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn decode(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Bad timestamp {:?}: {}", raw, e)))
}
