// sqlx::Error -> AppError

use coffeeq_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            match db_err.code() {
                // SQLite error codes: https://www.sqlite.org/rescode.html
                Some(code) => match code.as_ref() {
                    "2067" | "1555" => {
                        AppError::Database(format!("Unique constraint violation: {}", message))
                    }
                    "275" => AppError::Database(format!("Check constraint violation: {}", message)),
                    "5" | "517" => {
                        AppError::Database(format!("Database locked (SQLITE_BUSY): {}", message))
                    }
                    "13" => AppError::Database(format!("Database full: {}", message)),
                    other => AppError::Database(format!("Database error [{}]: {}", other, message)),
                },
                None => AppError::Database(format!("Database error: {}", message)),
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}
