//! Webhook Error Mapping
//!
//! Command validation never reaches here (it is reply text). What does is
//! an infrastructure fault, answered with a non-2xx status and an
//! ephemeral message so only the caller sees it.

use crate::types::SlashResponse;
use axum::http::StatusCode;
use axum::Json;
use coffeeq_core::error::AppError;
use tracing::error;

/// Convert AppError to an HTTP status + reply body
pub fn to_error_response(err: AppError) -> (StatusCode, Json<SlashResponse>) {
    match err {
        // Should have been rendered by the router; answer it anyway
        AppError::Domain(e) => (StatusCode::OK, Json(SlashResponse::in_channel(e.to_string()))),
        AppError::Database(msg) => {
            error!(error = %msg, "Storage failure while handling command");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(SlashResponse::ephemeral(
                    "The coffee queue storage is unavailable. Please try again later.",
                )),
            )
        }
        other => {
            error!(error = ?other, "Internal error while handling command");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SlashResponse::ephemeral("Internal error. Please try again later.")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeeq_core::domain::DomainError;

    #[test]
    fn test_status_mapping() {
        let (status, body) = to_error_response(AppError::Database("disk I/O error".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.0.response_type, crate::types::ResponseType::Ephemeral);

        let (status, _) = to_error_response(AppError::Internal("boom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = to_error_response(AppError::Domain(DomainError::EmptyQueue));
        assert_eq!(status, StatusCode::OK);
    }
}
