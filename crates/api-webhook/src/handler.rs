//! HTTP Handlers

use crate::error::to_error_response;
use crate::types::{HealthResponse, SlashCommandForm, SlashResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use coffeeq_core::application::CommandRouter;
use std::sync::Arc;
use tracing::info;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CommandRouter>,
}

/// POST /qc
///
/// Always 200 for any command outcome, valid or not; only storage or
/// internal faults produce an error status.
pub async fn slash_command(
    State(state): State<AppState>,
    Form(form): Form<SlashCommandForm>,
) -> Response {
    info!(
        channel_id = form.channel_id.as_deref().unwrap_or("-"),
        user_name = form.user_name.as_deref().unwrap_or("-"),
        "Slash command received"
    );

    match state.router.handle(&form.text).await {
        Ok(text) => (StatusCode::OK, Json(SlashResponse::in_channel(text))).into_response(),
        Err(e) => to_error_response(e).into_response(),
    }
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
