//! Webhook HTTP Server

use crate::handler::{health, slash_command, AppState};
use axum::routing::{get, post};
use axum::Router;
use coffeeq_core::application::CommandRouter;
use coffeeq_core::error::{AppError, Result};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Webhook Server Configuration
#[derive(Debug, Clone)]
pub struct WebhookServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebhookServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Webhook Server
pub struct WebhookServer {
    config: WebhookServerConfig,
    router: Arc<CommandRouter>,
}

impl WebhookServer {
    pub fn new(config: WebhookServerConfig, router: Arc<CommandRouter>) -> Self {
        Self { config, router }
    }

    /// HTTP routes with request tracing
    pub fn app(&self) -> Router {
        let state = AppState {
            router: Arc::clone(&self.router),
        };

        Router::new()
            .route("/qc", post(slash_command))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Webhook server listening"
        );

        axum::serve(listener, self.app())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AppError::Internal(format!("Webhook server failed on {}: {}", addr, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResponseType, SlashResponse};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use coffeeq_core::application::QueueService;
    use coffeeq_core::domain::{Retention, Roster};
    use coffeeq_core::port::audit_log::mocks::InMemoryAuditLog;
    use coffeeq_core::port::entry_store::mocks::InMemoryEntryStore;
    use coffeeq_core::port::id_provider::mocks::SequentialIdProvider;
    use coffeeq_core::port::time_provider::mocks::ManualClock;
    use tower::ServiceExt;

    fn app() -> Router {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap(),
        ));
        let ids = Arc::new(SequentialIdProvider::new("e"));
        let service = QueueService::new(
            Arc::new(InMemoryEntryStore::new(ids.clone(), clock.clone())),
            Arc::new(InMemoryAuditLog::new()),
            Roster::new(["Alice", "Bob"]),
            Retention::default(),
            ids,
            clock,
        );
        let router = Arc::new(CommandRouter::new(Arc::new(service)));
        WebhookServer::new(WebhookServerConfig::default(), router).app()
    }

    fn form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/qc")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn reply(app: Router, body: &'static str) -> (StatusCode, SlashResponse) {
        let response = app.oneshot(form(body)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_add_command() {
        let (status, body) = reply(app(), "text=add+Alice+late&channel_id=C123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.response_type, ResponseType::InChannel);
        assert!(body.text.ends_with("Alice (03/07 : late)"));
    }

    #[tokio::test]
    async fn test_invalid_command_is_still_ok() {
        let (status, body) = reply(app(), "text=remove+banana").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.text.contains("is not a number"));

        let (status, body) = reply(app(), "channel_id=C123").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.text.starts_with("Invalid command"));
    }

    #[tokio::test]
    async fn test_state_is_shared_between_requests() {
        let app = app();
        reply(app.clone(), "text=add+Bob+meeting").await;
        let (_, body) = reply(app, "text=show").await;
        assert!(body.text.starts_with("Bob is about to pay"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
