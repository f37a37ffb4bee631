//! Webhook Request/Response Types

use serde::{Deserialize, Serialize};

/// Form body posted by the chat platform for a slash command
#[derive(Debug, Default, Deserialize)]
pub struct SlashCommandForm {
    /// Everything after the slash command, e.g. `add Alice late`
    #[serde(default)]
    pub text: String,

    /// Originating channel (kept for request logging only)
    #[serde(default)]
    pub channel_id: Option<String>,

    #[serde(default)]
    pub user_name: Option<String>,
}

/// Who sees the reply in the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    InChannel,
    Ephemeral,
}

/// Reply body: `{"response_type": "in_channel", "text": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResponse {
    pub response_type: ResponseType,
    pub text: String,
}

impl SlashResponse {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: coffeeq_core::VERSION.to_string(),
        }
    }
}
