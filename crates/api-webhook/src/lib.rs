//! Slash-Command Webhook Layer
//!
//! Exposes the command router over HTTP: `POST /qc` takes the chat
//! platform's form-encoded slash command, `GET /health` is the probe.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{WebhookServer, WebhookServerConfig};
