// Command Router - text in, reply text out

pub mod parse;
pub mod reply;

pub use parse::Command;

use crate::application::QueueService;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Routes slash-command text to the queue service
///
/// Domain errors become ordinary replies. Only infrastructure failures
/// (storage, serialization) come back as `Err`.
pub struct CommandRouter {
    service: Arc<QueueService>,
}

impl CommandRouter {
    pub fn new(service: Arc<QueueService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &QueueService {
        &self.service
    }

    /// Handle one command and render the reply
    pub async fn handle(&self, text: &str) -> Result<String> {
        let command = match Command::parse(text) {
            Ok(c) => c,
            Err(e) => {
                debug!(text, error = %e, "Rejected command text");
                return self.reject(AppError::Domain(e)).await;
            }
        };

        info!(verb = command.verb(), "Handling command");

        match self.execute(command).await {
            Ok(reply) => Ok(reply),
            Err(e) => self.reject(e).await,
        }
    }

    async fn execute(&self, command: Command) -> Result<String> {
        let service = &self.service;
        let reply = match command {
            Command::Add { name, reason } => {
                let entry = service.add(&name, &reason).await?;
                reply::added(&entry, &service.snapshot().await?)
            }
            Command::Insert {
                index,
                name,
                reason,
            } => {
                let entry = service.insert(index, &name, &reason).await?;
                reply::inserted(&entry, &service.snapshot().await?)
            }
            Command::Remove { index } => {
                let entry = service.remove(index).await?;
                reply::removed(&entry, &service.snapshot().await?)
            }
            Command::Shoot => {
                let entry = service.shoot().await?;
                reply::shot(&entry, &service.snapshot().await?)
            }
            Command::Clear => {
                service.clear().await?;
                reply::cleared(&service.snapshot().await?)
            }
            Command::Show => {
                let entry = service.show().await?;
                reply::head(&entry, &service.snapshot().await?)
            }
            Command::History => {
                let records = service.history().await?;
                reply::history(&records, service.retention().window().num_days())
            }
            Command::Help => reply::HELP.to_string(),
        };
        Ok(reply)
    }

    /// Turn a domain error into a reply; pass anything else through
    async fn reject(&self, err: AppError) -> Result<String> {
        match err {
            AppError::Domain(e) => {
                let queue = self.service.snapshot().await?;
                Ok(reply::rejected(&e, &queue))
            }
            other => Err(other),
        }
    }
}
