//! Coffee Queue CLI - post slash commands to a running webhook
//!
//! Sends exactly what the chat platform would: a form-encoded `POST /qc`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;

const DEFAULT_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser)]
#[command(name = "coffeeq")]
#[command(about = "Coffee queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Webhook base URL
    #[arg(long, env = "COFFEEQ_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Channel id sent with the command
    #[arg(long, env = "COFFEEQ_CHANNEL", default_value = "cli")]
    channel: String,

    /// User name sent with the command
    #[arg(long, env = "USER", default_value = "cli")]
    user: String,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Queue someone at the tail
    Add {
        name: String,
        /// Reason (remaining words)
        #[arg(required = true, num_args = 1..)]
        reason: Vec<String>,
    },

    /// Queue someone at a zero-based index
    Insert {
        index: i64,
        name: String,
        #[arg(required = true, num_args = 1..)]
        reason: Vec<String>,
    },

    /// Remove the entry at a zero-based index
    Remove { index: i64 },

    /// The head pays and leaves the queue
    Shoot,

    /// Show who pays next
    Show,

    /// Empty the queue
    Clear,

    /// Recent actions
    History,

    /// Server-side usage text (the `help` slash command)
    Usage,

    /// Send raw command text as typed in chat
    Raw {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Check the health endpoint
    Health,
}

impl Commands {
    /// Slash-command text for this subcommand (`None` for non-command calls)
    fn text(&self) -> Option<String> {
        let text = match self {
            Commands::Add { name, reason } => format!("add {} {}", name, reason.join(" ")),
            Commands::Insert {
                index,
                name,
                reason,
            } => format!("insert {} {} {}", index, name, reason.join(" ")),
            Commands::Remove { index } => format!("remove {}", index),
            Commands::Shoot => "shoot".to_string(),
            Commands::Show => "show".to_string(),
            Commands::Clear => "clear".to_string(),
            Commands::History => "history".to_string(),
            Commands::Usage => "help".to_string(),
            Commands::Raw { text } => text.join(" "),
            Commands::Health => return None,
        };
        Some(text)
    }
}

#[derive(Deserialize)]
struct SlashResponse {
    #[allow(dead_code)]
    response_type: String,
    text: String,
}

async fn post_command(cli: &Cli, text: &str) -> Result<String> {
    let url = format!("{}/qc", cli.url.trim_end_matches('/'));

    let response = reqwest::Client::new()
        .post(&url)
        .form(&[
            ("text", text),
            ("channel_id", cli.channel.as_str()),
            ("user_name", cli.user.as_str()),
        ])
        .send()
        .await
        .context("Failed to connect to webhook")?;

    let status = response.status();
    let body: SlashResponse = response
        .json()
        .await
        .context("Failed to parse response")?;

    if !status.is_success() {
        anyhow::bail!("Webhook error ({}): {}", status, body.text);
    }
    Ok(body.text)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.text() {
        Some(text) => {
            let reply = post_command(&cli, &text).await?;
            println!("{}", reply);
        }
        None => {
            let url = format!("{}/health", cli.url.trim_end_matches('/'));
            match reqwest::get(&url).await {
                Ok(resp) if resp.status().is_success() => {
                    let body: serde_json::Value = resp.json().await.unwrap_or_default();
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Version:".bold(), body["version"]);
                }
                Ok(resp) => {
                    println!("  {} {}", "Status:".bold(), resp.status().to_string().red());
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "OFFLINE".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
