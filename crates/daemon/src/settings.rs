//! Runtime settings
//!
//! Layered with the `config` crate: defaults, then an optional TOML file
//! (`COFFEEQ_CONFIG`, else `config/coffeeq.toml`), then `COFFEEQ_*`
//! environment variables. `COFFEEQ_ROSTER` is comma separated.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config/coffeeq.toml";
const DEFAULT_DB_PATH: &str = "~/.coffeeq/queue.db";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub roster: Vec<String>,
    pub log_retention_days: i64,
    pub log_format: LogFormat,
}

impl Settings {
    /// Load from the default file location and the process environment
    pub fn load() -> Result<Self> {
        let file =
            std::env::var("COFFEEQ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        // The original deployment convention: plain PORT wins over the default
        let port = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok());
        Self::from_sources(Some(file.as_str()), Environment::with_prefix("COFFEEQ"), port)
    }

    fn from_sources(file: Option<&str>, env: Environment, port: Option<u16>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("database_url", DEFAULT_DB_PATH)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("log_retention_days", coffeeq_core::domain::DEFAULT_RETENTION_DAYS)?
            .set_default("log_format", "pretty")?;

        if let Some(port) = port {
            builder = builder.set_default("port", i64::from(port))?;
        }
        if let Some(path) = file {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                env.try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("roster"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings.expanded())
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("port must be non-zero");
        }
        if self.log_retention_days <= 0 {
            bail!("log_retention_days must be positive");
        }
        if self.roster.iter().any(|n| n.trim().is_empty()) {
            bail!("roster contains a blank name");
        }
        Ok(())
    }

    fn expanded(mut self) -> Self {
        self.database_url = shellexpand::tilde(&self.database_url).into_owned();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("COFFEEQ").source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(None, env(&[]), None).unwrap();
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.log_retention_days, 30);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.roster.is_empty());
        assert!(settings.database_url.ends_with(".coffeeq/queue.db"));
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_sources(
            None,
            env(&[
                ("COFFEEQ_ROSTER", "Alice,Bob"),
                ("COFFEEQ_PORT", "8080"),
                ("COFFEEQ_LOG_FORMAT", "json"),
                ("COFFEEQ_DATABASE_URL", "sqlite::memory:"),
            ]),
            Some(9000),
        )
        .unwrap();
        assert_eq!(settings.roster, vec!["Alice", "Bob"]);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.database_url, "sqlite::memory:");
    }

    #[test]
    fn test_plain_port_fallback() {
        let settings = Settings::from_sources(None, env(&[]), Some(9000)).unwrap();
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn test_rejects_bad_retention() {
        let result =
            Settings::from_sources(None, env(&[("COFFEEQ_LOG_RETENTION_DAYS", "0")]), None);
        assert!(result.is_err());
    }
}
