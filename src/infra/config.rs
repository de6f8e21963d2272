// src/infra/config.rs — Configuration loading (TOML + environment)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::errors::RelayError;

/// Environment variable overriding the downstream webhook URL.
pub const WEBHOOK_URL_ENV: &str = "LISTING_RELAY_WEBHOOK_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub webhook: WebhookConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Downstream automation webhook that generates the marketing pack.
    pub url: String,
    /// Hard timeout per attempt, in seconds.
    pub timeout_seconds: u64,
    /// Total attempts (1 initial + retries).
    pub max_attempts: u32,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5678/webhook/listing-launch".into(),
            timeout_seconds: 10,
            max_attempts: 3,
        }
    }
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// How long a completed session's cached response remains servable, in seconds.
    pub retention_seconds: u64,
    /// How long an in-progress entry may persist before it is treated as
    /// abandoned, in seconds.
    pub stall_seconds: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retention_seconds: 600,
            stall_seconds: 30,
        }
    }
}

impl LedgerConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_seconds)
    }

    pub fn stall(&self) -> Duration {
        Duration::from_secs(self.stall_seconds)
    }
}

impl Config {
    /// Load config from an optional file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            if !url.is_empty() {
                self.webhook.url = url;
            }
        }
    }

    /// Sanity-check values that would otherwise fail at request time.
    pub fn validate(&self) -> Result<(), RelayError> {
        url::Url::parse(&self.webhook.url)
            .map_err(|e| RelayError::Config(format!("bad webhook url '{}': {e}", self.webhook.url)))?;
        if self.webhook.max_attempts == 0 {
            return Err(RelayError::Config("webhook.max_attempts must be at least 1".into()));
        }
        if self.webhook.timeout_seconds == 0 {
            return Err(RelayError::Config("webhook.timeout_seconds must be at least 1".into()));
        }
        Ok(())
    }
}
