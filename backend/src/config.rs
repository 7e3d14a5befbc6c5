//! Core configuration loaded via OrthoConfig.
//!
//! Values come from `CIVIC_*` environment variables (for example
//! `CIVIC_DATABASE_URL`) layered over optional configuration files.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Runtime settings for the core and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CIVIC")]
pub struct CoreSettings {
    /// PostgreSQL connection URL for the document store.
    pub database_url: Option<String>,
    /// Upper bound on pooled store connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Attempts made for a contended upvote transaction before giving up.
    #[ortho_config(default = 5)]
    pub transaction_attempts: u32,
    /// Push gateway endpoint. Push delivery is disabled when unset.
    pub push_gateway_url: Option<String>,
    /// Bearer token presented to the push gateway.
    pub push_gateway_api_key: Option<String>,
    /// Identity provider admin endpoint used for claim updates.
    pub identity_admin_url: Option<String>,
    /// Bearer token presented to the identity provider.
    pub identity_admin_token: Option<String>,
    /// Timeout applied to outbound HTTP calls, in seconds.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
    /// Emit JSON log lines instead of human-readable ones. Read through
    /// [`CoreSettings::log_json`], which defaults to JSON when unset.
    pub log_json: Option<bool>,
}

impl CoreSettings {
    /// Outbound HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Whether logs are emitted as JSON.
    pub fn log_json(&self) -> bool {
        self.log_json.unwrap_or(true)
    }

    /// Transaction attempt budget, never below one.
    pub fn transaction_attempts(&self) -> u32 {
        self.transaction_attempts.max(1)
    }
}
