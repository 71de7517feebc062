//! Configuration for the inspection record service

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the STCH REST backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API root, e.g. "http://localhost:3000/api"
    pub base_url: String,

    /// Session token sent as a bearer credential
    pub auth_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `STCH_API_URL`: API root (default: "http://localhost:3000/api")
    /// - `STCH_API_TOKEN`: Session token (default: none)
    /// - `STCH_API_TIMEOUT_SECS`: Request timeout (default: 30)
    #[must_use = "creates config from environment variables"]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("STCH_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let auth_token = lookup("STCH_API_TOKEN").filter(|s| !s.is_empty());

        let timeout_secs = lookup("STCH_API_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            auth_token,
            timeout_secs,
        }
    }

    /// Set the session token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

impl Default for ServiceConfig {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
