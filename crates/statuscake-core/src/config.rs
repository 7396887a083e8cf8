//! Configuration types for the StatusCake provider
//!
//! The provider block recognizes an API key (sensitive, falls back to
//! `STATUSCAKE_API_KEY`), plus the API base URL and request timeout.

use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable consulted when `api_key` is not configured
pub const API_KEY_ENV: &str = "STATUSCAKE_API_KEY";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "STATUSCAKE_API_URL";

/// Environment variable overriding the request timeout
pub const TIMEOUT_ENV: &str = "STATUSCAKE_TIMEOUT_SECS";

/// Public StatusCake v1 endpoint
pub const DEFAULT_API_URL: &str = "https://api.statuscake.com/v1";

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// StatusCake API key
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the StatusCake API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, crate::Error> {
        let timeout_secs = match env::var(TIMEOUT_ENV) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                crate::Error::config(format!("{} must be an integer. Got: {}", TIMEOUT_ENV, raw))
            })?,
            Err(_) => default_timeout_secs(),
        };

        Ok(Self {
            api_key: env::var(API_KEY_ENV).ok(),
            api_url: env::var(API_URL_ENV).unwrap_or_else(|_| default_api_url()),
            timeout_secs,
        })
    }

    /// The API key, once validated to be present
    pub fn api_key(&self) -> Result<&str, crate::Error> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(crate::Error::config("Missing api_key")),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.api_key()?;

        let url = reqwest::Url::parse(&self.api_url).map_err(|e| {
            crate::Error::config(format!("api_url is not a valid URL ({}): {}", e, self.api_url))
        })?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(crate::Error::config(format!(
                "api_url must use HTTP or HTTPS scheme. Got: {}",
                self.api_url
            )));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "timeout_secs must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
