//! Client configuration
//!
//! This module contains the configuration structures used to set up an
//! [`HttpClient`](crate::http::HttpClient) and default walk options, loaded
//! from YAML.
//!
//! ```yaml
//! base_url: https://api.twitter.com
//! timeout_secs: 30
//! max_retries: 3
//! backoff:
//!   type: exponential
//!   initial_ms: 100
//!   max_ms: 60000
//! headers:
//!   Authorization: Bearer AAAA...
//! pagination:
//!   empty_response_limit: 1
//!   limit: 500
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::{WalkOptions, EMPTY_RESPONSE_LIMIT};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL for API requests
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for transient failures
    pub max_retries: u32,

    /// Backoff between retries
    pub backoff: BackoffConfig,

    /// Custom user agent
    pub user_agent: Option<String>,

    /// Headers sent with every request (e.g. `Authorization`)
    pub headers: HashMap<String, String>,

    /// Pagination settings
    pub pagination: PaginationSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffConfig::default(),
            user_agent: None,
            headers: HashMap::new(),
            pagination: PaginationSettings::default(),
        }
    }
}

// ============================================================================
// Backoff
// ============================================================================

/// Retry backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Backoff type
    #[serde(rename = "type")]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: 100,
            max_ms: 60_000,
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Defaults applied to paginated walks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    /// Consecutive empty rounds tolerated before a walk halts
    pub empty_response_limit: u32,

    /// Stop fetching once this many elements are buffered
    pub limit: Option<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            empty_response_limit: EMPTY_RESPONSE_LIMIT,
            limit: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values make sense
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.pagination.empty_response_limit == 0 {
            return Err(Error::invalid_value(
                "pagination.empty_response_limit",
                "must be at least 1",
            ));
        }

        if self.backoff.initial_ms > self.backoff.max_ms {
            return Err(Error::invalid_value(
                "backoff.initial_ms",
                "must not exceed backoff.max_ms",
            ));
        }

        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );

        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }

    /// Walk options derived from this config
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions::new().empty_response_limit(self.pagination.empty_response_limit)
    }
}
