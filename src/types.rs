//! Common types used throughout twitter-rest
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// Request verb understood by [`Requester`](crate::http::Requester)
///
/// `Post` and `Put` send parameters as a form body, while `JsonPost` and
/// `JsonPut` send them as a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    JsonPost,
    JsonPut,
}

impl Method {
    /// Whether parameters travel in the query string
    pub fn uses_query(self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }

    /// Whether parameters travel as a JSON body
    pub fn uses_json_body(self) -> bool {
        matches!(self, Method::JsonPost | Method::JsonPut)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post | Method::JsonPost => reqwest::Method::POST,
            Method::Put | Method::JsonPut => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::str::FromStr for Method {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            "json_post" => Ok(Method::JsonPost),
            "json_put" => Ok(Method::JsonPut),
            other => Err(crate::error::Error::invalid_value(
                "method",
                format!("unknown HTTP method '{other}'"),
            )),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
