// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

//! # twitter-rest
//!
//! Core of a typed client for the Twitter REST API: the request collaborator
//! and the lazy cursor engine behind every list-style endpoint.
//!
//! ## Features
//!
//! - **Lazy Pagination**: Walk `next_cursor` and search pages on demand
//! - **Safety Valve**: Stop walking when a source stops producing new elements
//! - **Retrying HTTP**: Backoff on 429/5xx, timeouts and connection errors
//! - **YAML Config**: Base URL, headers, retries and pagination defaults
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use std::sync::Arc;
//! use twitter_rest::http::{HttpClient, Requester};
//! use twitter_rest::pagination::{Cursor, PageRequest, PaginatedExt};
//! use twitter_rest::{ClientConfig, Method, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::load("twitter.yaml")?;
//!     let client: Arc<dyn Requester> = Arc::new(HttpClient::with_config(config.http_config())?);
//!
//!     let request = PageRequest::new(client, Method::Get, "/1.1/followers/ids.json")
//!         .param("screen_name", "sferik");
//!     let mut ids: Cursor<u64> = Cursor::fetch(request, "ids").await?;
//!
//!     let mut stream = ids.stream();
//!     while let Some(id) = stream.next().await {
//!         println!("{}", id?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │   Consumers: for_each(f) → &mut S      stream() → Stream  │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌────────────────────────────┴──────────────────────────────┐
//! │                  Walk (emit / fetch loop)                 │
//! └────────────────────────────┬──────────────────────────────┘
//!                              │ Paginated
//! ┌──────────────┬─────────────┴──────┬───────────────────────┐
//! │   Buffered   │      Cursor        │     SearchResults     │
//! └──────────────┴─────────────┬──────┴───────────────────────┘
//!                              │ Requester::perform_request
//! ┌────────────────────────────┴──────────────────────────────┐
//! │           HttpClient (reqwest, retry, backoff)            │
//! └───────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and the request collaborator trait
pub mod http;

/// Paginated sequences and the walk that drives them
pub mod pagination;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
