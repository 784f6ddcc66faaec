//! HTTP client module
//!
//! Provides the [`Requester`] collaborator trait and an HTTP client with
//! retry and backoff that implements it.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Verb Mapping**: Query, form, or JSON parameters depending on [`Method`](crate::types::Method)

mod client;
mod requester;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use requester::Requester;

#[cfg(test)]
mod tests;
