//! Concrete paginated sequences
//!
//! Each sequence handles one paging pattern of the API:
//! - [`Buffered`]: an already complete, in-memory result
//! - [`Cursor`]: `cursor` / `next_cursor` pages (followers, friends, lists, ...)
//! - [`SearchResults`]: `search_metadata.next_results` pages

use super::types::Paginated;
use crate::error::{Error, Result};
use crate::http::Requester;
use crate::types::{JsonValue, Method, StringMap};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Shared request plumbing
// ============================================================================

/// The endpoint a sequence pages through
#[derive(Clone)]
pub struct PageRequest {
    client: Arc<dyn Requester>,
    method: Method,
    path: String,
    params: StringMap,
}

impl PageRequest {
    /// Describe a request against `path`
    pub fn new(client: Arc<dyn Requester>, method: Method, path: impl Into<String>) -> Self {
        Self {
            client,
            method,
            path: path.into(),
            params: StringMap::new(),
        }
    }

    /// Add a parameter sent with every page
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add several parameters sent with every page
    #[must_use]
    pub fn params(mut self, params: StringMap) -> Self {
        self.params.extend(params);
        self
    }

    /// Request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request verb
    pub fn method(&self) -> Method {
        self.method
    }

    /// Parameters sent with every page
    pub fn base_params(&self) -> &StringMap {
        &self.params
    }

    /// Perform the request with `extra` merged over the base parameters
    pub async fn perform(&self, extra: StringMap) -> Result<JsonValue> {
        let mut params = self.params.clone();
        params.extend(extra);
        self.client
            .perform_request(self.method, &self.path, &params)
            .await
    }
}

impl std::fmt::Debug for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Deserialize every element of `body[key]`
///
/// A missing or null key yields no elements.
fn extract_elements<T: DeserializeOwned>(body: &JsonValue, key: &str) -> Result<Vec<T>> {
    match body.get(key) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| {
                serde_json::from_value(item.clone()).map_err(|e| {
                    Error::decode(format!("Failed to decode element of '{key}': {e}"))
                })
            })
            .collect(),
        Some(other) => Err(Error::decode(format!(
            "Expected an array under '{key}', got {other}"
        ))),
    }
}

fn limit_reached(limit: Option<usize>, fetched: usize) -> bool {
    limit.is_some_and(|limit| fetched >= limit)
}

// ============================================================================
// Buffered
// ============================================================================

/// A finite, already complete sequence
///
/// Uses the default predicates, so walking it emits the buffer once and
/// never fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffered<T> {
    items: Vec<T>,
}

impl<T> Buffered<T> {
    /// Wrap an existing buffer
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Take the buffer back
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T> From<Vec<T>> for Buffered<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

#[async_trait]
impl<T: Send> Paginated for Buffered<T> {
    type Item = T;

    fn collection(&self) -> &[T] {
        &self.items
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Cursor Pagination
// ============================================================================

/// Where a [`Cursor`] will read its next page from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorPosition {
    /// Nothing fetched yet; the first request sends `cursor=-1`
    Start,
    /// Send this cursor value next
    Next(String),
    /// The last page has been read
    Done,
}

impl CursorPosition {
    /// Read the position from a response's `next_cursor` field
    ///
    /// `0`, `"0"`, `""`, `null` and a missing field all mean there is no
    /// further page.
    pub fn from_response(body: &JsonValue) -> Self {
        match body.get("next_cursor") {
            Some(JsonValue::Number(n)) if n.as_i64() == Some(0) || n.as_u64() == Some(0) => {
                Self::Done
            }
            Some(JsonValue::Number(n)) => Self::Next(n.to_string()),
            Some(JsonValue::String(s)) if s.is_empty() || s == "0" => Self::Done,
            Some(JsonValue::String(s)) => Self::Next(s.clone()),
            _ => Self::Done,
        }
    }

    /// The `cursor` parameter value to send, if another page exists
    pub fn as_param(&self) -> Option<&str> {
        match self {
            Self::Start => Some("-1"),
            Self::Next(cursor) => Some(cursor),
            Self::Done => None,
        }
    }
}

/// A `next_cursor`-paged collection
///
/// Elements are read from one key of each response (`"ids"`, `"users"`,
/// `"lists"`, ...) and appended in order. The sequence is on its last page
/// once the API stops returning a usable `next_cursor`.
#[derive(Debug)]
pub struct Cursor<T> {
    request: PageRequest,
    key: String,
    limit: Option<usize>,
    position: CursorPosition,
    collection: Vec<T>,
}

impl<T: DeserializeOwned + Send> Cursor<T> {
    /// Create an unseeded cursor; nothing is fetched until it is walked
    pub fn new(request: PageRequest, key: impl Into<String>) -> Self {
        Self {
            request,
            key: key.into(),
            limit: None,
            position: CursorPosition::Start,
            collection: Vec::new(),
        }
    }

    /// Create a cursor seeded with its first page
    pub async fn fetch(request: PageRequest, key: impl Into<String>) -> Result<Self> {
        let mut cursor = Self::new(request, key);
        cursor.fetch_next_page().await?;
        Ok(cursor)
    }

    /// Stop fetching once at least `limit` elements are buffered
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Current fetch position
    pub fn position(&self) -> &CursorPosition {
        &self.position
    }

    /// Response key the elements are read from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Take the buffered elements
    pub fn into_inner(self) -> Vec<T> {
        self.collection
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send> Paginated for Cursor<T> {
    type Item = T;

    fn collection(&self) -> &[T] {
        &self.collection
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let Some(cursor) = self.position.as_param() else {
            return Ok(());
        };

        let mut extra = StringMap::new();
        extra.insert("cursor".to_string(), cursor.to_string());
        let body = self.request.perform(extra).await?;

        let elements = extract_elements(&body, &self.key)?;
        let position = CursorPosition::from_response(&body);
        debug!(
            path = self.request.path(),
            fetched = elements.len(),
            next = ?position,
            "Cursor page fetched"
        );

        self.collection.extend(elements);
        self.position = position;
        Ok(())
    }

    fn is_last_page(&self) -> bool {
        self.position == CursorPosition::Done
    }

    fn is_limit_reached(&self) -> bool {
        limit_reached(self.limit, self.collection.len())
    }
}

// ============================================================================
// Search Results
// ============================================================================

/// Default response key holding search results
pub const SEARCH_RESULTS_KEY: &str = "statuses";

/// A search collection paged by `search_metadata.next_results`
///
/// `next_results` is a query string such as `?max_id=1&q=rust&count=100`;
/// its parameters are merged into the next request.
#[derive(Debug)]
pub struct SearchResults<T> {
    request: PageRequest,
    key: String,
    limit: Option<usize>,
    /// Parameters of the next page; `None` until the first fetch
    next_page: Option<StringMap>,
    fetched: bool,
    collection: Vec<T>,
}

impl<T: DeserializeOwned + Send> SearchResults<T> {
    /// Create unseeded search results; nothing is fetched until walked
    pub fn new(request: PageRequest) -> Self {
        Self {
            request,
            key: SEARCH_RESULTS_KEY.to_string(),
            limit: None,
            next_page: None,
            fetched: false,
            collection: Vec::new(),
        }
    }

    /// Create search results seeded with their first page
    pub async fn fetch(request: PageRequest) -> Result<Self> {
        let mut results = Self::new(request);
        results.fetch_next_page().await?;
        Ok(results)
    }

    /// Read elements from a key other than `statuses`
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Stop fetching once at least `limit` elements are buffered
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parameters the next page will be requested with, if there is one
    pub fn next_page(&self) -> Option<&StringMap> {
        self.next_page.as_ref()
    }

    /// Take the buffered elements
    pub fn into_inner(self) -> Vec<T> {
        self.collection
    }
}

/// Parse `search_metadata.next_results` into query parameters
///
/// Only the first value of a repeated key is kept.
pub fn parse_next_results(body: &JsonValue) -> Option<StringMap> {
    let next = body
        .get("search_metadata")?
        .get("next_results")?
        .as_str()?;
    let query = next.trim_start_matches('?');
    if query.is_empty() {
        return None;
    }

    let mut params = StringMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    Some(params)
}

#[async_trait]
impl<T: DeserializeOwned + Send> Paginated for SearchResults<T> {
    type Item = T;

    fn collection(&self) -> &[T] {
        &self.collection
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let extra = match (&self.next_page, self.fetched) {
            (_, false) => StringMap::new(),
            (Some(next), true) => next.clone(),
            (None, true) => return Ok(()),
        };

        let body = self.request.perform(extra).await?;

        let elements = extract_elements(&body, &self.key)?;
        let next_page = parse_next_results(&body);
        debug!(
            path = self.request.path(),
            fetched = elements.len(),
            has_next = next_page.is_some(),
            "Search page fetched"
        );

        self.collection.extend(elements);
        self.next_page = next_page;
        self.fetched = true;
        Ok(())
    }

    fn is_last_page(&self) -> bool {
        self.fetched && self.next_page.is_none()
    }

    fn is_limit_reached(&self) -> bool {
        limit_reached(self.limit, self.collection.len())
    }
}
