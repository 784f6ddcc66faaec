//! Pagination types and traits
//!
//! Defines the core sequence abstraction every paginated result implements.

use crate::error::Result;
use async_trait::async_trait;

/// Number of consecutive empty rounds after which a walk gives up
pub const EMPTY_RESPONSE_LIMIT: u32 = 1;

/// A buffered, paginated collection of results for one logical query
///
/// Implementors own an append-only buffer (`collection`) and whatever fetch
/// state their endpoint needs. The walk in [`super::walk`] drives them; it
/// never touches the buffer except by calling [`fetch_next_page`].
///
/// The default predicates describe a sequence that is already complete:
/// `is_last_page` is `true` and `is_limit_reached` is `false`, so a bare
/// implementation behaves as one finite buffer and is never asked to fetch.
///
/// [`fetch_next_page`]: Paginated::fetch_next_page
#[async_trait]
pub trait Paginated: Send {
    /// Element type yielded by the sequence
    type Item: Send;

    /// Every element fetched so far, in fetch order
    fn collection(&self) -> &[Self::Item];

    /// Fetch one more page, append its elements and advance the fetch state
    ///
    /// On error the buffer and fetch state must be left as they were, so a
    /// later walk resumes from the same position.
    async fn fetch_next_page(&mut self) -> Result<()>;

    /// Whether the most recent page is known to be the last one
    fn is_last_page(&self) -> bool {
        true
    }

    /// Whether a caller-defined cap on fetched elements has been reached
    fn is_limit_reached(&self) -> bool {
        false
    }

    /// No further fetch will be attempted once this holds
    fn is_finished(&self) -> bool {
        self.is_last_page() || self.is_limit_reached()
    }
}

/// Options for a single walk over a [`Paginated`] sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Buffer offset of the first element to emit
    pub start: usize,
    /// Consecutive empty rounds tolerated before the walk halts (minimum 1)
    pub empty_response_limit: u32,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            start: 0,
            empty_response_limit: EMPTY_RESPONSE_LIMIT,
        }
    }
}

impl WalkOptions {
    /// Create options with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start emitting at the given buffer offset
    #[must_use]
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Set the empty-round threshold
    #[must_use]
    pub fn empty_response_limit(mut self, limit: u32) -> Self {
        self.empty_response_limit = limit;
        self
    }

    /// The threshold actually applied; zero behaves like one
    pub(crate) fn effective_empty_limit(&self) -> u32 {
        self.empty_response_limit.max(1)
    }
}
