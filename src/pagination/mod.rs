//! Pagination module
//!
//! Supports: Buffered, Cursor, Search Results
//!
//! # Overview
//!
//! Every list-style endpoint returns a [`Paginated`] sequence: an append-only
//! buffer plus the state needed to fetch the next page. Consumers walk it
//! with [`for_each`] or pull it lazily with [`stream`]; pages are fetched one
//! at a time, only when the consumer moves past what is already buffered.
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use twitter_rest::pagination::{Cursor, PageRequest, PaginatedExt};
//!
//! let request = PageRequest::new(client, Method::Get, "/1.1/followers/ids.json")
//!     .param("screen_name", "sferik");
//! let mut ids: Cursor<u64> = Cursor::fetch(request, "ids").await?;
//! let mut stream = ids.stream();
//! while let Some(id) = stream.next().await {
//!     println!("{}", id?);
//! }
//! ```

mod strategies;
mod types;
mod walk;

pub use strategies::{
    parse_next_results, Buffered, Cursor, CursorPosition, PageRequest, SearchResults,
    SEARCH_RESULTS_KEY,
};
pub use types::{Paginated, WalkOptions, EMPTY_RESPONSE_LIMIT};
pub use walk::{for_each, stream, PaginatedExt, Walk};
