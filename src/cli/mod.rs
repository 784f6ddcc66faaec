//! CLI module
//!
//! Command-line interface for walking paginated endpoints.
//!
//! # Commands
//!
//! - `cursor` - Walk a `next_cursor`-paged endpoint
//! - `search` - Walk search results
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
