//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Walk paginated Twitter API endpoints from the command line
#[derive(Parser, Debug)]
#[command(name = "twitter-rest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk a cursor-paged endpoint (followers/ids, friends/list, ...)
    Cursor {
        /// Endpoint path, e.g. /1.1/followers/ids.json
        #[arg(long)]
        path: String,

        /// Response key holding the elements, e.g. ids or users
        #[arg(long)]
        key: String,

        /// HTTP method (get, post, put, delete, json_post, json_put)
        #[arg(long, default_value = "get")]
        method: String,

        /// Extra request parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Stop fetching once this many elements are buffered
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Walk search results
    Search {
        /// Endpoint path
        #[arg(long, default_value = "/1.1/search/tweets.json")]
        path: String,

        /// Search query
        #[arg(short, long)]
        query: String,

        /// Response key holding the elements
        #[arg(long, default_value = "statuses")]
        key: String,

        /// Extra request parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// Stop fetching once this many elements are buffered
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one element per line)
    Json,
    /// Indented JSON
    Pretty,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cursor_command() {
        let cli = Cli::try_parse_from([
            "twitter-rest",
            "cursor",
            "--path",
            "/1.1/followers/ids.json",
            "--key",
            "ids",
            "--param",
            "screen_name=sferik",
            "--param",
            "count=5000",
            "--limit",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Cursor {
                path,
                key,
                method,
                params,
                limit,
            } => {
                assert_eq!(path, "/1.1/followers/ids.json");
                assert_eq!(key, "ids");
                assert_eq!(method, "get");
                assert_eq!(
                    params,
                    vec![
                        ("screen_name".to_string(), "sferik".to_string()),
                        ("count".to_string(), "5000".to_string()),
                    ]
                );
                assert_eq!(limit, Some(10));
            }
            other => panic!("Expected Cursor, got {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_search_with_globals() {
        let cli = Cli::try_parse_from([
            "twitter-rest",
            "search",
            "-q",
            "rust",
            "--format",
            "pretty",
            "--base-url",
            "http://localhost:9000",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
        assert!(matches!(
            cli.command,
            Commands::Search { ref query, ref key, .. } if query == "rust" && key == "statuses"
        ));
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
