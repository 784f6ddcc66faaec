//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClient, Requester};
use crate::pagination::{
    Cursor, PageRequest, Paginated, PaginatedExt, SearchResults, WalkOptions,
};
use crate::types::{JsonValue, Method, StringMap};
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Cursor {
                path,
                key,
                method,
                params,
                limit,
            } => {
                let method: Method = method.parse()?;
                let request = self.page_request(&config, method, path, params)?;
                let mut cursor: Cursor<JsonValue> = Cursor::new(request, key);
                if let Some(limit) = limit.or(config.pagination.limit) {
                    cursor = cursor.with_limit(limit);
                }
                let count = self.print_all(&mut cursor, config.walk_options()).await?;
                info!("Walked {count} elements from {path}");
                Ok(())
            }
            Commands::Search {
                path,
                query,
                key,
                params,
                limit,
            } => {
                let request = self
                    .page_request(&config, Method::Get, path, params)?
                    .param("q", query);
                let mut results: SearchResults<JsonValue> =
                    SearchResults::new(request).with_key(key);
                if let Some(limit) = limit.or(config.pagination.limit) {
                    results = results.with_limit(limit);
                }
                let count = self.print_all(&mut results, config.walk_options()).await?;
                info!("Walked {count} search results from {path}");
                Ok(())
            }
            Commands::Config => {
                let yaml = serde_yaml::to_string(&config)?;
                print!("{yaml}");
                Ok(())
            }
        }
    }

    /// Load the config file (if any) and apply command line overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };

        if let Some(base_url) = &self.cli.base_url {
            config.base_url.clone_from(base_url);
            config.validate().context("--base-url")?;
        }

        Ok(config)
    }

    fn page_request(
        &self,
        config: &ClientConfig,
        method: Method,
        path: &str,
        params: &[(String, String)],
    ) -> Result<PageRequest> {
        let client: Arc<dyn Requester> = Arc::new(HttpClient::with_config(config.http_config())?);
        let params: StringMap = params.iter().cloned().collect();
        Ok(PageRequest::new(client, method, path).params(params))
    }

    /// Stream every element of `sequence` to stdout
    async fn print_all<S>(&self, sequence: &mut S, options: WalkOptions) -> Result<usize>
    where
        S: Paginated<Item = JsonValue>,
    {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut count = 0;

        let mut stream = sequence.stream_with(options);
        while let Some(item) = stream.next().await {
            let item = item?;
            let line = match self.cli.format {
                OutputFormat::Json => serde_json::to_string(&item)?,
                OutputFormat::Pretty => serde_json::to_string_pretty(&item)?,
            };
            writeln!(out, "{line}").map_err(Error::Io)?;
            count += 1;
        }

        out.flush()?;
        Ok(count)
    }
}
