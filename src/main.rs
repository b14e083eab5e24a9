// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG > --quiet > --verbose > info), on stderr
// 3. Build the right fetcher for the subcommand and run the crawl
// 4. Exit with proper code (0 = crawl finished, 2 = error)
// =============================================================================

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use url::Url;

use cli::{Cli, Commands};
use link_crawler::{
    crawl, crawl_with_timeout, Fetcher, HttpFetcher, HttpFetcherConfig, Reporter, StaticFetcher,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    debug!(?cli, "CLI arguments parsed");

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout is reserved for crawl output (it may be JSON lines)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Site {
            start_url,
            max_depth,
            json,
            timeout_secs,
            request_timeout_secs,
            all_domains,
        } => {
            let start = Url::parse(&start_url)
                .with_context(|| format!("Invalid URL '{}'", start_url))?;

            let fetcher = HttpFetcher::new(HttpFetcherConfig {
                request_timeout: Duration::from_secs(request_timeout_secs),
                ..HttpFetcherConfig::default()
            })
            .context("Failed to create HTTP client")?;

            // Stay on the host the start URL lands on, so example.com ->
            // www.example.com still crawls www.example.com
            let fetcher = if all_domains {
                fetcher
            } else {
                let host = site_host(&fetcher, &start).await?;
                fetcher.with_allowed_host(Some(host))
            };

            let deadline = timeout_secs.map(Duration::from_secs);
            run_crawl(start.as_str(), max_depth, Arc::new(fetcher), json, deadline).await;
        }
        Commands::Demo { max_depth, json } => {
            let fetcher = StaticFetcher::golang_demo();
            run_crawl("https://golang.org/", max_depth, Arc::new(fetcher), json, None).await;
        }
    }

    Ok(())
}

// Host of the page the start URL redirects to. If the redirects can't be
// resolved, the start URL's own host is used and the crawl reports the error
async fn site_host(fetcher: &HttpFetcher, start: &Url) -> Result<String> {
    let landing = match fetcher.landing_url(start.as_str()).await {
        Ok(landing) => landing,
        Err(e) => {
            warn!(start = %start, error = %e, "could not resolve start URL redirects");
            start.clone()
        }
    };

    if landing.host_str() != start.host_str() {
        info!(from = %start, to = %landing, "start URL redirects to another host");
    }

    landing
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("URL has no host: {}", landing))
}

async fn run_crawl(
    root: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    json: bool,
    deadline: Option<Duration>,
) {
    let reporter = if json { Reporter::Json } else { Reporter::Text };

    match deadline {
        Some(limit) => crawl_with_timeout(root, max_depth, fetcher, reporter, limit).await,
        None => crawl(root, max_depth, fetcher, reporter).await,
    }
}
