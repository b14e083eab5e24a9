// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - site: crawl a real website over HTTP
// - demo: crawl a small canned link graph, no network needed
//
// Global flags control logging verbosity; RUST_LOG still wins when set.
// =============================================================================

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "A concurrent, depth-bounded web crawler",
    long_about = "link-crawler follows links from a starting page, one task per page, \
                  fetching every reachable page at most once up to a maximum depth."
)]
pub struct Cli {
    /// More log output (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website over HTTP
    ///
    /// Example: link-crawler site https://example.com --max-depth 3
    Site {
        /// URL to start from (e.g., https://example.com)
        start_url: String,

        /// Maximum crawl depth
        ///
        /// Depth 1 = just the starting page
        /// Depth 2 = starting page + all pages it links to
        /// Depth 0 = fetch nothing
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Print progress as JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Stop the whole crawl after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Timeout for each HTTP request, in seconds
        #[arg(long, default_value_t = 10)]
        request_timeout_secs: u64,

        /// Follow links to other hosts too (default: stay on the start host)
        #[arg(long)]
        all_domains: bool,
    },

    /// Crawl the built-in golang.org sample graph
    Demo {
        /// Maximum crawl depth
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Print progress as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}
