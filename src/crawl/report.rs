// src/crawl/report.rs
// =============================================================================
// Progress output for a running crawl.
//
// Each successful fetch produces a Found event, each failed fetch a Failed
// event. Events from different tasks interleave in whatever order the tasks
// finish. This is only a side channel: nothing in the crawl depends on it.
// =============================================================================

use serde::Serialize;

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// A page was fetched
    Found {
        url: String,
        depth: usize,
        summary: String,
        links: usize,
    },
    /// A fetch failed; the crawl carries on without this page's links
    Failed {
        url: String,
        depth: usize,
        error: String,
    },
}

/// Where progress events go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reporter {
    /// `found: <url> "<summary>"` on stdout, failures on stderr
    #[default]
    Text,
    /// One JSON object per line on stdout
    Json,
    /// Nothing at all
    Quiet,
}

impl Reporter {
    pub fn report(&self, event: &CrawlEvent) {
        match self {
            Reporter::Text => match event {
                CrawlEvent::Found { .. } => println!("{}", format_text(event)),
                CrawlEvent::Failed { .. } => eprintln!("{}", format_text(event)),
            },
            Reporter::Json => match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(error = %e, "could not serialize crawl event"),
            },
            Reporter::Quiet => {}
        }
    }
}

fn format_text(event: &CrawlEvent) -> String {
    match event {
        CrawlEvent::Found { url, summary, .. } => format!("found: {} {:?}", url, summary),
        CrawlEvent::Failed { error, .. } => error.clone(),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[serde(tag = "event")] do?
//    - Writes the variant name into an "event" field
//    - Found becomes {"event":"found","url":...}
//
// 2. Why {:?} for the summary?
//    - Debug formatting of a String adds quotes and escapes
//    - found: https://golang.org/ "The Go Programming Language"
// -----------------------------------------------------------------------------
