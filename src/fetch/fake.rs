// src/fetch/fake.rs
// =============================================================================
// A fetcher that returns canned results from an in-memory table.
//
// Used by the `demo` subcommand and by the crawler tests, where we need the
// exact same link graph on every run and no network access.
// =============================================================================

use std::collections::HashMap;

use async_trait::async_trait;

use super::{FetchError, Fetcher, Page};

/// Fetcher backed by a fixed URL -> page table.
///
/// Any URL missing from the table fails with `FetchError::NotFound`.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, Page>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one page in the table.
    pub fn with_page(mut self, url: &str, body: &str, urls: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                body: body.to_string(),
                urls: urls.iter().map(|u| u.to_string()).collect(),
            },
        );
        self
    }

    /// The four-page golang.org graph.
    ///
    /// `https://golang.org/cmd/` is linked from two pages but has no entry,
    /// so fetching it always fails.
    pub fn golang_demo() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                &["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                &[
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does with_page() take `mut self` and return Self?
//    - It's a builder: each call consumes the fetcher and hands it back
//    - That lets us chain .with_page(..).with_page(..)
//
// 2. Why .cloned() in fetch()?
//    - get() returns a reference into our table
//    - The caller needs an owned Page, so we copy it out
// -----------------------------------------------------------------------------
