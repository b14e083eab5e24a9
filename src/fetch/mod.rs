// src/fetch/mod.rs
// =============================================================================
// This module defines the fetch capability the crawler depends on.
//
// The crawler never knows HOW a page is fetched. It only knows that, given a
// URL, something can hand back the page body and the URLs found on it.
//
// Implementations:
// - http: Real network fetcher (reqwest + scraper)
// - fake: Canned lookup table, deterministic, used by `demo` and the tests
//
// Rust concepts:
// - Traits: Shared behaviour that many types can implement
// - Trait objects: Arc<dyn Fetcher> picks the implementation at runtime
// - thiserror: Derive Display/Error for our own error enum
// =============================================================================

mod fake;
mod http;

pub use fake::StaticFetcher;
pub use http::{HttpFetcher, HttpFetcherConfig};

use async_trait::async_trait;
use thiserror::Error;

/// A successfully fetched page: its body and the URLs it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Content summary (page title or a body prefix for HTTP, canned text for fakes)
    pub body: String,
    /// Outgoing references, in the order they were found. May contain duplicates.
    pub urls: Vec<String>,
}

/// Why a single fetch failed.
///
/// None of these abort a crawl; they only end the task that hit them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Turns a URL into its content and outgoing links.
///
/// Both `HttpFetcher` and `StaticFetcher` implement this, and the crawler
/// accepts either without any change.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page, FetchError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - Async methods in traits can't be used behind `dyn` on their own
//    - async_trait rewrites them to return a boxed future, so Arc<dyn Fetcher>
//      works
//
// 2. Why Send + Sync on the trait?
//    - The same fetcher is shared by many tokio tasks on many threads
//
// 3. What does #[from] do in FetchError?
//    - Generates From<reqwest::Error> for FetchError
//    - So `?` on a reqwest call converts the error for us
// -----------------------------------------------------------------------------
