// src/lib.rs
// =============================================================================
// link-crawler: a concurrent, depth-bounded crawler.
//
// - fetch: the capability that turns a URL into a page body + outgoing links
//          (real HTTP, or a canned table for demos and tests)
// - crawl: the fan-out itself, with its visited set and completion tracker
//
// The crawler only ever sees `Arc<dyn Fetcher>`, so any fetcher works.
// =============================================================================

pub mod crawl;
pub mod fetch;

pub use crawl::{crawl, crawl_with_cancellation, crawl_with_timeout, Reporter};
pub use fetch::{FetchError, Fetcher, HttpFetcher, HttpFetcherConfig, Page, StaticFetcher};
