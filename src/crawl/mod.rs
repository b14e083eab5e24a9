// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Submodules:
// - visited: Shared set of URLs already claimed by a task
// - tracker: Counts in-flight tasks and tells us when all of them are done
// - report: Progress events (text, JSON lines, or nothing)
// - crawler: The recursive fan-out that ties the three together
//
// Rust concepts:
// - Async programming: One tokio task per page, spawned as links are found
// - Shared state: Arc + Mutex for the visited set and the task counter
// =============================================================================

mod crawler;
mod report;
mod tracker;
mod visited;

// Re-export the crawl entry points and the types callers need
pub use crawler::{crawl, crawl_with_cancellation, crawl_with_timeout};
pub use report::{CrawlEvent, Reporter};
pub use tracker::{CompletionTracker, TaskGuard};
pub use visited::VisitedSet;
