// src/crawl/crawler.rs
// =============================================================================
// This module implements the concurrent, depth-bounded crawl.
//
// How it works:
// 1. The caller's root URL becomes the first task (registered, then spawned)
// 2. A task with depth 0 stops right away
// 3. Otherwise it claims its URL in the visited set; if someone else already
//    claimed it, it stops
// 4. It fetches the URL. A failure is reported and the task stops
// 5. On success it registers and spawns one child task per outgoing link,
//    with depth - 1. Duplicates are spawned too; the child's claim weeds
//    them out
// 6. The caller waits on the completion tracker until every task, however
//    deeply nested, has finished
//
// Each task owns only its URL and depth. The visited set, tracker, fetcher,
// reporter and cancellation token are shared through one Arc per crawl, so
// independent crawls never see each other's state.
//
// A URL is claimed before it is fetched, so a URL that fails is tried exactly
// once per crawl, however many pages link to it.
// =============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::report::{CrawlEvent, Reporter};
use super::tracker::CompletionTracker;
use super::visited::VisitedSet;
use crate::fetch::Fetcher;

// Boxed so the recursive spawn has a nameable, Send future type
type TaskFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

// Everything the tasks of one crawl share
struct CrawlState {
    fetcher: Arc<dyn Fetcher>,
    visited: VisitedSet<String>,
    tracker: CompletionTracker,
    reporter: Reporter,
    cancel: CancellationToken,
}

/// Crawls from `root`, following links up to `max_depth` levels, and returns
/// once every spawned task has finished.
///
/// `max_depth = 1` fetches only the root; `max_depth = 0` fetches nothing.
/// Fetch failures are reported through `reporter` and never returned.
pub async fn crawl(root: &str, max_depth: usize, fetcher: Arc<dyn Fetcher>, reporter: Reporter) {
    crawl_with_cancellation(root, max_depth, fetcher, reporter, CancellationToken::new()).await
}

/// Like [`crawl`], but stops early once `cancel` fires.
///
/// Tasks check the token before they fetch and abandon a fetch that is still
/// in flight. Every task still releases its registration, so this returns
/// promptly after cancellation.
pub async fn crawl_with_cancellation(
    root: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    reporter: Reporter,
    cancel: CancellationToken,
) {
    info!(root, max_depth, "starting crawl");

    let state = Arc::new(CrawlState {
        fetcher,
        visited: VisitedSet::new(),
        tracker: CompletionTracker::new(),
        reporter,
        cancel,
    });

    spawn_task(&state, root.to_string(), max_depth);
    state.tracker.wait().await;

    info!(
        root,
        claimed = state.visited.len(),
        cancelled = state.cancel.is_cancelled(),
        "crawl finished"
    );
}

/// Like [`crawl`], but gives up after `limit`.
///
/// Pages fetched before the deadline are still reported.
pub async fn crawl_with_timeout(
    root: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    reporter: Reporter,
    limit: Duration,
) {
    let cancel = CancellationToken::new();
    let crawl = crawl_with_cancellation(root, max_depth, fetcher, reporter, cancel.clone());
    tokio::pin!(crawl);

    tokio::select! {
        _ = &mut crawl => return,
        _ = tokio::time::sleep(limit) => {
            warn!(root, ?limit, "crawl deadline reached, cancelling");
            cancel.cancel();
        }
    }

    // Let the remaining tasks observe the token and release
    crawl.await;
}

// Registers a task for (url, depth), then spawns it. The registration must
// happen here, in the spawner, so the count can't reach zero in between
fn spawn_task(state: &Arc<CrawlState>, url: String, depth: usize) {
    let guard = state.tracker.register();
    let task = run_task(Arc::clone(state), url, depth);

    tokio::spawn(async move {
        let _guard = guard;
        task.await;
    });
}

fn run_task(state: Arc<CrawlState>, url: String, depth: usize) -> TaskFuture {
    Box::pin(async move {
        if depth == 0 {
            debug!(url = %url, "depth exhausted");
            return;
        }

        if state.cancel.is_cancelled() {
            debug!(url = %url, "crawl cancelled before fetch");
            return;
        }

        if !state.visited.try_claim(&url) {
            debug!(url = %url, "already claimed");
            return;
        }

        let result = tokio::select! {
            biased;
            _ = state.cancel.cancelled() => {
                debug!(url = %url, "crawl cancelled during fetch");
                return;
            }
            result = state.fetcher.fetch(&url) => result,
        };

        match result {
            Ok(page) => {
                debug!(url = %url, depth, links = page.urls.len(), "fetched");
                state.reporter.report(&CrawlEvent::Found {
                    url: url.clone(),
                    depth,
                    summary: page.body,
                    links: page.urls.len(),
                });

                for link in page.urls {
                    spawn_task(&state, link, depth - 1);
                }
            }
            Err(e) => {
                warn!(url = %url, depth, error = %e, "fetch failed");
                state.reporter.report(&CrawlEvent::Failed {
                    url,
                    depth,
                    error: e.to_string(),
                });
            }
        }
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::spawn instead of a queue?
//    - Each page becomes its own task, so slow pages don't hold up fast ones
//    - There is no worker pool; the depth limit and the visited set are what
//      keep the number of tasks finite
//
// 2. Why is run_task boxed?
//    - The task spawns more copies of itself
//    - An `async fn` that spawns itself has a type the compiler can't check
//      for Send; naming it as Pin<Box<dyn Future + Send>> breaks the cycle
//
// 3. What does tokio::select! do here?
//    - Polls the fetch and the cancellation token together
//    - Whichever finishes first wins; the other future is dropped
//    - `biased;` means cancellation is checked first on every poll
//
// 4. Where is the "done" call?
//    - There isn't one. `_guard` is dropped when the spawned task ends, and
//      TaskGuard's Drop releases the registration
// -----------------------------------------------------------------------------
