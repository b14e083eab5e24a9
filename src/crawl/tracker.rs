// src/crawl/tracker.rs
// =============================================================================
// Knows when a crawl is finished.
//
// Every crawl task is registered BEFORE it is spawned and released when it
// ends. Registration hands back a TaskGuard; dropping the guard is the only
// way to release, so:
// - every exit path releases (early return, cancellation, even a panic)
// - nothing can release a task that was never registered
//
// wait() resolves once the outstanding count is back to zero. Because a
// running task registers its children before its own guard drops, the count
// can't touch zero while any descendant is still pending.
//
// Rust concepts:
// - Drop: Code that runs automatically when a value goes out of scope (RAII)
// - Arc: Shared ownership across tasks
// - tokio::sync::Notify: Wake async waiters without a channel
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: Mutex<usize>,
    idle: Notify,
}

impl Inner {
    fn count(&self) -> MutexGuard<'_, usize> {
        self.outstanding.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts in-flight crawl tasks. Cloning shares the same counter.
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<Inner>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one more outstanding task.
    ///
    /// Hand the returned guard to the task; the task is counted as done when
    /// the guard is dropped.
    #[must_use = "dropping the guard immediately marks the task as done"]
    pub fn register(&self) -> TaskGuard {
        *self.inner.count() += 1;
        TaskGuard {
            tracker: self.clone(),
        }
    }

    /// Registers `n` outstanding tasks at once.
    #[must_use = "dropping the guards immediately marks the tasks as done"]
    pub fn register_many(&self, n: usize) -> Vec<TaskGuard> {
        *self.inner.count() += n;
        (0..n)
            .map(|_| TaskGuard {
                tracker: self.clone(),
            })
            .collect()
    }

    /// Current number of registered tasks that have not finished.
    pub fn outstanding(&self) -> usize {
        *self.inner.count()
    }

    /// Waits until no registered task is outstanding.
    ///
    /// Returns straight away if nothing is registered.
    pub async fn wait(&self) {
        loop {
            // Subscribe before reading the count, otherwise a release that
            // lands between the read and the await would be missed
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn release(&self) {
        let mut count = self.inner.count();
        debug_assert!(*count > 0, "released more tasks than were registered");
        *count -= 1;
        if *count == 0 {
            self.inner.idle.notify_waiters();
        }
    }
}

/// Proof that one task is registered. Releases it on drop.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: CompletionTracker,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.release();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is RAII?
//    - "Resource Acquisition Is Initialization"
//    - Getting a TaskGuard IS registering; dropping it IS finishing
//    - Rust runs Drop on every path out of a scope, so no exit can forget it
//
// 2. Why #[must_use]?
//    - `tracker.register();` on its own would drop the guard at once
//    - The compiler warns so the guard gets bound to a variable
//
// 3. Why enable() before checking the count?
//    - notify_waiters() only wakes futures that are already waiting
//    - enable() makes our Notified future count as waiting before we look,
//      so a release in between can't slip past us
//
// 4. Why the loop in wait()?
//    - A wakeup only says "the count hit zero at some point"
//    - We read it again to be sure before returning
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const SHORT: Duration = Duration::from_millis(50);
    const LONG: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_wait_with_nothing_registered() {
        let tracker = CompletionTracker::new();
        assert!(timeout(SHORT, tracker.wait()).await.is_ok());
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_guard_dropped() {
        let tracker = CompletionTracker::new();
        let guard = tracker.register();
        assert_eq!(tracker.outstanding(), 1);

        assert!(timeout(SHORT, tracker.wait()).await.is_err());

        drop(guard);
        assert!(timeout(SHORT, tracker.wait()).await.is_ok());
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_register_many() {
        let tracker = CompletionTracker::new();
        let mut guards = tracker.register_many(3);
        assert_eq!(tracker.outstanding(), 3);

        guards.pop();
        assert_eq!(tracker.outstanding(), 2);

        drop(guards);
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_children_registered_before_parent_finishes() {
        let tracker = CompletionTracker::new();
        let root = tracker.register();

        let spawner = tracker.clone();
        tokio::spawn(async move {
            let _root = root;
            for _ in 0..10 {
                let child = spawner.register();
                tokio::spawn(async move {
                    let _child = child;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                });
            }
        });

        assert!(timeout(LONG, tracker.wait()).await.is_ok());
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_still_releases() {
        let tracker = CompletionTracker::new();
        let guard = tracker.register();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("task blew up");
        });
        assert!(handle.await.is_err());

        assert!(timeout(SHORT, tracker.wait()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_the_count() {
        let tracker = CompletionTracker::new();
        let other = tracker.clone();
        let _guard = other.register();
        assert_eq!(tracker.outstanding(), 1);
    }
}
