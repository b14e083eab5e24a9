// src/crawl/visited.rs
// =============================================================================
// The set of URLs that some crawl task has already claimed.
//
// There is exactly one way in: try_claim(). It checks AND marks under a single
// lock, so two tasks racing on the same URL can never both win. Entries are
// never removed while a crawl is running.
// =============================================================================

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

/// Shared deduplication set, one per crawl.
#[derive(Debug)]
pub struct VisitedSet<K> {
    claimed: Mutex<HashSet<K>>,
}

impl<K: Eq + Hash + Clone> VisitedSet<K> {
    pub fn new() -> Self {
        Self {
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Marks `key` as claimed.
    ///
    /// Returns `true` if this call claimed it (the caller should fetch) and
    /// `false` if some earlier call already did.
    pub fn try_claim(&self, key: &K) -> bool {
        // The critical section only touches the HashSet, so a panic elsewhere
        // can't leave it half-updated; recover from poisoning instead of failing
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(key) {
            return false;
        }
        claimed.insert(key.clone())
    }

    /// Number of keys claimed so far.
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<K: Eq + Hash + Clone> Default for VisitedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not contains() and then insert() from the crawler?
//    - Two tasks could both see "not there" before either inserts
//    - Doing both under one lock makes the pair indivisible
//
// 2. What is PoisonError?
//    - A Mutex is "poisoned" if a thread panicked while holding it
//    - into_inner() gives us the data anyway; a HashSet insert can't be left
//      half-done, so the data is still fine
//
// 3. Why is VisitedSet generic over K?
//    - The set only needs Eq + Hash (+ Clone to store a copy)
//    - The crawler uses String URLs, but nothing here depends on that
// -----------------------------------------------------------------------------
