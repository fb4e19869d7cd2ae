//! Singleflight Module
//!
//! Collapses concurrent identical loads: for any key, at most one producer
//! runs at a time, and every caller that arrives while it is in flight
//! receives the same result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::error::{CacheError, Result};

/// Completion slot shared by all waiters of one in-flight call.
type Slot<T> = watch::Receiver<Option<Result<T>>>;

/// What the current caller is: the one running the producer, or a waiter
/// on an already in-flight call.
enum Role<T> {
    Leader(watch::Sender<Option<Result<T>>>),
    Waiter(Slot<T>),
}

// == Flight Group ==
/// One deduplication table, keyed by cache key.
///
/// The table lock covers only bookkeeping (insert, lookup, remove); it is
/// never held while the producer runs or while a waiter blocks, so loads
/// for unrelated keys never contend. Entries are removed as soon as the
/// call completes or its leader is dropped, so the table cannot grow
/// beyond the number of keys currently in flight.
pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> std::fmt::Debug for FlightGroup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightGroup").finish_non_exhaustive()
    }
}

impl<T: Clone> Default for FlightGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears a leader's table entry when the leader finishes or is dropped
/// mid-producer, so an abandoned load never wedges its key.
struct SlotGuard<'a, T> {
    calls: &'a Mutex<HashMap<String, Slot<T>>>,
    key: &'a str,
}

impl<T> Drop for SlotGuard<'_, T> {
    fn drop(&mut self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.key);
    }
}

impl<T: Clone> FlightGroup<T> {
    // == Constructor ==
    /// Creates an empty flight group.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Executes `producer` for `key`, or waits on the execution already in
    /// flight for it.
    ///
    /// The first caller for a key runs the producer on its own task; callers
    /// arriving before it completes observe the identical result, error
    /// included. The slot is cleared immediately on completion, so a caller
    /// arriving afterwards triggers a fresh producer execution.
    pub async fn run<F, Fut>(&self, key: &str, producer: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let role = {
            let mut calls = self.lock_calls();
            if let Some(slot) = calls.get(key) {
                Role::Waiter(slot.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                calls.insert(key.to_string(), rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Waiter(mut slot) => match slot.wait_for(Option::is_some).await {
                Ok(result) => (*result).clone().unwrap_or_else(|| {
                    Err(CacheError::Internal("empty flight result".to_string()))
                }),
                // Sender dropped without publishing: the leader was torn down
                Err(_) => Err(CacheError::Internal(
                    "in-flight load abandoned".to_string(),
                )),
            },
            Role::Leader(tx) => {
                // The guard clears the slot on every exit from this scope,
                // including this future being dropped mid-producer.
                let _guard = SlotGuard {
                    calls: &self.calls,
                    key,
                };
                let result = producer().await;
                // Publish before the guard clears the slot so waiters still
                // holding the receiver are released with the result.
                let _ = tx.send(Some(result.clone()));
                result
            }
        }
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.lock_calls().len()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot<T>>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
