//! Cache Store Module
//!
//! Request-coalescing cache: at most one fetch per key is in flight, every
//! concurrent requester observes that same fetch, successes stay cached for the
//! life of the cache and failures are evicted so the next request retries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::FutureExt;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, FetchSource, Operation, ResolvedSource};
use crate::error::{FetchError, Result};
use crate::fetch::Fetcher;

// == Entry State ==
/// Where a key currently sits in its lifecycle.
///
/// `Absent -> InFlight -> Cached`, or back to `Absent` when the fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Absent,
    InFlight,
    Cached,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    next_generation: u64,
}

impl CacheState {
    /// Removes `key` only if it still belongs to `generation`.
    ///
    /// A newer attempt inserted after the failure must survive a late cleanup
    /// from the older one. Rejected keys are not counted as failures.
    fn evict_generation(&mut self, key: &str, generation: u64, err: &FetchError) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.generation == generation => {
                self.entries.remove(key);
                if err.is_retryable() {
                    self.stats.record_failure();
                }
                self.stats.set_total_entries(self.entries.len());
                true
            }
            _ => false,
        }
    }
}

// == Fetch Coalescing Cache ==
/// Deduplicates concurrent and sequential fetches for the same key.
///
/// Construct one per process and share it behind an `Arc`. Fetches are
/// spawned onto the tokio runtime, so [`get`](Self::get) must be called from
/// within one.
pub struct FetchCoalescingCache {
    state: Arc<Mutex<CacheState>>,
    fetcher: Arc<dyn Fetcher>,
}

impl fmt::Debug for FetchCoalescingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `None` while another task holds the lock
        let entries = self.state.try_lock().ok().map(|state| state.entries.len());
        f.debug_struct("FetchCoalescingCache")
            .field("entries", &entries)
            .finish()
    }
}

impl FetchCoalescingCache {
    // == Constructor ==
    /// Creates an empty cache that fetches through `fetcher`.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            fetcher,
        }
    }

    /// Convenience constructor taking the fetcher by value.
    pub fn with_fetcher(fetcher: impl Fetcher) -> Self {
        Self::new(Arc::new(fetcher))
    }

    // == Get ==
    /// Returns the payload for `key`, fetching it at most once per generation.
    ///
    /// An empty key returns empty bytes without fetching. On failure the
    /// entry is evicted and the error propagated; a later call retries.
    ///
    /// `key` is handed to the fetcher unvalidated. Use [`load`](Self::load) to
    /// reject malformed URLs before they reach the cache.
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        if key.is_empty() {
            self.state.lock().await.stats.record_short_circuit();
            return Ok(Bytes::new());
        }

        let (generation, operation) = self.acquire(key).await;

        match operation.await {
            Ok(bytes) => Ok(bytes),
            Err(err) => {
                // Normally already done by the fetch task; covers a task that was torn down.
                self.state.lock().await.evict_generation(key, generation, &err);
                Err(err)
            }
        }
    }

    /// Like [`get`](Self::get), but this caller gives up after `wait`.
    ///
    /// Giving up yields [`FetchError::Cancelled`] and leaves the shared fetch
    /// running for everyone else; the entry is not evicted.
    pub async fn get_with_timeout(&self, key: &str, wait: Duration) -> Result<Bytes> {
        match tokio::time::timeout(wait, self.get(key)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(key, ?wait, "observer stopped waiting");
                Err(FetchError::Cancelled(format!(
                    "gave up waiting for {key} after {wait:?}"
                )))
            }
        }
    }

    // == Load ==
    /// Resolves a consumer-supplied source and fetches it if needed.
    ///
    /// Absent sources yield `None`, inline bytes are returned untouched and
    /// malformed URLs fail with [`FetchError::InvalidKey`] without touching
    /// the cache.
    pub async fn load(&self, source: FetchSource) -> Result<Option<Bytes>> {
        match source.resolve()? {
            ResolvedSource::Empty => {
                self.state.lock().await.stats.record_short_circuit();
                Ok(None)
            }
            ResolvedSource::Inline(bytes) => Ok(Some(bytes)),
            ResolvedSource::Fetch(key) => self.get(&key).await.map(Some),
        }
    }

    /// Looks up or creates the operation for `key`. The lock is released on return.
    async fn acquire(&self, key: &str) -> (u64, Operation) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(entry) = state.entries.get(key) {
            if entry.is_cached() {
                state.stats.record_hit();
                debug!(key, generation = entry.generation, "cache hit");
            } else {
                state.stats.record_join();
                debug!(key, generation = entry.generation, "joining in-flight fetch");
            }
            return (entry.generation, entry.operation());
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let operation = self.spawn_fetch(key.to_string(), generation);
        state.entries.insert(
            key.to_string(),
            CacheEntry::new(key.to_string(), generation, operation.clone()),
        );
        state.stats.record_fetch();
        state.stats.set_total_entries(state.entries.len());
        info!(key, generation, "starting fetch");

        (generation, operation)
    }

    /// Runs the fetch on its own task and returns a shareable handle to its outcome.
    ///
    /// The task owns the fetch, so observers dropping their handles never
    /// cancel it.
    fn spawn_fetch(&self, key: String, generation: u64) -> Operation {
        let (sender, receiver) = oneshot::channel::<Result<Bytes>>();
        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::clone(&self.state);

        let operation: Operation = receiver
            .map(|received| {
                received.unwrap_or_else(|_| {
                    Err(FetchError::TransportFailure(
                        "fetch task ended without a result".to_string(),
                    ))
                })
            })
            .boxed()
            .shared();
        let settle = operation.clone();

        tokio::spawn(async move {
            let outcome = fetcher.fetch(&key).await;

            // Evict before publishing: later callers start a new generation
            // instead of joining this failed one.
            if let Err(err) = &outcome {
                let evicted = state.lock().await.evict_generation(&key, generation, err);
                warn!(key = %key, generation, evicted, error = %err, "fetch failed");
            }

            sender.send(outcome).ok();

            // Resolve the shared handle even if every observer has gone away.
            let _ = settle.await;
        });

        operation
    }

    // == Introspection ==
    /// Returns the lifecycle state of `key`.
    pub async fn entry_state(&self, key: &str) -> EntryState {
        let state = self.state.lock().await;
        match state.entries.get(key) {
            None => EntryState::Absent,
            Some(entry) if entry.is_cached() => EntryState::Cached,
            Some(_) => EntryState::InFlight,
        }
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    /// Returns the number of live entries (in flight or cached).
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}
