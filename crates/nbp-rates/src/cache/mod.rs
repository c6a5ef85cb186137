//! Bounded memoization of resolved queries.
//!
//! Entries are keyed by everything that changes a query's outcome, so two
//! clients sharing one cache only share results they would both compute.
//! The policy is plain LRU with no expiry: NBP publications for past dates
//! do not change, and callers that need fresh "current"/"today" data can
//! [`clear`](RequestCache::clear) it.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use moka::future::Cache;
use moka::policy::EvictionPolicy;

use crate::errors::NbpError;
use crate::models::{ExchangeRate, NumericMode, RateQuery};
use crate::registry::canonical_code;

/// Cached result of one query.
///
/// `None` records a failure that was suppressed; it is replayed as-is.
pub type CachedOutcome = Option<Arc<Vec<ExchangeRate>>>;

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub currency_code: String,
    pub query: RateQuery,
    pub mode: NumericMode,
    pub suppress_errors: bool,
}

impl CacheKey {
    pub fn new(
        currency_code: &str,
        query: RateQuery,
        mode: NumericMode,
        suppress_errors: bool,
    ) -> Self {
        Self {
            currency_code: canonical_code(currency_code),
            query,
            mode,
            suppress_errors,
        }
    }
}

/// Thread-safe LRU cache of query outcomes. Clones share storage.
#[derive(Clone)]
pub struct RequestCache {
    inner: Cache<CacheKey, CachedOutcome>,
    capacity: u64,
}

impl std::fmt::Debug for RequestCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("capacity", &self.capacity)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl RequestCache {
    pub fn new(capacity: u64) -> Result<Self, NbpError> {
        if capacity == 0 {
            return Err(NbpError::InvalidConfig(
                "cache capacity must be positive".to_string(),
            ));
        }

        let inner = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Ok(Self { inner, capacity })
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Return the cached outcome for `key`, or run `resolve` and store its
    /// `Ok` result.
    ///
    /// Concurrent callers for the same key wait for a single `resolve` and
    /// all receive its result. Errors are returned to every waiter and are
    /// not stored.
    ///
    /// Every insertion applies pending maintenance before returning, so the
    /// entry count never stays above the capacity and the least recently
    /// used entry is the one evicted.
    pub async fn get_or_resolve<F>(
        &self,
        key: CacheKey,
        resolve: F,
    ) -> Result<CachedOutcome, NbpError>
    where
        F: Future<Output = Result<CachedOutcome, NbpError>>,
    {
        let entry = self
            .inner
            .entry(key)
            .or_try_insert_with(resolve)
            .await
            .map_err(|e| Arc::try_unwrap(e).unwrap_or_else(|shared| (*shared).clone()))?;

        if entry.is_fresh() {
            self.inner.run_pending_tasks().await;
            debug!(
                "Cached {} ({} of {} entries)",
                entry.key().query,
                self.inner.entry_count(),
                self.capacity
            );
        }
        Ok(entry.into_value())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of entries as of the last maintenance run.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }

    /// Apply pending evictions and bookkeeping.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}
