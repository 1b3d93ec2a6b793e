//! Tag-subscribed query cache
//!
//! One entry per (endpoint, canonically-serialized arguments). Entries hold
//! the last decoded body, a status for consuming components, and the tags
//! the read provides. Mutations publish invalidating tags; matching entries
//! are marked stale, and the ones with live subscribers are refetched by the
//! mutation caller before its future resolves. Stale entries without
//! subscribers refetch lazily on next access.
//!
//! De-duplication: the first caller for a key performs the fetch; concurrent
//! callers for the same key wait on the entry's completion channel and share
//! the result. Dropping interest does not abort an in-flight request; a late
//! response still settles the shared entry.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

use crate::error::ApiError;
use crate::tags::Tag;
use crate::transport::ApiRequest;

/// Lifecycle status of one cache entry, as consumers observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryStatus {
    /// Never fetched
    Uninitialized,
    /// A fetch is in flight
    Loading,
    /// Last fetch succeeded
    Success,
    /// Last fetch failed
    Error,
}

struct CacheEntry {
    request: ApiRequest,
    provides: Vec<Tag>,
    data: Option<Value>,
    error: Option<ApiError>,
    stale: bool,
    fetching: bool,
    subscribers: usize,
    // Bumped on every fetch completion; waiters subscribe under the state
    // lock so completions are never missed.
    completion: watch::Sender<u64>,
}

impl CacheEntry {
    fn new(request: ApiRequest, provides: Vec<Tag>) -> Self {
        let (completion, _) = watch::channel(0);
        Self {
            request,
            provides,
            data: None,
            error: None,
            stale: false,
            fetching: false,
            subscribers: 0,
            completion,
        }
    }

    fn status(&self) -> QueryStatus {
        if self.fetching {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Uninitialized
        }
    }
}

/// Outcome of asking the cache for a key.
pub(crate) enum FetchDecision {
    /// A fresh value is cached; use it.
    UseCached(Value),
    /// Someone else is fetching this key; wait for their completion.
    Wait(watch::Receiver<u64>),
    /// The caller owns the fetch and must call `complete_fetch`.
    Fetch,
}

/// Cloneable handle to the shared query cache.
#[derive(Clone, Default)]
pub struct QueryCache {
    state: Arc<Mutex<IndexMap<String, CacheEntry>>>,
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how a read for `key` proceeds, registering the entry if it is
    /// new. Exactly one concurrent caller per key receives `Fetch`.
    pub(crate) fn begin_fetch(
        &self,
        key: &str,
        request: &ApiRequest,
        provides: &[Tag],
    ) -> FetchDecision {
        let mut state = self.state.lock();
        let entry = state
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(request.clone(), provides.to_vec()));

        if entry.fetching {
            return FetchDecision::Wait(entry.completion.subscribe());
        }
        if !entry.stale {
            if let Some(data) = &entry.data {
                return FetchDecision::UseCached(data.clone());
            }
        }
        entry.fetching = true;
        entry.provides = provides.to_vec();
        entry.request = request.clone();
        FetchDecision::Fetch
    }

    /// Record the result of a fetch and wake every waiter for the key.
    pub(crate) fn complete_fetch(&self, key: &str, result: Result<Value, ApiError>) {
        let mut state = self.state.lock();
        let Some(entry) = state.get_mut(key) else {
            return;
        };
        entry.fetching = false;
        match result {
            Ok(value) => {
                entry.data = Some(value);
                entry.error = None;
                entry.stale = false;
            }
            Err(err) => {
                // A failed refetch keeps prior data renderable but records
                // the error; the entry stays stale so the next access
                // retries.
                entry.error = Some(err);
            }
        }
        entry.completion.send_modify(|v| *v += 1);
    }

    /// Read the cached value for a key, fresh or stale.
    pub(crate) fn cached_value(&self, key: &str) -> Option<Value> {
        self.state.lock().get(key).and_then(|e| e.data.clone())
    }

    /// Read the last error recorded for a key.
    pub(crate) fn cached_error(&self, key: &str) -> Option<ApiError> {
        self.state.lock().get(key).and_then(|e| e.error.clone())
    }

    /// Publish invalidations for a mutation's tags.
    ///
    /// Every entry whose provided tags intersect `tags` is marked stale.
    /// Entries with live subscribers (and no fetch already in flight) are
    /// claimed for refetch and returned to the caller, which performs the
    /// refetches before the mutation future resolves.
    pub(crate) fn invalidate(&self, tags: &[Tag]) -> Vec<(String, ApiRequest)> {
        let mut state = self.state.lock();
        let mut refetch = Vec::new();
        for (key, entry) in state.iter_mut() {
            let hit = entry
                .provides
                .iter()
                .any(|provided| tags.iter().any(|t| provided.matches(t)));
            if !hit {
                continue;
            }
            entry.stale = true;
            tracing::debug!(key = %key, "cache entry invalidated");
            if entry.subscribers > 0 && !entry.fetching {
                entry.fetching = true;
                refetch.push((key.clone(), entry.request.clone()));
            }
        }
        refetch
    }

    /// Status of the entry for a key, as a consumer would render it.
    pub fn status_of(&self, key: &str) -> QueryStatus {
        self.state
            .lock()
            .get(key)
            .map(|e| e.status())
            .unwrap_or(QueryStatus::Uninitialized)
    }

    /// Whether the entry for a key is marked stale.
    pub fn is_stale(&self, key: &str) -> bool {
        self.state.lock().get(key).is_some_and(|e| e.stale)
    }

    /// Register interest in a key. While the returned guard lives, tag
    /// invalidations refetch this entry eagerly.
    pub fn subscribe(&self, key: impl Into<String>, request: &ApiRequest, provides: &[Tag]) -> QuerySubscription {
        let key = key.into();
        let mut state = self.state.lock();
        let entry = state
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(request.clone(), provides.to_vec()));
        entry.subscribers += 1;
        drop(state);
        QuerySubscription {
            cache: self.clone(),
            key,
        }
    }

    fn unsubscribe(&self, key: &str) {
        let mut state = self.state.lock();
        if let Some(entry) = state.get_mut(key) {
            entry.subscribers = entry.subscribers.saturating_sub(1);
        }
    }

    /// Drop every entry. Used at logout so one user's reads never leak into
    /// the next session.
    pub fn clear(&self) {
        self.state.lock().clear();
    }
}

/// Guard representing a mounted consumer of one cache entry.
///
/// Dropping the guard removes interest; it does not abort an in-flight
/// request for the key.
pub struct QuerySubscription {
    cache: QueryCache,
    key: String,
}

impl QuerySubscription {
    /// The cache key this subscription watches.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.key);
    }
}
