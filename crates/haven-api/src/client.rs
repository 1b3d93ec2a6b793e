//! The API client handed to frontends
//!
//! `ApiClient` binds the transport, the query cache, and the session store.
//! Queries are cached and de-duplicated; mutations publish tag invalidations
//! and refetch subscribed entries before their future resolves, so a caller
//! that awaits a mutation observes its invalidations on the next query.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::{FetchDecision, QueryCache, QueryStatus, QuerySubscription};
use crate::config::ApiConfig;
use crate::endpoints::{ApiMutation, ApiQuery};
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::transport::{ApiTransport, HttpTransport};

/// Cloneable client over one backend, one cache, one session.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    cache: QueryCache,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client over an arbitrary transport (tests inject an
    /// in-memory backend here).
    pub fn new(transport: Arc<dyn ApiTransport>, session: SessionStore) -> Self {
        Self {
            transport,
            cache: QueryCache::new(),
            session,
        }
    }

    /// Create a production client over HTTP.
    pub fn http(config: ApiConfig, session: SessionStore) -> ApiResult<Self> {
        let transport = HttpTransport::new(config, session.clone())?;
        Ok(Self::new(Arc::new(transport), session))
    }

    /// The session store backing this client.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// The query cache backing this client.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run a query through the cache.
    ///
    /// Identical queries share one in-flight request and one entry. A fresh
    /// cached value is returned without touching the network; a stale one
    /// triggers a refetch.
    pub async fn query<Q: ApiQuery>(&self, query: &Q) -> ApiResult<Q::Output> {
        let request = query.request();
        let key = request.cache_key();
        let provides = query.provides();

        loop {
            match self.cache.begin_fetch(&key, &request, &provides) {
                FetchDecision::UseCached(value) => return decode::<Q::Output>(value),
                FetchDecision::Wait(mut completion) => {
                    // The fetching caller settles the entry and bumps the
                    // channel; a closed channel means the entry was dropped,
                    // so loop and start over.
                    let _ = completion.changed().await;
                    if !self.cache.is_stale(&key) {
                        if let Some(value) = self.cache.cached_value(&key) {
                            return decode::<Q::Output>(value);
                        }
                    }
                    if let Some(err) = self.cache.cached_error(&key) {
                        return Err(err);
                    }
                }
                FetchDecision::Fetch => {
                    let result = self
                        .transport
                        .send(request.clone())
                        .await
                        .and_then(|response| response.into_result());
                    self.cache.complete_fetch(&key, result.clone());
                    return result.and_then(decode::<Q::Output>);
                }
            }
        }
    }

    /// Run a mutation.
    ///
    /// On success, the mutation's tags are published: every cached read
    /// providing one is marked stale, and entries with live subscribers are
    /// refetched before this future resolves. On failure nothing is
    /// invalidated and the server's error payload is returned unmodified.
    pub async fn mutate<M: ApiMutation>(&self, mutation: &M) -> ApiResult<M::Output> {
        let request = mutation.request();
        tracing::debug!(path = %request.path, "mutation");

        let value = self
            .transport
            .send(request)
            .await
            .and_then(|response| response.into_result())?;
        let output = decode::<M::Output>(value)?;

        let tags = mutation.invalidates();
        if !tags.is_empty() {
            let refetch = self.cache.invalidate(&tags);
            for (key, request) in refetch {
                let result = self
                    .transport
                    .send(request)
                    .await
                    .and_then(|response| response.into_result());
                self.cache.complete_fetch(&key, result);
            }
        }
        Ok(output)
    }

    /// PUT raw bytes to a presigned absolute URL.
    pub async fn upload(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<()> {
        self.transport.upload(url, content_type, bytes).await
    }

    /// Register interest in a query's cache entry. While the guard lives,
    /// mutations that invalidate the entry refetch it eagerly.
    pub fn subscribe<Q: ApiQuery>(&self, query: &Q) -> QuerySubscription {
        let request = query.request();
        let key = request.cache_key();
        self.cache.subscribe(key, &request, &query.provides())
    }

    /// Current status of a query's cache entry, for loading/error rendering.
    pub fn status_of<Q: ApiQuery>(&self, query: &Q) -> QueryStatus {
        self.cache.status_of(&query.request().cache_key())
    }

    /// Drop all cached reads. Called on login/logout so one identity's data
    /// never bleeds into another's session.
    pub fn reset_cache(&self) {
        self.cache.clear();
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
}
