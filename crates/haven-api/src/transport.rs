//! The REST transport seam
//!
//! All server communication goes through the [`ApiTransport`] trait so the
//! cache and workflows can run against an in-memory backend in tests. The
//! production implementation is [`HttpTransport`] over `reqwest`.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET (queries)
    Get,
    /// POST (creations and actions)
    Post,
    /// PATCH (partial updates)
    Patch,
    /// DELETE (removals)
    Delete,
}

impl Method {
    /// Method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request to the backend, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute path under the base URL (`/alerts`, `/admin/users/:id`, ...)
    pub path: String,
    /// Query-string parameters
    pub query: Vec<(String, String)>,
    /// JSON body, for mutations that carry one
    pub body: Option<Value>,
}

impl ApiRequest {
    /// A GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A POST request for the given path.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A PATCH request for the given path.
    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A DELETE request for the given path.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Canonical cache key for this request: path plus sorted query pairs.
    ///
    /// Two queries with an identical key share one cache entry and one
    /// in-flight request, so the serialization must not depend on argument
    /// construction order.
    pub fn cache_key(&self) -> String {
        let mut pairs = self.query.clone();
        pairs.sort();
        let mut key = self.path.clone();
        for (k, v) in pairs {
            key.push_str(&format!("?{k}={v}"));
        }
        key
    }
}

/// A response from the backend.
///
/// Non-2xx statuses are carried here (not as transport errors) so the
/// server's error payload survives intact for the caller to render.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body (`Value::Null` when the body was empty)
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn the response into its body, or the server's error.
    pub fn into_result(self) -> ApiResult<Value> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ApiError::status(self.status, self.body))
        }
    }
}

/// The boundary every server exchange crosses.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send a request to the backend.
    ///
    /// `Err` is reserved for transport-level failures; HTTP error statuses
    /// come back as an [`ApiResponse`].
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;

    /// PUT raw bytes to a presigned absolute URL (profile pictures, audio
    /// ingest). No Authorization header; the URL itself is the credential.
    async fn upload(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<()>;
}

/// Production transport over `reqwest`.
///
/// Reads the bearer token from the session store at request-build time, so a
/// cleared session immediately stops attaching the Authorization header.
pub struct HttpTransport {
    config: ApiConfig,
    session: SessionStore,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given backend and session store.
    ///
    /// Fails if the underlying HTTP client cannot be built; a client
    /// without the configured timeout is worse than no client.
    pub fn new(config: ApiConfig, session: SessionStore) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("building http client failed: {e}")))?;
        Ok(Self {
            config,
            session,
            client,
        })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.config.url_for(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.session.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = request.method.as_str(), path = %request.path, "api request");

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("reading response body failed: {e}")))?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| ApiError::decode(format!("response was not JSON: {e}")))?
        };

        if !(200..300).contains(&status) {
            tracing::warn!(status, path = %request.path, "api request failed");
        }

        Ok(ApiResponse { status, body })
    }

    async fn upload(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<()> {
        tracing::debug!(url, size = bytes.len(), "presigned upload");

        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("upload to {url} failed: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::status(
                response.status().as_u16(),
                Value::String("presigned upload rejected".into()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = ApiRequest::get("/alerts")
            .with_query("home_id", "h-1")
            .with_query("status", "open");
        let b = ApiRequest::get("/alerts")
            .with_query("status", "open")
            .with_query("home_id", "h-1");
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_distinguishes_args() {
        let a = ApiRequest::get("/alerts").with_query("status", "open");
        let b = ApiRequest::get("/alerts").with_query("status", "closed");
        assert_ne!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), ApiRequest::get("/alerts").cache_key());
    }

    #[test]
    fn test_http_transport_builds_with_configured_timeout() {
        let transport = HttpTransport::new(ApiConfig::default(), SessionStore::new());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_response_into_result_splits_on_status() {
        let ok = ApiResponse {
            status: 200,
            body: serde_json::json!({"ok": true}),
        };
        assert!(ok.into_result().is_ok());

        let err = ApiResponse {
            status: 422,
            body: serde_json::json!({"detail": "bad plan"}),
        };
        match err.into_result() {
            Err(ApiError::Status { status, .. }) => assert_eq!(status, 422),
            other => panic!("expected status error, got {other:?}"),
        }
    }
}
