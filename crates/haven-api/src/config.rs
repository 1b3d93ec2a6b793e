//! API client configuration

use std::time::Duration;

/// Configuration for the REST boundary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Environment variable overriding the base URL.
    pub const BASE_URL_ENV: &'static str = "HAVEN_API_URL";

    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Build a configuration from the environment, falling back to the
    /// default local backend address.
    pub fn from_env() -> Self {
        match std::env::var(Self::BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    /// Join a request path onto the base URL.
    pub fn url_for(&self, path: &str) -> String {
        debug_assert!(path.starts_with('/'), "endpoint paths are absolute");
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ApiConfig::new("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.url_for("/alerts"), "https://api.example.com/alerts");
    }
}
