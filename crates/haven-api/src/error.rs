//! API error types
//!
//! Three failure shapes cross the REST boundary: the network failed, the
//! server answered with a non-2xx status, or the payload did not decode.
//! The server's error detail is carried through unmodified so callers can
//! render it.

use haven_core::HavenError;
use serde_json::Value;

/// Error returned by queries and mutations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Network/transport failure (unreachable host, timeout, TLS)
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("server returned {status}: {}", detail_text(detail))]
    Status {
        /// HTTP status code
        status: u16,
        /// The server's error payload, passed through unmodified
        detail: Value,
    },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {message}")]
    Decode {
        /// Description of the decode failure
        message: String,
    },
}

/// Extract a printable detail string from a server error payload.
fn detail_text(detail: &Value) -> String {
    match detail.get("detail") {
        Some(Value::String(s)) => s.clone(),
        _ => detail.to_string(),
    }
}

impl ApiError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a status error from a server response.
    pub fn status(status: u16, detail: Value) -> Self {
        Self::Status { status, detail }
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether this is a 401 from the server.
    ///
    /// Not intercepted globally; pages decide how to react.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// The server's detail payload, if the error carries one.
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::Status { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// Standard Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ApiError> for HavenError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport { message } => HavenError::network(message),
            ApiError::Status { status: 401 | 403, detail } => {
                HavenError::permission_denied(detail_text(&detail))
            }
            ApiError::Status { status: 404, detail } => {
                HavenError::not_found(detail_text(&detail))
            }
            ApiError::Status { status, detail } => {
                HavenError::network(format!("{status}: {}", detail_text(&detail)))
            }
            ApiError::Decode { message } => HavenError::serialization(message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_shows_server_detail() {
        let err = ApiError::status(422, json!({"detail": "plan has no items"}));
        assert_eq!(err.to_string(), "server returned 422: plan has no items");
    }

    #[test]
    fn test_unparsed_detail_passes_through() {
        let err = ApiError::status(500, json!({"code": 12}));
        assert_eq!(err.to_string(), "server returned 500: {\"code\":12}");
        assert_eq!(err.detail(), Some(&json!({"code": 12})));
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ApiError::status(401, Value::Null).is_unauthorized());
        assert!(!ApiError::status(403, Value::Null).is_unauthorized());
        assert!(!ApiError::transport("offline").is_unauthorized());
    }

    #[test]
    fn test_conversion_to_haven_error() {
        let err: HavenError = ApiError::status(404, serde_json::json!({"detail": "no such home"})).into();
        assert!(matches!(err, HavenError::NotFound { .. }));
    }
}
