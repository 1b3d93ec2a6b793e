//! Categorized application errors
//!
//! Workflows wrap lower-level failures into categories so frontends can
//! pick the right surface: inline validation text, a warning banner, or an
//! error toast. The server's own message is preserved where one exists.

use std::fmt;

use haven_api::ApiError;

use crate::notifications::ToastLevel;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend treatment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Client-side precondition failed (correctable by the user)
    Input,
    /// Role/authorization failure
    Capability,
    /// Resource not found
    NotFound,
    /// Network connectivity failure (often transient)
    Network,
    /// General operation failure (catch-all, includes server errors)
    Operation,
}

impl ErrorCategory {
    /// Whether the user can correct this error themselves.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input)
    }

    /// Whether a retry is likely to help.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::NotFound)
    }

    /// The toast severity for this category.
    #[must_use]
    pub fn toast_severity(&self) -> ToastLevel {
        match self {
            Self::Input => ToastLevel::Info,
            Self::Capability => ToastLevel::Error,
            Self::NotFound => ToastLevel::Warning,
            Self::Network => ToastLevel::Warning,
            Self::Operation => ToastLevel::Error,
        }
    }

    /// Short label for logs and banners.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Capability => "Permission",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Operation => "Operation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// AppError
// ============================================================================

/// A categorized workflow failure.
#[derive(Debug, Clone)]
pub struct AppError {
    /// Category driving UI treatment
    pub category: ErrorCategory,
    /// Message to render (server-provided where available)
    pub message: String,
}

impl AppError {
    /// Create an error in the given category.
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    /// A client-side validation error, raised before any network call.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Input, message)
    }

    /// A role/authorization failure.
    pub fn capability(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Capability, message)
    }

    /// The toast severity for this error.
    pub fn toast_level(&self) -> ToastLevel {
        self.category.toast_severity()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        let category = match &err {
            ApiError::Transport { .. } => ErrorCategory::Network,
            ApiError::Status { status: 401 | 403, .. } => ErrorCategory::Capability,
            ApiError::Status { status: 404, .. } => ErrorCategory::NotFound,
            ApiError::Status { .. } => ErrorCategory::Operation,
            ApiError::Decode { .. } => ErrorCategory::Operation,
        };
        Self::new(category, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_errors_are_user_correctable() {
        let err = AppError::input("select at least one room");
        assert!(err.category.is_user_correctable());
        assert_eq!(err.toast_level(), ToastLevel::Info);
    }

    #[test]
    fn test_api_error_categorization() {
        let err: AppError = ApiError::transport("connection refused").into();
        assert_eq!(err.category, ErrorCategory::Network);
        assert!(err.category.is_transient());

        let err: AppError = ApiError::status(403, json!({"detail": "wrong role"})).into();
        assert_eq!(err.category, ErrorCategory::Capability);

        let err: AppError = ApiError::status(422, json!({"detail": "empty plan"})).into();
        assert_eq!(err.category, ErrorCategory::Operation);
        assert!(err.message.contains("empty plan"));
    }
}
