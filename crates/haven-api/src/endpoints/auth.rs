//! Authentication endpoint

use haven_core::User;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiMutation;
use crate::tags::Tag;
use crate::transport::ApiRequest;

/// `POST /auth/login`
///
/// Authentication itself is the backend's concern; this just exchanges
/// credentials for a user and token. The caller stores both atomically in
/// the session store.
#[derive(Debug, Clone, Serialize)]
pub struct Login {
    /// Login email
    pub email: String,
    /// Plaintext password (sent over TLS, never stored)
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// The authenticated user
    pub user: User,
    /// Bearer token for subsequent requests
    pub token: String,
}

impl ApiMutation for Login {
    type Output = LoginResponse;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/auth/login").with_body(json!({
            "email": self.email,
            "password": self.password,
        }))
    }

    fn invalidates(&self) -> Vec<Tag> {
        // A fresh login starts from an empty cache (the client clears it on
        // credential changes), so there is nothing to invalidate.
        Vec::new()
    }
}
