//! Login and logout
//!
//! The only two writes to the session store. Both also reset the query
//! cache so one identity's cached reads never bleed into another session.

use haven_api::endpoints::auth::Login;
use haven_api::ApiClient;
use haven_core::User;

use crate::errors::AppError;
use crate::notifications::Notifications;

/// Exchange credentials for a session.
///
/// On success the user and token are stored atomically and the cache is
/// reset. On failure the session is untouched and an error toast is pushed.
pub async fn login(
    client: &ApiClient,
    notifications: &Notifications,
    email: impl Into<String>,
    password: impl Into<String>,
) -> Result<User, AppError> {
    let mutation = Login {
        email: email.into(),
        password: password.into(),
    };
    match client.mutate(&mutation).await {
        Ok(response) => {
            client.reset_cache();
            client
                .session()
                .set_credentials(response.user.clone(), response.token);
            tracing::info!(user = %response.user.email, "logged in");
            Ok(response.user)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

/// Clear the session and every cached read.
///
/// Role-gated routes react to the cleared session by redirecting to login.
pub fn logout(client: &ApiClient) {
    client.session().clear_credentials();
    client.reset_cache();
    tracing::info!("logged out");
}
