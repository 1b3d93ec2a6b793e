//! Own-profile edits and the picture upload flow
//!
//! Picture upload is three steps: presign, raw PUT to object storage,
//! confirm. The confirm response carries the updated user, which also
//! refreshes the session copy so the header avatar updates immediately.

use haven_api::endpoints::profile::{
    ConfirmPicture, PresignPicture, ProfilePatch, UpdateProfile,
};
use haven_api::ApiClient;
use haven_core::User;

use crate::errors::AppError;
use crate::notifications::Notifications;

/// Apply a partial profile update.
pub async fn update_profile(
    client: &ApiClient,
    notifications: &Notifications,
    patch: ProfilePatch,
) -> Result<User, AppError> {
    match client.mutate(&UpdateProfile { patch }).await {
        Ok(user) => {
            refresh_session_user(client, &user);
            notifications.info("Profile updated");
            Ok(user)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

/// Upload a new profile picture.
///
/// Any failed step aborts the flow with a toast; a dangling presigned slot
/// is harmless and expires server-side.
pub async fn upload_picture(
    client: &ApiClient,
    notifications: &Notifications,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<User, AppError> {
    let result = async {
        let grant = client
            .mutate(&PresignPicture {
                content_type: content_type.to_owned(),
            })
            .await?;
        client.upload(&grant.upload_url, content_type, bytes).await?;
        client
            .mutate(&ConfirmPicture {
                picture_key: grant.picture_key,
            })
            .await
    }
    .await;

    match result {
        Ok(user) => {
            refresh_session_user(client, &user);
            notifications.info("Profile picture updated");
            Ok(user)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

// Keep the session's user in step with profile edits without touching the
// token.
fn refresh_session_user(client: &ApiClient, user: &User) {
    let session = client.session();
    if let Some(token) = session.bearer_token() {
        session.set_credentials(user.clone(), token);
    }
}
