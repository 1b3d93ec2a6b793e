//! Own-profile endpoints and the picture presign flow (tag: `Profile`)

use haven_core::User;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /profile`
#[derive(Debug, Clone, Default)]
pub struct GetProfile;

impl ApiQuery for GetProfile {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::get("/profile")
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Profile)]
    }
}

/// Partial update body for the caller's profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `PATCH /profile`
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    /// Fields to change
    pub patch: ProfilePatch,
}

impl ApiMutation for UpdateProfile {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch("/profile").with_body(json!(self.patch))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Profile)]
    }
}

/// Presigned upload slot for a profile picture.
#[derive(Debug, Clone, Deserialize)]
pub struct PictureUploadGrant {
    /// Absolute URL to PUT the image bytes to
    pub upload_url: String,
    /// Opaque key identifying the upload, echoed back at confirm time
    pub picture_key: String,
}

/// `POST /profile/picture` — request a presigned upload slot.
#[derive(Debug, Clone, Serialize)]
pub struct PresignPicture {
    /// MIME type of the image about to be uploaded
    pub content_type: String,
}

impl ApiMutation for PresignPicture {
    type Output = PictureUploadGrant;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/profile/picture").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        // Nothing changes until the upload is confirmed.
        Vec::new()
    }
}

/// `POST /profile/picture/confirm?picture_key=` — finalize after the PUT.
#[derive(Debug, Clone)]
pub struct ConfirmPicture {
    /// Key returned by the presign call
    pub picture_key: String,
}

impl ApiMutation for ConfirmPicture {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/profile/picture/confirm")
            .with_query("picture_key", self.picture_key.clone())
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Profile)]
    }
}
