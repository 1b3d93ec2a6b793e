//! Audio ingest presign flow
//!
//! Same presigned-upload pattern as profile pictures: request a slot, PUT
//! the bytes directly to object storage, confirm to start the server-side
//! processing job.

use haven_core::JobId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ApiMutation;
use crate::tags::Tag;
use crate::transport::ApiRequest;

/// Presigned upload slot for an audio clip.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestUploadGrant {
    /// Absolute URL to PUT the audio bytes to
    pub upload_url: String,
    /// Object-storage key, echoed back at confirm time
    pub s3_key: String,
}

/// `POST /ingest` — request a presigned upload slot.
#[derive(Debug, Clone, Serialize)]
pub struct PresignIngest {
    /// MIME type of the clip ("audio/wav", ...)
    pub content_type: String,
}

impl ApiMutation for PresignIngest {
    type Output = IngestUploadGrant;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/ingest").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        Vec::new()
    }
}

/// A queued server-side ingest job.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestJob {
    /// Identifier for polling job progress
    pub job_id: JobId,
}

/// `POST /ingest/confirm` — finalize the upload and queue processing.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmIngest {
    /// Key returned by the presign call
    pub s3_key: String,
}

impl ApiMutation for ConfirmIngest {
    type Output = IngestJob;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/ingest/confirm").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        Vec::new()
    }
}
