//! Audio clip ingest
//!
//! Presign, PUT the clip to object storage, confirm. Returns the job id of
//! the server-side processing job queued by the confirm call.

use haven_api::endpoints::ingest::{ConfirmIngest, PresignIngest};
use haven_api::ApiClient;
use haven_core::JobId;

use crate::errors::AppError;
use crate::notifications::Notifications;

/// Upload an audio clip and queue it for processing.
pub async fn ingest_audio(
    client: &ApiClient,
    notifications: &Notifications,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<JobId, AppError> {
    let result = async {
        let grant = client
            .mutate(&PresignIngest {
                content_type: content_type.to_owned(),
            })
            .await?;
        client.upload(&grant.upload_url, content_type, bytes).await?;
        client.mutate(&ConfirmIngest { s3_key: grant.s3_key }).await
    }
    .await;

    match result {
        Ok(job) => {
            tracing::info!(job = %job.job_id, "ingest job queued");
            notifications.info("Audio uploaded; processing started");
            Ok(job.job_id)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}
