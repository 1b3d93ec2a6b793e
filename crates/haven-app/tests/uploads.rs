//! Presigned upload flows: profile pictures and audio ingest.

use std::sync::Arc;

use haven_api::{ApiClient, SessionStore};
use haven_app::notifications::Notifications;
use haven_app::workflows::ingest::ingest_audio;
use haven_app::workflows::profile::upload_picture;
use haven_app::workflows::session::login;
use haven_testkit::{InMemoryBackend, PASSWORD};

fn harness() -> (ApiClient, Arc<InMemoryBackend>, Notifications) {
    let backend = Arc::new(InMemoryBackend::new());
    let client = ApiClient::new(backend.clone(), SessionStore::new());
    (client, backend, Notifications::new())
}

#[tokio::test]
async fn test_picture_upload_presigns_puts_and_confirms() {
    let (client, backend, notifications) = harness();
    login(&client, &notifications, "owner@haven.test", PASSWORD)
        .await
        .unwrap();

    let user = upload_picture(&client, &notifications, "image/png", vec![0xAB; 64])
        .await
        .unwrap();

    let picture_url = user.picture_url.unwrap();
    assert!(picture_url.starts_with("https://cdn.haven.test/"));

    // The raw PUT went to the presigned slot, not through the API.
    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].content_type, "image/png");
    assert_eq!(uploads[0].size, 64);

    // The session copy of the user follows the confirm response.
    let session_user = client.session().current_user().unwrap();
    assert_eq!(session_user.picture_url.as_deref(), Some(picture_url.as_str()));
}

#[tokio::test]
async fn test_ingest_queues_a_processing_job() {
    let (client, backend, notifications) = harness();

    let job_id = ingest_audio(&client, &notifications, "audio/wav", vec![0x01; 1024])
        .await
        .unwrap();

    assert!(!job_id.to_string().is_empty());
    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].content_type, "audio/wav");
}
