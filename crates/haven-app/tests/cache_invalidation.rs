//! Cache coherence across the mutation boundary, driven through real
//! workflows against the in-memory backend.

use std::sync::Arc;

use haven_api::endpoints::devices::{CreateDevice, ListDevices};
use haven_api::endpoints::homes::{HomePatch, ListHomes, UpdateHome};
use haven_api::endpoints::installation::ListTechRequests;
use haven_api::{ApiClient, Method, QueryStatus, SessionStore};
use haven_app::notifications::Notifications;
use haven_app::workflows::installation::{approve_all, owner_requests, tech_requests, tech_transition};
use haven_app::workflows::session::{login, logout};
use haven_core::RequestAction;
use haven_testkit::{InMemoryBackend, PASSWORD};

const TECH_LIST: &str = "/tech/installation-requests";
const OWNER_LIST: &str = "/owner/installation-requests";

fn harness() -> (ApiClient, Arc<InMemoryBackend>, Notifications) {
    let backend = Arc::new(InMemoryBackend::new());
    let client = ApiClient::new(backend.clone(), SessionStore::new());
    (client, backend, Notifications::new())
}

#[tokio::test]
async fn test_identical_queries_share_one_fetch() {
    let (client, backend, notifications) = harness();

    let first = tech_requests(&client, None).await.unwrap();
    let second = tech_requests(&client, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.requests_to(TECH_LIST), 1, "second read is served from cache");
    assert!(notifications.is_empty());
}

#[tokio::test]
async fn test_mutation_refetches_subscribed_list_before_resolving() {
    let (client, backend, notifications) = harness();
    let id = backend.fixtures().request.id;

    let query = ListTechRequests { status: None };
    let _sub = client.subscribe(&query);
    tech_requests(&client, None).await.unwrap();
    assert_eq!(backend.requests_to(TECH_LIST), 1);

    approve_all(&client, &notifications, id).await.unwrap();

    // The mutation awaited the subscribed refetch before resolving.
    assert_eq!(backend.requests_to(TECH_LIST), 2);
    let key = haven_api::ApiRequest::get(TECH_LIST).cache_key();
    assert_eq!(client.cache().status_of(&key), QueryStatus::Success);
    assert!(!client.cache().is_stale(&key));

    // The refreshed entry already reflects the mutation.
    let requests = tech_requests(&client, None).await.unwrap();
    assert_eq!(backend.requests_to(TECH_LIST), 2, "fresh entry needs no new fetch");
    assert_eq!(requests[0].pending_items(), 0);
}

#[tokio::test]
async fn test_unsubscribed_stale_entry_refetches_lazily() {
    let (client, backend, notifications) = harness();
    let id = backend.fixtures().request.id;

    // Seeded request is InReview; walk it one step so the owner list changes.
    owner_requests(&client).await.unwrap();
    assert_eq!(backend.requests_to(OWNER_LIST), 1);

    tech_transition(&client, &notifications, id, RequestAction::PlanReady)
        .await
        .unwrap();

    // No subscriber, so invalidation alone does not refetch.
    assert_eq!(backend.requests_to(OWNER_LIST), 1);

    let requests = owner_requests(&client).await.unwrap();
    assert_eq!(backend.requests_to(OWNER_LIST), 2, "stale entry refetches on access");
    assert_eq!(
        requests[0].status,
        haven_core::RequestStatus::PlanReady
    );
}

#[tokio::test]
async fn test_device_write_invalidates_the_device_list() {
    let (client, backend, _notifications) = harness();
    let home_id = backend.fixtures().home.id;
    let list = ListDevices { home_id: None };
    let device_list_gets = || {
        backend
            .request_log()
            .iter()
            .filter(|r| r.path == "/devices" && r.method == Method::Get)
            .count()
    };

    let devices = client.query(&list).await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(device_list_gets(), 1);

    client
        .mutate(&CreateDevice {
            home_id,
            room_id: None,
            model: "HV-Leak 1".into(),
        })
        .await
        .unwrap();

    // The stale list refetches on next access and sees the new device.
    let devices = client.query(&list).await.unwrap();
    assert_eq!(devices.len(), 3);
    assert_eq!(device_list_gets(), 2);
}

#[tokio::test]
async fn test_home_rename_refetches_subscribed_home_list() {
    let (client, backend, _notifications) = harness();
    let home_id = backend.fixtures().home.id;

    let _sub = client.subscribe(&ListHomes);
    let homes = client.query(&ListHomes).await.unwrap();
    assert_eq!(homes[0].name, "Maple Street 12");
    assert_eq!(backend.requests_to("/admin/homes"), 1);

    client
        .mutate(&UpdateHome {
            id: home_id,
            patch: HomePatch {
                name: Some("Maple Street 12b".into()),
                address: None,
            },
        })
        .await
        .unwrap();

    // Subscribed, so the mutation refetched the list before resolving.
    assert_eq!(backend.requests_to("/admin/homes"), 2);
    let homes = client.query(&ListHomes).await.unwrap();
    assert_eq!(homes[0].name, "Maple Street 12b");
    assert_eq!(backend.requests_to("/admin/homes"), 2);
}

#[tokio::test]
async fn test_login_and_logout_reset_the_cache() {
    let (client, backend, notifications) = harness();

    login(&client, &notifications, "owner@haven.test", PASSWORD)
        .await
        .unwrap();
    owner_requests(&client).await.unwrap();
    assert_eq!(backend.requests_to(OWNER_LIST), 1);

    logout(&client);

    let key = haven_api::ApiRequest::get(OWNER_LIST).cache_key();
    assert_eq!(client.cache().status_of(&key), QueryStatus::Uninitialized);

    // The next identity starts from an empty cache.
    owner_requests(&client).await.unwrap();
    assert_eq!(backend.requests_to(OWNER_LIST), 2);
}
