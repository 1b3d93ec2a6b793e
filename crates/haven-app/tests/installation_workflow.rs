//! End-to-end installation-request workflow against the in-memory backend.

use std::sync::Arc;

use haven_api::{ApiClient, SessionStore};
use haven_app::errors::ErrorCategory;
use haven_app::notifications::{Notifications, ToastLevel};
use haven_app::workflows::installation::{
    approve_all, owner_can, owner_decide, submit_plan, tech_can, tech_transition,
    transition_item, RoomDraft,
};
use haven_core::{CoverageType, ItemAction, ItemStatus, RequestAction, RequestStatus, RoomId};
use haven_testkit::InMemoryBackend;

fn harness() -> (ApiClient, Arc<InMemoryBackend>, Notifications) {
    let backend = Arc::new(InMemoryBackend::new());
    let client = ApiClient::new(backend.clone(), SessionStore::new());
    (client, backend, Notifications::new())
}

fn draft(room_id: RoomId, coverage: CoverageType, count: u32) -> RoomDraft {
    RoomDraft {
        room_id: Some(room_id),
        coverage,
        desired_device_count: count,
        notes: None,
    }
}

#[tokio::test]
async fn test_all_none_plan_fails_locally_with_no_network() {
    let (client, backend, notifications) = harness();
    let home_id = backend.fixtures().home.id;
    let drafts: Vec<RoomDraft> = backend
        .fixtures()
        .rooms
        .iter()
        .map(|r| draft(r.id, CoverageType::None, 0))
        .collect();

    let err = submit_plan(&client, &notifications, home_id, None, &drafts)
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Input);
    assert_eq!(backend.request_count(), 0, "validation must not hit the network");
    let toasts = notifications.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Info);
}

#[tokio::test]
async fn test_submission_drops_unconfigured_rooms() {
    let (client, backend, notifications) = harness();
    let fixtures = backend.fixtures();
    let drafts = vec![
        draft(fixtures.rooms[0].id, CoverageType::Full, 2),
        draft(fixtures.rooms[1].id, CoverageType::None, 0),
        draft(fixtures.rooms[2].id, CoverageType::Safety, 1),
    ];

    let request = submit_plan(&client, &notifications, fixtures.home.id, None, &drafts)
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::Submitted);
    assert_eq!(request.items.len(), 2, "the None room is dropped client-side");
    assert!(request.items.iter().all(|i| i.status == ItemStatus::Pending));
    assert_eq!(backend.requests_to("/owner/installation-requests"), 1);
}

#[tokio::test]
async fn test_full_lifecycle_with_owner_signoff() {
    let (client, backend, notifications) = harness();
    let fixtures = backend.fixtures();
    let drafts = vec![draft(fixtures.rooms[0].id, CoverageType::Full, 2)];

    let request = submit_plan(&client, &notifications, fixtures.home.id, None, &drafts)
        .await
        .unwrap();
    let id = request.id;

    let request = tech_transition(&client, &notifications, id, RequestAction::StartReview)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::InReview);
    assert!(request.technician_id.is_some(), "pickup assigns the technician");

    let request = tech_transition(&client, &notifications, id, RequestAction::PlanReady)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::PlanReady);

    let request = owner_decide(&client, &notifications, id, RequestAction::Approve)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::OwnerApproved);

    let request = tech_transition(&client, &notifications, id, RequestAction::MarkInstalled)
        .await
        .unwrap();
    assert!(request.status.is_terminal());
}

#[tokio::test]
async fn test_item_decision_comes_back_in_the_full_request() {
    let (client, backend, notifications) = harness();
    let fixture = backend.fixtures().request.clone();
    let pending = fixture.items[0].id;

    let updated = transition_item(
        &client,
        &notifications,
        fixture.id,
        pending,
        ItemAction::Approve,
    )
    .await
    .unwrap();

    assert_eq!(updated.items[0].status, ItemStatus::Approved);
    // The other items come back untouched.
    assert_eq!(updated.items[1].status, ItemStatus::Approved);
    assert_eq!(updated.items[2].status, ItemStatus::Rejected);
    assert_eq!(updated.items[3].status, ItemStatus::Pending);
}

#[tokio::test]
async fn test_approve_all_is_one_call_and_spares_rejections() {
    let (client, backend, notifications) = harness();
    let fixture = backend.fixtures().request.clone();
    assert_eq!(fixture.pending_items(), 2);

    let updated = approve_all(&client, &notifications, fixture.id).await.unwrap();

    assert_eq!(updated.pending_items(), 0);
    assert_eq!(updated.items[2].status, ItemStatus::Rejected);
    // One bulk call, never expanded into per-item mutations.
    let log = backend.request_log();
    assert_eq!(
        log.iter().filter(|r| r.path.ends_with("/approve-all")).count(),
        1
    );
    assert!(!log.iter().any(|r| r.path.contains("/items/")));
}

#[tokio::test]
async fn test_repeat_reject_is_a_conflict_not_a_regression() {
    let (client, backend, notifications) = harness();
    let fixture = backend.fixtures().request.clone();
    let rejected = fixture.items[2].id;

    let err = transition_item(
        &client,
        &notifications,
        fixture.id,
        rejected,
        ItemAction::Reject,
    )
    .await
    .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Operation);
    let server_copy = backend.installation_request(fixture.id).unwrap();
    assert_eq!(server_copy.items[2].status, ItemStatus::Rejected);
    // Request-level state never regresses from a refused item action.
    assert_eq!(server_copy.status, RequestStatus::InReview);
    assert_eq!(notifications.len(), 1);
}

#[tokio::test]
async fn test_wrong_side_action_is_a_capability_error() {
    let (client, backend, notifications) = harness();
    let id = backend.fixtures().request.id;

    // Approve is an owner action; pushing it down the technician route is
    // refused by the server with a 403.
    let err = tech_transition(&client, &notifications, id, RequestAction::Approve)
        .await
        .unwrap_err();
    assert_eq!(err.category, ErrorCategory::Capability);
}

#[tokio::test]
async fn test_affordance_helpers_track_request_state() {
    let (_, backend, _) = harness();
    let fixture = backend.fixtures().request.clone();
    assert_eq!(fixture.status, RequestStatus::InReview);

    assert!(tech_can(&fixture, RequestAction::PlanReady));
    assert!(!tech_can(&fixture, RequestAction::StartReview));
    assert!(!owner_can(&fixture, RequestAction::Approve));
}
