//! Login, logout, and the routing gate over real session state.

use std::sync::Arc;

use haven_api::{ApiClient, SessionStore};
use haven_app::errors::ErrorCategory;
use haven_app::notifications::Notifications;
use haven_app::routing::{resolve, Route, RouteDecision};
use haven_app::workflows::session::{login, logout};
use haven_core::Role;
use haven_testkit::{InMemoryBackend, PASSWORD};

fn harness() -> (ApiClient, Arc<InMemoryBackend>, Notifications) {
    let backend = Arc::new(InMemoryBackend::new());
    let client = ApiClient::new(backend.clone(), SessionStore::new());
    (client, backend, Notifications::new())
}

#[tokio::test]
async fn test_login_sets_session_and_gates_routes_by_role() {
    let (client, _backend, notifications) = harness();

    let user = login(&client, &notifications, "owner@haven.test", PASSWORD)
        .await
        .unwrap();
    assert_eq!(user.role, Some(Role::Owner));
    assert!(client.session().is_authenticated());

    let session = client.session().snapshot();
    assert_eq!(resolve(&session, "/overview"), RouteDecision::Render);
    assert_eq!(
        resolve(&session, "/admin/users"),
        RouteDecision::RedirectDefault(Route("/overview"))
    );
}

#[tokio::test]
async fn test_technician_login_lands_on_tech_routes() {
    let (client, _backend, notifications) = harness();

    login(&client, &notifications, "tech@haven.test", PASSWORD)
        .await
        .unwrap();
    let session = client.session().snapshot();

    assert_eq!(
        resolve(&session, "/tech/installation-requests"),
        RouteDecision::Render
    );
    assert_eq!(
        resolve(&session, "/alerts"),
        RouteDecision::RedirectDefault(Route("/tech/overview"))
    );
}

#[tokio::test]
async fn test_failed_login_leaves_session_untouched() {
    let (client, backend, notifications) = harness();

    let err = login(&client, &notifications, "owner@haven.test", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::Capability);
    assert!(!client.session().is_authenticated());
    assert_eq!(notifications.len(), 1);
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test]
async fn test_logout_redirects_everything_to_login() {
    let (client, _backend, notifications) = harness();

    login(&client, &notifications, "admin@haven.test", PASSWORD)
        .await
        .unwrap();
    logout(&client);

    let session = client.session().snapshot();
    assert!(!session.is_authenticated());
    assert_eq!(resolve(&session, "/admin/users"), RouteDecision::RedirectLogin);
    assert_eq!(resolve(&session, "/overview"), RouteDecision::RedirectLogin);
}
