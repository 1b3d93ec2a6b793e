//! The installation-request workflow
//!
//! Owner side: draft per-room coverage, submit, approve or request changes
//! on the technician's plan. Technician side: request-level transitions,
//! per-item approve/reject, and the atomic approve-all.
//!
//! Every mutation returns the server's authoritative request object; callers
//! replace their held copy wholesale (items included) instead of patching
//! item status locally. That keeps an open drawer consistent with the server
//! after concurrent edits.

use haven_api::endpoints::installation::{
    ApproveAllItems, ListOwnerRequests, ListTechRequests, NewInstallationItem, OwnerDecision,
    SubmitRequest, TechTransition, TransitionItem,
};
use haven_api::ApiClient;
use haven_core::{
    apply_item_action, apply_request_action, CoverageType, InstallationRequest, ItemAction,
    ItemId, ItemStatus, RequestAction, RequestId, RequestStatus, RoomId, WorkflowActor,
};

use crate::errors::AppError;
use crate::notifications::Notifications;

// ============================================================================
// Owner: drafting and submission
// ============================================================================

/// One room's line in the owner's draft, before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    /// Room being drafted
    pub room_id: Option<RoomId>,
    /// Chosen coverage level (`None` means "skip this room")
    pub coverage: CoverageType,
    /// Desired device count
    pub desired_device_count: u32,
    /// Owner notes for the technician
    pub notes: Option<String>,
}

/// Reduce a draft to the items worth submitting.
///
/// Rooms at coverage `None` are dropped; everything else carries its device
/// count and notes through unchanged.
pub fn qualifying_items(drafts: &[RoomDraft]) -> Vec<NewInstallationItem> {
    drafts
        .iter()
        .filter(|d| d.coverage.is_requested())
        .map(|d| NewInstallationItem {
            room_id: d.room_id,
            coverage_type: d.coverage,
            desired_device_count: d.desired_device_count,
            notes: d.notes.clone(),
        })
        .collect()
}

/// Submit an owner's coverage plan.
///
/// Precondition, checked before any network call: at least one room must
/// request coverage. An all-`None` draft fails locally with an inline
/// validation error.
pub async fn submit_plan(
    client: &ApiClient,
    notifications: &Notifications,
    home_id: haven_core::HomeId,
    notes: Option<String>,
    drafts: &[RoomDraft],
) -> Result<InstallationRequest, AppError> {
    let items = qualifying_items(drafts);
    if items.is_empty() {
        let err = AppError::input("Select coverage for at least one room before submitting");
        notifications.push(err.toast_level(), err.message.clone());
        return Err(err);
    }

    let mutation = SubmitRequest {
        home_id,
        notes,
        items,
    };
    match client.mutate(&mutation).await {
        Ok(request) => {
            tracing::info!(request = %request.id, "installation plan submitted");
            notifications.info("Installation plan submitted");
            Ok(request)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

/// List the owner's own requests.
pub async fn owner_requests(client: &ApiClient) -> Result<Vec<InstallationRequest>, AppError> {
    client.query(&ListOwnerRequests).await.map_err(AppError::from)
}

/// Whether the owner may take `action` on `request` right now.
///
/// Pure UI affordance; the server re-checks on mutation.
pub fn owner_can(request: &InstallationRequest, action: RequestAction) -> bool {
    apply_request_action(request.status, action, WorkflowActor::Owner).is_ok()
}

/// Owner checkpoint on a technician's plan: approve or request changes.
pub async fn owner_decide(
    client: &ApiClient,
    notifications: &Notifications,
    request_id: RequestId,
    action: RequestAction,
) -> Result<InstallationRequest, AppError> {
    debug_assert!(matches!(
        action,
        RequestAction::Approve | RequestAction::RequestChanges
    ));
    match client.mutate(&OwnerDecision { id: request_id, action }).await {
        Ok(request) => {
            let message = match action {
                RequestAction::Approve => "Plan approved",
                _ => "Changes requested",
            };
            notifications.info(message);
            Ok(request)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

// ============================================================================
// Technician: review and installation
// ============================================================================

/// List the technician work queue, optionally filtered by status.
pub async fn tech_requests(
    client: &ApiClient,
    status: Option<RequestStatus>,
) -> Result<Vec<InstallationRequest>, AppError> {
    client
        .query(&ListTechRequests { status })
        .await
        .map_err(AppError::from)
}

/// Whether the technician may take `action` on `request` right now.
pub fn tech_can(request: &InstallationRequest, action: RequestAction) -> bool {
    apply_request_action(request.status, action, WorkflowActor::Technician).is_ok()
}

/// Whether an item still admits `action` (drives button enablement).
pub fn item_can(status: ItemStatus, action: ItemAction) -> bool {
    apply_item_action(status, action).is_ok()
}

/// Technician request-level transition: start review, plan ready, or mark
/// installed.
pub async fn tech_transition(
    client: &ApiClient,
    notifications: &Notifications,
    request_id: RequestId,
    action: RequestAction,
) -> Result<InstallationRequest, AppError> {
    match client.mutate(&TechTransition { id: request_id, action }).await {
        Ok(request) => {
            tracing::debug!(request = %request.id, status = ?request.status, "request transitioned");
            Ok(request)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

/// Approve or reject one item.
///
/// The returned request replaces the caller's copy; only the acted-on item
/// changes status in the server's response.
pub async fn transition_item(
    client: &ApiClient,
    notifications: &Notifications,
    request_id: RequestId,
    item_id: ItemId,
    action: ItemAction,
) -> Result<InstallationRequest, AppError> {
    let mutation = TransitionItem {
        request_id,
        item_id,
        action,
    };
    match client.mutate(&mutation).await {
        Ok(request) => Ok(request),
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}

/// Approve every pending item in one server call.
///
/// Never expanded into per-item mutations client-side; the single call is
/// what makes the bulk action atomic.
pub async fn approve_all(
    client: &ApiClient,
    notifications: &Notifications,
    request_id: RequestId,
) -> Result<InstallationRequest, AppError> {
    match client.mutate(&ApproveAllItems { request_id }).await {
        Ok(request) => {
            notifications.info("All pending items approved");
            Ok(request)
        }
        Err(err) => {
            let err = AppError::from(err);
            notifications.push(err.toast_level(), err.message.clone());
            Err(err)
        }
    }
}
