//! Installation-request workflow endpoints (tag: `InstallationRequest`)
//!
//! Two sides of one workflow. Owners submit and sign off on plans under
//! `/owner/...`; technicians review, transition items, and mark installs
//! under `/tech/...`. Every mutation returns the full request object so the
//! client can replace its held copy wholesale, items included.

use haven_core::{
    CoverageType, HomeId, InstallationRequest, ItemAction, ItemId, RequestAction, RequestId,
    RequestStatus, RoomId,
};
use serde::Serialize;
use serde_json::json;

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// Both the parameterized and bare tags: the open drawer and every list
/// refetch together.
fn request_tags(id: RequestId) -> Vec<Tag> {
    vec![
        Tag::with_id(TagKind::InstallationRequest, id),
        Tag::of(TagKind::InstallationRequest),
        Tag::of(TagKind::Overview),
    ]
}

// ============================================================================
// Owner side
// ============================================================================

/// `GET /owner/installation-requests`
#[derive(Debug, Clone, Default)]
pub struct ListOwnerRequests;

impl ApiQuery for ListOwnerRequests {
    type Output = Vec<InstallationRequest>;

    fn request(&self) -> ApiRequest {
        ApiRequest::get("/owner/installation-requests")
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::InstallationRequest)]
    }
}

/// One line of a submission body: a room the owner wants covered.
///
/// Rooms with coverage `None` never appear here; the workflow filters them
/// out before this type is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewInstallationItem {
    /// Room to cover
    pub room_id: Option<RoomId>,
    /// Requested coverage level
    pub coverage_type: CoverageType,
    /// Number of devices the owner wants
    pub desired_device_count: u32,
    /// Owner notes for the technician
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `POST /owner/installation-requests`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    /// Home the plan covers
    pub home_id: HomeId,
    /// Request-level notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The qualifying rooms (non-empty; enforced by the workflow before any
    /// network call)
    pub items: Vec<NewInstallationItem>,
}

impl ApiMutation for SubmitRequest {
    type Output = InstallationRequest;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/owner/installation-requests").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![
            Tag::of(TagKind::InstallationRequest),
            Tag::of(TagKind::Overview),
        ]
    }
}

/// `PATCH /owner/installation-requests/:id`
///
/// Owner checkpoints on a technician's plan: approve, or request changes.
#[derive(Debug, Clone)]
pub struct OwnerDecision {
    /// Request to act on
    pub id: RequestId,
    /// `Approve` or `RequestChanges`
    pub action: RequestAction,
}

impl ApiMutation for OwnerDecision {
    type Output = InstallationRequest;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!("/owner/installation-requests/{}", self.id))
            .with_body(json!({ "action": self.action }))
    }

    fn invalidates(&self) -> Vec<Tag> {
        request_tags(self.id)
    }
}

// ============================================================================
// Technician side
// ============================================================================

/// `GET /tech/installation-requests[?status]`
#[derive(Debug, Clone, Default)]
pub struct ListTechRequests {
    /// Restrict to one workflow status
    pub status: Option<RequestStatus>,
}

impl ApiQuery for ListTechRequests {
    type Output = Vec<InstallationRequest>;

    fn request(&self) -> ApiRequest {
        let mut req = ApiRequest::get("/tech/installation-requests");
        if let Some(status) = self.status {
            // snake_case wire labels, matching the status serde rename.
            let label = match status {
                RequestStatus::Submitted => "submitted",
                RequestStatus::InReview => "in_review",
                RequestStatus::PlanReady => "plan_ready",
                RequestStatus::OwnerApproved => "owner_approved",
                RequestStatus::ChangesRequested => "changes_requested",
                RequestStatus::Installed => "installed",
            };
            req = req.with_query("status", label);
        }
        req
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::InstallationRequest)]
    }
}

/// `PATCH /tech/installation-requests/:id`
///
/// Technician request-level transitions: start review, plan ready, mark
/// installed.
#[derive(Debug, Clone)]
pub struct TechTransition {
    /// Request to act on
    pub id: RequestId,
    /// Transition to apply
    pub action: RequestAction,
}

impl ApiMutation for TechTransition {
    type Output = InstallationRequest;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!("/tech/installation-requests/{}", self.id))
            .with_body(json!({ "action": self.action }))
    }

    fn invalidates(&self) -> Vec<Tag> {
        request_tags(self.id)
    }
}

/// `PATCH /tech/installation-requests/:id/items/:item_id`
///
/// Per-item approve/reject. Returns the whole request, not just the item.
#[derive(Debug, Clone)]
pub struct TransitionItem {
    /// Request the item belongs to
    pub request_id: RequestId,
    /// Item to act on
    pub item_id: ItemId,
    /// `Approve` or `Reject`
    pub action: ItemAction,
}

impl ApiMutation for TransitionItem {
    type Output = InstallationRequest;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!(
            "/tech/installation-requests/{}/items/{}",
            self.request_id, self.item_id
        ))
        .with_body(json!({ "action": self.action }))
    }

    fn invalidates(&self) -> Vec<Tag> {
        request_tags(self.request_id)
    }
}

/// `POST /tech/installation-requests/:id/approve-all`
///
/// One atomic server call flipping every pending item to approved. Exists
/// specifically so the client never issues N sequential item mutations with
/// partial-failure states.
#[derive(Debug, Clone)]
pub struct ApproveAllItems {
    /// Request whose pending items to approve
    pub request_id: RequestId,
}

impl ApiMutation for ApproveAllItems {
    type Output = InstallationRequest;

    fn request(&self) -> ApiRequest {
        ApiRequest::post(format!(
            "/tech/installation-requests/{}/approve-all",
            self.request_id
        ))
    }

    fn invalidates(&self) -> Vec<Tag> {
        request_tags(self.request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_body_shape() {
        let home_id = HomeId::new();
        let room_id = RoomId::new();
        let submit = SubmitRequest {
            home_id,
            notes: None,
            items: vec![NewInstallationItem {
                room_id: Some(room_id),
                coverage_type: CoverageType::Full,
                desired_device_count: 2,
                notes: Some("cover the bay window".into()),
            }],
        };
        let body = submit.request().body.unwrap();
        assert_eq!(body["home_id"], json!(home_id.to_string()));
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["coverage_type"], json!("full"));
        assert_eq!(items[0]["desired_device_count"], json!(2));
    }

    #[test]
    fn test_status_filter_uses_wire_labels() {
        let req = ListTechRequests {
            status: Some(RequestStatus::PlanReady),
        }
        .request();
        assert!(req.query.contains(&("status".into(), "plan_ready".into())));
    }

    #[test]
    fn test_item_transition_body_carries_action() {
        let mutation = TransitionItem {
            request_id: RequestId::new(),
            item_id: ItemId::new(),
            action: ItemAction::Reject,
        };
        let body = mutation.request().body.unwrap();
        assert_eq!(body["action"], json!("reject"));
    }

    #[test]
    fn test_mutations_invalidate_bare_and_parameterized_tags() {
        let id = RequestId::new();
        let tags = TechTransition {
            id,
            action: RequestAction::StartReview,
        }
        .invalidates();
        assert!(tags.contains(&Tag::with_id(TagKind::InstallationRequest, id)));
        assert!(tags.contains(&Tag::of(TagKind::InstallationRequest)));
    }
}
