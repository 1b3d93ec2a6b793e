//! Installation-request workflow types and state machines
//!
//! The one multi-actor, multi-step process in the platform. An owner submits
//! a per-room coverage plan; a technician reviews it, approves or rejects
//! individual items, and marks the request installed; the owner approves the
//! technician's plan or requests changes.
//!
//! Transitions are pure functions here. The server is authoritative: clients
//! call these to gate UI affordances and the test backend calls them to
//! enforce the contract, but after any mutation the client replaces its held
//! request with the server's response.

use serde::{Deserialize, Serialize};

use crate::identifiers::{HomeId, ItemId, RequestId, RoomId, UserId};
use crate::roles::Role;

// ============================================================================
// Coverage and statuses
// ============================================================================

/// Desired monitoring coverage for one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageType {
    /// No coverage requested; rooms at this level are dropped at submission
    None,
    /// Full sensor coverage
    Full,
    /// Intrusion detection only
    Intrusion,
    /// Safety sensors (smoke, CO)
    Safety,
    /// Environmental sensors (humidity, temperature, leaks)
    Environmental,
    /// Custom plan described in the item notes
    Custom,
}

impl CoverageType {
    /// Whether a room at this coverage level belongs in a submission.
    pub fn is_requested(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Status of a single installation item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Awaiting technician review
    Pending,
    /// Approved by the technician
    Approved,
    /// Rejected by the technician
    Rejected,
    /// Physically installed
    Installed,
}

/// Status of a whole installation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Submitted by the owner, not yet picked up
    Submitted,
    /// Technician is reviewing
    InReview,
    /// Technician has a plan ready for the owner
    PlanReady,
    /// Owner approved the plan
    OwnerApproved,
    /// Owner requested changes
    ChangesRequested,
    /// Installation complete (terminal)
    Installed,
}

impl RequestStatus {
    /// Whether this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// One room's line entry within an installation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationItem {
    /// Item identifier
    pub id: ItemId,
    /// Room this item covers, if tied to a specific room
    #[serde(default)]
    pub room_id: Option<RoomId>,
    /// Requested coverage level
    pub coverage_type: CoverageType,
    /// Number of devices the owner wants
    pub desired_device_count: u32,
    /// Free-form notes from owner or technician
    #[serde(default)]
    pub notes: Option<String>,
    /// Review status
    pub status: ItemStatus,
}

/// An owner-submitted, technician-reviewed installation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRequest {
    /// Request identifier
    pub id: RequestId,
    /// Home this request belongs to
    pub home_id: HomeId,
    /// Submitting owner
    pub owner_id: UserId,
    /// Assigned technician, once one picks the request up
    #[serde(default)]
    pub technician_id: Option<UserId>,
    /// Request-level workflow status
    pub status: RequestStatus,
    /// Request-level notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Per-room line items
    pub items: Vec<InstallationItem>,
}

impl InstallationRequest {
    /// Count items currently awaiting review.
    pub fn pending_items(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.status == ItemStatus::Pending)
            .count()
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Which side of the workflow an actor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowActor {
    /// The submitting home owner
    Owner,
    /// The reviewing technician
    Technician,
}

impl WorkflowActor {
    /// Map a platform role onto a workflow side, if it has one.
    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Owner => Some(Self::Owner),
            Role::Technician => Some(Self::Technician),
            Role::Staff | Role::Admin => None,
        }
    }
}

/// A request-level transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    /// Technician starts reviewing a submitted request
    StartReview,
    /// Technician publishes a plan for owner sign-off
    PlanReady,
    /// Owner approves the plan
    Approve,
    /// Owner requests changes to the plan
    RequestChanges,
    /// Technician marks the whole request installed
    MarkInstalled,
}

/// An item-level transition attempt (technician only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemAction {
    /// Approve a pending item
    Approve,
    /// Reject a pending item
    Reject,
}

/// A rejected workflow transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The action is not valid from the current state
    #[error("cannot {action:?} a request in state {from:?}")]
    InvalidRequestTransition {
        /// State the request was in
        from: RequestStatus,
        /// Attempted action
        action: RequestAction,
    },

    /// The action is not valid for the current item state
    #[error("cannot {action:?} an item in state {from:?}")]
    InvalidItemTransition {
        /// State the item was in
        from: ItemStatus,
        /// Attempted action
        action: ItemAction,
    },

    /// The actor is on the wrong side of the workflow for this action
    #[error("{action:?} is a {required:?} action, attempted by {actor:?}")]
    WrongActor {
        /// Attempted action
        action: RequestAction,
        /// Side that may perform it
        required: WorkflowActor,
        /// Side that attempted it
        actor: WorkflowActor,
    },
}

impl RequestAction {
    /// The workflow side permitted to perform this action.
    pub fn required_actor(&self) -> WorkflowActor {
        match self {
            Self::StartReview | Self::PlanReady | Self::MarkInstalled => WorkflowActor::Technician,
            Self::Approve | Self::RequestChanges => WorkflowActor::Owner,
        }
    }
}

/// Apply a request-level action, returning the next status.
///
/// The direct `PlanReady -> Installed` path is intentional: a technician may
/// complete an install without a separate owner approval round-trip.
pub fn apply_request_action(
    status: RequestStatus,
    action: RequestAction,
    actor: WorkflowActor,
) -> Result<RequestStatus, TransitionError> {
    let required = action.required_actor();
    if actor != required {
        return Err(TransitionError::WrongActor {
            action,
            required,
            actor,
        });
    }

    use RequestAction as A;
    use RequestStatus as S;
    match (status, action) {
        (S::Submitted, A::StartReview) => Ok(S::InReview),
        (S::InReview, A::PlanReady) => Ok(S::PlanReady),
        (S::PlanReady, A::Approve) => Ok(S::OwnerApproved),
        (S::PlanReady, A::RequestChanges) => Ok(S::ChangesRequested),
        (S::OwnerApproved, A::MarkInstalled) => Ok(S::Installed),
        (S::PlanReady, A::MarkInstalled) => Ok(S::Installed),
        (from, action) => Err(TransitionError::InvalidRequestTransition { from, action }),
    }
}

/// Apply an item-level action, returning the next status.
///
/// Only `Pending` items may move; repeated approve/reject calls are rejected
/// here so they can never regress request-level state.
pub fn apply_item_action(
    status: ItemStatus,
    action: ItemAction,
) -> Result<ItemStatus, TransitionError> {
    match (status, action) {
        (ItemStatus::Pending, ItemAction::Approve) => Ok(ItemStatus::Approved),
        (ItemStatus::Pending, ItemAction::Reject) => Ok(ItemStatus::Rejected),
        (from, action) => Err(TransitionError::InvalidItemTransition { from, action }),
    }
}

/// Flip every currently-`Pending` item to `Approved` in place.
///
/// Items already `Approved`, `Rejected`, or `Installed` are untouched.
/// Returns the number of items that changed.
pub fn approve_all_pending(items: &mut [InstallationItem]) -> usize {
    let mut changed = 0;
    for item in items.iter_mut() {
        if item.status == ItemStatus::Pending {
            item.status = ItemStatus::Approved;
            changed += 1;
        }
    }
    changed
}
