//! # Haven Core
//!
//! Shared domain model for the Haven smart-home dashboard core:
//!
//! - [`identifiers`]: Opaque entity identifiers
//! - [`roles`]: The four-role access model
//! - [`domain`]: Users, homes, devices, alerts, and analytics summaries
//! - [`installation`]: Installation-request workflow types and state machines
//! - [`errors`]: Unified error type for all Haven operations
//!
//! This crate is pure data and pure functions. Network access, caching, and
//! session handling live in `haven-api`; routing and workflows in `haven-app`.

pub mod domain;
pub mod errors;
pub mod identifiers;
pub mod installation;
pub mod roles;

pub use domain::{
    Alert, AlertStatus, AuditLogEntry, Device, DeviceStatus, Home, OverviewSummary, Room, User,
};
pub use errors::{HavenError, Result};
pub use identifiers::{
    AlertId, DeviceId, HomeId, ItemId, JobId, RequestId, RoomId, UserId,
};
pub use installation::{
    apply_item_action, apply_request_action, approve_all_pending, CoverageType, InstallationItem,
    InstallationRequest, ItemAction, ItemStatus, RequestAction, RequestStatus, TransitionError,
    WorkflowActor,
};
pub use roles::Role;
