//! Domain entities served by the REST boundary
//!
//! These are plain serde structs mirroring the backend's JSON shapes. The
//! client never derives state locally from them beyond rendering; mutations
//! always replace held objects with the server's authoritative response.

use serde::{Deserialize, Serialize};

use crate::identifiers::{AlertId, DeviceId, HomeId, RoomId, UserId};
use crate::roles::Role;

/// An authenticated user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier
    pub id: UserId,
    /// Login email
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Access role; absent role means "no access" at the routing gate
    #[serde(default)]
    pub role: Option<Role>,
    /// Home this user belongs to (owners only)
    #[serde(default)]
    pub home_id: Option<HomeId>,
    /// Profile picture URL, if one has been confirmed
    #[serde(default)]
    pub picture_url: Option<String>,
}

/// A home: the tenant unit owning rooms, devices, alerts, and requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    /// Home identifier
    pub id: HomeId,
    /// Human-readable name
    pub name: String,
    /// Street address
    #[serde(default)]
    pub address: Option<String>,
    /// Owner account
    pub owner_id: UserId,
}

/// A room within a home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Owning home
    pub home_id: HomeId,
    /// Room name ("Kitchen", "Garage", ...)
    pub name: String,
}

/// Operational status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Device is reporting heartbeats
    Online,
    /// Device has missed its heartbeat window
    Offline,
    /// Device is provisioned but not yet activated
    Pending,
}

/// A monitoring device installed in a home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier
    pub id: DeviceId,
    /// Owning home
    pub home_id: HomeId,
    /// Room placement, if assigned
    #[serde(default)]
    pub room_id: Option<RoomId>,
    /// Device model name
    pub model: String,
    /// Current operational status
    pub status: DeviceStatus,
    /// Unix-millisecond timestamp of the last heartbeat
    #[serde(default)]
    pub last_heartbeat: Option<u64>,
}

/// Lifecycle status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Newly raised, unseen
    Open,
    /// Acknowledged by staff
    Acknowledged,
    /// Escalated for urgent handling
    Escalated,
    /// Resolved and closed
    Closed,
}

/// A monitoring alert raised against a home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier
    pub id: AlertId,
    /// Home the alert belongs to
    pub home_id: HomeId,
    /// Device that raised the alert, if any
    #[serde(default)]
    pub device_id: Option<DeviceId>,
    /// Alert kind ("intrusion", "smoke", "water_leak", ...)
    pub kind: String,
    /// Current lifecycle status
    pub status: AlertStatus,
    /// Human-readable message
    pub message: String,
    /// Unix-millisecond creation timestamp
    pub created_at: u64,
}

/// One entry in the administrative audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Entry identifier (opaque server-assigned string)
    pub id: String,
    /// Acting user
    pub actor_id: UserId,
    /// Action name ("user.create", "request.approve_all", ...)
    pub action: String,
    /// Target entity description
    #[serde(default)]
    pub target: Option<String>,
    /// Unix-millisecond timestamp
    pub timestamp: u64,
}

/// Aggregate analytics returned by the per-role overview endpoints.
///
/// The server computes these; the client only renders them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewSummary {
    /// Total homes visible to the caller
    #[serde(default)]
    pub homes: u64,
    /// Total devices visible to the caller
    #[serde(default)]
    pub devices: u64,
    /// Devices currently online
    #[serde(default)]
    pub devices_online: u64,
    /// Open alerts
    #[serde(default)]
    pub open_alerts: u64,
    /// Installation requests not yet installed
    #[serde(default)]
    pub pending_requests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_missing_role_deserializes() {
        // A user object without a role is "no access", not a decode error.
        let json = format!(
            r#"{{"id":"{}","email":"a@b.c"}}"#,
            uuid::Uuid::new_v4()
        );
        let user: User = serde_json::from_str(&json).unwrap();
        assert!(user.role.is_none());
        assert!(user.home_id.is_none());
    }

    #[test]
    fn test_alert_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&AlertStatus::Acknowledged).unwrap(),
            "\"acknowledged\""
        );
    }

    #[test]
    fn test_overview_defaults_to_zero() {
        let summary: OverviewSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, OverviewSummary::default());
    }
}
