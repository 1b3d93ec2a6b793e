//! The four-role access model
//!
//! Every authenticated user carries exactly one role. Roles drive navigation,
//! default landing routes, and which side of the installation workflow a user
//! may act on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User role within the platform.
///
/// Roles are disjoint; `Admin` is not a strict superset of the others at the
/// type level. Navigation composition (admin seeing owner and staff entries)
/// is decided by the routing gate, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A home owner: drafts installation plans, approves technician proposals
    Owner,
    /// A field technician: reviews plans, transitions items, marks installs
    Technician,
    /// Operations staff: monitoring and triage views
    Staff,
    /// Platform administrator: user/home CRUD and audit access
    Admin,
}

impl Role {
    /// All roles, in a stable order.
    pub const ALL: [Role; 4] = [Role::Owner, Role::Technician, Role::Staff, Role::Admin];

    /// Short lowercase label matching the wire representation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Technician => "technician",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }

    /// Whether this role acts on the owner side of the installation workflow.
    pub fn is_owner_side(&self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Whether this role acts on the technician side of the workflow.
    pub fn is_technician_side(&self) -> bool {
        matches!(self, Self::Technician)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Role {
    type Err = crate::HavenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "technician" => Ok(Self::Technician),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(crate::HavenError::invalid(format!("unknown role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Role::Technician).unwrap();
        assert_eq!(json, "\"technician\"");
        let back: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(back, Role::Admin);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!("manager".parse::<Role>().is_err());
        assert_eq!("owner".parse::<Role>().unwrap(), Role::Owner);
    }

    #[test]
    fn test_workflow_sides() {
        assert!(Role::Owner.is_owner_side());
        assert!(!Role::Admin.is_owner_side());
        assert!(Role::Technician.is_technician_side());
        assert!(!Role::Staff.is_technician_side());
    }
}
