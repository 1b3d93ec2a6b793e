//! Invalidation tags
//!
//! Coarse labels connecting cached reads to the mutations that stale them.
//! A query declares the tags it *provides*; a mutation declares the tags it
//! *invalidates*. After a successful mutation, every cache entry providing a
//! matching tag is marked stale.
//!
//! Granularity is whole-resource-category by default, with optional instance
//! parameterization. A bare kind matches every entry of that kind, and a
//! parameterized tag also matches bare-kind entries, so a single entity
//! update refetches list queries of the same type. Intentional trade-off:
//! over-invalidation is safe, under-invalidation is not.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource categories used for invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// User accounts
    User,
    /// Homes and their rooms
    Home,
    /// Devices
    Device,
    /// Alerts
    Alert,
    /// Emergency contacts
    Contact,
    /// Monitoring policies
    Policy,
    /// Detection model configuration
    ModelConfig,
    /// Network settings
    Network,
    /// Installation requests and their items
    InstallationRequest,
    /// Administrative audit log
    AuditLog,
    /// The caller's own profile
    Profile,
    /// Per-role overview analytics
    Overview,
}

/// An invalidation tag: a resource kind, optionally pinned to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Resource category
    pub kind: TagKind,
    /// Instance id, when the tag is parameterized
    pub id: Option<String>,
}

impl Tag {
    /// A bare category tag.
    pub fn of(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    /// A tag pinned to one instance of the category.
    pub fn with_id(kind: TagKind, id: impl fmt::Display) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }

    /// Whether a mutation carrying `invalidating` stales an entry
    /// providing `self`.
    ///
    /// Kinds must match. If either side is unparameterized the match is by
    /// kind alone; otherwise the instance ids must agree.
    pub fn matches(&self, invalidating: &Tag) -> bool {
        if self.kind != invalidating.kind {
            return false;
        }
        match (&self.id, &invalidating.id) {
            (Some(provided), Some(invalidated)) => provided == invalidated,
            _ => true,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{:?}({id})", self.kind),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_tag_matches_any_instance() {
        let provided = Tag::with_id(TagKind::User, "u-1");
        let invalidating = Tag::of(TagKind::User);
        assert!(provided.matches(&invalidating));
    }

    #[test]
    fn test_parameterized_tag_stales_list_entries() {
        // A list query provides the bare kind; an entity update invalidates
        // the parameterized tag and must still hit the list.
        let provided = Tag::of(TagKind::InstallationRequest);
        let invalidating = Tag::with_id(TagKind::InstallationRequest, "r-9");
        assert!(provided.matches(&invalidating));
    }

    #[test]
    fn test_instance_ids_must_agree_when_both_present() {
        let provided = Tag::with_id(TagKind::Device, "d-1");
        assert!(provided.matches(&Tag::with_id(TagKind::Device, "d-1")));
        assert!(!provided.matches(&Tag::with_id(TagKind::Device, "d-2")));
    }

    #[test]
    fn test_kinds_never_cross() {
        let provided = Tag::of(TagKind::Alert);
        assert!(!provided.matches(&Tag::of(TagKind::Device)));
    }
}
