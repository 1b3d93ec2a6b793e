//! Session store: the authenticated identity slot
//!
//! A single writable slot holding the logged-in user and their bearer token.
//! Every role check reads it synchronously, and the transport reads the
//! token at request-build time, so clearing credentials immediately stops
//! new requests from carrying an Authorization header.
//!
//! The store is a cloneable handle around shared state and is passed
//! explicitly to whatever needs it. There is no ambient global.

use std::sync::Arc;

use haven_core::{Role, User};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// The authenticated identity, or the lack of one.
///
/// Invariant: `user` and `token` are always set and cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The logged-in user, if any
    pub user: Option<User>,
    /// The bearer token backing the user's requests
    pub token: Option<String>,
}

impl Session {
    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// Cloneable handle to the process-wide session slot.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    /// Create an empty (logged-out) session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the session with a freshly authenticated identity.
    ///
    /// Unconditional overwrite, no merge. User and token are swapped in
    /// under one lock so no reader ever observes one without the other.
    pub fn set_credentials(&self, user: User, token: impl Into<String>) {
        let mut session = self.inner.write();
        *session = Session {
            user: Some(user),
            token: Some(token.into()),
        };
    }

    /// Clear the session back to the logged-out state.
    pub fn clear_credentials(&self) {
        let mut session = self.inner.write();
        *session = Session::default();
    }

    /// Current bearer token, if a session exists.
    pub fn bearer_token(&self) -> Option<String> {
        self.inner.read().token.clone()
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.inner.read().user.clone()
    }

    /// The logged-in user's role, if any.
    ///
    /// A logged-in user without a role yields `None`; the routing gate
    /// treats that as "no access".
    pub fn role(&self) -> Option<Role> {
        self.inner.read().user.as_ref().and_then(|u| u.role)
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_authenticated()
    }

    /// A point-in-time copy of the session.
    pub fn snapshot(&self) -> Session {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::UserId;

    fn user(role: Option<Role>) -> User {
        User {
            id: UserId::new(),
            email: "owner@example.com".into(),
            name: Some("Test Owner".into()),
            role,
            home_id: None,
            picture_url: None,
        }
    }

    #[test]
    fn test_set_then_clear_restores_initial_state() {
        let store = SessionStore::new();
        let initial = store.snapshot();

        store.set_credentials(user(Some(Role::Owner)), "tok-123");
        assert!(store.is_authenticated());
        assert_eq!(store.bearer_token().as_deref(), Some("tok-123"));

        store.clear_credentials();
        assert_eq!(store.snapshot(), initial);
        assert!(store.bearer_token().is_none());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_set_credentials_overwrites() {
        let store = SessionStore::new();
        store.set_credentials(user(Some(Role::Owner)), "first");
        store.set_credentials(user(Some(Role::Admin)), "second");
        assert_eq!(store.bearer_token().as_deref(), Some("second"));
        assert_eq!(store.role(), Some(Role::Admin));
    }

    #[test]
    fn test_missing_role_reads_as_none() {
        let store = SessionStore::new();
        store.set_credentials(user(None), "tok");
        assert!(store.is_authenticated());
        assert_eq!(store.role(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.set_credentials(user(Some(Role::Staff)), "tok");
        assert_eq!(other.role(), Some(Role::Staff));
    }
}
