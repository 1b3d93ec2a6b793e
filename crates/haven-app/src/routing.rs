//! The role-routing gate
//!
//! Given a session and a requested path, decide whether to render, redirect
//! to login, or redirect to the role's default landing route. Navigation
//! entries are composed per role.
//!
//! Admin is a superset of owner and staff navigation but deliberately NOT of
//! technician navigation; that asymmetry matches the backend's authorization
//! rules and is preserved, not generalized.

use haven_api::Session;
use haven_core::Role;

/// The login route, reachable without a session.
pub const LOGIN_ROUTE: &str = "/login";

/// A named route in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route(pub &'static str);

impl Route {
    /// The route's path.
    pub fn path(&self) -> &'static str {
        self.0
    }
}

/// One navigation entry rendered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavEntry {
    /// Label shown to the user
    pub label: &'static str,
    /// Route subtree this entry opens; child paths are permitted too
    pub path: &'static str,
}

const OWNER_NAV: &[NavEntry] = &[
    NavEntry { label: "Overview", path: "/overview" },
    NavEntry { label: "Alerts", path: "/alerts" },
    NavEntry { label: "Devices", path: "/devices" },
    NavEntry { label: "Installation", path: "/installation-requests" },
    NavEntry { label: "Profile", path: "/profile" },
];

const TECHNICIAN_NAV: &[NavEntry] = &[
    NavEntry { label: "Overview", path: "/tech/overview" },
    NavEntry { label: "Work Queue", path: "/tech/installation-requests" },
    NavEntry { label: "Profile", path: "/profile" },
];

const STAFF_NAV: &[NavEntry] = &[
    NavEntry { label: "Overview", path: "/ops/overview" },
    NavEntry { label: "Alerts", path: "/ops/alerts" },
    NavEntry { label: "Homes", path: "/ops/homes" },
    NavEntry { label: "Profile", path: "/profile" },
];

const ADMIN_NAV: &[NavEntry] = &[
    NavEntry { label: "Overview", path: "/admin/overview" },
    NavEntry { label: "Users", path: "/admin/users" },
    NavEntry { label: "Homes", path: "/admin/homes" },
    NavEntry { label: "Audit Log", path: "/admin/audit-log" },
];

/// Default landing route for a role.
///
/// A missing role falls through to the owner default; that is "no access"
/// policy, not an error, and the permitted-set check will bounce such users
/// off everything but the owner landing page they cannot use anyway.
pub fn default_route(role: Option<Role>) -> Route {
    match role {
        Some(Role::Technician) => Route("/tech/overview"),
        Some(Role::Staff) => Route("/ops/overview"),
        Some(Role::Admin) => Route("/admin/overview"),
        Some(Role::Owner) | None => Route("/overview"),
    }
}

/// Navigation entries for a role, in render order.
///
/// Admin receives its own entries plus owner's and staff's, but not
/// technician's.
pub fn nav_entries(role: Option<Role>) -> Vec<NavEntry> {
    match role {
        Some(Role::Owner) => OWNER_NAV.to_vec(),
        Some(Role::Technician) => TECHNICIAN_NAV.to_vec(),
        Some(Role::Staff) => STAFF_NAV.to_vec(),
        Some(Role::Admin) => {
            let mut entries = ADMIN_NAV.to_vec();
            entries.extend_from_slice(OWNER_NAV);
            entries.extend_from_slice(STAFF_NAV);
            // Profile appears in both owner and staff lists.
            entries.dedup();
            entries
        }
        None => Vec::new(),
    }
}

/// Whether `path` falls inside a role's permitted route subtree.
pub fn is_permitted(role: Option<Role>, path: &str) -> bool {
    if path == LOGIN_ROUTE {
        return true;
    }
    nav_entries(role)
        .iter()
        .any(|entry| path == entry.path || path.starts_with(&format!("{}/", entry.path)))
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested path
    Render,
    /// No session: go to the login page
    RedirectLogin,
    /// Session exists but the path is outside the role's set: go home
    RedirectDefault(Route),
}

/// Decide what a navigation event does.
pub fn resolve(session: &Session, path: &str) -> RouteDecision {
    if !session.is_authenticated() {
        return RouteDecision::RedirectLogin;
    }
    let role = session.user.as_ref().and_then(|u| u.role);
    if is_permitted(role, path) {
        RouteDecision::Render
    } else {
        RouteDecision::RedirectDefault(default_route(role))
    }
}
