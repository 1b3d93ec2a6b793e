//! # Haven App
//!
//! Portable headless core for the Haven dashboard. Frontends (web, terminal)
//! render state from here and call workflows; they never talk to the REST
//! boundary directly.
//!
//! - [`routing`]: the role-routing gate deciding landing pages, navigation
//!   entries, and redirects
//! - [`errors`]: categorized application errors with toast-severity routing
//! - [`notifications`]: the transient toast feed surfacing workflow outcomes
//! - [`workflows`]: session, installation-request, profile, and ingest flows

pub mod errors;
pub mod notifications;
pub mod routing;
pub mod workflows;

pub use errors::{AppError, ErrorCategory};
pub use notifications::{Notifications, Toast, ToastLevel};
pub use routing::{default_route, nav_entries, resolve, NavEntry, Route, RouteDecision};
