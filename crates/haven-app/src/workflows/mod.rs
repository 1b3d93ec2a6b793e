//! # Workflows: Portable Business Logic
//!
//! Multi-step operations shared by every frontend. Each workflow function
//! takes the [`ApiClient`](haven_api::ApiClient) and the notification feed
//! explicitly; there is no ambient state.
//!
//! Failure contract: a failed step surfaces a toast and returns the error;
//! client-held state is never mutated optimistically, so the prior state
//! stays intact. Nothing is retried automatically.

pub mod ingest;
pub mod installation;
pub mod profile;
pub mod session;
