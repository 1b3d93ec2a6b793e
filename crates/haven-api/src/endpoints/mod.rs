//! # Endpoint Definitions
//!
//! One typed definition per REST operation. Queries declare the tags they
//! provide; mutations declare the tags they invalidate. The traits keep
//! endpoint definitions declarative: a request description plus tag sets,
//! with decoding handled generically by the client.
//!
//! Modules mirror the backend's resource groups:
//! - [`auth`]: login
//! - [`users`] / [`homes`]: admin CRUD
//! - [`devices`]: device CRUD and heartbeats
//! - [`alerts`]: alert list and lifecycle actions
//! - [`installation`]: owner and technician sides of the workflow
//! - [`profile`]: own profile and picture presign flow
//! - [`ingest`]: audio ingest presign flow
//! - [`overview`]: per-role analytics reads
//! - [`audit`]: administrative audit log

use serde::de::DeserializeOwned;

use crate::tags::Tag;
use crate::transport::ApiRequest;

pub mod alerts;
pub mod audit;
pub mod auth;
pub mod devices;
pub mod homes;
pub mod ingest;
pub mod installation;
pub mod overview;
pub mod profile;
pub mod users;

/// A cached, de-duplicated server read.
pub trait ApiQuery {
    /// Decoded response type.
    type Output: DeserializeOwned;

    /// The GET request this query issues.
    fn request(&self) -> ApiRequest;

    /// Tags this read provides; invalidating any of them stales the entry.
    fn provides(&self) -> Vec<Tag>;
}

/// A server write that invalidates dependent reads on success.
pub trait ApiMutation {
    /// Decoded response type.
    type Output: DeserializeOwned;

    /// The request this mutation issues.
    fn request(&self) -> ApiRequest;

    /// Tags published on success; every cached read providing one refetches.
    fn invalidates(&self) -> Vec<Tag>;
}
