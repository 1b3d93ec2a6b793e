//! # Haven Testkit
//!
//! An in-memory implementation of the REST boundary plus seeded fixtures.
//! Tests construct an [`InMemoryBackend`], hand it to an
//! [`ApiClient`](haven_api::ApiClient) as its transport, and drive real
//! workflows against deterministic data without a server.
//!
//! The backend enforces the same contracts the real server does: workflow
//! transitions go through the shared state machines, error statuses carry a
//! `detail` payload, and every request is recorded so tests can assert on
//! network traffic (including its absence).

pub mod backend;
pub mod fixtures;

pub use backend::{InMemoryBackend, UploadRecord};
pub use fixtures::{Fixtures, PASSWORD};
