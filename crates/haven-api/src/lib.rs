//! # Haven API
//!
//! The data-access layer of the Haven dashboard core. It mediates every
//! exchange with the REST backend and keeps read results coherent after
//! writes:
//!
//! - [`session`]: the authenticated identity slot consumed by role checks
//!   and by the transport's Authorization-header injection
//! - [`transport`]: the `ApiTransport` seam plus the production `reqwest`
//!   implementation
//! - [`tags`]: coarse invalidation labels linking cached reads to mutations
//! - [`cache`]: the tag-subscribed query cache with in-flight de-duplication
//! - [`endpoints`]: one typed query/mutation definition per REST operation
//! - [`client`]: `ApiClient`, the handle frontends are given
//!
//! ## Read/write flow
//!
//! ```text
//! Query  → cache (dedup, tags) → transport → backend
//! Mutation → transport → backend → publish invalidations → refetch subscribers
//! ```
//!
//! Tag granularity is deliberately coarse (whole resource categories, with
//! optional instance ids). Over-invalidation is safe; under-invalidation is
//! not.

pub mod cache;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod tags;
pub mod transport;

pub use cache::{QueryCache, QueryStatus, QuerySubscription};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use session::{Session, SessionStore};
pub use tags::{Tag, TagKind};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method};
pub use endpoints::{ApiMutation, ApiQuery};
