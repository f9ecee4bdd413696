//! graphlens-client: HTTP client for the remote graph query endpoint.
//!
//! All query traffic flows through this crate: one transport client
//! (`ApiClient`) and one module (`queries`) that assembles every piece of
//! query text the system sends, so escaping and parameter binding live in
//! exactly one place.

pub mod client;
pub mod queries;

pub use client::{ApiClient, ApiConfig, ApiError, QueryResponse};
pub use queries::QuerySpec;
