//! HTTP API layer for civimod.
//!
//! This crate provides the REST façade over the moderation core:
//!
//! - **Endpoints**: public report submission plus the admin surface
//! - **Extractors**: admin session authentication
//! - **Middleware**: bearer-token validation with uniform 401 collapse
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
