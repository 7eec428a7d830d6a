//! Shared infrastructure: errors, API primitives, auth middleware.

pub mod api_common;
pub mod error;
pub mod middleware;
