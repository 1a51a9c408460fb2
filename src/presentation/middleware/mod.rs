//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{auth_middleware, verify_token, Claims};
pub use logging::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
