//! HTTP Interface
//!
//! Axum routes, request handlers and extractors.

pub mod extractors;
pub mod handlers;
pub mod routes;
