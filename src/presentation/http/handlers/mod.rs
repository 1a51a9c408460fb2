//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod health;
pub mod marks;
pub mod receipts;
pub mod students;

use crate::shared::error::AppError;

/// Parse a numeric path segment.
fn parse_id(value: &str, entity: &str) -> Result<i64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", entity)))
}
