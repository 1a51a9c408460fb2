//! Custom Extractors
//!
//! Axum extractors for request parsing.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::validation_error;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// JSON body that is deserialized and then validated
///
/// Every failure is reported as an [`AppError`], so malformed bodies get the
/// same JSON error shape as failed validation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_error)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => data_error(&err.body_text()),
        other => AppError::BadRequest(other.body_text()),
    }
}

/// Turn a deserialization failure into a field error.
///
/// The rejection text is `<prefix>: <path>: <message>`; errors at the root
/// carry no path.
fn data_error(text: &str) -> AppError {
    let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);

    let (path, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.contains(char::is_whitespace) => (Some(path), message),
        _ => (None, detail),
    };

    let field = match (path, missing_field(message)) {
        (Some(path), Some(name)) => format!("{}.{}", path, name),
        (Some(path), None) => path.to_string(),
        (None, Some(name)) => name.to_string(),
        (None, None) => "body".to_string(),
    };

    AppError::invalid_field(field, message)
}

fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.split('`').next()
}
