//! Authentication Middleware
//!
//! Verifies the bearer token issued by the account service and attaches
//! the caller's school as a `TenantContext` request extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtSettings;
use crate::domain::TenantContext;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (admin user ID)
    pub sub: String,
    /// School the admin acts for
    pub school_id: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Decode a token into the tenant it was issued for.
pub fn verify_token(token: &str, settings: &JwtSettings) -> Result<TenantContext, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = settings.leeway_seconds;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    let admin_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    Ok(TenantContext::new(token_data.claims.school_id, admin_id))
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AppError::Unauthorized("Missing or malformed authorization header".into()))?;

    let tenant = verify_token(bearer.token(), &state.settings.jwt)?;
    tracing::debug!(school_id = tenant.school_id, admin_id = tenant.admin_id, "Authenticated");

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(tenant);

    Ok(next.run(request).await)
}
