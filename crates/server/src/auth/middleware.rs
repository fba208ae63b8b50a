//! # Authentication Middleware
//!
//! This module provides the Axum middleware for bearer-token (JWT) validation.
//! Routes under `/protected` always require `Authorization: Bearer <token>`
//! signed with the configured secret. When `auth.enabled` is set, the
//! top-level routes outside `auth.public_paths` require it too. The validated
//! `Claims` are placed in the request extensions for handlers.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::state::AppState;

/// Represents the claims we expect to find in the JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token, which we use as the caller's identity.
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
}

/// A custom rejection type for authentication failures.
///
/// Rendered as `{"error": ...}` with the carried status code.
#[derive(Debug)]
pub struct AuthError(StatusCode, String);

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

fn unauthorized(message: &str) -> AuthError {
    AuthError(StatusCode::UNAUTHORIZED, message.to_string())
}

/// Decodes and validates an HS256 token, returning its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("JWT validation failed: {}", e);
        unauthorized("Invalid or expired token.")
    })?;

    // `Validation::default()` allows some leeway on `exp`; expired is expired here.
    let current_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| {
            AuthError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "System time is before UNIX EPOCH.".to_string(),
            )
        })?
        .as_secs();

    if (token_data.claims.exp as u64) < current_timestamp {
        warn!(
            "Token has expired. exp: {}, current: {}",
            token_data.claims.exp, current_timestamp
        );
        return Err(unauthorized("Invalid or expired token."));
    }

    Ok(token_data.claims)
}

/// Validates the bearer token of `request` and stores its claims in the
/// request extensions.
fn authorize(state: &AppState, request: &mut Request) -> Result<(), AuthError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        warn!(path = request.uri().path(), "Request without a bearer token rejected.");
        return Err(unauthorized("Missing bearer token."));
    };

    let claims = validate_token(bearer.token(), &state.config.jwt_secret)?;
    debug!(sub = %claims.sub, "Bearer token accepted.");
    request.extensions_mut().insert(claims);
    Ok(())
}

/// Rejects every request without a valid bearer token.
///
/// Guards the `/protected` variants of the API routes.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    authorize(&state, &mut request)?;
    Ok(next.run(request).await)
}

/// Like `require_bearer_token`, but lets `auth.public_paths` through.
///
/// Installed on the top-level routes when `auth.enabled` is set.
pub async fn require_bearer_token_outside_public_paths(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let is_public = state
        .config
        .auth
        .public_paths
        .iter()
        .any(|p| p == request.uri().path());
    if is_public {
        debug!(path = request.uri().path(), "Public path; skipping token validation.");
    } else {
        authorize(&state, &mut request)?;
    }
    Ok(next.run(request).await)
}
