//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::JwtManager;
use crate::error::ErrorResponse;

/// Rejection produced by the bearer middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer token on the request (401).
    MissingToken,
    /// Token present but invalid or expired (403).
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Access token required", "MISSING_TOKEN"),
            ),
            AuthError::InvalidToken => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("Invalid or expired token", "INVALID_TOKEN"),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Pull the token out of an `Authorization: <scheme> <token>` header.
///
/// No header, or a header without a token part, is a missing token. A token
/// under any scheme other than `Bearer` (case-insensitive) is present but
/// invalid.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MissingToken)?;
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Extract and validate JWT token from request.
///
/// Expects `Authorization: Bearer <token>` header. Valid claims are placed in
/// the request extensions for handlers.
pub async fn require_jwt(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;

    let claims = jwt_manager.validate_token(token).map_err(|e| {
        tracing::debug!(error = %e, path = %request.uri().path(), "Rejected bearer token");
        AuthError::InvalidToken
    })?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
