//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::api::types::*;
use crate::auth::Claims;
use crate::domain::DashboardData;
use crate::error::{DashboardError, DashboardResult, ErrorResponse};
use crate::AppState;

/// Authenticate with username and password.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> DashboardResult<Json<LoginResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        // A body that is not JSON carries no credentials
        Err(JsonRejection::MissingJsonContentType(_)) => LoginRequest::default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Malformed login body");
            return Err(DashboardError::BadRequest("Invalid request body".to_string()));
        }
    };

    let user = state
        .user_store
        .authenticate(&request.username, &request.password)
        .ok_or_else(|| {
            tracing::warn!(username = %request.username, "Failed login attempt");
            DashboardError::Unauthorized("Invalid credentials".to_string())
        })?;

    let user = user.session_user();
    let token = state.jwt_manager.generate_token(&user)?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %user.role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// Profile of the authenticated user.
///
/// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DashboardResult<Json<ProfileResponse>> {
    let user = state.user_store.find_by_id(claims.id).ok_or_else(|| {
        tracing::warn!(user_id = claims.id, "Token names an unknown user");
        DashboardError::NotFound("User not found".to_string())
    })?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
        last_login: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Dashboard statistics.
///
/// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardData),
        (status = 401, description = "Missing token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_dashboard(Extension(claims): Extension<Claims>) -> Json<DashboardData> {
    tracing::debug!(user_id = claims.id, "Serving dashboard data");
    Json(DashboardData::sample())
}

/// Liveness probe.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
