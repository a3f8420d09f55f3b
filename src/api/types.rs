//! API request and response types.
//!
//! Shared by the handlers and the session guard's HTTP client.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Role, SessionUser};

// ==================== Authentication ====================

/// Login request.
///
/// Missing fields are read as empty strings and fail authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: SessionUser,
}

/// Profile of the token's user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: u64,
    pub username: String,
    pub role: Role,
    /// RFC 3339 timestamp of this verification.
    pub last_login: String,
}

impl ProfileResponse {
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Timestamp.
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime: f64,
    /// Deployment environment.
    pub environment: String,
    /// Service version.
    pub version: String,
}
