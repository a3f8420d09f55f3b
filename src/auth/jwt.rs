//! JWT issuance and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::{Role, SessionUser};
use crate::error::{DashboardError, DashboardResult};

/// JWT claims for authenticated users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub id: u64,
    /// Username.
    pub username: String,
    /// User role.
    pub role: Role,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    /// The identity carried by the token.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in hours.
    token_duration_hours: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration_hours,
        }
    }

    /// Generate a JWT token for a user.
    pub fn generate_token(&self, user: &SessionUser) -> DashboardResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_duration_hours);

        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DashboardError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a JWT token.
    ///
    /// Bad signatures, foreign issuers and expired tokens are all `Forbidden`.
    pub fn validate_token(&self, token: &str) -> DashboardResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                DashboardError::Forbidden(format!("Invalid token: {}", e))
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> SessionUser {
        SessionUser {
            id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret-key-12345", "vikk-dashboard".to_string(), 24);

        let token = manager.generate_token(&admin()).unwrap();

        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.id, 1);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.session_user(), admin());
    }

    #[test]
    fn test_expired_token_rejected() {
        let manager = JwtManager::new("test-secret-key-12345", "vikk-dashboard".to_string(), -1);
        let token = manager.generate_token(&admin()).unwrap();

        let err = manager.validate_token(&token).unwrap_err();
        assert!(matches!(err, DashboardError::Forbidden(_)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = JwtManager::new("secret-a", "vikk-dashboard".to_string(), 24);
        let verifier = JwtManager::new("secret-b", "vikk-dashboard".to_string(), 24);
        let token = issuer.generate_token(&admin()).unwrap();

        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let manager = JwtManager::new("secret", "vikk-dashboard".to_string(), 24);
        assert!(matches!(
            manager.validate_token("not-a-jwt"),
            Err(DashboardError::Forbidden(_))
        ));
    }
}
