//! Configuration module.
//!
//! Loads configuration from YAML files and environment variables.

use std::path::PathBuf;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredUser;
use crate::domain::Role;

/// Secret used when nothing else is configured. Fine for local runs only.
pub const DEFAULT_JWT_SECRET: &str = "vikk-dashboard-secret-key-2024";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub web: WebConfig,
    /// Deployment environment name (development, production, ...).
    pub environment: String,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Token issuance and user configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Token validity in hours.
    pub token_duration_hours: i64,
    /// Users allowed to log in.
    #[serde(default = "default_users")]
    pub users: Vec<ConfiguredUser>,
}

/// Static page configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory holding page shells, scripts and header fragments.
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. `PORT` and `JWT_SECRET` environment variables
    /// 2. Environment variables (VIKK__*)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("auth.jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("auth.jwt_issuer", "vikk-dashboard")?
            .set_default("auth.token_duration_hours", 24)?
            .set_default("web.static_dir", "public")?
            .set_default("environment", "development")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("VIKK")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl AuthConfig {
    /// Whether the signing secret was left at its built-in value.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_issuer: "vikk-dashboard".to_string(),
            token_duration_hours: 24,
            users: default_users(),
        }
    }
}

/// Demo accounts: admin/admin123, user/user123, demo/demo123.
fn default_users() -> Vec<ConfiguredUser> {
    vec![
        ConfiguredUser {
            id: 1,
            username: "admin".to_string(),
            password_hash: "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
                .to_string(),
            role: Role::Admin,
        },
        ConfiguredUser {
            id: 2,
            username: "user".to_string(),
            password_hash: "e606e38b0d8c19b24cf0ee3808183162ea7cd63ff7912dbb22b5e803286b4446"
                .to_string(),
            role: Role::User,
        },
        ConfiguredUser {
            id: 3,
            username: "demo".to_string(),
            password_hash: "d3ad9315b7be5dd53b31a273b3b3aba5defe700808305aa16a3062b76658a791"
                .to_string(),
            role: Role::User,
        },
    ]
}
