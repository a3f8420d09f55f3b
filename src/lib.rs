//! Vikk Dashboard
//!
//! An authenticated dashboard service: credential login issuing JWT bearer
//! tokens, protected profile and dashboard endpoints, and the client-side
//! session guard that gates each page on a verified session.

use std::time::Instant;

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

use crate::auth::{JwtManager, UserStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Configured users allowed to log in.
    pub user_store: UserStore,
    /// Deployment environment reported by the health probe.
    pub environment: String,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(jwt_manager: JwtManager, user_store: UserStore, environment: String) -> Self {
        Self {
            jwt_manager,
            user_store,
            environment,
            started_at: Instant::now(),
        }
    }
}
