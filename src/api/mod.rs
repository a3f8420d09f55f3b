//! HTTP API layer.
//!
//! Provides the REST endpoints for login, profile, dashboard data and health,
//! plus the page-shell routes served to browsers.

pub mod handlers;
mod routes;
pub mod types;

pub use routes::{build_router, ApiDoc, GATED_PAGES, PUBLIC_PAGES};
