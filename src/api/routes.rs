//! Route definitions for the API and page shells.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::require_jwt;
use crate::config::WebConfig;
use crate::AppState;

/// Pages anyone may open, with the shell file that backs them.
pub const PUBLIC_PAGES: &[(&str, &str)] = &[("/", "index.html"), ("/clone", "clone.html")];

/// Pages whose shells are served unconditionally but whose scripts require a
/// verified session.
pub const GATED_PAGES: &[(&str, &str)] = &[
    ("/dashboard", "dashboard.html"),
    ("/sample-lawyer-page", "sample-lawyer-page.html"),
    ("/vikk-intelligence", "vikk-intelligence.html"),
    ("/knowledge-graph", "knowledge-graph.html"),
];

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login,
        handlers::get_profile,
        handlers::get_dashboard,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::ProfileResponse,
        crate::api::types::HealthResponse,
        crate::error::ErrorResponse,
        crate::domain::SessionUser,
        crate::domain::Role,
        crate::domain::DashboardData,
        crate::domain::DashboardStats,
        crate::domain::ActivityEntry,
        crate::domain::DashboardCharts,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and session verification"),
        (name = "dashboard", description = "Dashboard data"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Vikk Dashboard API",
        version = "0.1.0",
        description = "Authenticated dashboard API",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router.
///
/// Only the data endpoints under `/api` (other than login) check bearer
/// tokens; page shells and static assets are public.
pub fn build_router(state: AppState, web: &WebConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes requiring a bearer token
    let protected_routes = Router::new()
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_manager.clone(),
            require_jwt,
        ));

    // Public API routes
    let public_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/health", get(handlers::health_check));

    let mut router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state);

    for &(path, file) in PUBLIC_PAGES.iter().chain(GATED_PAGES) {
        router = router.route_service(path, ServeFile::new(web.static_dir.join(file)));
    }

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(&web.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
