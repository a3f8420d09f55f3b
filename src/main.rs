//! Vikk Dashboard server.
//!
//! Serves the dashboard page shells and the authenticated REST API.

use tokio::net::TcpListener;

use vikk_dashboard::api::build_router;
use vikk_dashboard::auth::{JwtManager, UserStore};
use vikk_dashboard::config::Config;
use vikk_dashboard::{logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Vikk Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        environment = %config.environment,
        static_dir = %config.web.static_dir.display(),
        "Configuration loaded"
    );

    if config.auth.uses_default_secret() {
        tracing::warn!("JWT secret is the built-in default - set JWT_SECRET for production");
    }

    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_duration_hours,
    );
    let user_store = UserStore::new(config.auth.users.clone());

    tracing::info!(
        users = user_store.len(),
        token_duration_hours = config.auth.token_duration_hours,
        "Authentication configured"
    );
    for username in user_store.usernames() {
        tracing::debug!(username = %username, "Configured user");
    }

    let state = AppState::new(jwt_manager, user_store, config.environment.clone());
    let app = build_router(state, &config.web);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
