mod assistant;
mod auth;
mod config;
mod db;
mod errors;
mod execution;
mod models;
mod routes;
mod state;
mod users;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::GeminiClient;
use crate::auth::jwt::SessionKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::execution::PistonRunner;
use crate::routes::build_router;
use crate::state::AppState;
use crate::users::store::PgUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting editor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize external clients
    let runner = PistonRunner::new(config.execution_api_url.clone());
    info!("Code runner: {}", config.execution_api_url);

    let assistant = GeminiClient::new(config.gemini_api_url.clone(), config.gemini_api_key.clone());
    info!("Assistant client initialized (model: {})", crate::assistant::MODEL);

    let session_keys = SessionKeys::from_secret(
        config.session_jwt_secret.as_bytes(),
        config.session_jwt_issuer.clone(),
    )
    .with_audience(config.session_jwt_audience.clone());

    // Build app state
    let state = AppState {
        users: Arc::new(PgUserStore::new(db)),
        runner: Arc::new(runner),
        assistant: Arc::new(assistant),
        session_keys: Arc::new(session_keys),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the editor's deployed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
