pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::execution::handlers as execution;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", get(users::handle_get_user))
        .route("/api/v1/users/sync", post(users::handle_sync_user))
        .route("/api/v1/users/me", get(users::handle_current_user))
        .route("/api/v1/users/upgrade", post(users::handle_upgrade_to_pro))
        // Code execution
        .route("/api/v1/run", post(execution::handle_run))
        // DoubtGPT
        .route("/api/v1/assistant/explain", post(assistant::handle_explain))
        .route("/api/v1/assistant/ask", post(assistant::handle_ask))
        .with_state(state)
}
