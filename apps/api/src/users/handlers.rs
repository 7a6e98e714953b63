use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::users::service;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    #[serde(default)]
    pub user_id: String,
}

/// POST /api/v1/users/sync
pub async fn handle_sync_user(
    State(state): State<AppState>,
    Json(req): Json<SyncUserRequest>,
) -> Result<StatusCode, AppError> {
    service::sync_user(state.users.as_ref(), &req.user_id, &req.email, &req.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users?userId=
///
/// Answers `null` for an empty or unknown id.
pub async fn handle_get_user(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Option<User>>, AppError> {
    let user = service::get_user(state.users.as_ref(), &params.user_id).await?;
    Ok(Json(user))
}

/// GET /api/v1/users/me
pub async fn handle_current_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<User>, AppError> {
    let user = service::current_user(state.users.as_ref(), session.identity()).await?;
    Ok(Json(user))
}

/// POST /api/v1/users/upgrade
pub async fn handle_upgrade_to_pro(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<User>, AppError> {
    let user =
        service::upgrade_to_pro(state.users.as_ref(), session.identity(), Utc::now()).await?;
    Ok(Json(user))
}
