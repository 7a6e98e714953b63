use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::execution::RunOutput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: RunStatus,
    #[serde(flatten)]
    pub result: RunOutput,
}

impl From<RunOutput> for RunResponse {
    fn from(result: RunOutput) -> Self {
        let status = if result.is_error() {
            RunStatus::Error
        } else {
            RunStatus::Success
        };
        Self { status, result }
    }
}

/// POST /api/v1/run
///
/// Program failures (compile errors, non-zero exit) are a normal `error`
/// result; only runner outages become an error response.
pub async fn handle_run(
    State(state): State<AppState>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunResponse>, AppError> {
    if req.code.trim().is_empty() {
        return Ok(Json(RunOutput::failure("Please enter some code").into()));
    }

    let result = state.runner.run(&req.code, &req.language).await?;
    Ok(Json(result.into()))
}
