use axum::{extract::State, Json};
use serde::Deserialize;

use crate::assistant::chat::{pick_context, ChatMessage, Conversation};
use crate::errors::AppError;
use crate::state::AppState;

/// The run result the conversation is about.
#[derive(Debug, Default, Deserialize)]
pub struct RunContext {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RunContext {
    fn text(&self) -> &str {
        pick_context(self.output.as_deref(), self.error.as_deref()).unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    #[serde(flatten)]
    pub context: RunContext,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(flatten)]
    pub context: RunContext,
    pub question: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// POST /api/v1/assistant/explain
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<Conversation>, AppError> {
    let conversation = Conversation::explain(state.assistant.as_ref(), req.context.text()).await?;
    Ok(Json(conversation))
}

/// POST /api/v1/assistant/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<Conversation>, AppError> {
    let mut conversation = Conversation::from_messages(req.messages);
    conversation
        .follow_up(state.assistant.as_ref(), req.context.text(), &req.question)
        .await?;
    Ok(Json(conversation))
}
