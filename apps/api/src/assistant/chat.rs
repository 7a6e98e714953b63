//! DoubtGPT conversation flow over a run's output.
//!
//! The server keeps no conversation memory: the caller sends the message list
//! it holds for the current page view and gets the extended list back.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::assistant::prompts::{explain_prompt, follow_up_prompt, EXPLAIN_REQUEST_MESSAGE};
use crate::assistant::Assistant;
use crate::errors::AppError;

/// Shown in place of a reply when the assistant call fails.
pub const FAILURE_MESSAGE: &str = "Something went wrong. Try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Gemini,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn gemini(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Gemini,
            text: text.into(),
        }
    }
}

/// The text a conversation is about: the run's error if there is one,
/// otherwise its output.
pub fn pick_context<'a>(output: Option<&'a str>, error: Option<&'a str>) -> Option<&'a str> {
    error
        .filter(|e| !e.is_empty())
        .or(output.filter(|o| !o.is_empty()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Starts a fresh conversation asking for an explanation of `context`.
    pub async fn explain(assistant: &dyn Assistant, context: &str) -> Result<Self, AppError> {
        if context.trim().is_empty() {
            return Err(AppError::Validation("There is no output to explain".to_string()));
        }

        let reply = reply_or_failure(assistant, &explain_prompt(context)).await;
        Ok(Self {
            messages: vec![
                ChatMessage::user(EXPLAIN_REQUEST_MESSAGE),
                ChatMessage::gemini(reply),
            ],
        })
    }

    /// Appends the user's question and the assistant's answer.
    /// Follow-ups need the same run output the conversation started from.
    pub async fn follow_up(
        &mut self,
        assistant: &dyn Assistant,
        context: &str,
        question: &str,
    ) -> Result<(), AppError> {
        if context.trim().is_empty() {
            return Err(AppError::Validation("There is no output to ask about".to_string()));
        }
        if question.trim().is_empty() {
            return Err(AppError::Validation("question cannot be empty".to_string()));
        }

        self.messages.push(ChatMessage::user(question));
        let reply = reply_or_failure(assistant, &follow_up_prompt(context, question)).await;
        self.messages.push(ChatMessage::gemini(reply));
        Ok(())
    }
}

async fn reply_or_failure(assistant: &dyn Assistant, prompt: &str) -> String {
    match assistant.ask(prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Assistant call failed: {e}");
            FAILURE_MESSAGE.to_string()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::assistant::{Assistant, AssistantError};

    /// Answers every prompt with a fixed reply (or fails) and records prompts.
    pub struct ScriptedAssistant {
        reply: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedAssistant {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Assistant for ScriptedAssistant {
        async fn ask(&self, prompt: &str) -> Result<String, AssistantError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().ok_or(AssistantError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            })
        }
    }
}
