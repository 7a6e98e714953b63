//! Code Execution Client: runs editor code on an external Piston-compatible runner.
//!
//! The runner is opaque: this module only shapes the request and reads
//! stdout/stderr back. No retries and no client-side timeout.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;
pub mod languages;

use crate::execution::languages::runtime_for;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Runner error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Result of one run, as shown in the output pane.
/// Exactly one of `output` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    #[serde(rename = "stdout", skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(rename = "stderr", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            output: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Interprets a runner response.
    ///
    /// Precedence: runner message, failed compile stage, failed run stage, run output.
    pub fn from_response(response: PistonResponse) -> Self {
        if let Some(message) = response.message {
            return Self::failure(message);
        }

        if let Some(compile) = response.compile.filter(|c| c.code.unwrap_or(0) != 0) {
            return Self::failure(compile.stderr_or_output());
        }

        match response.run {
            Some(run) if run.code.unwrap_or(0) != 0 => Self::failure(run.stderr_or_output()),
            Some(run) => Self::success(run.output.trim()),
            None => Self::success(""),
        }
    }
}

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct PistonResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub compile: Option<PistonStage>,
    #[serde(default)]
    pub run: Option<PistonStage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PistonStage {
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub output: String,
    /// Null when the process was killed by a signal.
    #[serde(default)]
    pub code: Option<i32>,
}

impl PistonStage {
    fn stderr_or_output(self) -> String {
        if self.stderr.is_empty() {
            self.output
        } else {
            self.stderr
        }
    }
}

/// Runs source code in a given language.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, source: &str, language: &str) -> Result<RunOutput, ExecutionError>;
}

/// Client for the Piston `/execute` endpoint.
#[derive(Clone)]
pub struct PistonRunner {
    client: Client,
    base_url: String,
}

impl PistonRunner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CodeRunner for PistonRunner {
    async fn run(&self, source: &str, language: &str) -> Result<RunOutput, ExecutionError> {
        let runtime = runtime_for(language)
            .ok_or_else(|| ExecutionError::UnsupportedLanguage(language.to_string()))?;

        let body = PistonRequest {
            language: runtime.language,
            version: runtime.version,
            files: vec![PistonFile { content: source }],
        };

        let response = self
            .client
            .post(format!("{}/execute", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // The runner reports rejected requests (bad runtime, oversized input)
        // as a JSON `message`; that is shown to the user like any other error.
        match serde_json::from_str::<PistonResponse>(&text) {
            Ok(parsed) if status.is_success() || parsed.message.is_some() => {
                let output = RunOutput::from_response(parsed);
                debug!(
                    "Ran {} {}: error={}",
                    runtime.language,
                    runtime.version,
                    output.is_error()
                );
                Ok(output)
            }
            _ => {
                warn!("Runner returned {status}: {text}");
                Err(ExecutionError::Api {
                    status: status.as_u16(),
                    message: text,
                })
            }
        }
    }
}
