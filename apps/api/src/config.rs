use anyhow::{Context, Result};

const DEFAULT_EXECUTION_API_URL: &str = "https://emkc.org/api/v2/piston";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub execution_api_url: String,
    pub session_jwt_secret: String,
    /// Expected `iss` claim on session tokens. Unchecked when unset.
    pub session_jwt_issuer: Option<String>,
    /// Expected `aud` claim on session tokens. Unchecked when unset.
    pub session_jwt_audience: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            execution_api_url: optional_env("EXECUTION_API_URL")
                .unwrap_or_else(|| DEFAULT_EXECUTION_API_URL.to_string()),
            session_jwt_secret: require_env("SESSION_JWT_SECRET")?,
            session_jwt_issuer: optional_env("SESSION_JWT_ISSUER"),
            session_jwt_audience: optional_env("SESSION_JWT_AUDIENCE"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Empty values count as unset so `.env` templates can leave them blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
