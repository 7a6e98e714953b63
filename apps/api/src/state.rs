use std::sync::Arc;

use crate::assistant::Assistant;
use crate::auth::jwt::SessionKeys;
use crate::execution::CodeRunner;
use crate::users::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    /// External code runner. Default: `PistonRunner`.
    pub runner: Arc<dyn CodeRunner>,
    /// DoubtGPT backend. Default: `GeminiClient`.
    pub assistant: Arc<dyn Assistant>,
    pub session_keys: Arc<SessionKeys>,
}
