//! Helpers shared by tests.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::assistant::Assistant;
use crate::auth::jwt::{testing::TEST_SECRET, SessionKeys};
use crate::execution::CodeRunner;
use crate::state::AppState;
use crate::users::store::MemoryUserStore;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_state(runner: Arc<dyn CodeRunner>, assistant: Arc<dyn Assistant>) -> AppState {
    AppState {
        users: Arc::new(MemoryUserStore::new()),
        runner,
        assistant,
        session_keys: Arc::new(SessionKeys::from_secret(TEST_SECRET, None)),
    }
}
