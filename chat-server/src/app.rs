//! Axum app: shared state and router.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chatcore::ConversationAgent;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ConversationAgent>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(crate::routes::root))
        .route("/health", get(crate::routes::health))
        .route("/openai/chat", post(crate::routes::chat))
        .with_state(state)
}
