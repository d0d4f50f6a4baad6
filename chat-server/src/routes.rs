//! Route handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::Sse;
use axum::response::{IntoResponse, Json};
use chatcore::ConversationContext;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::sse::outbound_event_stream;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello! Welcome to the LLM Backend Service API." }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub context: ConversationContext,
}

/// `POST /openai/chat`: streams outbound events as SSE. A malformed request
/// body never reaches this handler — axum's `Json` extractor rejects it with
/// a 4xx before the agent is started.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, axum::extract::rejection::JsonRejection>,
) -> axum::response::Response {
    let Json(request) = match body {
        Ok(json) => json,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.to_string() })),
            )
                .into_response();
        }
    };

    let rx = state
        .agent
        .process_message(request.message, request.system_prompt, request.context);

    Sse::new(outbound_event_stream(rx)).into_response()
}
