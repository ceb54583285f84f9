use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::services::ai::Message;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub content: Vec<ContentBlock>,
}

// POST /api/chat
//
// The body is taken as raw JSON so a malformed `messages` field gets the
// same 400 as a missing one.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ChatResponse>, AppError> {
    let messages: Vec<Message> = body
        .get("messages")
        .filter(|m| m.is_array())
        .and_then(|m| serde_json::from_value(m.clone()).ok())
        .ok_or_else(|| {
            AppError::BadRequest("Invalid request: messages array required".to_string())
        })?;

    if state.config.anthropic_api_key.is_empty() {
        tracing::error!("ANTHROPIC_API_KEY not configured");
        return Err(AppError::Config("API configuration error".to_string()));
    }

    let system = body.get("system").and_then(|s| s.as_str()).unwrap_or("");
    let text = state
        .llm
        .chat(system, &messages)
        .await
        .map_err(|e| AppError::Ai(e.to_string()))?;

    Ok(Json(ChatResponse {
        content: vec![ContentBlock { kind: "text", text }],
    }))
}
