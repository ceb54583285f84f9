use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{self, queries};
use crate::errors::AppError;
use crate::models::{ConversationTurn, SearchHistoryEntry, TripCriteria};
use crate::services::conversation::{self, ChatReply};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 5;

// POST /api/conversation
#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub session_id: Option<String>,
    pub message: String,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest("message must not be empty".to_string()));
    }

    let reply = conversation::process_message(&state, req.session_id.as_deref(), message).await?;
    Ok(Json(reply))
}

// GET /api/conversation/:session_id
#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub criteria: TripCriteria,
    pub transcript: Vec<ConversationTurn>,
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = conversation::load_session(&state, &session_id)?
        .ok_or_else(|| AppError::NotFound(format!("session {session_id}")))?;

    Ok(Json(SessionResponse {
        session_id: session.id,
        criteria: session.criteria,
        transcript: session.transcript,
    }))
}

// POST /api/conversation/:session_id/filters
#[derive(Deserialize)]
pub struct ApplyFiltersRequest {
    #[serde(default)]
    pub filters: BTreeMap<String, Vec<String>>,
}

pub async fn apply_filters(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<ApplyFiltersRequest>,
) -> Result<Json<ChatReply>, AppError> {
    conversation::apply_filters(&state, &session_id, &req.filters)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::BadRequest("no filters selected".to_string()))
}

// GET /api/conversation/:session_id/history
#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub searches: Vec<SearchHistoryEntry>,
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let searches = {
        let conn = db::lock(&state.db)?;
        queries::recent_searches(&conn, &session_id, limit)?
    };

    Ok(Json(HistoryResponse {
        session_id,
        searches,
    }))
}
