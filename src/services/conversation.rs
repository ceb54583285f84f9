use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::db::{self, queries};
use crate::models::{ChatSession, FlightOffer, Recommendation, Role, Slot, TripCriteria};
use crate::services::ai::follow_up::rephrase_question;
use crate::services::extractor::extract;
use crate::services::generator::{generate_offers, recommendations};
use crate::services::tracker::{is_reset_command, DialogueTracker, Prompt, RESET_REPLY};
use crate::state::AppState;

pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble right now. Please try again in a moment.";

/// Outcome of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub session_id: String,
    /// `None` when the assistant deliberately says nothing this turn.
    pub reply: Option<String>,
    pub criteria: TripCriteria,
    pub missing: Vec<Slot>,
    pub complete: bool,
    pub offers: Vec<FlightOffer>,
    /// Only filled alongside `offers`.
    pub recommendations: Vec<Recommendation>,
}

pub fn results_reply(count: usize) -> String {
    format!("Great! I found {count} excellent options for you:")
}

pub async fn process_message(
    state: &Arc<AppState>,
    session_id: Option<&str>,
    message: &str,
) -> anyhow::Result<ChatReply> {
    let now = Utc::now();
    let session_id = session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut session = {
        let conn = db::lock(&state.db)?;
        match queries::get_session(&conn, &session_id)? {
            Some(session) => session,
            None => {
                // An expired row under this id takes its search history with it.
                queries::delete_session(&conn, &session_id)?;
                new_session(&session_id)
            }
        }
    };

    let previous_assistant = session.last_assistant_text().map(str::to_string);
    session.push(Role::User, message);

    let mut tracker = DialogueTracker::new(std::mem::take(&mut session.criteria));
    let mut offers = Vec::new();
    let mut hints = Vec::new();
    let is_reset = is_reset_command(message);

    let reply = if is_reset {
        tracker.reset();
        Some(RESET_REPLY.to_string())
    } else {
        let patch = extract(message, previous_assistant.as_deref(), tracker.criteria());
        tracing::debug!(session_id = %session_id, ?patch, "extracted criteria");
        tracker.apply_patch(patch);

        match tracker.prompt(previous_assistant.as_deref()) {
            Prompt::Ready => {
                offers = generate_offers(tracker.criteria());
                hints = recommendations();
                Some(results_reply(offers.len()))
            }
            Prompt::Ask(question) => Some(question.to_string()),
            Prompt::Repeat(slot) => {
                follow_up(state, slot, tracker.criteria(), &session, previous_assistant.as_deref())
                    .await
            }
        }
    };

    if let Some(text) = &reply {
        session.push(Role::Assistant, text.clone());
    }

    let missing = tracker.missing_fields();
    let complete = missing.is_empty();
    session.criteria = tracker.into_criteria();
    session.last_activity = now;
    session.expires_at = now + Duration::minutes(state.config.session_ttl_minutes);

    {
        let conn = db::lock(&state.db)?;
        queries::save_session(&conn, &session)?;
        if !is_reset {
            queries::record_search(&conn, &session.id, message, &now)?;
        }
        let expired = queries::expire_old_sessions(&conn)?;
        if expired > 0 {
            tracing::debug!(expired, "removed expired chat sessions");
        }
    }

    tracing::info!(
        session_id = %session.id,
        complete,
        missing = missing.len(),
        offers = offers.len(),
        "processed chat turn"
    );

    Ok(ChatReply {
        session_id: session.id,
        reply,
        criteria: session.criteria,
        missing,
        complete,
        offers,
        recommendations: hints,
    })
}

/// Re-words a question the traveller left unanswered. Silent when the LLM
/// gives back the previous question unchanged.
async fn follow_up(
    state: &Arc<AppState>,
    slot: Slot,
    criteria: &TripCriteria,
    session: &ChatSession,
    previous_assistant: Option<&str>,
) -> Option<String> {
    match rephrase_question(state.llm.as_ref(), slot, criteria, &session.transcript).await {
        Ok(text) if text.is_empty() || Some(text.trim()) == previous_assistant.map(str::trim) => {
            tracing::debug!(slot = slot.as_str(), "follow-up matched previous question, staying silent");
            None
        }
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(error = %e, slot = slot.as_str(), "failed to rephrase question");
            Some(FALLBACK_REPLY.to_string())
        }
    }
}

/// Builds the utterance sent when the traveller applies sidebar filters.
/// Categories with no selected options are skipped; `None` if nothing is
/// selected at all.
pub fn compose_filter_query(
    last_user_message: Option<&str>,
    filters: &BTreeMap<String, Vec<String>>,
) -> Option<String> {
    let preferences: Vec<String> = filters
        .iter()
        .filter(|(_, options)| !options.is_empty())
        .map(|(category, options)| format!("{category}: {}", options.join(", ")))
        .collect();

    if preferences.is_empty() {
        return None;
    }

    let base = last_user_message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("My previous search");
    Some(format!("{base} with these preferences: {}", preferences.join("; ")))
}

pub async fn apply_filters(
    state: &Arc<AppState>,
    session_id: &str,
    filters: &BTreeMap<String, Vec<String>>,
) -> anyhow::Result<Option<ChatReply>> {
    let last_user = load_session(state, session_id)?
        .and_then(|s| s.last_user_text().map(str::to_string));

    let Some(query) = compose_filter_query(last_user.as_deref(), filters) else {
        return Ok(None);
    };
    process_message(state, Some(session_id), &query).await.map(Some)
}

pub fn load_session(state: &Arc<AppState>, session_id: &str) -> anyhow::Result<Option<ChatSession>> {
    let conn = db::lock(&state.db)?;
    queries::get_session(&conn, session_id)
}

fn new_session(id: &str) -> ChatSession {
    let now = Utc::now();
    ChatSession {
        id: id.to_string(),
        criteria: TripCriteria::default(),
        transcript: Vec::new(),
        last_activity: now,
        expires_at: now,
    }
}
