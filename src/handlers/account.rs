use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{AccountUser, SavedTrip, UserProfile};
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the signed-in user, or 401.
async fn authenticate<'a>(
    state: &AppState,
    headers: &'a HeaderMap,
) -> Result<(&'a str, AccountUser), AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let user = state
        .accounts
        .get_user(token)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok((token, user))
}

// GET /api/auth/signin/:provider
#[derive(Deserialize)]
pub struct SignInQuery {
    pub redirect_to: Option<String>,
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(params): Query<SignInQuery>,
) -> Result<Redirect, AppError> {
    let url = state
        .accounts
        .sign_in_url(&provider, params.redirect_to.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    tracing::info!(provider = %provider, "redirecting to OAuth sign-in");
    Ok(Redirect::to(&url))
}

// POST /api/auth/signout
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let (token, user) = authenticate(&state, &headers).await?;
    state.accounts.sign_out(token).await?;
    tracing::info!(user_id = %user.id, "signed out");
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/trips
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<SavedTrip>>, AppError> {
    let (token, user) = authenticate(&state, &headers).await?;
    let trips = state.accounts.list_trips(token, &user.id).await?;
    Ok(Json(trips))
}

// POST /api/trips
pub async fn save_trip(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(mut trip): Json<SavedTrip>,
) -> Result<(StatusCode, Json<SavedTrip>), AppError> {
    let (token, user) = authenticate(&state, &headers).await?;
    trip.user_id = user.id;
    let saved = state.accounts.save_trip(token, &trip).await?;
    tracing::info!(
        user_id = %saved.user_id,
        origin = %saved.origin,
        destination = %saved.destination,
        "trip saved"
    );
    Ok((StatusCode::CREATED, Json(saved)))
}

// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, AppError> {
    let (token, user) = authenticate(&state, &headers).await?;
    let profile = state
        .accounts
        .get_profile(token, &user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".to_string()))?;
    Ok(Json(profile))
}

// POST /api/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(mut fields): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<UserProfile>, AppError> {
    let (token, user) = authenticate(&state, &headers).await?;
    fields.remove("id");
    let profile = UserProfile {
        id: user.id,
        fields,
    };
    state.accounts.upsert_profile(token, &profile).await?;
    Ok(Json(profile))
}
