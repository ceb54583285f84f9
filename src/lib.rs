pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/conversation", post(handlers::conversation::send_message))
        .route(
            "/api/conversation/:session_id",
            get(handlers::conversation::get_session),
        )
        .route(
            "/api/conversation/:session_id/filters",
            post(handlers::conversation::apply_filters),
        )
        .route(
            "/api/conversation/:session_id/history",
            get(handlers::conversation::get_history),
        )
        .route("/api/chat", post(handlers::llm::chat))
        .route("/api/amadeus-auth", post(handlers::flights::amadeus_auth))
        .route("/api/search-flights", post(handlers::flights::search_flights))
        .route("/api/auth/signin/:provider", get(handlers::account::sign_in))
        .route("/api/auth/signout", post(handlers::account::sign_out))
        .route(
            "/api/trips",
            get(handlers::account::list_trips).post(handlers::account::save_trip),
        )
        .route(
            "/api/profile",
            get(handlers::account::get_profile).post(handlers::account::update_profile),
        )
        .with_state(state)
}
