use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AccessToken, FlightSearchRequest, LiveFlight};
use crate::state::AppState;

// POST /api/amadeus-auth
pub async fn amadeus_auth(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AccessToken>, AppError> {
    let token = state.flights.access_token().await?;
    Ok(Json(token))
}

// POST /api/search-flights
#[derive(Serialize)]
pub struct SearchMeta {
    pub count: usize,
    pub currency: &'static str,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub flights: Vec<LiveFlight>,
    pub meta: SearchMeta,
}

pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlightSearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = req
        .validate()
        .ok_or_else(|| AppError::BadRequest("Missing required parameters".to_string()))?;

    let flights = state.flights.search(&query).await?;

    Ok(Json(SearchResponse {
        success: true,
        meta: SearchMeta {
            count: flights.len(),
            currency: "USD",
        },
        flights,
    }))
}
