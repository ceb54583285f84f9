use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use flightfinder::config::AppConfig;
use flightfinder::db;
use flightfinder::services::ai::anthropic::AnthropicProvider;
use flightfinder::services::amadeus::AmadeusClient;
use flightfinder::services::supabase::SupabaseClient;
use flightfinder::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.anthropic_api_key.is_empty() {
        tracing::warn!("ANTHROPIC_API_KEY not set, follow-up questions and /api/chat will fail");
    }
    tracing::info!("using Anthropic model {}", config.anthropic_model);
    let llm = AnthropicProvider::new(
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
        config.anthropic_url.clone(),
    );

    if config.amadeus_api_key.is_empty() || config.amadeus_api_secret.is_empty() {
        tracing::warn!("Amadeus credentials not set, live flight search is disabled");
    }
    let flights = AmadeusClient::new(
        config.amadeus_api_key.clone(),
        config.amadeus_api_secret.clone(),
        config.amadeus_url.clone(),
    );

    if config.supabase_url.is_empty() {
        tracing::warn!("SUPABASE_URL not set, account endpoints will fail");
    }
    let accounts = SupabaseClient::new(config.supabase_url.clone(), config.supabase_anon_key.clone());

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        llm: Box::new(llm),
        flights: Box::new(flights),
        accounts: Box::new(accounts),
    });

    let app = flightfinder::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
