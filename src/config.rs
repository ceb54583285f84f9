use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub session_ttl_minutes: i64,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub anthropic_url: String,
    pub amadeus_api_key: String,
    pub amadeus_api_secret: String,
    pub amadeus_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "flightfinder.db".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            anthropic_model: env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string()),
            anthropic_url: env::var("ANTHROPIC_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            // Older deployments only set the VITE_-prefixed names.
            amadeus_api_key: env_with_fallback("AMADEUS_API_KEY", "VITE_AMADEUS_API_KEY"),
            amadeus_api_secret: env_with_fallback("AMADEUS_API_SECRET", "VITE_AMADEUS_API_SECRET"),
            amadeus_url: env::var("AMADEUS_URL")
                .unwrap_or_else(|_| "https://test.api.amadeus.com".to_string()),
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
        }
    }
}

fn env_with_fallback(name: &str, fallback: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| env::var(fallback).ok())
        .unwrap_or_default()
}
