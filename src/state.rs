use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::amadeus::FlightSearchProvider;
use crate::services::supabase::AccountBackend;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub flights: Box<dyn FlightSearchProvider>,
    pub accounts: Box<dyn AccountBackend>,
}
