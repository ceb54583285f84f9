pub mod transform;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::models::{AccessToken, FlightQuery, LiveFlight};

use self::transform::{transform_offers, FlightOffersResponse};

/// Tokens are refreshed this long before Amadeus says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum AmadeusError {
    #[error("Amadeus credentials not configured")]
    MissingCredentials,

    #[error("failed to authenticate with Amadeus ({0})")]
    AuthFailed(StatusCode),

    #[error("authentication error: token response did not include an access token")]
    MissingToken,

    #[error("flight search failed ({status})")]
    Search {
        status: StatusCode,
        details: serde_json::Value,
    },

    #[error("Amadeus request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait FlightSearchProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken, AmadeusError>;
    async fn search(&self, query: &FlightQuery) -> Result<Vec<LiveFlight>, AmadeusError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

struct CachedToken {
    token: AccessToken,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        let lifetime = Duration::from_secs(self.token.expires_in);
        self.fetched_at.elapsed() + EXPIRY_MARGIN < lifetime
    }
}

pub struct AmadeusClient {
    api_key: String,
    api_secret: String,
    base_url: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(api_key: String, api_secret: String, base_url: String) -> Self {
        Self {
            api_key,
            api_secret,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    async fn fetch_token(&self) -> Result<AccessToken, AmadeusError> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            tracing::error!(
                has_api_key = !self.api_key.is_empty(),
                has_api_secret = !self.api_secret.is_empty(),
                "missing Amadeus credentials"
            );
            return Err(AmadeusError::MissingCredentials);
        }

        let resp = self
            .client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.api_secret.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Amadeus auth error");
            return Err(AmadeusError::AuthFailed(status));
        }

        let data: TokenResponse = resp.json().await?;
        let access_token = data
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AmadeusError::MissingToken)?;

        Ok(AccessToken {
            access_token,
            expires_in: data.expires_in.unwrap_or(0),
        })
    }

    /// Returns the cached token, fetching a new one when it is missing or
    /// about to expire.
    async fn current_token(&self) -> Result<String, AmadeusError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.token.access_token.clone());
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            token,
            fetched_at: Instant::now(),
        });
        Ok(access_token)
    }

    async fn send_search(
        &self,
        token: &str,
        query: &FlightQuery,
    ) -> Result<reqwest::Response, AmadeusError> {
        let resp = self
            .client
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .bearer_auth(token)
            .query(&search_params(query))
            .send()
            .await?;
        Ok(resp)
    }
}

#[async_trait]
impl FlightSearchProvider for AmadeusClient {
    async fn access_token(&self) -> Result<AccessToken, AmadeusError> {
        self.fetch_token().await
    }

    async fn search(&self, query: &FlightQuery) -> Result<Vec<LiveFlight>, AmadeusError> {
        let token = self.current_token().await?;
        let mut resp = self.send_search(&token, query).await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            tracing::info!("Amadeus token rejected, fetching a new one");
            *self.token.lock().await = None;
            let token = self.current_token().await?;
            resp = self.send_search(&token, query).await?;
        }

        let status = resp.status();
        if !status.is_success() {
            let details = resp.json().await.unwrap_or(serde_json::Value::Null);
            tracing::error!(%status, details = %details, "Amadeus search error");
            return Err(AmadeusError::Search { status, details });
        }

        let data: FlightOffersResponse = resp.json().await?;
        let flights = transform_offers(&data);
        tracing::info!(
            origin = %query.origin,
            destination = %query.destination,
            count = flights.len(),
            "flight search completed"
        );
        Ok(flights)
    }
}

pub fn search_params(query: &FlightQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("originLocationCode", query.origin.clone()),
        ("destinationLocationCode", query.destination.clone()),
        ("departureDate", query.departure_date.clone()),
        ("adults", query.adults.to_string()),
        ("max", "10".to_string()),
        ("currencyCode", "USD".to_string()),
    ];
    if let Some(return_date) = &query.return_date {
        params.push(("returnDate", return_date.clone()));
    }
    if let Some(class) = &query.travel_class {
        params.push(("travelClass", class.to_uppercase()));
    }
    if query.non_stop {
        params.push(("nonStop", "true".to_string()));
    }
    params
}
