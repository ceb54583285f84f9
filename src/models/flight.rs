use serde::{Deserialize, Serialize};

use super::PriceTrend;

/// Body of `POST /api/search-flights`. Field names follow the front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<u32>,
    pub travel_class: Option<String>,
    #[serde(default)]
    pub non_stop: bool,
}

/// A search request whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub travel_class: Option<String>,
    pub non_stop: bool,
}

impl FlightSearchRequest {
    /// Returns `None` when origin, destination, departure date or a positive
    /// adult count is missing.
    pub fn validate(self) -> Option<FlightQuery> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Some(FlightQuery {
            origin: non_empty(self.origin)?,
            destination: non_empty(self.destination)?,
            departure_date: non_empty(self.departure_date)?,
            return_date: non_empty(self.return_date),
            adults: self.adults.filter(|n| *n > 0)?,
            travel_class: non_empty(self.travel_class),
            non_stop: self.non_stop,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFlight {
    pub id: usize,
    pub amadeus_id: String,
    pub airline: String,
    pub logo: String,
    pub carrier_code: String,
    pub aircraft: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub duration_minutes: u32,
    pub stops: String,
    pub price: f64,
    pub currency: String,
    pub emission: String,
    pub prediction: PriceTrend,
    pub prediction_percent: i32,
    pub prediction_text: String,
    pub booking_url: String,
    pub number_of_bookable_seats: u32,
    /// Outbound segments exactly as Amadeus returned them.
    pub segments: serde_json::Value,
    pub validating_airline_codes: Vec<String>,
    pub jet_lag: LiveJetLag,
}

/// Live results carry no timezone data, so this is the same generic advice
/// for every flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveJetLag {
    pub severity: String,
    pub time_difference: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub expires_in: u64,
}
