use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUser {
    pub id: String,
    pub email: Option<String>,
}

/// A row of the `booked_trips` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: String,
    pub airline: String,
    #[serde(default)]
    pub flight_number: Option<String>,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    pub passengers: u32,
    #[serde(rename = "class")]
    pub cabin_class: String,
    pub price: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<String>,
}

fn default_status() -> String {
    "confirmed".to_string()
}

/// A row of the `user_profiles` table. Columns beyond `id` are opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
