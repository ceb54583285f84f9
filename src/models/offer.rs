use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OfferTag {
    Cheapest,
    Fastest,
    BestValue,
}

impl OfferTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferTag::Cheapest => "cheapest",
            OfferTag::Fastest => "fastest",
            OfferTag::BestValue => "best-value",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            OfferTag::Cheapest => "💰 Cheapest",
            OfferTag::Fastest => "⚡ Fastest",
            OfferTag::BestValue => "⭐ Best Value",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceTrend {
    Increasing,
    Stable,
    Decreasing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePrediction {
    pub trend: PriceTrend,
    pub confidence: u8,
    pub predicted_change_percent: i32,
    /// Dollars saved by booking now; zero unless the price is rising.
    pub savings: f64,
    pub recommendation: String,
    pub best_time_to_book: String,
    pub current_vs_optimal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreakdown {
    pub base_fare: f64,
    pub taxes: f64,
    pub fees: f64,
    pub fuel: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyOption {
    pub miles: u32,
    pub cash_needed: f64,
    pub total_savings: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Departure,
    Service,
    Meal,
    Rest,
    Scenery,
    Entertainment,
    Arrival,
    Layover,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub time: String,
    pub event: String,
    pub kind: TimelineKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SleepDay {
    pub day: String,
    pub sleep: String,
    pub wake: String,
    pub tips: Vec<String>,
}

/// Day-by-day plan for adjusting to the destination time zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JetLagPlan {
    pub time_difference: String,
    pub severity: String,
    pub recovery_time: String,
    pub pre_departure: Vec<SleepDay>,
    pub in_flight: Vec<String>,
    pub post_arrival: Vec<String>,
}

/// A hint shown under the result cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOffer {
    pub position: usize,
    pub tag: OfferTag,
    pub badge: String,
    pub airline: String,
    pub flight_number: String,
    pub route: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub duration_minutes: u32,
    pub stops: u32,
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: u32,
    pub total_price: f64,
    pub currency: String,
    pub within_budget: bool,
    pub comfort_score: f64,
    /// Tonnes of CO2 per passenger.
    pub carbon_footprint: f64,
    pub wifi_available: bool,
    pub meal_included: bool,
    pub price_breakdown: PriceBreakdown,
    pub price_prediction: PricePrediction,
    pub loyalty: LoyaltyOption,
    pub timeline: Vec<TimelineEvent>,
    pub jet_lag: JetLagPlan,
}
