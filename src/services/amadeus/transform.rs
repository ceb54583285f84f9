//! Maps Amadeus flight-offers responses onto the flight cards the front end
//! renders.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::{LiveFlight, LiveJetLag, PriceTrend};

#[derive(Debug, Default, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<AmadeusOffer>,
    #[serde(default)]
    pub dictionaries: Option<Dictionaries>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pub carriers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmadeusOffer {
    pub id: String,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
    pub price: OfferPrice,
    #[serde(default)]
    pub number_of_bookable_seats: Option<u32>,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
}

/// Segments stay raw so they can be handed to the client untouched; the
/// fields read here are parsed from them on demand.
#[derive(Debug, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: SegmentEndpoint,
    pub arrival: SegmentEndpoint,
    pub carrier_code: String,
    #[serde(default)]
    pub aircraft: Option<AircraftRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentEndpoint {
    pub iata_code: String,
    pub at: String,
}

#[derive(Debug, Deserialize)]
pub struct AircraftRef {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct OfferPrice {
    pub total: String,
    pub currency: String,
}

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?)?").expect("invalid duration pattern")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn transform_offers(response: &FlightOffersResponse) -> Vec<LiveFlight> {
    let carriers = response.dictionaries.as_ref().map(|d| &d.carriers);
    let mut flights = Vec::with_capacity(response.data.len());

    for offer in &response.data {
        match transform_offer(offer, carriers, flights.len() + 1) {
            Some(flight) => flights.push(flight),
            None => tracing::warn!(offer_id = %offer.id, "skipping malformed Amadeus offer"),
        }
    }
    flights
}

fn transform_offer(
    offer: &AmadeusOffer,
    carriers: Option<&HashMap<String, String>>,
    id: usize,
) -> Option<LiveFlight> {
    // Outbound leg only.
    let itinerary = offer.itineraries.first()?;
    let segments = itinerary
        .segments
        .iter()
        .map(Segment::deserialize)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let first = segments.first()?;
    let last = segments.last()?;
    let price: f64 = offer.price.total.parse().ok()?;

    let duration_minutes = itinerary
        .duration
        .as_deref()
        .and_then(parse_iso_duration)
        .or_else(|| elapsed_minutes(&first.departure.at, &last.arrival.at))
        .unwrap_or(0);
    let stops = u32::try_from(segments.len() - 1).ok()?;

    let arrival_time = format_time(&last.arrival.at);
    let arrival = match day_difference(&first.departure.at, &last.arrival.at) {
        Some(days) if days > 0 => format!("{arrival_time} +{days}"),
        _ => arrival_time,
    };

    Some(LiveFlight {
        id,
        amadeus_id: offer.id.clone(),
        airline: airline_name(&first.carrier_code, carriers),
        logo: airline_logo(&first.carrier_code).to_string(),
        carrier_code: first.carrier_code.clone(),
        aircraft: aircraft_name(first.aircraft.as_ref().map_or("Unknown", |a| a.code.as_str())),
        from: first.departure.iata_code.clone(),
        to: last.arrival.iata_code.clone(),
        departure: format_time(&first.departure.at),
        arrival,
        duration: format_duration(duration_minutes),
        duration_minutes,
        stops: stops_label(stops),
        price,
        currency: offer.price.currency.clone(),
        emission: estimate_co2(duration_minutes, stops),
        prediction: PriceTrend::Stable,
        prediction_percent: 0,
        prediction_text: "Price from live data".to_string(),
        booking_url: String::new(),
        number_of_bookable_seats: offer.number_of_bookable_seats.unwrap_or(9),
        segments: serde_json::Value::Array(itinerary.segments.clone()),
        validating_airline_codes: offer.validating_airline_codes.clone(),
        jet_lag: generic_jet_lag(),
    })
}

/// `PT10H30M` → 630. Returns `None` for anything that is not an ISO-8601
/// duration or that does not fit in a `u32` of minutes.
pub fn parse_iso_duration(raw: &str) -> Option<u32> {
    let caps = ISO_DURATION.captures(raw)?;
    if caps.get(1).is_none() && caps.get(2).is_none() && caps.get(3).is_none() {
        return None;
    }
    let part = |i: usize| -> Option<u32> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };
    part(1)?
        .checked_mul(24 * 60)?
        .checked_add(part(2)?.checked_mul(60)?)?
        .checked_add(part(3)?)
}

pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// `2025-12-15T10:30:00` → `10:30 AM`; unparseable input is returned as-is.
pub fn format_time(at: &str) -> String {
    NaiveDateTime::parse_from_str(at, TIMESTAMP_FORMAT)
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| at.to_string())
}

/// Whole 24-hour periods between departure and arrival, rounded down. The
/// timestamps are compared as given, without time zones, so an overnight
/// flight shorter than a day gets no offset.
pub fn day_difference(departure_at: &str, arrival_at: &str) -> Option<i64> {
    let departure = NaiveDateTime::parse_from_str(departure_at, TIMESTAMP_FORMAT).ok()?;
    let arrival = NaiveDateTime::parse_from_str(arrival_at, TIMESTAMP_FORMAT).ok()?;
    Some((arrival - departure).num_minutes().div_euclid(24 * 60))
}

fn elapsed_minutes(departure_at: &str, arrival_at: &str) -> Option<u32> {
    let departure = NaiveDateTime::parse_from_str(departure_at, TIMESTAMP_FORMAT).ok()?;
    let arrival = NaiveDateTime::parse_from_str(arrival_at, TIMESTAMP_FORMAT).ok()?;
    u32::try_from((arrival - departure).num_minutes()).ok()
}

pub fn stops_label(stops: u32) -> String {
    match stops {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{n} stops"),
    }
}

pub fn airline_name(code: &str, carriers: Option<&HashMap<String, String>>) -> String {
    if let Some(name) = carriers.and_then(|c| c.get(code)) {
        return name.clone();
    }
    let known = match code {
        "AA" => "American Airlines",
        "DL" => "Delta",
        "UA" => "United Airlines",
        "BA" => "British Airways",
        "LH" => "Lufthansa",
        "AF" => "Air France",
        "KL" => "KLM",
        "EK" => "Emirates",
        "QR" => "Qatar Airways",
        other => other,
    };
    known.to_string()
}

pub fn airline_logo(code: &str) -> &'static str {
    match code {
        "AA" | "UA" | "AF" | "QR" => "🛫",
        "BA" | "EK" => "🛩️",
        _ => "✈️",
    }
}

pub fn aircraft_name(code: &str) -> String {
    let name = match code {
        "319" => "Airbus A319",
        "320" => "Airbus A320",
        "321" => "Airbus A321",
        "330" => "Airbus A330",
        "350" => "Airbus A350",
        "380" => "Airbus A380",
        "737" => "Boeing 737",
        "747" => "Boeing 747",
        "757" => "Boeing 757",
        "767" => "Boeing 767",
        "777" => "Boeing 777",
        "787" => "Boeing 787",
        _ => return format!("Aircraft {code}"),
    };
    name.to_string()
}

/// Roughly 90 kg per flight hour plus 50 kg per extra take-off.
pub fn estimate_co2(duration_minutes: u32, stops: u32) -> String {
    // 1.5 kg per minute, rounded half up.
    let base = (u64::from(duration_minutes) * 3 + 1) / 2;
    format!("{}kg", base + u64::from(stops) * 50)
}

fn generic_jet_lag() -> LiveJetLag {
    LiveJetLag {
        severity: "Moderate".to_string(),
        time_difference: "Variable".to_string(),
        tips: [
            "Stay hydrated during flight",
            "Adjust sleep schedule gradually",
            "Get sunlight upon arrival",
            "Avoid heavy meals before sleeping",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlightOffersResponse {
        serde_json::from_value(serde_json::json!({
            "data": [
                {
                    "id": "1",
                    "numberOfBookableSeats": 4,
                    "validatingAirlineCodes": ["BA"],
                    "itineraries": [{
                        "duration": "PT7H5M",
                        "segments": [{
                            "departure": {"iataCode": "JFK", "at": "2025-12-15T18:45:00"},
                            "arrival": {"iataCode": "LHR", "at": "2025-12-16T06:50:00"},
                            "carrierCode": "BA",
                            "number": "178",
                            "aircraft": {"code": "777"}
                        }]
                    }],
                    "price": {"currency": "USD", "total": "612.40"}
                },
                {
                    "id": "2",
                    "itineraries": [{
                        "duration": "PT11H",
                        "segments": [
                            {
                                "departure": {"iataCode": "JFK", "at": "2025-12-15T08:00:00"},
                                "arrival": {"iataCode": "DUB", "at": "2025-12-15T14:00:00"},
                                "carrierCode": "ZZ"
                            },
                            {
                                "departure": {"iataCode": "DUB", "at": "2025-12-15T16:00:00"},
                                "arrival": {"iataCode": "LHR", "at": "2025-12-15T19:00:00"},
                                "carrierCode": "ZZ"
                            }
                        ]
                    }],
                    "price": {"currency": "USD", "total": "455.00"}
                },
                {
                    "id": "3",
                    "itineraries": [],
                    "price": {"currency": "USD", "total": "1.00"}
                }
            ],
            "dictionaries": {"carriers": {"ZZ": "Zed Air"}}
        }))
        .unwrap()
    }

    #[test]
    fn test_transform_offers() {
        let flights = transform_offers(&sample());
        assert_eq!(flights.len(), 2);

        let nonstop = &flights[0];
        assert_eq!(nonstop.id, 1);
        assert_eq!(nonstop.airline, "British Airways");
        assert_eq!(nonstop.aircraft, "Boeing 777");
        assert_eq!(nonstop.departure, "6:45 PM");
        assert_eq!(nonstop.arrival, "6:50 AM");
        assert_eq!(nonstop.logo, "🛩️");
        assert_eq!(nonstop.segments[0]["number"], "178");
        assert_eq!(nonstop.duration, "7h 5m");
        assert_eq!(nonstop.stops, "Nonstop");
        assert_eq!(nonstop.price, 612.4);
        assert_eq!(nonstop.number_of_bookable_seats, 4);
        assert_eq!(nonstop.emission, "638kg");

        let connecting = &flights[1];
        assert_eq!(connecting.airline, "Zed Air");
        assert_eq!(connecting.aircraft, "Aircraft Unknown");
        assert_eq!(connecting.from, "JFK");
        assert_eq!(connecting.to, "LHR");
        assert_eq!(connecting.arrival, "7:00 PM");
        assert_eq!(connecting.stops, "1 stop");
        assert_eq!(connecting.number_of_bookable_seats, 9);
        assert_eq!(connecting.emission, "1040kg");
        assert_eq!(connecting.segments.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration("PT10H30M"), Some(630));
        assert_eq!(parse_iso_duration("PT45M"), Some(45));
        assert_eq!(parse_iso_duration("P1DT2H"), Some(1560));
        assert_eq!(parse_iso_duration("10 hours"), None);
    }

    #[test]
    fn test_parse_iso_duration_overflow() {
        assert_eq!(parse_iso_duration("P99999999DT1H"), None);
        assert_eq!(parse_iso_duration("PT99999999999H"), None);
    }

    #[test]
    fn test_estimate_co2_large_duration() {
        assert_eq!(estimate_co2(u32::MAX, 2), "6442451043kg");
    }

    #[test]
    fn test_day_difference_counts_full_days() {
        assert_eq!(day_difference("2025-12-15T18:45:00", "2025-12-16T06:50:00"), Some(0));
        assert_eq!(day_difference("2025-12-15T10:30:00", "2025-12-16T14:45:00"), Some(1));
        assert_eq!(day_difference("2025-12-15T23:00:00", "2025-12-17T01:00:00"), Some(1));
        assert_eq!(day_difference("2025-12-15T10:00:00", "2025-12-15T08:00:00"), Some(-1));
        assert_eq!(day_difference("bad", "2025-12-15T08:00:00"), None);
    }

    #[test]
    fn test_airline_fallbacks() {
        assert_eq!(airline_name("EK", None), "Emirates");
        assert_eq!(airline_name("XQ", None), "XQ");
    }

    #[test]
    fn test_stops_label() {
        assert_eq!(stops_label(0), "Nonstop");
        assert_eq!(stops_label(3), "3 stops");
    }
}
