use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Oneway,
    Roundtrip,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::Oneway => "oneway",
            TripType::Roundtrip => "roundtrip",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    Economy,
    Premium,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Premium => "premium",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }

    /// Per-passenger base fare in USD before the offer tag adjustment.
    pub fn base_fare(&self) -> f64 {
        match self {
            CabinClass::Economy => 450.0,
            CabinClass::Premium => 780.0,
            CabinClass::Business => 1850.0,
            CabinClass::First => 3400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortPreference {
    Cheapest,
    Fastest,
    Best,
}

/// Trip fields the assistant asks about, in asking order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Origin,
    Destination,
    DepartureDate,
    TripType,
    ReturnDate,
    Passengers,
    CabinClass,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Origin => "origin",
            Slot::Destination => "destination",
            Slot::DepartureDate => "departure_date",
            Slot::TripType => "trip_type",
            Slot::ReturnDate => "return_date",
            Slot::Passengers => "passengers",
            Slot::CabinClass => "cabin_class",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripCriteria {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub trip_type: Option<TripType>,
    pub passengers: Option<u32>,
    pub cabin_class: Option<CabinClass>,
    pub max_price: Option<f64>,
    pub sort_preference: Option<SortPreference>,
}

/// Fields detected in a single utterance. Only `Some` entries are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CriteriaPatch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub trip_type: Option<TripType>,
    pub passengers: Option<u32>,
    pub cabin_class: Option<CabinClass>,
    pub max_price: Option<f64>,
    pub sort_preference: Option<SortPreference>,
}

impl CriteriaPatch {
    pub fn is_empty(&self) -> bool {
        *self == CriteriaPatch::default()
    }
}

impl TripCriteria {
    /// Merges a patch without touching fields that are already known.
    pub fn merge(&mut self, patch: CriteriaPatch) {
        fill(&mut self.origin, patch.origin);
        fill(&mut self.destination, patch.destination);
        fill(&mut self.departure_date, patch.departure_date);
        fill(&mut self.return_date, patch.return_date);
        fill(&mut self.trip_type, patch.trip_type);
        fill(&mut self.passengers, patch.passengers);
        fill(&mut self.cabin_class, patch.cabin_class);
        fill(&mut self.max_price, patch.max_price);
        fill(&mut self.sort_preference, patch.sort_preference);
    }

    /// One-line summary used in LLM prompts.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = &self.origin {
            parts.push(format!("from {v}"));
        }
        if let Some(v) = &self.destination {
            parts.push(format!("to {v}"));
        }
        if let Some(v) = &self.departure_date {
            parts.push(format!("departing {v}"));
        }
        if let Some(v) = &self.return_date {
            parts.push(format!("returning {v}"));
        }
        if let Some(v) = self.trip_type {
            parts.push(v.as_str().to_string());
        }
        if let Some(v) = self.passengers {
            parts.push(format!("{v} passenger(s)"));
        }
        if let Some(v) = self.cabin_class {
            parts.push(format!("{} class", v.as_str()));
        }
        if parts.is_empty() {
            "nothing known yet".to_string()
        } else {
            parts.join(", ")
        }
    }
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}
