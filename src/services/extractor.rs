//! Pulls trip fields out of a single free-text utterance.
//!
//! Each field has its own matcher. `extract` runs all of them and returns
//! whatever they found; it never consults which fields are already known
//! except to decide whether a lone date is a departure or a return.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CabinClass, CriteriaPatch, SortPreference, TripCriteria, TripType};

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const PLACE: &str = r"[a-z][a-z'\- ]*?";

/// Where a place name stops when it is followed by more of the sentence.
const PLACE_END: &str = r"(?:\s+(?:on|in|for|departing|leaving|returning|return|next|this|with|and|at|around|via)\b|\s*[,.!?;]|\s+\d|\s*$)";

static FROM_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bfrom\s+({PLACE})\s+to\s+({PLACE}){PLACE_END}"))
        .expect("invalid from/to pattern")
});

// Case-sensitive: both sides must look like capitalised place names.
static BARE_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*)*)\s+to\s+([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*)*)",
    )
    .expect("invalid bare route pattern")
});

static ANSWER_LEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:i'?m|i am|we'?re|we are)\s+)?(?:(?:flying|going|heading|leaving|departing|traveling|travelling)\s+)?(?:to|from)\s+",
    )
    .expect("invalid answer lead pattern")
});

static ANSWER_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\s+(?:on|in|for|departing|leaving|returning|next|this|with|and|at|around|via)\b|[,.!?;]|\s+\d|\s+{MONTH}\b"
    ))
    .expect("invalid answer end pattern")
});

/// Tried in order; the first pattern with a usable match wins.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Dec 15, December 15th, Dec. 15, 2025
        format!(r"(?i)\b{MONTH}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?\b(?:,?\s+\d{{4}}\b)?"),
        // 15 Dec, 15th of December 2025
        format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\b\.?(?:,?\s+\d{{4}}\b)?"),
        // 12/15, 12/15/2025
        r"\b(?:0?[1-9]|1[0-2])/(?:0?[1-9]|[12]\d|3[01])(?:/(?:\d{4}|\d{2}))?\b".to_string(),
        // 2025-12-15
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        // on the 15th
        r"(?i)\bon\s+(?:the\s+)?(\d{1,2}(?:st|nd|rd|th))\b".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid date pattern"))
    .collect()
});

/// A number followed by one of these is a count, not a day of the month.
static COUNT_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:passengers?|persons?|people|travell?ers?|adults?|stops?|bags?|nights?|days?|hours?)\b")
        .expect("invalid count noun pattern")
});

static RETURN_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:returning|coming\s+back|back\s+on|return\s+on|return\s+date(?:\s+is)?)\b")
        .expect("invalid return marker pattern")
});

static PASSENGERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}|one|two|three|four|five|six|seven|eight|nine)\s*(?:passengers?|persons?|people|travell?ers?|adults?)\b",
    )
    .expect("invalid passenger pattern")
});

static CABIN_CLASSES: Lazy<Vec<(Regex, CabinClass)>> = Lazy::new(|| {
    [
        (r"(?i)\bfirst\b", CabinClass::First),
        (r"(?i)\bbusiness\b", CabinClass::Business),
        (r"(?i)\bpremium\b", CabinClass::Premium),
        (r"(?i)\b(?:economy|coach)\b", CabinClass::Economy),
    ]
    .into_iter()
    .map(|(p, class)| (Regex::new(p).expect("invalid cabin pattern"), class))
    .collect()
});

static ONE_WAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:one[\s-]?way|single)\b").expect("invalid one-way pattern")
});

static ROUND_TRIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:round[\s-]?trip|return(?:ing)?|two[\s-]?way)\b")
        .expect("invalid round-trip pattern")
});

static MAX_PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:under|less\s+than|below|max(?:imum)?)\s*(?:of\s+)?(?:\$\s*(\d[\d,]*(?:\.\d+)?)|(\d[\d,]*(?:\.\d+)?)\s*(?:dollars|usd|bucks)\b)",
    )
    .expect("invalid price pattern")
});

static SORT_PREFERENCES: Lazy<Vec<(Regex, SortPreference)>> = Lazy::new(|| {
    [
        (r"(?i)\b(?:cheapest|lowest|least\s+expensive)\b", SortPreference::Cheapest),
        (r"(?i)\b(?:fastest|quickest|direct)\b", SortPreference::Fastest),
        (r"(?i)\bbest\b", SortPreference::Best),
    ]
    .into_iter()
    .map(|(p, pref)| (Regex::new(p).expect("invalid sort pattern"), pref))
    .collect()
});

/// Hedges and small talk that never name a place.
static NON_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:ok(?:ay)?|yes|yeah|yep|no|nope|not|sure|maybe|h+m+|u+m+|u+h+|idk|dunno|know|think|hi|hello|hey|thanks|thank|please|wait|anywhere|somewhere|what|why|help)\b",
    )
    .expect("invalid non-answer pattern")
});

/// Capitalised words that start a sentence rather than a place name.
const LEADING_FILLER: &[&str] = &[
    "I", "I'd", "I'm", "We", "We'd", "We're", "Hi", "Hello", "Hey", "Please", "Going", "Flying",
    "Fly", "Travel", "Traveling", "Travelling", "Want", "Need", "Book", "Find", "Get", "Show",
    "Trip", "Flight", "Flights", "Heading",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

pub fn extract(
    utterance: &str,
    previous_assistant: Option<&str>,
    current: &TripCriteria,
) -> CriteriaPatch {
    let route = extract_route(utterance, previous_assistant);
    let (departure_date, return_date) = extract_dates(utterance, current);
    let trip_type = extract_trip_type(utterance)
        .or_else(|| return_date.as_ref().map(|_| TripType::Roundtrip));

    CriteriaPatch {
        origin: route.origin,
        destination: route.destination,
        departure_date,
        return_date,
        trip_type,
        passengers: extract_passengers(utterance),
        cabin_class: extract_cabin_class(utterance),
        max_price: extract_max_price(utterance),
        sort_preference: extract_sort_preference(utterance),
    }
}

pub fn extract_route(utterance: &str, previous_assistant: Option<&str>) -> Route {
    if let Some(caps) = FROM_TO.captures(utterance) {
        return Route {
            origin: clean_place(&caps[1]),
            destination: clean_place(&caps[2]),
        };
    }

    for caps in BARE_ROUTE.captures_iter(utterance) {
        let origin = strip_leading_filler(&caps[1]);
        if origin.is_some() {
            return Route {
                origin,
                destination: clean_place(&caps[2]),
            };
        }
    }

    match previous_assistant {
        Some(prev) if asked_for_destination(prev) => Route {
            origin: None,
            destination: bare_answer(utterance),
        },
        _ => Route::default(),
    }
}

/// Finds at most one date in `text`.
pub fn extract_date(text: &str) -> Option<String> {
    for pattern in DATE_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if COUNT_NOUN.is_match(&text[whole.end()..]) {
                continue;
            }
            let value = caps.get(1).unwrap_or(whole);
            return Some(value.as_str().trim().to_string());
        }
    }
    None
}

/// Returns `(departure, return)`. Text after a return marker ("returning",
/// "coming back", ...) only ever yields the return date.
pub fn extract_dates(utterance: &str, current: &TripCriteria) -> (Option<String>, Option<String>) {
    if let Some(marker) = RETURN_MARKER.find(utterance) {
        return (
            extract_date(&utterance[..marker.start()]),
            extract_date(&utterance[marker.end()..]),
        );
    }

    match extract_date(utterance) {
        Some(date) if current.departure_date.is_none() => (Some(date), None),
        Some(date) if current.trip_type != Some(TripType::Oneway) => (None, Some(date)),
        _ => (None, None),
    }
}

pub fn extract_passengers(utterance: &str) -> Option<u32> {
    let caps = PASSENGERS.captures(utterance)?;
    let raw = caps[1].to_lowercase();
    let count = match raw.as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        digits => digits.parse().ok()?,
    };
    (count >= 1).then_some(count)
}

/// Priority order (first, business, premium, economy) beats text position.
pub fn extract_cabin_class(utterance: &str) -> Option<CabinClass> {
    CABIN_CLASSES
        .iter()
        .find(|(pattern, _)| pattern.is_match(utterance))
        .map(|(_, class)| *class)
}

pub fn extract_trip_type(utterance: &str) -> Option<TripType> {
    if ONE_WAY.is_match(utterance) {
        Some(TripType::Oneway)
    } else if ROUND_TRIP.is_match(utterance) {
        Some(TripType::Roundtrip)
    } else {
        None
    }
}

pub fn extract_max_price(utterance: &str) -> Option<f64> {
    let caps = MAX_PRICE.captures(utterance)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    raw.replace(',', "").parse().ok()
}

pub fn extract_sort_preference(utterance: &str) -> Option<SortPreference> {
    SORT_PREFERENCES
        .iter()
        .find(|(pattern, _)| pattern.is_match(utterance))
        .map(|(_, pref)| *pref)
}

pub fn asked_for_destination(assistant_text: &str) -> bool {
    let text = assistant_text.to_lowercase();
    text.contains("where would you like to go")
        || text.contains("flying to")
        || text.contains("destination")
}

/// Reads a short reply like "London on Dec 23rd" as a single place name.
fn bare_answer(utterance: &str) -> Option<String> {
    let rest = ANSWER_LEAD.replace(utterance, "");
    let cut = ANSWER_END
        .find(&rest)
        .map(|m| &rest[..m.start()])
        .unwrap_or(&rest);
    let place = cut.trim();

    let looks_like_place = place.chars().next().is_some_and(char::is_alphabetic)
        && !place.chars().any(|c| c.is_ascii_digit())
        && place.split_whitespace().count() <= 4
        && !NON_ANSWER.is_match(place);
    looks_like_place.then(|| place.to_string())
}

fn clean_place(raw: &str) -> Option<String> {
    let place = raw.trim();
    (!place.is_empty()).then(|| place.to_string())
}

fn strip_leading_filler(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .skip_while(|w| LEADING_FILLER.contains(w))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> TripCriteria {
        TripCriteria::default()
    }

    #[test]
    fn test_full_sentence() {
        let patch = extract(
            "I want to fly from New York to London on Dec 15, returning Dec 22, 2 passengers, economy",
            None,
            &empty(),
        );
        assert_eq!(patch.origin.as_deref(), Some("New York"));
        assert_eq!(patch.destination.as_deref(), Some("London"));
        assert_eq!(patch.departure_date.as_deref(), Some("Dec 15"));
        assert_eq!(patch.return_date.as_deref(), Some("Dec 22"));
        assert_eq!(patch.passengers, Some(2));
        assert_eq!(patch.cabin_class, Some(CabinClass::Economy));
        assert_eq!(patch.trip_type, Some(TripType::Roundtrip));
        assert_eq!(patch.max_price, None);
        assert_eq!(patch.sort_preference, None);
    }

    #[test]
    fn test_destination_answer_with_date() {
        let patch = extract("London on Dec 23rd", Some("Where would you like to go?"), &empty());
        assert_eq!(patch.origin, None);
        assert_eq!(patch.destination.as_deref(), Some("London"));
        assert_eq!(patch.departure_date.as_deref(), Some("Dec 23rd"));
        assert_eq!(patch.return_date, None);
    }

    #[test]
    fn test_from_to_route() {
        for (text, origin, destination) in [
            ("from Houston to New Delhi", "Houston", "New Delhi"),
            ("flights from paris to rome next week", "paris", "rome"),
            ("Can I go from San Francisco to Tokyo?", "San Francisco", "Tokyo"),
            ("from JFK to LHR 12/15", "JFK", "LHR"),
        ] {
            let route = extract_route(text, None);
            assert_eq!(route.origin.as_deref(), Some(origin), "{text}");
            assert_eq!(route.destination.as_deref(), Some(destination), "{text}");
        }
    }

    #[test]
    fn test_bare_route() {
        let route = extract_route("Houston to New Delhi on December 15th", None);
        assert_eq!(route.origin.as_deref(), Some("Houston"));
        assert_eq!(route.destination.as_deref(), Some("New Delhi"));
    }

    #[test]
    fn test_bare_route_skips_sentence_opener() {
        let route = extract_route("Book Chicago to Miami", None);
        assert_eq!(route.origin.as_deref(), Some("Chicago"));
        assert_eq!(route.destination.as_deref(), Some("Miami"));

        let route = extract_route("I want to go somewhere warm", None);
        assert_eq!(route, Route::default());
    }

    #[test]
    fn test_reply_to_origin_question_is_not_a_route() {
        let question = Some("Where are you flying from?");
        for text in ["Chicago", "ok", "not sure", "hmm let me think"] {
            assert_eq!(extract_route(text, question), Route::default(), "{text}");
        }
    }

    #[test]
    fn test_non_answer_to_destination_question() {
        let question = Some("Where would you like to go?");
        for text in ["ok", "not sure", "hmm let me think", "Hi", "I don't know yet"] {
            assert_eq!(extract_route(text, question).destination, None, "{text}");
        }
        assert_eq!(
            extract_route("New Delhi", question).destination.as_deref(),
            Some("New Delhi")
        );
    }

    #[test]
    fn test_answer_without_question_is_ignored() {
        assert_eq!(extract_route("London", None), Route::default());
        assert_eq!(
            extract_route("London", Some("How many passengers will be traveling?")),
            Route::default()
        );
    }

    #[test]
    fn test_date_formats_in_order() {
        assert_eq!(extract_date("leaving Dec 15, 2025").as_deref(), Some("Dec 15, 2025"));
        assert_eq!(extract_date("on 15th December").as_deref(), Some("15th December"));
        assert_eq!(extract_date("on 12/15/2025").as_deref(), Some("12/15/2025"));
        assert_eq!(extract_date("12/15").as_deref(), Some("12/15"));
        assert_eq!(extract_date("depart 2025-12-15").as_deref(), Some("2025-12-15"));
        assert_eq!(extract_date("maybe on the 3rd").as_deref(), Some("3rd"));
        assert_eq!(extract_date("sometime soon"), None);
    }

    #[test]
    fn test_month_name_wins_over_numeric() {
        assert_eq!(
            extract_date("12/20 or maybe January 3").as_deref(),
            Some("January 3")
        );
    }

    #[test]
    fn test_count_is_not_a_date() {
        assert_eq!(extract_date("we may 2 people"), None);
        assert_eq!(extract_date("Dec 22, 2 passengers").as_deref(), Some("Dec 22"));
    }

    #[test]
    fn test_lone_date_fills_return_when_departure_known() {
        let current = TripCriteria {
            departure_date: Some("Dec 15".to_string()),
            trip_type: Some(TripType::Roundtrip),
            ..Default::default()
        };
        assert_eq!(
            extract_dates("Dec 22", &current),
            (None, Some("Dec 22".to_string()))
        );

        let one_way = TripCriteria {
            departure_date: Some("Dec 15".to_string()),
            trip_type: Some(TripType::Oneway),
            ..Default::default()
        };
        assert_eq!(extract_dates("Dec 22", &one_way), (None, None));
    }

    #[test]
    fn test_return_marker_only_return() {
        let patch = extract("coming back on Jan 4", None, &empty());
        assert_eq!(patch.departure_date, None);
        assert_eq!(patch.return_date.as_deref(), Some("Jan 4"));
        assert_eq!(patch.trip_type, Some(TripType::Roundtrip));
    }

    #[test]
    fn test_passengers() {
        assert_eq!(extract_passengers("2 passengers"), Some(2));
        assert_eq!(extract_passengers("just 1 person"), Some(1));
        assert_eq!(extract_passengers("4 people"), Some(4));
        assert_eq!(extract_passengers("3 travelers"), Some(3));
        assert_eq!(extract_passengers("two adults"), Some(2));
        assert_eq!(extract_passengers("0 passengers"), None);
        assert_eq!(extract_passengers("economy please"), None);
    }

    #[test]
    fn test_cabin_priority_beats_position() {
        assert_eq!(extract_cabin_class("economy or business"), Some(CabinClass::Business));
        assert_eq!(extract_cabin_class("Premium Economy"), Some(CabinClass::Premium));
        assert_eq!(extract_cabin_class("business or FIRST"), Some(CabinClass::First));
        assert_eq!(extract_cabin_class("coach is fine"), Some(CabinClass::Economy));
        assert_eq!(extract_cabin_class("window seat"), None);
    }

    #[test]
    fn test_trip_type() {
        assert_eq!(extract_trip_type("one-way"), Some(TripType::Oneway));
        assert_eq!(extract_trip_type("oneway please"), Some(TripType::Oneway));
        assert_eq!(extract_trip_type("single ticket"), Some(TripType::Oneway));
        assert_eq!(extract_trip_type("Round trip"), Some(TripType::Roundtrip));
        assert_eq!(extract_trip_type("two-way"), Some(TripType::Roundtrip));
        assert_eq!(extract_trip_type("a return ticket"), Some(TripType::Roundtrip));
        assert_eq!(extract_trip_type("just me"), None);
    }

    #[test]
    fn test_max_price() {
        assert_eq!(extract_max_price("under $800"), Some(800.0));
        assert_eq!(extract_max_price("less than $1,250.50"), Some(1250.5));
        assert_eq!(extract_max_price("maximum $2000"), Some(2000.0));
        assert_eq!(extract_max_price("below 600 dollars"), Some(600.0));
        assert_eq!(extract_max_price("under 3 stops"), None);
    }

    #[test]
    fn test_sort_preference() {
        assert_eq!(
            extract_sort_preference("the cheapest or fastest"),
            Some(SortPreference::Cheapest)
        );
        assert_eq!(extract_sort_preference("direct flights"), Some(SortPreference::Fastest));
        assert_eq!(extract_sort_preference("best option"), Some(SortPreference::Best));
        assert_eq!(extract_sort_preference("anything"), None);
    }

    #[test]
    fn test_no_match_is_empty_patch() {
        assert!(extract("hello there", None, &empty()).is_empty());
    }
}
