use crate::models::{
    CabinClass, FlightOffer, JetLagPlan, LoyaltyOption, OfferTag, PriceBreakdown, PricePrediction,
    PriceTrend, Recommendation, SleepDay, SortPreference, TimelineEvent, TimelineKind,
    TripCriteria,
};

struct OfferTemplate {
    tag: OfferTag,
    price_factor: f64,
    /// The "was" price shown struck through, relative to the offer price.
    list_factor: f64,
    airline: &'static str,
    flight_number: &'static str,
    departure: &'static str,
    arrival: &'static str,
    duration_minutes: u32,
    stops: u32,
    comfort_score: f64,
    carbon_footprint: f64,
    trend: PriceTrend,
    confidence: u8,
    predicted_change_percent: i32,
    best_time_to_book: &'static str,
    current_vs_optimal: &'static str,
    miles: u32,
    cash_with_miles: f64,
    timeline: &'static [Step],
    time_difference: &'static str,
    severity: &'static str,
    recovery_time: &'static str,
    pre_departure: [Night; 3],
    in_flight: &'static [&'static str],
    post_arrival: &'static [&'static str],
}

/// Timeline entry; `{origin}` and `{destination}` are filled in per search.
struct Step(&'static str, &'static str, TimelineKind, Option<&'static str>);

struct Night {
    day: &'static str,
    sleep: &'static str,
    wake: &'static str,
    tips: [&'static str; 2],
}

const TEMPLATES: [OfferTemplate; 3] = [
    OfferTemplate {
        tag: OfferTag::Cheapest,
        price_factor: 0.85,
        list_factor: 1.16,
        airline: "United Airlines",
        flight_number: "UA 847 / UA 124",
        departure: "10:30 AM",
        arrival: "2:45 PM (+1 day)",
        duration_minutes: 1095,
        stops: 1,
        comfort_score: 7.8,
        carbon_footprint: 2.4,
        trend: PriceTrend::Increasing,
        confidence: 87,
        predicted_change_percent: 15,
        best_time_to_book: "Now",
        current_vs_optimal: "Current price is optimal",
        miles: 45000,
        cash_with_miles: 120.0,
        timeline: &[
            Step("10:30 AM", "✈️ Takeoff from {origin}", TimelineKind::Departure, None),
            Step("11:45 AM", "☕ Beverage service begins", TimelineKind::Service, None),
            Step("1:30 PM", "🍽️ Meal service - International cuisine", TimelineKind::Meal, None),
            Step("3:00 PM", "🌙 Lights dimmed for rest period", TimelineKind::Rest, None),
            Step("8:30 PM", "☕ Breakfast service", TimelineKind::Meal, None),
            Step("9:45 PM", "🛬 Landing in Dubai (DXB)", TimelineKind::Arrival, None),
            Step(
                "9:45 PM - 11:45 PM",
                "⏱️ 2-hour layover - Dubai Terminal 3",
                TimelineKind::Layover,
                Some("Time to explore duty-free, grab a meal, or relax in the lounge"),
            ),
            Step("11:45 PM", "✈️ Takeoff from Dubai", TimelineKind::Departure, None),
            Step("12:30 AM", "🍽️ Light meal service", TimelineKind::Meal, None),
            Step("2:45 PM", "🛬 Arrival in {destination}", TimelineKind::Arrival, None),
        ],
        time_difference: "+10.5 hours",
        severity: "Moderate",
        recovery_time: "4-6 days",
        pre_departure: [
            Night { day: "Day -3", sleep: "11:00 PM", wake: "7:00 AM", tips: ["Avoid caffeine after 2 PM", "Get 30 min sunlight exposure"] },
            Night { day: "Day -2", sleep: "10:30 PM", wake: "6:30 AM", tips: ["Light dinner by 7 PM", "Start taking melatonin"] },
            Night { day: "Day -1", sleep: "10:00 PM", wake: "6:00 AM", tips: ["Pack and relax", "Hydrate well"] },
        ],
        in_flight: &[
            "Board: set your watch to {destination} time immediately",
            "Hour 2-6: sleep with an eye mask and earplugs",
            "Hour 8: wake up and have breakfast",
            "Hour 10-14: stay awake",
            "Avoid alcohol and drink water every hour",
        ],
        post_arrival: &[
            "Day 1: stay awake until 9 PM local time",
            "Day 2-3: sleep 10 PM - 6 AM",
            "Day 4: you should feel normal",
        ],
    },
    OfferTemplate {
        tag: OfferTag::Fastest,
        price_factor: 1.20,
        list_factor: 1.06,
        airline: "Emirates",
        flight_number: "EK 211",
        departure: "8:45 PM",
        arrival: "11:35 AM (+1 day)",
        duration_minutes: 890,
        stops: 0,
        comfort_score: 9.2,
        carbon_footprint: 2.2,
        trend: PriceTrend::Stable,
        confidence: 92,
        predicted_change_percent: 3,
        best_time_to_book: "Next 3 days",
        current_vs_optimal: "$35 above optimal",
        miles: 52000,
        cash_with_miles: 180.0,
        timeline: &[
            Step("8:45 PM", "✈️ Takeoff from {origin}", TimelineKind::Departure, None),
            Step("10:00 PM", "🍽️ Gourmet dinner service", TimelineKind::Meal, None),
            Step("11:30 PM", "🌙 Cabin lights dimmed", TimelineKind::Rest, None),
            Step("5:00 AM", "🌅 Sunrise on approach", TimelineKind::Scenery, None),
            Step("6:30 AM", "☕ Breakfast service begins", TimelineKind::Meal, None),
            Step("11:35 AM", "🛬 Arrival in {destination}", TimelineKind::Arrival, None),
        ],
        time_difference: "+10.5 hours",
        severity: "Mild",
        recovery_time: "3-4 days",
        pre_departure: [
            Night { day: "Day -3", sleep: "11:30 PM", wake: "7:30 AM", tips: ["Evening workout", "Limit screen time"] },
            Night { day: "Day -2", sleep: "11:00 PM", wake: "7:00 AM", tips: ["Eat meals at destination times", "Stay hydrated"] },
            Night { day: "Day -1", sleep: "10:30 PM", wake: "6:30 AM", tips: ["Relax", "Confirm travel documents"] },
        ],
        in_flight: &[
            "Board: adjust your watch to {destination} time",
            "Hour 1-2: stay awake and eat a light dinner",
            "Hour 3-8: sleep",
            "Hour 9: wake and have breakfast",
            "Arrival: get sunlight immediately",
        ],
        post_arrival: &[
            "Day 1: stay active until 9 PM",
            "Day 2: return to a normal schedule",
            "Day 3: fully adjusted",
        ],
    },
    OfferTemplate {
        tag: OfferTag::BestValue,
        price_factor: 1.05,
        list_factor: 1.12,
        airline: "Qatar Airways",
        flight_number: "QR 715 / QR 579",
        departure: "1:15 PM",
        arrival: "5:30 PM (+1 day)",
        duration_minutes: 975,
        stops: 1,
        comfort_score: 8.9,
        carbon_footprint: 2.3,
        trend: PriceTrend::Decreasing,
        confidence: 78,
        predicted_change_percent: -5,
        best_time_to_book: "In 3 days",
        current_vs_optimal: "$69 above optimal",
        miles: 48000,
        cash_with_miles: 150.0,
        timeline: &[
            Step("1:15 PM", "✈️ Takeoff from {origin}", TimelineKind::Departure, None),
            Step("2:30 PM", "🍽️ Premium meal service", TimelineKind::Meal, None),
            Step("4:00 PM", "🎬 Latest movies available", TimelineKind::Entertainment, None),
            Step("6:00 PM", "🌙 Rest period begins", TimelineKind::Rest, None),
            Step("12:00 AM", "☕ Pre-landing refreshments", TimelineKind::Service, None),
            Step("1:00 AM", "🛬 Landing in Doha (DOH)", TimelineKind::Arrival, None),
            Step(
                "1:00 AM - 3:30 AM",
                "⏱️ 2.5-hour layover - Hamad International",
                TimelineKind::Layover,
                Some("Award-winning airport with art installations to explore"),
            ),
            Step("3:30 AM", "✈️ Takeoff from Doha", TimelineKind::Departure, None),
            Step("4:15 AM", "🍽️ Breakfast service", TimelineKind::Meal, None),
            Step("5:30 PM", "🛬 Arrival in {destination}", TimelineKind::Arrival, None),
        ],
        time_difference: "+10.5 hours",
        severity: "Moderate",
        recovery_time: "4-5 days",
        pre_departure: [
            Night { day: "Day -3", sleep: "11:00 PM", wake: "7:00 AM", tips: ["Morning exercise", "Eat a light dinner"] },
            Night { day: "Day -2", sleep: "10:30 PM", wake: "6:30 AM", tips: ["Afternoon nap if needed", "Stay hydrated"] },
            Night { day: "Day -1", sleep: "10:00 PM", wake: "6:00 AM", tips: ["Final prep", "Early dinner"] },
        ],
        in_flight: &[
            "Board: switch to {destination} time",
            "Hour 2-3: have a meal and stay awake",
            "Hour 4-9: sleep with an eye mask",
            "Hour 10: wake for a light breakfast",
            "Stay hydrated throughout the flight",
        ],
        post_arrival: &[
            "Day 1: resist napping and sleep at 10 PM",
            "Day 2-3: keep the same schedule",
            "Day 4: feeling great",
        ],
    },
];

const RECOMMENDATIONS: [(&str, &str); 3] = [
    ("💡", "You usually prefer morning flights - the Emirates option arrives early!"),
    ("💰", "Save $200 by flying on Tuesday instead of Wednesday"),
    ("🏆", "Premium Economy available - only $250 more for extra legroom"),
];

/// Builds the three mock offers for complete criteria.
///
/// Prices depend only on the cabin class and tag; durations, stops and the
/// narrative blocks are fixed per tag.
pub fn generate_offers(criteria: &TripCriteria) -> Vec<FlightOffer> {
    let class = criteria.cabin_class.unwrap_or(CabinClass::Economy);
    let passengers = criteria.passengers.unwrap_or(1).max(1);
    let origin = criteria.origin.as_deref().unwrap_or("Origin");
    let destination = criteria.destination.as_deref().unwrap_or("Destination");

    let mut offers: Vec<FlightOffer> = TEMPLATES
        .iter()
        .enumerate()
        .map(|(position, t)| {
            let price = (class.base_fare() * t.price_factor).round();
            let original_price = (price * t.list_factor).round();
            let discount_percent = (((original_price - price) / original_price) * 100.0).round() as u32;

            FlightOffer {
                position,
                tag: t.tag,
                badge: t.tag.badge().to_string(),
                airline: t.airline.to_string(),
                flight_number: t.flight_number.to_string(),
                route: format!("{origin} → {destination}"),
                departure: t.departure.to_string(),
                arrival: t.arrival.to_string(),
                duration: format_duration(t.duration_minutes),
                duration_minutes: t.duration_minutes,
                stops: t.stops,
                price,
                original_price,
                discount_percent,
                total_price: price * f64::from(passengers),
                currency: "USD".to_string(),
                within_budget: criteria.max_price.map_or(true, |max| price <= max),
                comfort_score: t.comfort_score,
                carbon_footprint: t.carbon_footprint,
                wifi_available: true,
                meal_included: true,
                price_breakdown: breakdown(price),
                price_prediction: prediction(t, price),
                loyalty: LoyaltyOption {
                    miles: t.miles,
                    cash_needed: t.cash_with_miles,
                    total_savings: (price - t.cash_with_miles).max(0.0),
                },
                timeline: t
                    .timeline
                    .iter()
                    .map(|Step(time, event, kind, details)| TimelineEvent {
                        time: time.to_string(),
                        event: fill(event, origin, destination),
                        kind: *kind,
                        details: (*details).map(str::to_string),
                    })
                    .collect(),
                jet_lag: jet_lag_plan(t, destination),
            }
        })
        .collect();

    sort_offers(&mut offers, criteria.sort_preference);
    offers
}

/// Stable sorts, so equal keys keep generation order.
pub fn sort_offers(offers: &mut [FlightOffer], preference: Option<SortPreference>) {
    match preference {
        Some(SortPreference::Cheapest) => offers.sort_by(|a, b| a.price.total_cmp(&b.price)),
        Some(SortPreference::Fastest) => offers.sort_by_key(|o| o.duration_minutes),
        Some(SortPreference::Best) => {
            offers.sort_by(|a, b| best_score(a).total_cmp(&best_score(b)));
        }
        None => {}
    }
}

/// Lower is better.
pub fn best_score(offer: &FlightOffer) -> f64 {
    offer.price + f64::from(offer.duration_minutes) * 0.5
}

/// The hints shown alongside every result set.
pub fn recommendations() -> Vec<Recommendation> {
    RECOMMENDATIONS
        .iter()
        .map(|(icon, text)| Recommendation {
            icon: icon.to_string(),
            text: text.to_string(),
        })
        .collect()
}

fn prediction(t: &OfferTemplate, price: f64) -> PricePrediction {
    let (savings, recommendation) = match t.trend {
        PriceTrend::Increasing => {
            let savings = (price * f64::from(t.predicted_change_percent) / 100.0).round();
            (savings, format!("Book soon to save ${savings}"))
        }
        PriceTrend::Stable => (0.0, "Good time to book".to_string()),
        PriceTrend::Decreasing => (0.0, "Wait 2-3 days for a better price".to_string()),
    };
    PricePrediction {
        trend: t.trend,
        confidence: t.confidence,
        predicted_change_percent: t.predicted_change_percent,
        savings,
        recommendation,
        best_time_to_book: t.best_time_to_book.to_string(),
        current_vs_optimal: t.current_vs_optimal.to_string(),
    }
}

fn jet_lag_plan(t: &OfferTemplate, destination: &str) -> JetLagPlan {
    let lines = |items: &[&str]| -> Vec<String> {
        items.iter().map(|line| line.replace("{destination}", destination)).collect()
    };
    JetLagPlan {
        time_difference: t.time_difference.to_string(),
        severity: t.severity.to_string(),
        recovery_time: t.recovery_time.to_string(),
        pre_departure: t
            .pre_departure
            .iter()
            .map(|n| SleepDay {
                day: n.day.to_string(),
                sleep: n.sleep.to_string(),
                wake: n.wake.to_string(),
                tips: n.tips.iter().map(|tip| tip.to_string()).collect(),
            })
            .collect(),
        in_flight: lines(t.in_flight),
        post_arrival: lines(t.post_arrival),
    }
}

fn fill(text: &str, origin: &str, destination: &str) -> String {
    text.replace("{origin}", origin).replace("{destination}", destination)
}

fn breakdown(price: f64) -> PriceBreakdown {
    let taxes = (price * 0.17).round();
    let fees = (price * 0.08).round();
    let fuel = (price * 0.05).round();
    PriceBreakdown {
        base_fare: price - taxes - fees - fuel,
        taxes,
        fees,
        fuel,
    }
}

fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}
