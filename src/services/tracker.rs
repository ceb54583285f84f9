use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{CriteriaPatch, Slot, TripCriteria, TripType};

pub const RESET_REPLY: &str = "Okay, let's start over. Where are you flying from?";

static RESET_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:reset|start\s+over|clear)\b").expect("invalid reset pattern")
});

/// What the assistant should say next.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Ask(&'static str),
    /// The question for this slot was the previous assistant turn verbatim.
    Repeat(Slot),
    Ready,
}

/// Owns the trip criteria for one conversation.
#[derive(Debug, Clone, Default)]
pub struct DialogueTracker {
    criteria: TripCriteria,
}

impl DialogueTracker {
    pub fn new(criteria: TripCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &TripCriteria {
        &self.criteria
    }

    pub fn into_criteria(self) -> TripCriteria {
        self.criteria
    }

    /// First-write-wins: known fields are never replaced.
    pub fn apply_patch(&mut self, patch: CriteriaPatch) -> &TripCriteria {
        self.criteria.merge(patch);
        &self.criteria
    }

    pub fn reset(&mut self) {
        self.criteria = TripCriteria::default();
    }

    pub fn missing_fields(&self) -> Vec<Slot> {
        missing_fields(&self.criteria)
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.criteria)
    }

    pub fn prompt(&self, previous_assistant: Option<&str>) -> Prompt {
        let Some(slot) = self.missing_fields().first().copied() else {
            return Prompt::Ready;
        };
        let question = question_for(slot);
        if previous_assistant.map(str::trim) == Some(question) {
            Prompt::Repeat(slot)
        } else {
            Prompt::Ask(question)
        }
    }
}

pub fn missing_fields(criteria: &TripCriteria) -> Vec<Slot> {
    let mut missing = Vec::new();
    if criteria.origin.is_none() {
        missing.push(Slot::Origin);
    }
    if criteria.destination.is_none() {
        missing.push(Slot::Destination);
    }
    if criteria.departure_date.is_none() {
        missing.push(Slot::DepartureDate);
    }
    if criteria.trip_type.is_none() {
        missing.push(Slot::TripType);
    }
    if criteria.trip_type == Some(TripType::Roundtrip)
        && criteria.departure_date.is_some()
        && criteria.return_date.is_none()
    {
        missing.push(Slot::ReturnDate);
    }
    if criteria.passengers.is_none() {
        missing.push(Slot::Passengers);
    }
    if criteria.cabin_class.is_none() {
        missing.push(Slot::CabinClass);
    }
    missing
}

pub fn is_complete(criteria: &TripCriteria) -> bool {
    missing_fields(criteria).is_empty()
}

pub fn next_question(criteria: &TripCriteria) -> Option<&'static str> {
    missing_fields(criteria).first().map(|slot| question_for(*slot))
}

pub fn question_for(slot: Slot) -> &'static str {
    match slot {
        Slot::Origin => "Where are you flying from?",
        Slot::Destination => "Where would you like to go?",
        Slot::DepartureDate => "What date would you like to depart?",
        Slot::TripType => "Is this a one-way or round-trip flight?",
        Slot::ReturnDate => "When would you like to return?",
        Slot::Passengers => "How many passengers will be traveling?",
        Slot::CabinClass => {
            "Which cabin class would you prefer: economy, premium economy, business, or first?"
        }
    }
}

pub fn is_reset_command(utterance: &str) -> bool {
    RESET_COMMAND.is_match(utterance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CabinClass;

    fn full() -> TripCriteria {
        TripCriteria {
            origin: Some("New York".to_string()),
            destination: Some("London".to_string()),
            departure_date: Some("Dec 15".to_string()),
            return_date: Some("Dec 22".to_string()),
            trip_type: Some(TripType::Roundtrip),
            passengers: Some(2),
            cabin_class: Some(CabinClass::Economy),
            max_price: None,
            sort_preference: None,
        }
    }

    #[test]
    fn test_empty_missing_order() {
        assert_eq!(
            missing_fields(&TripCriteria::default()),
            vec![
                Slot::Origin,
                Slot::Destination,
                Slot::DepartureDate,
                Slot::TripType,
                Slot::Passengers,
                Slot::CabinClass,
            ]
        );
    }

    #[test]
    fn test_return_date_only_for_roundtrip_with_departure() {
        let mut criteria = full();
        criteria.return_date = None;
        assert_eq!(missing_fields(&criteria), vec![Slot::ReturnDate]);

        criteria.trip_type = Some(TripType::Oneway);
        assert!(missing_fields(&criteria).is_empty());

        criteria.trip_type = Some(TripType::Roundtrip);
        criteria.departure_date = None;
        assert_eq!(missing_fields(&criteria), vec![Slot::DepartureDate]);
    }

    #[test]
    fn test_complete_iff_nothing_missing_for_every_combination() {
        // Six optional fields, each set or unset, times three trip-type states.
        for mask in 0u32..(1 << 6) {
            for trip in [None, Some(TripType::Oneway), Some(TripType::Roundtrip)] {
                let set = |bit: u32| mask & (1 << bit) != 0;
                let criteria = TripCriteria {
                    origin: set(0).then(|| "A".to_string()),
                    destination: set(1).then(|| "B".to_string()),
                    departure_date: set(2).then(|| "Dec 1".to_string()),
                    return_date: set(3).then(|| "Dec 9".to_string()),
                    trip_type: trip,
                    passengers: set(4).then_some(1),
                    cabin_class: set(5).then_some(CabinClass::First),
                    ..Default::default()
                };
                let missing = missing_fields(&criteria);
                assert_eq!(is_complete(&criteria), missing.is_empty());

                let order = [
                    Slot::Origin,
                    Slot::Destination,
                    Slot::DepartureDate,
                    Slot::TripType,
                    Slot::ReturnDate,
                    Slot::Passengers,
                    Slot::CabinClass,
                ];
                let positions: Vec<usize> = missing
                    .iter()
                    .map(|s| order.iter().position(|o| o == s).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_first_write_wins() {
        let mut tracker = DialogueTracker::default();
        tracker.apply_patch(CriteriaPatch {
            origin: Some("Houston".to_string()),
            ..Default::default()
        });
        let criteria = tracker.apply_patch(CriteriaPatch {
            origin: Some("Austin".to_string()),
            passengers: Some(3),
            ..Default::default()
        });
        assert_eq!(criteria.origin.as_deref(), Some("Houston"));
        assert_eq!(criteria.passengers, Some(3));
    }

    #[test]
    fn test_next_question_follows_first_missing() {
        assert_eq!(
            next_question(&TripCriteria::default()),
            Some("Where are you flying from?")
        );
        let criteria = TripCriteria {
            origin: Some("Paris".to_string()),
            ..Default::default()
        };
        assert_eq!(next_question(&criteria), Some("Where would you like to go?"));
        assert_eq!(next_question(&full()), None);
    }

    #[test]
    fn test_prompt_suppresses_repeat() {
        let tracker = DialogueTracker::default();
        assert_eq!(tracker.prompt(None), Prompt::Ask("Where are you flying from?"));
        assert_eq!(
            tracker.prompt(Some("Where are you flying from?")),
            Prompt::Repeat(Slot::Origin)
        );
        assert_eq!(
            tracker.prompt(Some("Sorry, where are you flying from?")),
            Prompt::Ask("Where are you flying from?")
        );
        assert_eq!(DialogueTracker::new(full()).prompt(None), Prompt::Ready);
    }

    #[test]
    fn test_non_answer_repeats_open_slot() {
        use crate::services::extractor::extract;

        for (criteria, question, slot) in [
            (TripCriteria::default(), "Where are you flying from?", Slot::Origin),
            (
                TripCriteria {
                    origin: Some("Boston".to_string()),
                    ..TripCriteria::default()
                },
                "Where would you like to go?",
                Slot::Destination,
            ),
        ] {
            for reply in ["ok", "not sure", "hmm let me think"] {
                let mut tracker = DialogueTracker::new(criteria.clone());
                let patch = extract(reply, Some(question), tracker.criteria());
                tracker.apply_patch(patch);
                assert_eq!(tracker.prompt(Some(question)), Prompt::Repeat(slot), "{reply}");
            }
        }
    }

    #[test]
    fn test_reset() {
        assert!(is_reset_command("reset"));
        assert!(is_reset_command("Let's START OVER please"));
        assert!(is_reset_command("clear everything"));
        assert!(!is_reset_command("a clearer route"));

        let mut tracker = DialogueTracker::new(full());
        tracker.reset();
        assert_eq!(*tracker.criteria(), TripCriteria::default());
        assert_eq!(tracker.prompt(None), Prompt::Ask("Where are you flying from?"));
    }
}
