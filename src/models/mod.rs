pub mod account;
pub mod conversation;
pub mod criteria;
pub mod flight;
pub mod offer;

pub use account::{AccountUser, SavedTrip, UserProfile};
pub use conversation::{ChatSession, ConversationTurn, Role, SearchHistoryEntry};
pub use criteria::{CabinClass, CriteriaPatch, Slot, SortPreference, TripCriteria, TripType};
pub use flight::{AccessToken, FlightQuery, FlightSearchRequest, LiveFlight, LiveJetLag};
pub use offer::{
    FlightOffer, JetLagPlan, LoyaltyOption, OfferTag, PriceBreakdown, PricePrediction, PriceTrend,
    Recommendation, SleepDay, TimelineEvent, TimelineKind,
};
