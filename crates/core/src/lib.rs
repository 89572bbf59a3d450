pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod flows;
pub mod suggestions;
pub mod timing;

pub use config::{ConfigError, EngineConfig, ScoringConfig, StageCaps, TimingConfig};
pub use domain::history::{BookingRecord, FareOption, PreviousSearch, UserProfile};
pub use domain::trip::{
    BudgetTier, CabinClass, CollectedInfo, SeatingPreference, ServiceType, TripDates,
    TripPreferences, TripType, Travelers,
};
pub use engine::{DecisionEngine, TurnOutcome};
pub use errors::DetectorError;
pub use flows::{
    ConversationFlow, ConversationStage, FlowContext, NextAction, TripField, TurnRecord,
};
pub use suggestions::{
    DetectorContext, PriorityScorer, ScoredSuggestion, SessionView, Suggestion, SuggestionAction,
    SuggestionDetector, SuggestionGroups, SuggestionId, SuggestionKind, SuggestionPriority,
};
pub use timing::{
    Engagement, InsertionPoint, SuggestionStage, TimingContext, TimingDecision, TimingGate,
};
