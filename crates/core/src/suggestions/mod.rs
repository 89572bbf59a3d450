//! The proactive suggestion pipeline.
//!
//! Detectors propose, the filter vetoes, dedup collapses, the scorer
//! ranks, and presentation groups. Each stage is pure; the engine in
//! [`crate::engine`] wires them together per turn.

pub mod context;
pub mod detector;
pub mod filter;
pub mod presentation;
pub mod scoring;
pub mod types;

pub use context::{DetectorContext, SessionView};
pub use detector::SuggestionDetector;
pub use filter::{deduplicate, filter_relevant, is_relevant};
pub use presentation::{group, SuggestionGroups};
pub use scoring::{stage_relevance_bonus, PriorityScorer, ScoredSuggestion};
pub use types::{
    ActionKind, Suggestion, SuggestionAction, SuggestionId, SuggestionKind, SuggestionPriority,
};
