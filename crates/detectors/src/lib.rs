//! Built-in suggestion detectors for the Tripflow decision engine.
//!
//! Each detector implements the [`SuggestionDetector`] contract from
//! `tripflow-core`: pure, deterministic given `DetectorContext::now`, and
//! silent when its inputs are missing. Register the whole set with
//! [`builtin_detectors`] or pick families individually.

mod calendar;

pub mod booking_window;
pub mod deals;
pub mod personalized;
pub mod search;
pub mod seasonal;

pub use booking_window::BookingWindowDetector;
pub use deals::DealDetector;
pub use personalized::PersonalizedDetector;
pub use search::SearchImprovementDetector;
pub use seasonal::SeasonalDetector;

use tripflow_core::suggestions::SuggestionDetector;

/// The full built-in detector set, in evaluation order.
pub fn builtin_detectors() -> Vec<Box<dyn SuggestionDetector>> {
    vec![
        Box::new(DealDetector),
        Box::new(SearchImprovementDetector),
        Box::new(BookingWindowDetector),
        Box::new(PersonalizedDetector),
        Box::new(SeasonalDetector),
    ]
}
