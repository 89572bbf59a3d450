//! The pluggable detector contract.

use crate::errors::DetectorError;
use crate::suggestions::context::DetectorContext;
use crate::suggestions::types::Suggestion;

/// An independent analyzer proposing suggestions from context.
///
/// Contract: pure and side-effect-free, order-insensitive relative to other
/// detectors, stable ids for the same underlying opportunity, and monotonic
/// expiry (an opportunity that expired must never come back as unexpired).
/// `priority` expresses the detector's own confidence, not global ranking.
/// Missing inputs are not errors; return an empty list. An `Err` is treated
/// as "contributed nothing this turn" and logged by the engine.
pub trait SuggestionDetector: Send + Sync {
    fn name(&self) -> &'static str;

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError>;
}

impl<F> SuggestionDetector for (&'static str, F)
where
    F: Fn(&DetectorContext) -> Result<Vec<Suggestion>, DetectorError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.0
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        (self.1)(ctx)
    }
}
