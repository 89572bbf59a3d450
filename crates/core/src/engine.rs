//! Per-turn orchestration.
//!
//! One `run_turn` call advances the conversation flow and runs the full
//! suggestion pipeline behind the timing gate. Everything is synchronous
//! and deterministic for a given set of inputs; the caller owns all state
//! and persistence.

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::trip::CollectedInfo;
use crate::flows::{advance, ConversationFlow, NextAction, TripField};
use crate::suggestions::{
    deduplicate, filter_relevant, group, DetectorContext, PriorityScorer, Suggestion,
    SuggestionDetector, SuggestionGroups,
};
use crate::timing::{TimingContext, TimingDecision, TimingGate};

/// Everything one turn produces: the advanced flow, the agent's next move,
/// and the suggestions cleared for display this turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub flow: ConversationFlow,
    pub action: NextAction,
    pub next_question: Option<TripField>,
    pub suggestions: SuggestionGroups,
    pub timing: TimingDecision,
}

pub struct DecisionEngine {
    detectors: Vec<Box<dyn SuggestionDetector>>,
    scorer: PriorityScorer,
    gate: TimingGate,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig, detectors: Vec<Box<dyn SuggestionDetector>>) -> Self {
        Self {
            detectors,
            scorer: PriorityScorer::new(config.scoring),
            gate: TimingGate::new(config.timing),
        }
    }

    /// Run one conversation turn.
    ///
    /// The flow advances unconditionally; the suggestion pipeline only runs
    /// when the gate admits it, and its output is truncated to the gate's
    /// cap before grouping. A gate suppression or an all-detectors-failed
    /// turn degrades to an empty suggestion group, never to an error.
    pub fn run_turn(
        &self,
        flow: ConversationFlow,
        extracted: CollectedInfo,
        detector_ctx: &DetectorContext,
        timing_ctx: &TimingContext,
    ) -> TurnOutcome {
        let flow = advance(flow, extracted);
        let action = flow.suggested_action.unwrap_or(NextAction::AskQuestion);
        let next_question = flow.next_question;

        let timing = self.gate.evaluate(timing_ctx, detector_ctx.now);
        let suggestions = if timing.should_suggest {
            self.run_pipeline(detector_ctx, timing_ctx, timing.max_suggestions)
        } else {
            SuggestionGroups::default()
        };

        debug!(
            event_name = "engine.turn_complete",
            action = ?action,
            should_suggest = timing.should_suggest,
            delivered = suggestions.len(),
            "turn processed"
        );

        TurnOutcome { flow, action, next_question, suggestions, timing }
    }

    fn run_pipeline(
        &self,
        ctx: &DetectorContext,
        timing_ctx: &TimingContext,
        cap: usize,
    ) -> SuggestionGroups {
        let mut candidates: Vec<Suggestion> = Vec::new();
        for detector in &self.detectors {
            match detector.detect(ctx) {
                Ok(found) => candidates.extend(found),
                Err(error) => {
                    warn!(
                        event_name = "engine.detector_failed",
                        detector = detector.name(),
                        %error,
                        "detector skipped this turn"
                    );
                }
            }
        }

        let candidates = deduplicate(filter_relevant(candidates, ctx));
        let mut ranked = self.scorer.rank(
            candidates,
            ctx.session.stage,
            ctx.session.engagement,
            timing_ctx.acceptance_rate(),
            ctx.now,
        );
        ranked.truncate(cap);
        group(ranked)
    }
}
