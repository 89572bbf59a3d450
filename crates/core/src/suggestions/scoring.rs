//! Multi-factor suggestion scoring.
//!
//! The resulting order is a contract: descending score, ties broken by
//! expiry presence, then savings presence, then stable input order. Tests
//! depend on reproducing it exactly.

use std::cmp::Ordering;

use chrono::Duration;

use crate::config::ScoringConfig;
use crate::suggestions::types::{Suggestion, SuggestionKind, SuggestionPriority};
use crate::timing::{Engagement, SuggestionStage};

/// Fixed stage-relevance lookup. How much a suggestion kind matters at a
/// given funnel stage; urgency peaks while booking, insider tips while
/// searching.
pub fn stage_relevance_bonus(kind: SuggestionKind, stage: SuggestionStage) -> f64 {
    use SuggestionKind::*;
    use SuggestionStage::*;

    match (kind, stage) {
        (Urgency, Booking) => 4.0,
        (Urgency, Comparison) => 3.0,
        (Urgency, Results | Details) => 2.0,
        (InsiderTip, Search) => 4.0,
        (InsiderTip, Greeting) => 2.0,
        (InsiderTip, Details) => 1.0,
        (DealAlert, Results) => 4.0,
        (DealAlert, Search) => 3.0,
        (DealAlert, Comparison) => 2.0,
        (CostSaving, Search | Results) => 3.0,
        (CostSaving, Comparison) => 2.0,
        (BetterOption, Comparison) => 4.0,
        (BetterOption, Results) => 3.0,
        (BetterOption, Details) => 2.0,
        (TimeSaving, Results | Details) => 2.0,
        (PackageDeal, Search | Results) => 2.0,
        (PackageDeal, Greeting) => 1.0,
        (Upsell, Details) => 3.0,
        (Upsell, Booking) => 2.0,
        (Upsell, Comparison) => 1.0,
        (Alternative, Results) => 3.0,
        (Alternative, Comparison) => 2.0,
        (Alternative, Search) => 1.0,
        (Personalized, Greeting) => 3.0,
        (Personalized, Search | Details) => 2.0,
        _ => 0.0,
    }
}

/// A candidate paired with its computed score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredSuggestion {
    pub suggestion: Suggestion,
    pub score: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PriorityScorer {
    config: ScoringConfig,
}

impl PriorityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score one suggestion. `acceptance_rate` is the session's historical
    /// accepted/shown ratio, absent before anything was shown (neutral).
    pub fn score(
        &self,
        suggestion: &Suggestion,
        stage: SuggestionStage,
        engagement: Engagement,
        acceptance_rate: Option<f64>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> f64 {
        let config = &self.config;
        let mut score = match suggestion.priority {
            SuggestionPriority::High => config.base_high,
            SuggestionPriority::Medium => config.base_medium,
            SuggestionPriority::Low => config.base_low,
        };

        score += stage_relevance_bonus(suggestion.kind, stage);

        if let Some(expires_at) = suggestion.expires_at {
            let remaining = expires_at.signed_duration_since(now);
            if remaining < Duration::hours(1) {
                score += config.expiry_urgent_bonus;
            } else if remaining < Duration::hours(24) {
                score += config.expiry_soon_bonus;
            }
        }

        if let Some(amount) = suggestion.savings_amount {
            if let Some(tier) =
                config.savings_tiers.iter().find(|tier| amount > tier.threshold)
            {
                score += tier.bonus;
            }
        }

        match engagement {
            Engagement::High => score *= config.high_engagement_multiplier,
            Engagement::Low if suggestion.priority != SuggestionPriority::High => {
                score *= config.low_engagement_damping;
            }
            _ => {}
        }

        if let Some(rate) = acceptance_rate {
            if rate > config.acceptance_boost_threshold {
                score *= config.acceptance_boost;
            } else if rate < config.acceptance_damping_threshold {
                score *= config.acceptance_damping;
            }
        }

        score
    }

    /// Score and sort descending with the contractual tie-break chain.
    /// The underlying sort is stable, so fully tied candidates keep their
    /// input order.
    pub fn rank(
        &self,
        candidates: Vec<Suggestion>,
        stage: SuggestionStage,
        engagement: Engagement,
        acceptance_rate: Option<f64>,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Vec<ScoredSuggestion> {
        let mut scored: Vec<ScoredSuggestion> = candidates
            .into_iter()
            .map(|suggestion| {
                let score = self.score(&suggestion, stage, engagement, acceptance_rate, now);
                ScoredSuggestion { suggestion, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.suggestion.expires_at.is_some().cmp(&a.suggestion.expires_at.is_some())
                })
                .then_with(|| {
                    b.suggestion
                        .savings_amount
                        .is_some()
                        .cmp(&a.suggestion.savings_amount.is_some())
                })
        });
        scored
    }
}
