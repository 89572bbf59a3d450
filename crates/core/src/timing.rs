//! Suggestion admission control.
//!
//! The gate decides whether any suggestion may be shown this turn and caps
//! how many, from per-session counters the caller owns. It never blocks a
//! conversation; worst case is "no suggestion this turn", which is always
//! a valid silent outcome.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TimingConfig;

/// Coarse classification of how actively the user is interacting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engagement {
    High,
    Medium,
    Low,
}

/// Funnel stage used for suggestion pacing. Coarser than the conversation
/// stage: several dialogue phases share one pacing bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionStage {
    Greeting,
    Search,
    Results,
    Details,
    Comparison,
    Booking,
    Confirmation,
    Completed,
}

impl From<crate::flows::ConversationStage> for SuggestionStage {
    fn from(stage: crate::flows::ConversationStage) -> Self {
        use crate::flows::ConversationStage::*;

        match stage {
            Greeting => SuggestionStage::Greeting,
            Discovery | Searching => SuggestionStage::Search,
            GatheringDetails | AssistanceNeeded => SuggestionStage::Details,
            PresentingOptions => SuggestionStage::Results,
            GuidingDecision => SuggestionStage::Comparison,
            Booking => SuggestionStage::Booking,
            Confirming => SuggestionStage::Confirmation,
            Completed => SuggestionStage::Completed,
        }
    }
}

/// Where in the reply the presentation layer should weave suggestions in.
/// A function of stage alone, independent of suggestion content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionPoint {
    Now,
    AfterResults,
    BeforeBooking,
    Never,
}

pub fn insertion_point(stage: SuggestionStage) -> InsertionPoint {
    match stage {
        SuggestionStage::Greeting
        | SuggestionStage::Search
        | SuggestionStage::Details
        | SuggestionStage::Comparison => InsertionPoint::Now,
        SuggestionStage::Results => InsertionPoint::AfterResults,
        SuggestionStage::Booking => InsertionPoint::BeforeBooking,
        SuggestionStage::Confirmation | SuggestionStage::Completed => InsertionPoint::Never,
    }
}

/// Per-session suggestion counters. Owned and persisted by the caller; the
/// gate reads them and the `record_*` helpers are advisory increments the
/// caller applies after acting on a decision.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimingContext {
    pub last_suggestion_time: Option<DateTime<Utc>>,
    pub engagement: Engagement,
    pub stage: SuggestionStage,
    pub suggestions_shown: u32,
    pub suggestions_accepted: u32,
    pub suggestions_dismissed: u32,
    pub time_on_page_secs: u64,
    pub last_user_message: Option<DateTime<Utc>>,
}

impl TimingContext {
    pub fn new(stage: SuggestionStage, engagement: Engagement) -> Self {
        Self {
            last_suggestion_time: None,
            engagement,
            stage,
            suggestions_shown: 0,
            suggestions_accepted: 0,
            suggestions_dismissed: 0,
            time_on_page_secs: 0,
            last_user_message: None,
        }
    }

    /// Advisory update after suggestions were actually delivered.
    pub fn record_shown(&mut self, count: u32, at: DateTime<Utc>) {
        if count == 0 {
            return;
        }
        self.suggestions_shown += count;
        self.last_suggestion_time = Some(at);
    }

    pub fn record_accepted(&mut self) {
        self.suggestions_accepted += 1;
    }

    pub fn record_dismissed(&mut self) {
        self.suggestions_dismissed += 1;
    }

    /// Accepted / shown, `None` before anything was shown.
    pub fn acceptance_rate(&self) -> Option<f64> {
        if self.suggestions_shown == 0 {
            return None;
        }
        Some(f64::from(self.suggestions_accepted) / f64::from(self.suggestions_shown))
    }

    fn dismissal_rate(&self) -> f64 {
        if self.suggestions_shown == 0 {
            return 0.0;
        }
        f64::from(self.suggestions_dismissed) / f64::from(self.suggestions_shown)
    }
}

/// Outcome of admission control for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingDecision {
    pub should_suggest: bool,
    pub insertion_point: InsertionPoint,
    pub max_suggestions: usize,
}

impl TimingDecision {
    fn suppress() -> Self {
        Self { should_suggest: false, insertion_point: InsertionPoint::Never, max_suggestions: 0 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TimingGate {
    config: TimingConfig,
}

impl TimingGate {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Evaluate the hard admission rules in order. The interval floors and
    /// the session-wide cap are floors, not preferences: no downstream
    /// component may override a suppression.
    pub fn evaluate(&self, ctx: &TimingContext, now: DateTime<Utc>) -> TimingDecision {
        let config = &self.config;

        // Rule 1: never during confirmation or after completion.
        if matches!(ctx.stage, SuggestionStage::Confirmation | SuggestionStage::Completed) {
            return TimingDecision::suppress();
        }

        // Rule 2: anti-spam floors.
        if ctx.suggestions_shown > config.max_total_suggestions {
            debug!(
                event_name = "timing.session_cap_hit",
                shown = ctx.suggestions_shown,
                "session-wide suggestion cap reached"
            );
            return TimingDecision::suppress();
        }
        if let Some(last) = ctx.last_suggestion_time {
            let floor =
                Duration::seconds(config.min_interval_secs.for_engagement(ctx.engagement) as i64);
            if now.signed_duration_since(last) < floor {
                return TimingDecision::suppress();
            }
        }
        if ctx.suggestions_shown >= config.dismissal_min_shown
            && ctx.dismissal_rate() >= config.dismissal_rate_threshold
        {
            debug!(
                event_name = "timing.dismissal_backoff",
                dismissed = ctx.suggestions_dismissed,
                shown = ctx.suggestions_shown,
                "user is dismissing suggestions; backing off"
            );
            return TimingDecision::suppress();
        }

        // Rule 3: low-engagement users get at most one per session.
        if ctx.engagement == Engagement::Low && ctx.suggestions_shown >= 1 {
            return TimingDecision::suppress();
        }

        // Rule 4: per-stage cap scaled by engagement, floored.
        let base_cap = config.stage_caps.for_stage(ctx.stage);
        let multiplier = config.engagement_multiplier.for_engagement(ctx.engagement);
        let max_suggestions = (base_cap as f64 * multiplier).floor() as usize;
        if max_suggestions == 0 {
            return TimingDecision::suppress();
        }

        // Rule 5: never talk to an idle tab.
        if let Some(last_message) = ctx.last_user_message {
            let idle = Duration::seconds(config.idle_timeout_secs as i64);
            if now.signed_duration_since(last_message) >= idle {
                return TimingDecision::suppress();
            }
        }

        TimingDecision {
            should_suggest: true,
            insertion_point: insertion_point(ctx.stage),
            max_suggestions,
        }
    }
}
