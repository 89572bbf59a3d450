//! Read-only input bundle for the suggestion pipeline.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::history::{FareOption, UserProfile};
use crate::domain::trip::CollectedInfo;
use crate::flows::TurnRecord;
use crate::suggestions::types::SuggestionId;
use crate::timing::{Engagement, SuggestionStage};

/// Session-scoped view the pipeline needs: what has already been shown and
/// how the user is pacing through the funnel.
#[derive(Clone, Debug)]
pub struct SessionView {
    pub shown: BTreeSet<SuggestionId>,
    pub engagement: Engagement,
    pub stage: SuggestionStage,
}

impl SessionView {
    pub fn new(stage: SuggestionStage, engagement: Engagement) -> Self {
        Self { shown: BTreeSet::new(), engagement, stage }
    }

    pub fn with_shown(mut self, ids: impl IntoIterator<Item = SuggestionId>) -> Self {
        self.shown.extend(ids);
        self
    }
}

/// Everything a detector (and the relevance filter) may look at for one
/// turn. Assembled by the caller before invoking the engine; `now` is
/// injected so the whole pipeline is a deterministic function of its
/// inputs. Detectors must treat every field as optional: missing data
/// yields an empty candidate list, never a fault.
#[derive(Clone, Debug)]
pub struct DetectorContext {
    pub trip: CollectedInfo,
    pub results: Vec<FareOption>,
    pub profile: Option<UserProfile>,
    pub conversation: Vec<TurnRecord>,
    pub session: SessionView,
    pub now: DateTime<Utc>,
}

impl DetectorContext {
    pub fn new(session: SessionView, now: DateTime<Utc>) -> Self {
        Self {
            trip: CollectedInfo::default(),
            results: Vec::new(),
            profile: None,
            conversation: Vec::new(),
            session,
            now,
        }
    }

    pub fn with_trip(mut self, trip: CollectedInfo) -> Self {
        self.trip = trip;
        self
    }

    pub fn with_results(mut self, results: Vec<FareOption>) -> Self {
        self.results = results;
        self
    }

    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_conversation(mut self, conversation: Vec<TurnRecord>) -> Self {
        self.conversation = conversation;
        self
    }

    /// User messages from the most recent turns, newest last.
    pub fn recent_user_messages(&self, window: usize) -> impl Iterator<Item = &str> {
        let skip = self.conversation.len().saturating_sub(window);
        self.conversation.iter().skip(skip).map(|turn| turn.user_message.as_str())
    }

    /// Days from `now` until the given date, negative when in the past.
    pub fn days_until(&self, date: chrono::NaiveDate) -> i64 {
        (date - self.now.date_naive()).num_days()
    }
}
