use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trip::CollectedInfo;

/// Dialogue phase, derived each turn from the collected info and context
/// flags. `Completed` is terminal and never derived; `AssistanceNeeded` is
/// orthogonal and reachable from any phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationStage {
    Greeting,
    Discovery,
    GatheringDetails,
    Searching,
    PresentingOptions,
    GuidingDecision,
    Confirming,
    Booking,
    Completed,
    AssistanceNeeded,
}

/// Single symbolic move the agent should make next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NextAction {
    AskQuestion,
    Search,
    Present,
    Guide,
    Book,
    Clarify,
}

/// Symbolic trip field the agent can still ask about. The presentation
/// collaborator turns these into natural-language questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripField {
    ServiceType,
    Origin,
    Destination,
    DepartureDate,
    ReturnDate,
    Adults,
}

/// Contextual flags maintained by the calling session alongside the
/// collected info. Presence and absence are explicit; no sentinel values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowContext {
    pub last_topic_discussed: Option<String>,
    pub user_seems_unsure: bool,
    pub needs_clarification: bool,
    pub needs_assistance: bool,
    pub awaiting_confirmation: bool,
    pub search_attempted: bool,
    pub options_presented: bool,
    pub selected_option: Option<String>,
}

/// One exchange in the conversation history. Append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub user_message: String,
    pub agent_response: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate per-conversation state. Created once per conversation and
/// recomputed exactly once per user turn; owned by the calling session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationFlow {
    pub current_stage: Option<ConversationStage>,
    pub next_question: Option<TripField>,
    pub missing_info: Vec<TripField>,
    pub collected_info: CollectedInfo,
    pub suggested_action: Option<NextAction>,
    pub conversation_history: Vec<TurnRecord>,
    pub context: FlowContext,
    completed: bool,
}

impl ConversationFlow {
    /// Fresh conversation: greeting stage, nothing collected.
    pub fn begin() -> Self {
        Self { current_stage: Some(ConversationStage::Greeting), ..Self::default() }
    }

    /// External completion signal. Once set, stage derivation pins the
    /// conversation to `Completed`; there is no way back short of starting
    /// a new conversation.
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.current_stage = Some(ConversationStage::Completed);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Append an exchange to the history after the agent response has been
    /// rendered by the presentation collaborator.
    pub fn record_turn(
        &mut self,
        user_message: impl Into<String>,
        agent_response: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.conversation_history.push(TurnRecord {
            user_message: user_message.into(),
            agent_response: agent_response.into(),
            timestamp,
        });
    }

    /// User messages from the most recent turns, newest last. Used by the
    /// relevance filter's contextual checks.
    pub fn recent_user_messages(&self, window: usize) -> impl Iterator<Item = &str> {
        let skip = self.conversation_history.len().saturating_sub(window);
        self.conversation_history.iter().skip(skip).map(|turn| turn.user_message.as_str())
    }
}
