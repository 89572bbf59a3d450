//! Proactive suggestion records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identity key for a suggestion. The same underlying opportunity
/// must keep the same id across turns so deduplication and already-shown
/// suppression hold.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub String);

impl SuggestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SuggestionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    DealAlert,
    BetterOption,
    CostSaving,
    TimeSaving,
    PackageDeal,
    Upsell,
    Alternative,
    InsiderTip,
    Urgency,
    Personalized,
}

/// Detector-local confidence, not a global ranking. Cross-suggestion
/// ordering is the scorer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

/// UI verb the presentation layer can attach to a suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    ShowFlexibleDates,
    ShowAlternatives,
    AddToCart,
    CompareOptions,
    ShowDetails,
    ApplyFilter,
    BookNow,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestionAction {
    pub kind: ActionKind,
    pub label: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_json::Value>,
}

impl SuggestionAction {
    pub fn new(kind: ActionKind, label: impl Into<String>) -> Self {
        Self { kind, label: label.into(), params: BTreeMap::new() }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// A candidate proactive message. Created fresh by a detector each turn,
/// immutable afterwards, and either delivered or discarded within the same
/// turn. The `message` is opaque to the core; detectors own its wording.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub kind: SuggestionKind,
    pub priority: SuggestionPriority,
    pub message: String,
    pub action: Option<SuggestionAction>,
    pub savings_amount: Option<f64>,
    pub savings_percentage: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Suggestion {
    pub fn new(
        id: impl Into<String>,
        kind: SuggestionKind,
        priority: SuggestionPriority,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: SuggestionId::new(id),
            kind,
            priority,
            message: message.into(),
            action: None,
            savings_amount: None,
            savings_percentage: None,
            expires_at: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_action(mut self, action: SuggestionAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_savings_amount(mut self, amount: f64) -> Self {
        self.savings_amount = Some(amount);
        self
    }

    pub fn with_savings_percentage(mut self, percentage: f64) -> Self {
        self.savings_percentage = Some(percentage);
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}
