//! Relevance filtering and deduplication.
//!
//! The filter is conservative by design: a candidate is dropped only when a
//! rule clearly applies. Ambiguous cases pass through, since suppressing a
//! legitimately useful suggestion costs more than showing a mediocre one.

use std::collections::BTreeSet;

use tracing::warn;

use crate::domain::trip::BudgetTier;
use crate::suggestions::context::DetectorContext;
use crate::suggestions::types::{ActionKind, Suggestion, SuggestionKind};

/// How many of the latest turns count as "recent" for the contextual
/// phrase checks below.
const RECENT_MESSAGE_WINDOW: usize = 5;

/// Phrases signalling the user wants a single product type only.
const SINGLE_PRODUCT_PHRASES: &[&str] =
    &["only flight", "just flight", "only the flight", "flights only", "only hotel", "just hotel", "hotels only", "no package"];

/// Phrases signalling the travel dates are fixed and non-negotiable.
const FIXED_DATE_PHRASES: &[&str] =
    &["must be", "need to travel on", "have to travel on", "can't change", "cannot change", "fixed date", "non-negotiable"];

fn recent_message_contains(ctx: &DetectorContext, phrases: &[&str]) -> bool {
    ctx.recent_user_messages(RECENT_MESSAGE_WINDOW).any(|message| {
        let normalized = message.to_ascii_lowercase();
        phrases.iter().any(|phrase| normalized.contains(phrase))
    })
}

/// True when no drop rule applies to the candidate.
pub fn is_relevant(suggestion: &Suggestion, ctx: &DetectorContext) -> bool {
    if ctx.session.shown.contains(&suggestion.id) {
        return false;
    }
    if suggestion.is_expired(ctx.now) {
        return false;
    }
    if suggestion.kind == SuggestionKind::Upsell && ctx.trip.budget == Some(BudgetTier::Economy) {
        return false;
    }
    if suggestion.kind == SuggestionKind::PackageDeal
        && recent_message_contains(ctx, SINGLE_PRODUCT_PHRASES)
    {
        return false;
    }
    if suggestion.action.as_ref().is_some_and(|action| action.kind == ActionKind::ShowFlexibleDates)
        && recent_message_contains(ctx, FIXED_DATE_PHRASES)
    {
        return false;
    }
    true
}

/// Apply the relevance rules, dropping invariant-violating candidates
/// (empty id) on the way. Order-preserving.
pub fn filter_relevant(candidates: Vec<Suggestion>, ctx: &DetectorContext) -> Vec<Suggestion> {
    candidates
        .into_iter()
        .filter(|suggestion| {
            if suggestion.id.as_str().is_empty() {
                warn!(
                    event_name = "suggestions.invariant_violation",
                    kind = ?suggestion.kind,
                    "dropping suggestion without an identity key"
                );
                return false;
            }
            is_relevant(suggestion, ctx)
        })
        .collect()
}

/// Collapse candidates sharing an id; the first occurrence in detector
/// evaluation order survives. Importance is the scorer's concern, never
/// arrival order.
pub fn deduplicate(candidates: Vec<Suggestion>) -> Vec<Suggestion> {
    let mut seen = BTreeSet::new();
    candidates.into_iter().filter(|suggestion| seen.insert(suggestion.id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::trip::{BudgetTier, CollectedInfo};
    use crate::suggestions::context::{DetectorContext, SessionView};
    use crate::suggestions::filter::{deduplicate, filter_relevant, is_relevant};
    use crate::suggestions::types::{
        ActionKind, Suggestion, SuggestionAction, SuggestionId, SuggestionKind, SuggestionPriority,
    };
    use crate::timing::{Engagement, SuggestionStage};

    fn ctx() -> DetectorContext {
        DetectorContext::new(
            SessionView::new(SuggestionStage::Results, Engagement::Medium),
            Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        )
    }

    fn suggestion(id: &str, kind: SuggestionKind) -> Suggestion {
        Suggestion::new(id, kind, SuggestionPriority::Medium, "msg")
    }

    fn with_user_message(ctx: DetectorContext, message: &str) -> DetectorContext {
        ctx.with_conversation(vec![crate::flows::TurnRecord {
            user_message: message.to_owned(),
            agent_response: String::new(),
            timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 11, 59, 0).unwrap(),
        }])
    }

    #[test]
    fn already_shown_ids_are_dropped() {
        let ctx = ctx();
        let shown = DetectorContext {
            session: ctx.session.clone().with_shown([SuggestionId::new("seen")]),
            ..ctx
        };

        assert!(!is_relevant(&suggestion("seen", SuggestionKind::InsiderTip), &shown));
        assert!(is_relevant(&suggestion("fresh", SuggestionKind::InsiderTip), &shown));
    }

    #[test]
    fn expired_suggestions_are_dropped() {
        let ctx = ctx();
        let expired = suggestion("deal", SuggestionKind::DealAlert)
            .with_expires_at(ctx.now - Duration::minutes(1));
        let live = suggestion("deal", SuggestionKind::DealAlert)
            .with_expires_at(ctx.now + Duration::minutes(1));

        assert!(!is_relevant(&expired, &ctx));
        assert!(is_relevant(&live, &ctx));
    }

    #[test]
    fn upsells_never_reach_economy_budget_users() {
        let ctx = ctx().with_trip(CollectedInfo {
            budget: Some(BudgetTier::Economy),
            ..CollectedInfo::default()
        });

        assert!(!is_relevant(&suggestion("lounge", SuggestionKind::Upsell), &ctx));
        // Unknown budget is ambiguous, so the upsell passes.
        assert!(is_relevant(&suggestion("lounge", SuggestionKind::Upsell), &self::ctx()));
    }

    #[test]
    fn package_deals_respect_an_explicit_single_product_ask() {
        let ctx = with_user_message(ctx(), "I want only flights, no hotel bundles please");
        assert!(!is_relevant(&suggestion("bundle", SuggestionKind::PackageDeal), &ctx));

        let ctx = with_user_message(self::ctx(), "looking for a trip to Rome");
        assert!(is_relevant(&suggestion("bundle", SuggestionKind::PackageDeal), &ctx));
    }

    #[test]
    fn flexible_date_actions_respect_fixed_dates() {
        let flexible = suggestion("flex", SuggestionKind::CostSaving).with_action(
            SuggestionAction::new(ActionKind::ShowFlexibleDates, "See flexible dates"),
        );
        let ctx = with_user_message(ctx(), "It must be June 1st, I need to travel on that day");

        assert!(!is_relevant(&flexible, &ctx));
        assert!(is_relevant(&flexible, &self::ctx()));
    }

    #[test]
    fn empty_ids_are_invariant_violations_and_dropped() {
        let ctx = ctx();
        let kept = filter_relevant(
            vec![suggestion("", SuggestionKind::InsiderTip), suggestion("ok", SuggestionKind::InsiderTip)],
            &ctx,
        );

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id.as_str(), "ok");
    }

    #[test]
    fn dedup_keeps_the_first_occurrence() {
        let first =
            suggestion("dup", SuggestionKind::DealAlert).with_metadata("source", "a".into());
        let second =
            suggestion("dup", SuggestionKind::DealAlert).with_metadata("source", "b".into());

        let deduped = deduplicate(vec![first.clone(), second, suggestion("other", SuggestionKind::InsiderTip)]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0], first);
    }

    #[test]
    fn feeding_the_same_id_twice_is_idempotent() {
        let deduped = deduplicate(vec![
            suggestion("same", SuggestionKind::DealAlert),
            suggestion("same", SuggestionKind::DealAlert),
        ]);
        assert_eq!(deduplicate(deduped.clone()), deduped);
        assert_eq!(deduped.len(), 1);
    }
}
