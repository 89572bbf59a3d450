//! Deal detection over the current search results.

use chrono::{DateTime, Utc};
use tripflow_core::errors::DetectorError;
use tripflow_core::suggestions::{
    ActionKind, DetectorContext, Suggestion, SuggestionAction, SuggestionDetector, SuggestionKind,
    SuggestionPriority,
};

/// A current price must sit at least this far under the previously seen
/// lowest before a drop is worth announcing.
const PRICE_DROP_RATIO: f64 = 0.85;

/// Discount above which a result counts as a flash sale even without the
/// explicit flag.
const FLASH_SALE_DISCOUNT: f64 = 20.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct DealDetector;

impl SuggestionDetector for DealDetector {
    fn name(&self) -> &'static str {
        "deals"
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        if ctx.results.is_empty() {
            return Ok(Vec::new());
        }

        let mut suggestions = Vec::new();
        if let Some(suggestion) = flash_sale(ctx) {
            suggestions.push(suggestion);
        }
        if let Some(suggestion) = price_drop(ctx) {
            suggestions.push(suggestion);
        }
        Ok(suggestions)
    }
}

fn flash_sale(ctx: &DetectorContext) -> Option<Suggestion> {
    let best = ctx
        .results
        .iter()
        .filter(|fare| {
            fare.is_flash_sale || fare.discount_percentage.is_some_and(|d| d > FLASH_SALE_DISCOUNT)
        })
        .max_by(|a, b| {
            a.discount_percentage
                .unwrap_or(0.0)
                .partial_cmp(&b.discount_percentage.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let discount = best.discount_percentage.unwrap_or(0.0);
    let mut suggestion = Suggestion::new(
        "flash-sale-alert",
        SuggestionKind::DealAlert,
        SuggestionPriority::High,
        format!(
            "Flash sale alert! Save {discount:.0}% on this option, gone in {}.",
            time_remaining_label(best.expires_at, ctx.now)
        ),
    )
    .with_savings_percentage(discount)
    .with_action(
        SuggestionAction::new(ActionKind::ShowDetails, "View Deal")
            .with_param("id", best.id.clone().into()),
    );
    if let Some(expires_at) = best.expires_at {
        suggestion = suggestion.with_expires_at(expires_at);
    }
    Some(suggestion)
}

fn price_drop(ctx: &DetectorContext) -> Option<Suggestion> {
    let profile = ctx.profile.as_ref()?;
    let destination = ctx.trip.destination.as_deref()?;

    let previous_lowest = profile
        .previous_searches
        .iter()
        .find(|search| {
            search.destination.as_deref() == Some(destination)
                && search.origin == ctx.trip.origin
        })
        .and_then(|search| search.lowest_price)
        .filter(|price| *price > 0.0)?;

    let current_lowest = ctx
        .results
        .iter()
        .map(|fare| fare.price)
        .fold(f64::INFINITY, f64::min);
    if !current_lowest.is_finite() || current_lowest >= previous_lowest * PRICE_DROP_RATIO {
        return None;
    }

    let savings = previous_lowest - current_lowest;
    let percent = (savings / previous_lowest * 100.0).round();
    Some(
        Suggestion::new(
            "price-drop-alert",
            SuggestionKind::DealAlert,
            SuggestionPriority::High,
            format!("Great news! Prices dropped {percent:.0}% since your last search."),
        )
        .with_savings_amount(savings)
        .with_savings_percentage(percent)
        .with_action(SuggestionAction::new(ActionKind::ShowAlternatives, "View Updated Prices")),
    )
}

fn time_remaining_label(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(expires_at) = expires_at else {
        return "soon".to_owned();
    };
    let remaining = expires_at.signed_duration_since(now);
    if remaining.num_hours() > 24 {
        format!("{} days", remaining.num_days())
    } else if remaining.num_hours() > 0 {
        format!("{} hours", remaining.num_hours())
    } else {
        format!("{} minutes", remaining.num_minutes().max(0))
    }
}
