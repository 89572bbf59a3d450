//! Personalization from the user's search and booking history.
//!
//! Everything here needs a profile; without one the detector stays silent.
//! Counting uses ordered maps so repeated runs list destinations and
//! airlines in a stable order.

use std::collections::BTreeMap;

use chrono::Datelike;
use tripflow_core::domain::history::UserProfile;
use tripflow_core::errors::DetectorError;
use tripflow_core::suggestions::{
    ActionKind, DetectorContext, Suggestion, SuggestionAction, SuggestionDetector, SuggestionKind,
    SuggestionPriority,
};

/// Bookings before the returning-customer note applies.
const RETURNING_CUSTOMER_BOOKINGS: usize = 3;

/// Headroom over the historical average when filtering to budget.
const BUDGET_HEADROOM: f64 = 1.1;

/// Share of bookings in one season that counts as a pattern.
const SEASONAL_PATTERN_SHARE: f64 = 0.6;

/// Hand-curated similar-destination pairs.
const SIMILAR_DESTINATIONS: &[(&str, &[&str])] = &[
    ("Paris", &["Rome", "Barcelona", "Amsterdam"]),
    ("Tokyo", &["Seoul", "Singapore", "Hong Kong"]),
    ("New York", &["Chicago", "Boston", "San Francisco"]),
    ("Bali", &["Phuket", "Maldives", "Fiji"]),
];

#[derive(Clone, Copy, Debug, Default)]
pub struct PersonalizedDetector;

impl SuggestionDetector for PersonalizedDetector {
    fn name(&self) -> &'static str {
        "personalized"
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        let Some(profile) = ctx.profile.as_ref() else {
            return Ok(Vec::new());
        };

        let mut suggestions = Vec::new();
        suggestions.extend(returning_customer(profile));
        suggestions.extend(favorite_destinations(profile));
        suggestions.extend(similar_destination(ctx, profile));
        suggestions.extend(budget_filter(ctx, profile));
        suggestions.extend(preferred_airline(ctx, profile));
        suggestions.extend(loyalty_program(profile));
        suggestions.extend(seasonal_pattern(profile));
        Ok(suggestions)
    }
}

fn returning_customer(profile: &UserProfile) -> Option<Suggestion> {
    let count = profile.booking_history.len();
    if count < RETURNING_CUSTOMER_BOOKINGS {
        return None;
    }
    Some(
        Suggestion::new(
            "loyalty-benefit",
            SuggestionKind::Personalized,
            SuggestionPriority::Medium,
            "As a returning customer you qualify for priority support and \
             exclusive deals.",
        )
        .with_metadata("booking_count", count.into()),
    )
}

fn destination_counts(profile: &UserProfile) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for booking in &profile.booking_history {
        *counts.entry(booking.destination.as_str()).or_insert(0) += 1;
    }
    counts
}

fn favorite_destinations(profile: &UserProfile) -> Option<Suggestion> {
    let favorites: Vec<&str> = destination_counts(profile)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(destination, _)| destination)
        .collect();
    if favorites.is_empty() {
        return None;
    }
    Some(
        Suggestion::new(
            "favorite-destinations",
            SuggestionKind::Personalized,
            SuggestionPriority::Low,
            format!(
                "I see you love {}. Want deal alerts for these places or similar \
                 destinations to explore?",
                favorites.join(", ")
            ),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ShowAlternatives, "Explore Similar Destinations")
                .with_param("destinations", serde_json::json!(favorites)),
        ),
    )
}

fn similar_destination(ctx: &DetectorContext, profile: &UserProfile) -> Option<Suggestion> {
    if profile.booking_history.is_empty() {
        return None;
    }
    let destination = ctx.trip.destination.as_deref()?;
    let similar = SIMILAR_DESTINATIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(destination))
        .map(|(_, similar)| *similar)?;

    let unvisited: Vec<&str> = similar
        .iter()
        .copied()
        .filter(|candidate| {
            !profile
                .booking_history
                .iter()
                .any(|booking| booking.destination.eq_ignore_ascii_case(candidate))
        })
        .collect();
    if unvisited.is_empty() {
        return None;
    }
    Some(
        Suggestion::new(
            "similar-destination",
            SuggestionKind::Personalized,
            SuggestionPriority::Low,
            format!(
                "Based on your previous trips you might also love {}. Want to compare?",
                unvisited.join(", ")
            ),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ShowAlternatives, "Explore Similar Destinations")
                .with_param("destinations", serde_json::json!(unvisited)),
        ),
    )
}

fn budget_filter(ctx: &DetectorContext, profile: &UserProfile) -> Option<Suggestion> {
    if ctx.results.is_empty() {
        return None;
    }
    let budget = profile.average_booking_price()?;
    let ceiling = budget * BUDGET_HEADROOM;
    let within = ctx.results.iter().filter(|fare| fare.price <= ceiling).count();
    if within == 0 || within == ctx.results.len() {
        return None;
    }
    Some(
        Suggestion::new(
            "budget-filter",
            SuggestionKind::Personalized,
            SuggestionPriority::Medium,
            format!(
                "I filtered to your usual budget of around {budget:.0} and found \
                 {within} good options."
            ),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ApplyFilter, "View Budget-Friendly Options")
                .with_param("max_price", ceiling.into()),
        ),
    )
}

fn preferred_airline(ctx: &DetectorContext, profile: &UserProfile) -> Option<Suggestion> {
    let preferred = &profile.preferences.as_ref()?.preferred_airlines;
    if preferred.is_empty() {
        return None;
    }
    let matching = ctx
        .results
        .iter()
        .filter(|fare| {
            fare.airline.as_ref().is_some_and(|airline| preferred.contains(airline))
        })
        .count();
    if matching == 0 {
        return None;
    }
    Some(
        Suggestion::new(
            "preferred-airline",
            SuggestionKind::Personalized,
            SuggestionPriority::Medium,
            format!("Good news: {matching} options fly with your preferred airlines."),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ApplyFilter, "View Preferred Airlines")
                .with_param("airlines", serde_json::json!(preferred)),
        ),
    )
}

fn loyalty_program(profile: &UserProfile) -> Option<Suggestion> {
    if !profile.loyalty_programs.is_empty() {
        return None;
    }
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for booking in &profile.booking_history {
        if let Some(airline) = booking.airline.as_deref() {
            *counts.entry(airline).or_insert(0) += 1;
        }
    }
    let frequent = counts
        .iter()
        .filter(|(_, count)| **count >= 2)
        .max_by_key(|(_, count)| **count)
        .map(|(airline, _)| *airline)?;
    Some(
        Suggestion::new(
            "loyalty-program-tip",
            SuggestionKind::Personalized,
            SuggestionPriority::Medium,
            format!(
                "You fly {frequent} often. Joining their loyalty program would earn \
                 points and perks on trips you're already taking."
            ),
        )
        .with_metadata("airline", frequent.into()),
    )
}

fn seasonal_pattern(profile: &UserProfile) -> Option<Suggestion> {
    if profile.booking_history.len() < 3 {
        return None;
    }
    let months: Vec<u32> = profile
        .booking_history
        .iter()
        .filter_map(|booking| booking.departure_date)
        .map(|date| date.month())
        .collect();
    if months.is_empty() {
        return None;
    }

    let total = profile.booking_history.len() as f64;
    let summer = months.iter().filter(|month| (6..=8).contains(*month)).count() as f64;
    let winter = months.iter().filter(|month| matches!(month, 12 | 1 | 2)).count() as f64;

    let message = if summer > total * SEASONAL_PATTERN_SHARE {
        "You tend to travel in summer. Want to see warm destinations for your \
         next trip?"
    } else if winter > total * SEASONAL_PATTERN_SHARE {
        "You're a winter traveler. Want to explore winter getaway options?"
    } else {
        return None;
    };
    Some(Suggestion::new(
        "seasonal-pattern",
        SuggestionKind::Personalized,
        SuggestionPriority::Low,
        message,
    ))
}
