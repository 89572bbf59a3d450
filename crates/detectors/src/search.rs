//! Search-improvement recommendations.
//!
//! Looks at the collected trip parameters and the result set for cheaper or
//! better ways to run the same trip: flexible dates around peak season,
//! direct-flight and cabin upgrades priced within reach, bundles, group
//! rates, and Saturday-stay fare tricks.

use chrono::NaiveDate;
use tripflow_core::domain::history::FareOption;
use tripflow_core::domain::trip::{CabinClass, TripType};
use tripflow_core::errors::DetectorError;
use tripflow_core::suggestions::{
    ActionKind, DetectorContext, Suggestion, SuggestionAction, SuggestionDetector, SuggestionKind,
    SuggestionPriority,
};

use crate::calendar::{includes_saturday, is_peak_period};

/// A direct flight is only pitched when it costs less than this much more
/// than the cheapest connection, in percent.
const DIRECT_UPGRADE_MAX_PERCENT: f64 = 25.0;

/// Same idea for premium economy over economy.
const PREMIUM_UPGRADE_MAX_PERCENT: f64 = 30.0;

/// Group-rate advice kicks in at this party size.
const GROUP_RATE_THRESHOLD: u32 = 6;

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchImprovementDetector;

impl SuggestionDetector for SearchImprovementDetector {
    fn name(&self) -> &'static str {
        "search-improvements"
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        let mut suggestions = Vec::new();
        suggestions.extend(flexible_dates(ctx));
        suggestions.extend(direct_flight_upgrade(ctx));
        suggestions.extend(package_deal(ctx));
        suggestions.extend(premium_upgrade(ctx));
        suggestions.extend(group_rate(ctx));
        suggestions.extend(multi_city_split(ctx));
        suggestions.extend(saturday_stay(ctx));
        Ok(suggestions)
    }
}

fn flexible_dates(ctx: &DetectorContext) -> Option<Suggestion> {
    let departure = ctx.trip.departure_date().filter(|date| is_peak_period(*date))?;
    Some(
        Suggestion::new(
            "flexible-dates-tip",
            SuggestionKind::CostSaving,
            SuggestionPriority::High,
            "You're searching during peak season. Shifting your dates by 2-3 days \
             could save up to 40%. Want to see flexible date options?",
        )
        .with_action(
            SuggestionAction::new(ActionKind::ShowFlexibleDates, "See Flexible Dates")
                .with_param("date", departure.to_string().into()),
        ),
    )
}

fn cheapest<'a>(
    fares: impl Iterator<Item = &'a FareOption>,
) -> Option<&'a FareOption> {
    fares.min_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal))
}

fn direct_flight_upgrade(ctx: &DetectorContext) -> Option<Suggestion> {
    let connecting = cheapest(ctx.results.iter().filter(|fare| !fare.is_direct()))?;
    let direct = cheapest(ctx.results.iter().filter(|fare| fare.is_direct()))?;

    let price_diff = direct.price - connecting.price;
    if price_diff <= 0.0 || connecting.price <= 0.0 {
        return None;
    }
    let percent = (price_diff / connecting.price * 100.0).round();
    if percent >= DIRECT_UPGRADE_MAX_PERCENT {
        return None;
    }

    let hours_saved = match (connecting.total_duration_minutes, direct.total_duration_minutes) {
        (Some(slow), Some(fast)) if slow > fast => (f64::from(slow - fast) / 60.0).round(),
        _ => 0.0,
    };
    Some(
        Suggestion::new(
            "direct-flight-upgrade",
            SuggestionKind::BetterOption,
            SuggestionPriority::Medium,
            format!(
                "For {price_diff:.0} more ({percent:.0}% increase) you could fly direct \
                 and save around {hours_saved:.0} hours of travel time."
            ),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ShowDetails, "View Direct Flights")
                .with_param("filter", "direct".into()),
        )
        .with_metadata("hours_saved", hours_saved.into()),
    )
}

fn package_deal(ctx: &DetectorContext) -> Option<Suggestion> {
    ctx.trip.destination.as_ref()?;
    Some(
        Suggestion::new(
            "package-deal-offer",
            SuggestionKind::PackageDeal,
            SuggestionPriority::Medium,
            "Booking hotel and flight together typically saves 15-20%. \
             Want to see package deals?",
        )
        .with_action(
            SuggestionAction::new(ActionKind::ShowAlternatives, "View Packages")
                .with_param("type", "package".into()),
        ),
    )
}

fn premium_upgrade(ctx: &DetectorContext) -> Option<Suggestion> {
    let wants_economy = ctx
        .trip
        .preferences
        .as_ref()
        .and_then(|preferences| preferences.cabin)
        == Some(CabinClass::Economy);
    if !wants_economy {
        return None;
    }

    let economy =
        cheapest(ctx.results.iter().filter(|fare| fare.cabin == Some(CabinClass::Economy)))?;
    let premium = cheapest(
        ctx.results.iter().filter(|fare| fare.cabin == Some(CabinClass::PremiumEconomy)),
    )?;

    if economy.price <= 0.0 {
        return None;
    }
    let percent = ((premium.price - economy.price) / economy.price * 100.0).round();
    if percent <= 0.0 || percent >= PREMIUM_UPGRADE_MAX_PERCENT {
        return None;
    }
    Some(
        Suggestion::new(
            "premium-upgrade",
            SuggestionKind::BetterOption,
            SuggestionPriority::Low,
            format!(
                "Premium economy is only {percent:.0}% more, with extra legroom, \
                 priority boarding, and better meals."
            ),
        )
        .with_action(
            SuggestionAction::new(ActionKind::ApplyFilter, "View Premium Options")
                .with_param("cabin", "premium-economy".into()),
        ),
    )
}

fn group_rate(ctx: &DetectorContext) -> Option<Suggestion> {
    let total = ctx.trip.travelers.map(|travelers| travelers.total())?;
    if total < GROUP_RATE_THRESHOLD {
        return None;
    }
    Some(
        Suggestion::new(
            "group-booking-tip",
            SuggestionKind::InsiderTip,
            SuggestionPriority::High,
            format!(
                "For {total} travelers, contacting airlines directly for group rates \
                 can get 10-15% off plus better flexibility."
            ),
        )
        .with_metadata("group_size", total.into()),
    )
}

fn multi_city_split(ctx: &DetectorContext) -> Option<Suggestion> {
    if ctx.trip.trip_type != Some(TripType::MultiCity) {
        return None;
    }
    Some(
        Suggestion::new(
            "multi-city-tip",
            SuggestionKind::InsiderTip,
            SuggestionPriority::Medium,
            "Sometimes separate one-way tickets beat a multi-city fare. \
             Worth comparing both.",
        )
        .with_metadata("compare_booking_types", true.into()),
    )
}

fn saturday_stay(ctx: &DetectorContext) -> Option<Suggestion> {
    let departure = ctx.trip.departure_date()?;
    let return_date = ctx.trip.return_date().filter(|date| *date >= departure)?;
    let trip_length = trip_length_days(departure, return_date);

    if includes_saturday(departure, return_date) {
        Some(
            Suggestion::new(
                "saturday-stay-tip",
                SuggestionKind::CostSaving,
                SuggestionPriority::Medium,
                "Your dates include a Saturday night stay, which often unlocks \
                 lower fares. Good pick.",
            )
            .with_metadata("trip_length", trip_length.into()),
        )
    } else {
        Some(
            Suggestion::new(
                "saturday-stay-suggestion",
                SuggestionKind::CostSaving,
                SuggestionPriority::Medium,
                "Extending your trip through a Saturday night could save 20-30% \
                 on airfare. Want to see weekend options?",
            )
            .with_action(SuggestionAction::new(
                ActionKind::ShowFlexibleDates,
                "Show Weekend Options",
            )),
        )
    }
}

fn trip_length_days(departure: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - departure).num_days()
}
