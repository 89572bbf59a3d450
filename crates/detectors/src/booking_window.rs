//! Booking-window timing advice keyed off the departure date.

use tripflow_core::errors::DetectorError;
use tripflow_core::suggestions::{
    ActionKind, DetectorContext, Suggestion, SuggestionAction, SuggestionDetector, SuggestionKind,
    SuggestionPriority,
};

use crate::calendar::is_weekend;

/// Prices are typically lowest 3 to 12 weeks before departure.
const OPTIMAL_WINDOW_DAYS: std::ops::RangeInclusive<i64> = 21..=90;

/// Beyond this, prices usually still have room to drop.
const EARLY_BOOKING_DAYS: i64 = 120;

/// Under this, the last-minute playbook applies.
const LAST_MINUTE_DAYS: i64 = 14;

#[derive(Clone, Copy, Debug, Default)]
pub struct BookingWindowDetector;

impl SuggestionDetector for BookingWindowDetector {
    fn name(&self) -> &'static str {
        "booking-window"
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        let Some(departure) = ctx.trip.departure_date() else {
            return Ok(Vec::new());
        };

        let mut suggestions = Vec::new();
        let days = ctx.days_until(departure);

        if OPTIMAL_WINDOW_DAYS.contains(&days) {
            suggestions.push(
                Suggestion::new(
                    "optimal-booking-window",
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::Low,
                    "Perfect timing: you're booking in the sweet spot, 3 to 12 weeks \
                     out, when prices are typically at their lowest.",
                )
                .with_metadata("days_until_departure", days.into()),
            );
        } else if days > EARLY_BOOKING_DAYS {
            suggestions.push(
                Suggestion::new(
                    "early-booking-tip",
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::Medium,
                    "You're booking quite early. Prices typically drop 8-12 weeks \
                     before departure; want price monitoring so you can book at the \
                     right moment?",
                )
                .with_action(SuggestionAction::new(ActionKind::AddToCart, "Monitor Prices")),
            );
        } else if (0..LAST_MINUTE_DAYS).contains(&days) {
            suggestions.push(
                Suggestion::new(
                    "last-minute-strategy",
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::High,
                    "You're booking last-minute. Airlines often release unsold seats \
                     at a discount 24-48 hours before departure; I can watch prices \
                     and alert you to drops.",
                )
                .with_action(SuggestionAction::new(ActionKind::AddToCart, "Set Price Alert")),
            );
        }

        if is_weekend(departure) {
            suggestions.push(
                Suggestion::new(
                    "weekday-savings-tip",
                    SuggestionKind::CostSaving,
                    SuggestionPriority::Medium,
                    "Tuesday and Wednesday flights are typically 15-25% cheaper than \
                     weekend departures. Want to see weekday options?",
                )
                .with_action(SuggestionAction::new(
                    ActionKind::ShowFlexibleDates,
                    "Show Weekday Flights",
                )),
            );
        }

        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tripflow_core::domain::trip::{CollectedInfo, TripDates};
    use tripflow_core::suggestions::{DetectorContext, SessionView, SuggestionDetector};
    use tripflow_core::timing::{Engagement, SuggestionStage};

    use super::BookingWindowDetector;

    // A Thursday; weekday cases below avoid the weekend tip.
    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    fn ctx_departing(date: &str) -> DetectorContext {
        DetectorContext::new(
            SessionView::new(SuggestionStage::Search, Engagement::Medium),
            now(),
        )
        .with_trip(CollectedInfo {
            dates: Some(TripDates {
                departure: Some(date.parse().expect("valid date")),
                ..TripDates::default()
            }),
            ..CollectedInfo::default()
        })
    }

    fn ids(ctx: &DetectorContext) -> Vec<String> {
        BookingWindowDetector
            .detect(ctx)
            .expect("detector runs")
            .into_iter()
            .map(|s| s.id.as_str().to_owned())
            .collect()
    }

    #[test]
    fn no_departure_date_no_advice() {
        let ctx = DetectorContext::new(
            SessionView::new(SuggestionStage::Search, Engagement::Medium),
            now(),
        );
        assert!(ids(&ctx).is_empty());
    }

    #[test]
    fn the_sweet_spot_earns_praise() {
        // June 11 is 41 days out, a Wednesday.
        assert_eq!(ids(&ctx_departing("2025-06-11")), vec!["optimal-booking-window"]);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        // 21 days out (May 22) and 90 days out (Jul 30), both weekdays.
        assert!(ids(&ctx_departing("2025-05-22")).contains(&"optimal-booking-window".to_owned()));
        assert!(ids(&ctx_departing("2025-07-30")).contains(&"optimal-booking-window".to_owned()));
        // 20 and 91 days out fall outside.
        assert!(ids(&ctx_departing("2025-05-21")).is_empty());
        assert!(!ids(&ctx_departing("2025-07-31")).contains(&"optimal-booking-window".to_owned()));
    }

    #[test]
    fn far_future_departures_get_the_early_booking_tip() {
        // Sep 10 is 132 days out.
        assert_eq!(ids(&ctx_departing("2025-09-10")), vec!["early-booking-tip"]);
    }

    #[test]
    fn imminent_departures_get_the_last_minute_strategy() {
        // May 7 is 6 days out, a Wednesday.
        assert_eq!(ids(&ctx_departing("2025-05-07")), vec!["last-minute-strategy"]);
    }

    #[test]
    fn past_departures_get_no_last_minute_advice() {
        assert!(ids(&ctx_departing("2025-04-23")).is_empty());
    }

    #[test]
    fn weekend_departures_also_get_the_weekday_tip() {
        // Saturday June 14, inside the optimal window.
        let found = ids(&ctx_departing("2025-06-14"));
        assert!(found.contains(&"optimal-booking-window".to_owned()));
        assert!(found.contains(&"weekday-savings-tip".to_owned()));
    }
}
