//! Destination insights keyed to the travel month.
//!
//! A small curated knowledge base: rainy and extreme-heat months, the best
//! months to visit, and month-specific events. Each matching insight becomes
//! one suggestion; ids carry the insight kind and destination so the same
//! advice is never repeated in a session.

use chrono::Datelike;
use tripflow_core::errors::DetectorError;
use tripflow_core::suggestions::{
    DetectorContext, Suggestion, SuggestionDetector, SuggestionKind, SuggestionPriority,
};

use crate::calendar::{is_peak_period, month_name};

struct DestinationProfile {
    name: &'static str,
    rainy_months: &'static [u32],
    hot_months: &'static [u32],
    best_months: &'static [u32],
    events: &'static [(u32, &'static str)],
}

const DESTINATIONS: &[DestinationProfile] = &[
    DestinationProfile {
        name: "Bali",
        rainy_months: &[11, 12, 1, 2],
        hot_months: &[],
        best_months: &[5, 6, 7, 8, 9],
        events: &[
            (3, "Nyepi (Day of Silence) closes the airport for a day"),
            (7, "Peak season, book accommodations early"),
        ],
    },
    DestinationProfile {
        name: "Paris",
        rainy_months: &[11, 12, 1, 2],
        hot_months: &[],
        best_months: &[4, 5, 6, 9, 10],
        events: &[
            (7, "Peak tourist season, expect crowds and higher prices"),
            (12, "Christmas markets, magical but expensive"),
        ],
    },
    DestinationProfile {
        name: "Tokyo",
        rainy_months: &[6, 7],
        hot_months: &[],
        best_months: &[3, 4, 10, 11],
        events: &[
            (3, "Cherry blossom season, book early"),
            (4, "Golden Week crowds in late April and early May"),
        ],
    },
    DestinationProfile {
        name: "Dubai",
        rainy_months: &[],
        hot_months: &[6, 7, 8, 9],
        best_months: &[11, 12, 1, 2, 3],
        events: &[(12, "Dubai Shopping Festival, great deals")],
    },
    DestinationProfile {
        name: "London",
        rainy_months: &[1, 2, 3, 11, 12],
        hot_months: &[],
        best_months: &[5, 6, 7, 8, 9],
        events: &[
            (7, "Wimbledon, book hotels early"),
            (12, "Holiday shopping, crowded but festive"),
        ],
    },
];

#[derive(Clone, Copy, Debug, Default)]
pub struct SeasonalDetector;

impl SuggestionDetector for SeasonalDetector {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn detect(&self, ctx: &DetectorContext) -> Result<Vec<Suggestion>, DetectorError> {
        let (Some(destination), Some(departure)) =
            (ctx.trip.destination.as_deref(), ctx.trip.departure_date())
        else {
            return Ok(Vec::new());
        };

        let month = departure.month();
        let mut suggestions = Vec::new();

        if let Some(profile) = lookup(destination) {
            let slug = profile.name.to_ascii_lowercase();
            let best = best_months_label(profile);

            if profile.rainy_months.contains(&month) {
                suggestions.push(Suggestion::new(
                    format!("seasonal-weather-{slug}"),
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::High,
                    format!(
                        "{} gets heavy rain in {}. {best} usually has better weather.",
                        profile.name,
                        month_name(month)
                    ),
                ));
            }
            if profile.hot_months.contains(&month) {
                suggestions.push(Suggestion::new(
                    format!("seasonal-weather-{slug}"),
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::High,
                    format!(
                        "{} is extremely hot in {} (40C and up). {best} is far more \
                         comfortable.",
                        profile.name,
                        month_name(month)
                    ),
                ));
            }
            if profile.best_months.contains(&month) {
                suggestions.push(Suggestion::new(
                    format!("seasonal-season-{slug}"),
                    SuggestionKind::Alternative,
                    SuggestionPriority::High,
                    format!(
                        "{} is one of the best months to visit {}: good weather and \
                         reasonable prices.",
                        month_name(month),
                        profile.name
                    ),
                ));
            }
            if let Some((_, event)) =
                profile.events.iter().find(|(event_month, _)| *event_month == month)
            {
                suggestions.push(Suggestion::new(
                    format!("seasonal-event-{slug}"),
                    SuggestionKind::InsiderTip,
                    SuggestionPriority::Medium,
                    format!("Heads up for your {} trip: {event}.", profile.name),
                ));
            }
        }

        if is_peak_period(departure) {
            suggestions.push(Suggestion::new(
                format!("seasonal-pricing-{}", destination.to_ascii_lowercase()),
                SuggestionKind::CostSaving,
                SuggestionPriority::High,
                format!(
                    "{} is peak travel season with prices typically 40-60% higher. \
                     Shoulder season is the better deal.",
                    month_name(month)
                ),
            ));
        }

        Ok(suggestions)
    }
}

fn lookup(destination: &str) -> Option<&'static DestinationProfile> {
    let normalized = destination.to_ascii_lowercase();
    DESTINATIONS
        .iter()
        .find(|profile| normalized.contains(&profile.name.to_ascii_lowercase()))
}

fn best_months_label(profile: &DestinationProfile) -> String {
    let names: Vec<&str> =
        profile.best_months.iter().take(3).map(|month| month_name(*month)).collect();
    names.join(", ")
}
