use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of product the traveler is asking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Flight,
    Hotel,
    Package,
    /// The traveler has not committed to a product yet.
    Undecided,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    RoundTrip,
    MultiCity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetTier {
    Economy,
    Premium,
    Luxury,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatingPreference {
    Window,
    Aisle,
    Extra,
}

/// Requested travel dates. `flexible` signals the traveler volunteered
/// date flexibility, not that the dates are unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDates {
    pub departure: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub flexible: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travelers {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Travelers {
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPreferences {
    pub preferred_airlines: Vec<String>,
    pub prefers_direct: Option<bool>,
    pub cabin: Option<CabinClass>,
    pub seating: Option<SeatingPreference>,
    pub meal: Option<String>,
    pub max_layovers: Option<u32>,
}

impl TripPreferences {
    pub fn is_empty(&self) -> bool {
        self.preferred_airlines.is_empty()
            && self.prefers_direct.is_none()
            && self.cabin.is_none()
            && self.seating.is_none()
            && self.meal.is_none()
            && self.max_layovers.is_none()
    }
}

/// Everything known so far about a trip request. Every field is optional;
/// the model is always partially populated and no field implies another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedInfo {
    pub service_type: Option<ServiceType>,
    pub trip_type: Option<TripType>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub dates: Option<TripDates>,
    pub travelers: Option<Travelers>,
    pub budget: Option<BudgetTier>,
    pub preferences: Option<TripPreferences>,
    pub constraints: Vec<String>,
}

impl CollectedInfo {
    /// True when nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.service_type.is_none()
            && self.trip_type.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.dates.is_none()
            && self.travelers.is_none()
            && self.budget.is_none()
            && self.preferences.as_ref().map_or(true, TripPreferences::is_empty)
            && self.constraints.is_empty()
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|dates| dates.departure)
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|dates| dates.return_date)
    }

    pub fn has_adults(&self) -> bool {
        self.travelers.is_some_and(|travelers| travelers.adults > 0)
    }

    /// Fold a newly extracted partial into this record. A field present in
    /// `newer` wins; an absent field leaves the existing value untouched.
    /// Constraints accumulate. Derived state (stage, action, missing info)
    /// is recomputed by the flow engine afterwards, never patched here.
    pub fn merge(&mut self, newer: CollectedInfo) {
        if newer.service_type.is_some() {
            self.service_type = newer.service_type;
        }
        if newer.trip_type.is_some() {
            self.trip_type = newer.trip_type;
        }
        if newer.origin.is_some() {
            self.origin = newer.origin;
        }
        if newer.destination.is_some() {
            self.destination = newer.destination;
        }
        if let Some(dates) = newer.dates {
            let merged = self.dates.get_or_insert_with(TripDates::default);
            if dates.departure.is_some() {
                merged.departure = dates.departure;
            }
            if dates.return_date.is_some() {
                merged.return_date = dates.return_date;
            }
            merged.flexible = merged.flexible || dates.flexible;
        }
        if newer.travelers.is_some() {
            self.travelers = newer.travelers;
        }
        if newer.budget.is_some() {
            self.budget = newer.budget;
        }
        if let Some(preferences) = newer.preferences {
            let merged = self.preferences.get_or_insert_with(TripPreferences::default);
            if !preferences.preferred_airlines.is_empty() {
                merged.preferred_airlines = preferences.preferred_airlines;
            }
            if preferences.prefers_direct.is_some() {
                merged.prefers_direct = preferences.prefers_direct;
            }
            if preferences.cabin.is_some() {
                merged.cabin = preferences.cabin;
            }
            if preferences.seating.is_some() {
                merged.seating = preferences.seating;
            }
            if preferences.meal.is_some() {
                merged.meal = preferences.meal;
            }
            if preferences.max_layovers.is_some() {
                merged.max_layovers = preferences.max_layovers;
            }
        }
        for constraint in newer.constraints {
            if !self.constraints.contains(&constraint) {
                self.constraints.push(constraint);
            }
        }
    }
}
