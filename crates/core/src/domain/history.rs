//! Read-only collaborator records: search results and user history.
//!
//! These are scoring inputs handed in by the search and history
//! collaborators. The engine never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trip::{CabinClass, TripPreferences};

/// One priced option returned by the external search collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareOption {
    pub id: String,
    pub airline: Option<String>,
    pub price: f64,
    pub stops: u32,
    pub total_duration_minutes: Option<u32>,
    pub cabin: Option<CabinClass>,
    pub discount_percentage: Option<f64>,
    pub is_flash_sale: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl FareOption {
    pub fn new(id: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            airline: None,
            price,
            stops: 0,
            total_duration_minutes: None,
            cabin: None,
            discount_percentage: None,
            is_flash_sale: false,
            expires_at: None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.stops == 0
    }
}

/// A search the user ran on an earlier visit, with the best price seen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviousSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub lowest_price: Option<f64>,
    pub searched_at: Option<DateTime<Utc>>,
}

/// A completed booking from the user's history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub destination: String,
    pub airline: Option<String>,
    pub price: Option<f64>,
    pub departure_date: Option<chrono::NaiveDate>,
    pub return_date: Option<chrono::NaiveDate>,
}

/// Historical profile supplied by the session store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub previous_searches: Vec<PreviousSearch>,
    pub booking_history: Vec<BookingRecord>,
    pub preferences: Option<TripPreferences>,
    pub loyalty_programs: Vec<String>,
}

impl UserProfile {
    /// Mean price across booked trips, `None` without price data.
    pub fn average_booking_price(&self) -> Option<f64> {
        let prices: Vec<f64> =
            self.booking_history.iter().filter_map(|booking| booking.price).collect();
        if prices.is_empty() {
            return None;
        }
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::{BookingRecord, UserProfile};

    fn booking(destination: &str, price: Option<f64>) -> BookingRecord {
        BookingRecord {
            destination: destination.to_owned(),
            airline: None,
            price,
            departure_date: None,
            return_date: None,
        }
    }

    #[test]
    fn average_booking_price_ignores_unpriced_bookings() {
        let profile = UserProfile {
            booking_history: vec![
                booking("Paris", Some(800.0)),
                booking("Rome", None),
                booking("Tokyo", Some(1200.0)),
            ],
            ..UserProfile::default()
        };

        assert_eq!(profile.average_booking_price(), Some(1000.0));
    }

    #[test]
    fn average_booking_price_is_none_without_data() {
        assert_eq!(UserProfile::default().average_booking_price(), None);
    }
}
