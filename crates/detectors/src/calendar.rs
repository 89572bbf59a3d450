//! Shared calendar predicates for the built-in detectors.

use chrono::{Datelike, NaiveDate, Weekday};

/// High-demand travel periods: summer vacation (June through August), the
/// winter holidays (Dec 20 through Jan 5), and spring break (Mar 10-25).
pub(crate) fn is_peak_period(date: NaiveDate) -> bool {
    let month = date.month();
    let day = date.day();

    if (6..=8).contains(&month) {
        return true;
    }
    if month == 12 && day >= 20 {
        return true;
    }
    if month == 1 && day <= 5 {
        return true;
    }
    month == 3 && (10..=25).contains(&day)
}

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// True when the inclusive date range contains a Saturday night.
pub(crate) fn includes_saturday(start: NaiveDate, end: NaiveDate) -> bool {
    let mut date = start;
    while date <= end {
        if date.weekday() == Weekday::Sat {
            return true;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => return false,
        };
    }
    false
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
