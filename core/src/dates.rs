//! Boundary date and time-of-day literals.
//!
//! Dates arrive as ISO `YYYY-MM-DD` or as `DD/MM/YYYY`. The slash form is
//! reordered component by component into ISO before parsing; no locale
//! guessing happens anywhere.

use crate::error::{RosterError, RosterResult};
use chrono::{NaiveDate, NaiveTime};

pub fn parse_date(input: &str) -> RosterResult<NaiveDate> {
    let trimmed = input.trim();
    let iso = if trimmed.contains('/') {
        reorder_day_first(trimmed).ok_or_else(|| invalid_date(input))?
    } else {
        trimmed.to_string()
    };
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d").map_err(|_| invalid_date(input))
}

/// `DD/MM/YYYY` -> `YYYY-MM-DD`. Returns None unless there are exactly three
/// all-digit components.
fn reorder_day_first(input: &str) -> Option<String> {
    let parts: Vec<&str> = input.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(day) && all_digits(month) && all_digits(year)) || year.len() != 4 {
        return None;
    }
    Some(format!("{year}-{month}-{day}"))
}

fn invalid_date(input: &str) -> RosterError {
    RosterError::InvalidDate { input: input.to_string() }
}

/// `HH:MM` or `HH:MM:SS`, 24-hour.
pub fn parse_time_of_day(input: &str) -> RosterResult<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| RosterError::InvalidShift {
            reason: format!("'{input}' is not a time of day (HH:MM)"),
        })
}
