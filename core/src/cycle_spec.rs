//! Cycle specification parsing.
//!
//! Turns a human-entered rotation token ("6x1", "12x36", …) plus an optional
//! list of fixed weekly rest days into a normalized, days-based
//! `CyclePattern`. Pure: same inputs, same pattern, no clock, no store.
//!
//! HOUR CONVERSION RULE (the single rule this engine applies):
//!   A token where either side exceeds 7 is read as hours on / hours off.
//!   - If the whole cycle fits in 72 hours (3 days), it collapses to 1x1.
//!   - Otherwise it becomes 1 work day and round(m / n) rest days, rounding
//!     half away from zero, never below 1.
//!   So "12x36" -> 1x1, "24x48" -> 1x1, "24x72" -> 1x3, "12x72" -> 1x6.

use crate::error::{RosterError, RosterResult};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Either side above this is a count of hours, not days.
pub const HOUR_UNIT_THRESHOLD: u32 = 7;

/// Hour-based cycles no longer than this collapse to one day on, one off.
pub const COLLAPSE_WITHIN_HOURS: u32 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CyclePattern {
    pub work_days: u32,
    pub rest_days: u32,
    /// Sorted Monday-first, no duplicates. Empty unless `uses_weekly_override`.
    pub weekly_rest_days: Vec<Weekday>,
    pub uses_weekly_override: bool,
}

impl CyclePattern {
    /// Saturates; a deserialized pattern is not bounded by the parser.
    pub fn cycle_length(&self) -> u32 {
        self.work_days.saturating_add(self.rest_days)
    }

    pub fn rests_on(&self, day: Weekday) -> bool {
        self.uses_weekly_override && self.weekly_rest_days.contains(&day)
    }

    /// Normalized token, e.g. "1x3" for a "24x72" input.
    pub fn token(&self) -> String {
        format!("{}x{}", self.work_days, self.rest_days)
    }
}

/// Parse `token` and the optional weekly rest days into a `CyclePattern`.
///
/// `weekly_rest_days` is only read when `uses_weekly_override` is set.
pub fn parse_cycle_spec<S: AsRef<str>>(
    token: &str,
    uses_weekly_override: bool,
    weekly_rest_days: &[S],
) -> RosterResult<CyclePattern> {
    let (n, m) = split_token(token).ok_or_else(|| RosterError::InvalidFormat {
        token: token.to_string(),
    })?;
    let (work_days, rest_days) = normalize_units(n, m);

    let weekly_rest_days = if uses_weekly_override {
        resolve_weekly_rest_days(weekly_rest_days, rest_days)?
    } else {
        Vec::new()
    };

    Ok(CyclePattern {
        work_days,
        rest_days,
        weekly_rest_days,
        uses_weekly_override,
    })
}

/// `^\d{1,2}x\d{1,2}$`, both sides non-zero.
fn split_token(token: &str) -> Option<(u32, u32)> {
    let (left, right) = token.split_once('x')?;
    let side = |s: &str| -> Option<u32> {
        if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok().filter(|v| *v > 0)
    };
    Some((side(left)?, side(right)?))
}

fn normalize_units(n: u32, m: u32) -> (u32, u32) {
    if n <= HOUR_UNIT_THRESHOLD && m <= HOUR_UNIT_THRESHOLD {
        return (n, m);
    }
    if n + m <= COLLAPSE_WITHIN_HOURS {
        return (1, 1);
    }
    let rest = (f64::from(m) / f64::from(n)).round() as u32;
    (1, rest.max(1))
}

fn resolve_weekly_rest_days<S: AsRef<str>>(
    given: &[S],
    rest_days: u32,
) -> RosterResult<Vec<Weekday>> {
    let given: Vec<String> = given.iter().map(|s| s.as_ref().to_string()).collect();
    if given.is_empty() {
        return Err(RosterError::InvalidWeeklyOverride {
            reason: "no weekly rest days given".into(),
            values: given,
        });
    }

    let unknown: Vec<String> = given
        .iter()
        .filter(|tag| parse_weekday(tag).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(RosterError::InvalidWeeklyOverride {
            reason: "unknown weekday tags".into(),
            values: unknown,
        });
    }

    let mut days: Vec<Weekday> = given.iter().filter_map(|tag| parse_weekday(tag)).collect();
    days.sort_by_key(|d| d.num_days_from_monday());
    days.dedup();

    if days.len() != rest_days as usize {
        return Err(RosterError::InvalidWeeklyOverride {
            reason: format!(
                "{} distinct rest days given, cycle has {rest_days}",
                days.len()
            ),
            values: given,
        });
    }
    Ok(days)
}

/// Full English name or three-letter abbreviation, any case.
pub fn parse_weekday(tag: &str) -> Option<Weekday> {
    let day = match tag.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday"    => Weekday::Mon,
        "tue" | "tuesday"   => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thursday"  => Weekday::Thu,
        "fri" | "friday"    => Weekday::Fri,
        "sat" | "saturday"  => Weekday::Sat,
        "sun" | "sunday"    => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_tags_normalize_regardless_of_form() {
        for tag in ["sat", "SAT", "Sat", "saturday", "SATURDAY", " Saturday "] {
            assert_eq!(parse_weekday(tag), Some(Weekday::Sat), "tag {tag:?}");
        }
        assert_eq!(parse_weekday("sa"), None);
        assert_eq!(parse_weekday("sábado"), None);
    }

    #[test]
    fn hour_rule_boundaries() {
        assert_eq!(normalize_units(7, 7), (7, 7));
        assert_eq!(normalize_units(8, 1), (1, 1));
        assert_eq!(normalize_units(36, 36), (1, 1));
        assert_eq!(normalize_units(36, 37), (1, 1));
        assert_eq!(normalize_units(99, 1), (1, 1));
        assert_eq!(normalize_units(24, 60), (1, 3));
    }
}
