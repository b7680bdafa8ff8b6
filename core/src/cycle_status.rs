//! On-duty / off-duty decision for a single date.
//!
//! The mapping (pattern, start date, query date) -> status is pure. Weekday
//! comes from the query date's calendar only; there is no clock or locale.
//!
//! ORDER OF CHECKS:
//!   1. Query before start (or no start)   -> BeforeStart  (off)
//!   2. Degenerate zero-length cycle       -> Degenerate   (off)
//!   3. Weekday in weekly rest days        -> WeeklyRest   (off)
//!   4. Position in rolling cycle          -> Working | CycleRest

use crate::cycle_spec::CyclePattern;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    Working,
    CycleRest,
    WeeklyRest,
    BeforeStart,
    Degenerate,
}

impl DutyStatus {
    pub fn is_on_duty(self) -> bool {
        matches!(self, Self::Working)
    }
}

pub fn duty_status(
    pattern: &CyclePattern,
    start_date: impl Into<Option<NaiveDate>>,
    query_date: NaiveDate,
) -> DutyStatus {
    let Some(start_date) = start_date.into() else {
        return DutyStatus::BeforeStart;
    };
    if query_date < start_date {
        return DutyStatus::BeforeStart;
    }

    let cycle_length = i64::from(pattern.work_days) + i64::from(pattern.rest_days);
    if cycle_length == 0 {
        return DutyStatus::Degenerate;
    }

    if pattern.rests_on(query_date.weekday()) {
        return DutyStatus::WeeklyRest;
    }

    let days_since_start = (query_date - start_date).num_days();
    let position = days_since_start.rem_euclid(cycle_length);
    if position < i64::from(pattern.work_days) {
        DutyStatus::Working
    } else {
        DutyStatus::CycleRest
    }
}

pub fn is_on_duty(
    pattern: &CyclePattern,
    start_date: impl Into<Option<NaiveDate>>,
    query_date: NaiveDate,
) -> bool {
    duty_status(pattern, start_date, query_date).is_on_duty()
}

/// One row of an employee's duty calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDay {
    pub date:   NaiveDate,
    pub status: DutyStatus,
}

/// Status for every date in `from..=to`. Empty when `to < from`.
pub fn duty_calendar(
    pattern: &CyclePattern,
    start_date: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<DutyDay> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|date| DutyDay {
            date,
            status: duty_status(pattern, start_date, date),
        })
        .collect()
}
