//! Roster aggregation: who is working on a given date.
//!
//! An employee without an assignment is neither on duty nor resting: they
//! are reported separately as unassigned, never folded into off-duty.

use crate::{
    cycle_status::DutyStatus,
    dates::parse_date,
    error::RosterResult,
    schedule::ScheduleAssignment,
    types::EmployeeId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee id with whatever assignment they currently hold.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub employee_id: EmployeeId,
    pub assignment:  Option<ScheduleAssignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDay {
    pub date:       NaiveDate,
    pub on_duty:    Vec<EmployeeId>,
    pub off_duty:   Vec<EmployeeId>,
    pub unassigned: Vec<EmployeeId>,
}

/// Ids of the assigned employees on duty on `date`, in input order.
pub fn active_on<'a, I>(date: NaiveDate, entries: I) -> Vec<EmployeeId>
where
    I: IntoIterator<Item = &'a RosterEntry>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            let assignment = entry.assignment.as_ref()?;
            assignment
                .is_on_duty(date)
                .then(|| entry.employee_id.clone())
        })
        .collect()
}

/// `active_on` for a boundary date literal (`YYYY-MM-DD` or `DD/MM/YYYY`).
pub fn active_on_str<'a, I>(date: &str, entries: I) -> RosterResult<Vec<EmployeeId>>
where
    I: IntoIterator<Item = &'a RosterEntry>,
{
    Ok(active_on(parse_date(date)?, entries))
}

/// Full split of `entries` into on duty / off duty / unassigned.
pub fn roster_day<'a, I>(date: NaiveDate, entries: I) -> RosterDay
where
    I: IntoIterator<Item = &'a RosterEntry>,
{
    let mut day = RosterDay {
        date,
        ..RosterDay::default()
    };
    for entry in entries {
        let id = entry.employee_id.clone();
        match entry.assignment.as_ref().map(|a| a.status_on(date)) {
            None => day.unassigned.push(id),
            Some(DutyStatus::Working) => day.on_duty.push(id),
            Some(_) => day.off_duty.push(id),
        }
    }
    day
}
