//! Schedule assignments: a cycle pattern and start date bound to one employee.

use crate::{
    cycle_spec::{parse_cycle_spec, CyclePattern},
    cycle_status::{duty_status, DutyStatus},
    dates::parse_date,
    error::RosterResult,
    types::{EmployeeId, ScheduleVersion, Timestamp},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAssignment {
    pub employee_id: EmployeeId,
    pub version:     ScheduleVersion,
    /// Token as the administrator entered it, before unit normalization.
    pub cycle_token: String,
    pub pattern:     CyclePattern,
    pub start_date:  NaiveDate,
    pub assigned_at: Timestamp,
}

impl ScheduleAssignment {
    pub fn status_on(&self, date: NaiveDate) -> DutyStatus {
        duty_status(&self.pattern, self.start_date, date)
    }

    pub fn is_on_duty(&self, date: NaiveDate) -> bool {
        self.status_on(date).is_on_duty()
    }
}

/// Body of a create/alter schedule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub employee_id: EmployeeId,
    pub start_date:  String,
    pub cycle:       String,
    #[serde(default)]
    pub uses_weekly_override: bool,
    #[serde(default)]
    pub weekly_rest_days: Vec<String>,
}

impl ScheduleRequest {
    /// Validate and normalize into a pattern and start date. Nothing is
    /// written; a failure here leaves the store untouched.
    pub fn resolve(&self) -> RosterResult<(CyclePattern, NaiveDate)> {
        let pattern = parse_cycle_spec(
            &self.cycle,
            self.uses_weekly_override,
            &self.weekly_rest_days,
        )?;
        let start_date = parse_date(&self.start_date)?;
        Ok((pattern, start_date))
    }
}
