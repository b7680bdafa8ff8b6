//! Daily shift window, independent of the rotation cycle.

use crate::{
    dates::parse_time_of_day,
    error::{RosterError, RosterResult},
    types::EmployeeId,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftWindow {
    pub start:          NaiveTime,
    /// May be at or before `start` for a window that crosses midnight.
    pub end:            NaiveTime,
    pub duration_hours: f64,
    pub break_minutes:  u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRequest {
    pub employee_id:    EmployeeId,
    pub start:          String,
    pub end:            String,
    pub duration_hours: f64,
    #[serde(default)]
    pub break_minutes:  u32,
}

impl ShiftRequest {
    pub fn resolve(&self) -> RosterResult<ShiftWindow> {
        let start = parse_time_of_day(&self.start)?;
        let end = parse_time_of_day(&self.end)?;

        if !(self.duration_hours > 0.0 && self.duration_hours <= 24.0) {
            return Err(RosterError::InvalidShift {
                reason: format!("duration {}h outside (0, 24]", self.duration_hours),
            });
        }
        if f64::from(self.break_minutes) >= self.duration_hours * 60.0 {
            return Err(RosterError::InvalidShift {
                reason: format!(
                    "break of {} min does not fit in a {}h shift",
                    self.break_minutes, self.duration_hours
                ),
            });
        }

        Ok(ShiftWindow {
            start,
            end,
            duration_hours: self.duration_hours,
            break_minutes: self.break_minutes,
        })
    }
}
