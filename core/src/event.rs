//! Roster events: what the service reports happened, for delivery elsewhere.
//!
//! RULE: The engine never delivers notifications itself. Service operations
//! return events; a dispatcher outside the engine turns them into
//! notifications and delivers them.

use crate::types::{EmployeeId, ScheduleVersion};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEvent {
    // ── Schedule ───────────────────────────────────
    ScheduleAssigned {
        employee_id: EmployeeId,
        version: ScheduleVersion,
        cycle: String,
        start_date: NaiveDate,
    },
    ScheduleAltered {
        employee_id: EmployeeId,
        version: ScheduleVersion,
        cycle: String,
        start_date: NaiveDate,
    },

    // ── Confirmation ───────────────────────────────
    ConfirmationRequested {
        employee_id: EmployeeId,
        version: ScheduleVersion,
    },
    ScheduleConfirmed {
        employee_id: EmployeeId,
        version: ScheduleVersion,
    },
    ConfirmationReminder {
        employee_id: EmployeeId,
    },

    // ── Shift window ───────────────────────────────
    ShiftAssigned {
        employee_id: EmployeeId,
    },
    ShiftAltered {
        employee_id: EmployeeId,
    },
}

impl RosterEvent {
    /// Stable category name; also the notification category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::ScheduleAssigned { .. }      => "schedule_assigned",
            Self::ScheduleAltered { .. }       => "schedule_altered",
            Self::ConfirmationRequested { .. } => "confirmation_requested",
            Self::ScheduleConfirmed { .. }     => "schedule_confirmed",
            Self::ConfirmationReminder { .. }  => "confirmation_reminder",
            Self::ShiftAssigned { .. }         => "shift_assigned",
            Self::ShiftAltered { .. }          => "shift_altered",
        }
    }

    pub fn employee_id(&self) -> &str {
        match self {
            Self::ScheduleAssigned { employee_id, .. }
            | Self::ScheduleAltered { employee_id, .. }
            | Self::ConfirmationRequested { employee_id, .. }
            | Self::ScheduleConfirmed { employee_id, .. }
            | Self::ConfirmationReminder { employee_id }
            | Self::ShiftAssigned { employee_id }
            | Self::ShiftAltered { employee_id } => employee_id,
        }
    }
}
