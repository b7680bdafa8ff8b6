use crate::{
    employee::Employee,
    error::{RosterError, RosterResult},
    schedule::ScheduleRequest,
    shift::ShiftRequest,
    types::EmployeeId,
    validation::require_fields,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every operation reachable from outside the engine.
/// Variants are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum RosterCommand {
    // ── Directory ─────────────────────────────────
    RegisterEmployee(Employee),

    // ── Schedule ──────────────────────────────────
    CreateSchedule(ScheduleRequest),
    AlterSchedule(ScheduleRequest),
    ConfirmSchedule { employee_id: EmployeeId },

    // ── Roster queries ────────────────────────────
    ActiveOn { admin_id: EmployeeId, date: String },
    PendingConfirmations { admin_id: EmployeeId },

    // ── Shift window ──────────────────────────────
    CreateShift(ShiftRequest),
    AlterShift(ShiftRequest),

    // ── Employee views ────────────────────────────
    EmployeeOverview { employee_id: EmployeeId },
    DutyCalendar { employee_id: EmployeeId, from: String, to: String },
}

const SCHEDULE_FIELDS: &[&str] = &["employee_id", "start_date", "cycle"];
const SHIFT_FIELDS: &[&str] = &["employee_id", "start", "end", "duration_hours"];

/// Required fields per command name. None for unknown commands.
pub fn required_fields(cmd: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match cmd {
        "register_employee"     => &["employee_id", "name"],
        "create_schedule"       => SCHEDULE_FIELDS,
        "alter_schedule"        => SCHEDULE_FIELDS,
        "confirm_schedule"      => &["employee_id"],
        "active_on"             => &["admin_id", "date"],
        "pending_confirmations" => &["admin_id"],
        "create_shift"          => SHIFT_FIELDS,
        "alter_shift"           => SHIFT_FIELDS,
        "employee_overview"     => &["employee_id"],
        "duty_calendar"         => &["employee_id", "from", "to"],
        _ => return None,
    };
    Some(fields)
}

impl RosterCommand {
    /// Check required fields, then deserialize. Unknown commands fall
    /// through to serde and surface as a serialization error.
    pub fn from_json(body: Value) -> RosterResult<Self> {
        let Some(cmd) = body.get("cmd").and_then(Value::as_str) else {
            return Err(RosterError::MissingFields {
                fields: vec!["cmd".into()],
            });
        };
        if let Some(required) = required_fields(cmd) {
            require_fields(&body, required)?;
        }
        Ok(serde_json::from_value(body)?)
    }
}
