//! Confirmation ledger: tracks whether an employee has acknowledged their
//! current schedule.
//!
//! STATE MACHINE (per employee, per schedule version):
//!   create  -> Pending            (retires the previous current entry)
//!   confirm -> Pending → Confirmed (Confirmed is terminal)
//!
//! "Current" is the entry the employee record points at. The pointer moves in
//! the same transaction that inserts the new entry, so there is never a
//! window where two entries compete for current. Retired entries stay stored.

use crate::{
    employee::PopulationFilter,
    error::{RosterError, RosterResult},
    store::RosterStore,
    types::{ConfirmationId, EmployeeId, ScheduleVersion, Timestamp},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
}

impl ConfirmationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending   => "pending",
            Self::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending"   => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub confirmation_id:  ConfirmationId,
    pub employee_id:      EmployeeId,
    pub schedule_version: ScheduleVersion,
    pub status:           ConfirmationStatus,
    pub confirmed_at:     Option<Timestamp>,
    pub created_at:       Timestamp,
}

impl Confirmation {
    pub fn pending(employee_id: &str, schedule_version: ScheduleVersion, now: Timestamp) -> Self {
        Self {
            confirmation_id: format!("cnf-{}", Uuid::new_v4().simple()),
            employee_id: employee_id.to_string(),
            schedule_version,
            status: ConfirmationStatus::Pending,
            confirmed_at: None,
            created_at: now,
        }
    }

    /// Pending -> Confirmed. Leaves `self` untouched on failure.
    pub fn confirm(&mut self, now: Timestamp) -> RosterResult<()> {
        if self.status == ConfirmationStatus::Confirmed {
            return Err(RosterError::AlreadyConfirmed {
                employee_id: self.employee_id.clone(),
            });
        }
        self.status = ConfirmationStatus::Confirmed;
        self.confirmed_at = Some(now);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == ConfirmationStatus::Pending
    }
}

pub struct ConfirmationLedger<'a> {
    store: &'a RosterStore,
}

impl<'a> ConfirmationLedger<'a> {
    pub fn new(store: &'a RosterStore) -> Self {
        Self { store }
    }

    /// Open a fresh Pending entry for `schedule_version` and make it current.
    ///
    /// Call only after the assignment write for that version has committed.
    pub fn create(
        &self,
        employee_id: &str,
        schedule_version: ScheduleVersion,
        now: Timestamp,
    ) -> RosterResult<Confirmation> {
        let confirmation = Confirmation::pending(employee_id, schedule_version, now);
        self.store.open_confirmation(&confirmation)?;
        Ok(confirmation)
    }

    /// Confirm the employee's current entry.
    ///
    /// An entry opened for an older schedule version than the one assigned
    /// does not count: that is `NotFound`, not `AlreadyConfirmed`.
    pub fn confirm(&self, employee_id: &str, now: Timestamp) -> RosterResult<Confirmation> {
        let not_found = || RosterError::NotFound {
            what: "confirmation",
            employee_id: employee_id.to_string(),
        };
        let mut current = self.current(employee_id)?.ok_or_else(not_found)?;
        if let Some(version) = self.store.current_schedule_version(employee_id)? {
            if current.schedule_version != version {
                return Err(not_found());
            }
        }
        current.confirm(now)?;

        // Conditional update: loses cleanly to a concurrent confirm.
        if !self.store.mark_confirmed(&current.confirmation_id, now)? {
            return Err(RosterError::AlreadyConfirmed {
                employee_id: employee_id.to_string(),
            });
        }
        Ok(current)
    }

    pub fn current(&self, employee_id: &str) -> RosterResult<Option<Confirmation>> {
        self.store.current_confirmation(employee_id)
    }

    /// Employees in `filter` who hold a schedule and whose current
    /// confirmation is Pending, missing, or for an older schedule version.
    /// Sorted by employee id.
    pub fn pending_employees(&self, filter: &PopulationFilter) -> RosterResult<Vec<EmployeeId>> {
        let states = self.store.scheduled_confirmation_states(filter)?;
        Ok(states
            .into_iter()
            .filter(|(_, status)| !matches!(status, Some(ConfirmationStatus::Confirmed)))
            .map(|(employee_id, _)| employee_id)
            .collect())
    }
}
