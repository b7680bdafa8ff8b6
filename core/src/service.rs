//! Schedule service: the layer that ties the engine to persistence.
//!
//! ORDERING (fixed):
//!   1. Validate and normalize the request      (pure, nothing written)
//!   2. Write the assignment and commit          (conflict-checked by the store)
//!   3. Open the new confirmation                (only after step 2 committed)
//!   4. Return events for the caller to dispatch (never delivered here)
//!
//! A failure at step 3 is returned to the caller; the committed assignment
//! from step 2 stays in place and the employee counts as pending until a
//! confirmation for that version exists.

use crate::{
    clock::{Clock, SystemClock},
    command::RosterCommand,
    confirmation::{Confirmation, ConfirmationLedger},
    cycle_status::{duty_calendar, DutyDay},
    dates::parse_date,
    employee::{Employee, PopulationFilter},
    error::{RosterError, RosterResult},
    event::RosterEvent,
    notifier::NotificationRecord,
    roster::{self, RosterDay, RosterEntry},
    schedule::{ScheduleAssignment, ScheduleRequest},
    shift::{ShiftRequest, ShiftWindow},
    store::RosterStore,
    types::{EmployeeId, ScheduleVersion},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Longest range a duty calendar may cover, in days.
pub const MAX_CALENDAR_DAYS: i64 = 366;

/// The result of an operation plus the events it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value:  T,
    pub events: Vec<RosterEvent>,
}

impl<T> Applied<T> {
    fn new(value: T, events: Vec<RosterEvent>) -> Self {
        Self { value, events }
    }
}

/// Everything an employee sees about their own schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeOverview {
    pub employee:      Employee,
    pub assignment:    Option<ScheduleAssignment>,
    pub shift:         Option<ShiftWindow>,
    pub confirmation:  Option<Confirmation>,
    pub notifications: Vec<NotificationRecord>,
}

pub struct ScheduleService<C: Clock = SystemClock> {
    store: RosterStore,
    clock: C,
}

impl<C: Clock> ScheduleService<C> {
    pub fn new(store: RosterStore, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ledger(&self) -> ConfirmationLedger<'_> {
        ConfirmationLedger::new(&self.store)
    }

    // ── Directory ──────────────────────────────────────────────────

    pub fn register_employee(&self, employee: &Employee) -> RosterResult<()> {
        self.store.upsert_employee(employee)?;
        log::debug!("employee {} registered", employee.employee_id);
        Ok(())
    }

    fn require_employee(&self, employee_id: &str) -> RosterResult<Employee> {
        self.store
            .get_employee(employee_id)?
            .ok_or_else(|| RosterError::NotFound {
                what: "employee",
                employee_id: employee_id.to_string(),
            })
    }

    // ── Schedule ───────────────────────────────────────────────────

    /// First schedule for an employee. Fails with `ConflictingAssignment` if
    /// one already exists.
    pub fn create_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> RosterResult<Applied<ScheduleAssignment>> {
        let (pattern, start_date) = request.resolve()?;
        self.require_employee(&request.employee_id)?;

        let assignment = ScheduleAssignment {
            employee_id: request.employee_id.clone(),
            version: 1,
            cycle_token: request.cycle.clone(),
            pattern,
            start_date,
            assigned_at: self.clock.now(),
        };
        self.store.insert_assignment(&assignment)?;
        log::info!(
            "schedule {} ({}) assigned to {} from {start_date}",
            assignment.cycle_token,
            assignment.pattern.token(),
            assignment.employee_id
        );

        self.open_confirmation(&assignment.employee_id, assignment.version)?;

        let events = vec![
            RosterEvent::ScheduleAssigned {
                employee_id: assignment.employee_id.clone(),
                version: assignment.version,
                cycle: assignment.cycle_token.clone(),
                start_date,
            },
            RosterEvent::ConfirmationRequested {
                employee_id: assignment.employee_id.clone(),
                version: assignment.version,
            },
        ];
        Ok(Applied::new(assignment, events))
    }

    /// Replace an employee's schedule wholesale and ask for a fresh
    /// confirmation. Fails with `NotFound` if there is nothing to replace.
    pub fn alter_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> RosterResult<Applied<ScheduleAssignment>> {
        let (pattern, start_date) = request.resolve()?;
        self.require_employee(&request.employee_id)?;

        let assignment = self.store.replace_assignment(
            &request.employee_id,
            &request.cycle,
            &pattern,
            start_date,
            self.clock.now(),
        )?;
        log::info!(
            "schedule for {} altered to {} ({}) from {start_date}, version {}",
            assignment.employee_id,
            assignment.cycle_token,
            assignment.pattern.token(),
            assignment.version
        );

        self.open_confirmation(&assignment.employee_id, assignment.version)?;

        let events = vec![
            RosterEvent::ScheduleAltered {
                employee_id: assignment.employee_id.clone(),
                version: assignment.version,
                cycle: assignment.cycle_token.clone(),
                start_date,
            },
            RosterEvent::ConfirmationRequested {
                employee_id: assignment.employee_id.clone(),
                version: assignment.version,
            },
        ];
        Ok(Applied::new(assignment, events))
    }

    fn open_confirmation(
        &self,
        employee_id: &str,
        version: ScheduleVersion,
    ) -> RosterResult<Confirmation> {
        let confirmation = self
            .ledger()
            .create(employee_id, version, self.clock.now())
            .map_err(|e| {
                log::warn!(
                    "schedule v{version} for {employee_id} is committed but its confirmation was not opened: {e}"
                );
                e
            })?;
        log::debug!(
            "confirmation {} opened for {employee_id} v{version}",
            confirmation.confirmation_id
        );
        Ok(confirmation)
    }

    // ── Confirmation ───────────────────────────────────────────────

    pub fn confirm_schedule(&self, employee_id: &str) -> RosterResult<Applied<Confirmation>> {
        let confirmation = self.ledger().confirm(employee_id, self.clock.now())?;
        log::info!(
            "{employee_id} confirmed schedule version {}",
            confirmation.schedule_version
        );
        let events = vec![RosterEvent::ScheduleConfirmed {
            employee_id: employee_id.to_string(),
            version: confirmation.schedule_version,
        }];
        Ok(Applied::new(confirmation, events))
    }

    /// Employees in the admin's sector still owing a confirmation, with one
    /// reminder event each.
    pub fn pending_confirmations(&self, admin_id: &str) -> RosterResult<Applied<Vec<EmployeeId>>> {
        let admin = self.require_employee(admin_id)?;
        let pending = self
            .ledger()
            .pending_employees(&PopulationFilter::for_admin(&admin))?;
        log::debug!("{} pending confirmations in scope of {admin_id}", pending.len());

        let events = pending
            .iter()
            .map(|employee_id| RosterEvent::ConfirmationReminder {
                employee_id: employee_id.clone(),
            })
            .collect();
        Ok(Applied::new(pending, events))
    }

    // ── Roster ─────────────────────────────────────────────────────

    /// On-duty employee ids in the admin's sector, sorted.
    pub fn active_on(&self, admin_id: &str, date: &str) -> RosterResult<Vec<EmployeeId>> {
        let date = parse_date(date)?;
        let admin = self.require_employee(admin_id)?;
        let entries = self.roster_entries(&PopulationFilter::for_admin(&admin))?;
        Ok(roster::active_on(date, &entries))
    }

    pub fn roster_day(&self, filter: &PopulationFilter, date: NaiveDate) -> RosterResult<RosterDay> {
        let entries = self.roster_entries(filter)?;
        Ok(roster::roster_day(date, &entries))
    }

    fn roster_entries(&self, filter: &PopulationFilter) -> RosterResult<Vec<RosterEntry>> {
        let mut assignments: HashMap<EmployeeId, ScheduleAssignment> = self
            .store
            .assignments_in(filter)?
            .into_iter()
            .map(|a| (a.employee_id.clone(), a))
            .collect();
        Ok(self
            .store
            .employees_in(filter)?
            .into_iter()
            .map(|e| RosterEntry {
                assignment: assignments.remove(&e.employee_id),
                employee_id: e.employee_id,
            })
            .collect())
    }

    /// Per-day status over `from..=to` for the employee's current schedule.
    pub fn duty_calendar(&self, employee_id: &str, from: &str, to: &str) -> RosterResult<Vec<DutyDay>> {
        let from_date = parse_date(from)?;
        let to_date = parse_date(to)?;
        let span = (to_date - from_date).num_days();
        if !(0..MAX_CALENDAR_DAYS).contains(&span) {
            return Err(RosterError::InvalidDate { input: to.to_string() });
        }

        let assignment = self
            .store
            .get_assignment(employee_id)?
            .ok_or_else(|| RosterError::NotFound {
                what: "schedule",
                employee_id: employee_id.to_string(),
            })?;
        Ok(duty_calendar(
            &assignment.pattern,
            assignment.start_date,
            from_date,
            to_date,
        ))
    }

    // ── Shift window ───────────────────────────────────────────────

    pub fn create_shift(&self, request: &ShiftRequest) -> RosterResult<Applied<ShiftWindow>> {
        let window = request.resolve()?;
        self.require_employee(&request.employee_id)?;
        self.store
            .insert_shift(&request.employee_id, &window, self.clock.now())?;
        log::info!(
            "shift {}-{} assigned to {}",
            window.start,
            window.end,
            request.employee_id
        );
        let events = vec![RosterEvent::ShiftAssigned {
            employee_id: request.employee_id.clone(),
        }];
        Ok(Applied::new(window, events))
    }

    pub fn alter_shift(&self, request: &ShiftRequest) -> RosterResult<Applied<ShiftWindow>> {
        let window = request.resolve()?;
        self.store
            .update_shift(&request.employee_id, &window, self.clock.now())?;
        log::info!(
            "shift for {} altered to {}-{}",
            request.employee_id,
            window.start,
            window.end
        );
        let events = vec![RosterEvent::ShiftAltered {
            employee_id: request.employee_id.clone(),
        }];
        Ok(Applied::new(window, events))
    }

    // ── Views ──────────────────────────────────────────────────────

    pub fn employee_overview(&self, employee_id: &str) -> RosterResult<EmployeeOverview> {
        let employee = self.require_employee(employee_id)?;
        Ok(EmployeeOverview {
            assignment:    self.store.get_assignment(employee_id)?,
            shift:         self.store.get_shift(employee_id)?,
            confirmation:  self.store.current_confirmation(employee_id)?,
            notifications: self.store.notifications_for(employee_id)?,
            employee,
        })
    }

    // ── Command entry point ────────────────────────────────────────

    /// Run a decoded command, encoding its result as JSON.
    pub fn execute(&self, command: RosterCommand) -> RosterResult<Applied<serde_json::Value>> {
        use serde_json::{json, to_value};

        let applied = match command {
            RosterCommand::RegisterEmployee(employee) => {
                self.register_employee(&employee)?;
                Applied::new(to_value(&employee)?, vec![])
            }
            RosterCommand::CreateSchedule(request) => {
                let a = self.create_schedule(&request)?;
                Applied::new(to_value(&a.value)?, a.events)
            }
            RosterCommand::AlterSchedule(request) => {
                let a = self.alter_schedule(&request)?;
                Applied::new(to_value(&a.value)?, a.events)
            }
            RosterCommand::ConfirmSchedule { employee_id } => {
                let a = self.confirm_schedule(&employee_id)?;
                Applied::new(to_value(&a.value)?, a.events)
            }
            RosterCommand::ActiveOn { admin_id, date } => {
                let active = self.active_on(&admin_id, &date)?;
                Applied::new(json!({ "date": date, "active": active }), vec![])
            }
            RosterCommand::PendingConfirmations { admin_id } => {
                let a = self.pending_confirmations(&admin_id)?;
                Applied::new(json!({ "pending": a.value }), a.events)
            }
            RosterCommand::CreateShift(request) => {
                let a = self.create_shift(&request)?;
                Applied::new(to_value(&a.value)?, a.events)
            }
            RosterCommand::AlterShift(request) => {
                let a = self.alter_shift(&request)?;
                Applied::new(to_value(&a.value)?, a.events)
            }
            RosterCommand::EmployeeOverview { employee_id } => {
                Applied::new(to_value(self.employee_overview(&employee_id)?)?, vec![])
            }
            RosterCommand::DutyCalendar { employee_id, from, to } => {
                Applied::new(to_value(self.duty_calendar(&employee_id, &from, &to)?)?, vec![])
            }
        };
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, TimeZone, Utc};

    const BLOCK_CONFIRMATIONS: &str = "
        CREATE TRIGGER block_confirmation BEFORE INSERT ON confirmation
        BEGIN SELECT RAISE(ABORT, 'confirmation table offline'); END;";

    fn service() -> ScheduleService<FixedClock> {
        let store = RosterStore::in_memory().expect("in-memory store");
        store.migrate().expect("migration");
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let service = ScheduleService::new(store, clock);
        for id in ["ADM", "E1", "E2"] {
            service
                .register_employee(&Employee {
                    employee_id: id.into(),
                    name: id.into(),
                    sector: None,
                })
                .expect("register employee");
        }
        service
    }

    fn request(employee_id: &str, start_date: &str, cycle: &str) -> ScheduleRequest {
        ScheduleRequest {
            employee_id: employee_id.into(),
            start_date: start_date.into(),
            cycle: cycle.into(),
            uses_weekly_override: false,
            weekly_rest_days: vec![],
        }
    }

    #[test]
    fn assignment_is_kept_when_confirmation_cannot_open() {
        let service = service();
        service.store.execute_batch(BLOCK_CONFIRMATIONS).unwrap();

        let err = service
            .create_schedule(&request("E1", "2024-01-01", "6x1"))
            .unwrap_err();
        assert!(matches!(err, RosterError::Database(_)), "got {err:?}");

        let stored = service.store.get_assignment("E1").unwrap();
        assert_eq!(stored.map(|a| a.version), Some(1), "assignment committed first");
        assert!(service.store.confirmations_for("E1").unwrap().is_empty());
        assert_eq!(service.pending_confirmations("ADM").unwrap().value, vec!["E1"]);
    }

    #[test]
    fn altered_schedule_stays_pending_when_confirmation_cannot_open() {
        let service = service();
        service.create_schedule(&request("E1", "2024-01-01", "6x1")).unwrap();
        service.confirm_schedule("E1").unwrap();
        service.clock.advance(Duration::days(1));

        service.store.execute_batch(BLOCK_CONFIRMATIONS).unwrap();
        assert!(service
            .alter_schedule(&request("E1", "2024-02-01", "5x2"))
            .is_err());

        let stored = service.store.get_assignment("E1").unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.cycle_token, "5x2");
        assert_eq!(service.pending_confirmations("ADM").unwrap().value, vec!["E1"]);
        assert!(matches!(
            service.confirm_schedule("E1"),
            Err(RosterError::NotFound { what: "confirmation", .. })
        ));

        // Once confirmations can be written again, the next alteration
        // restores the normal flow.
        service
            .store
            .execute_batch("DROP TRIGGER block_confirmation;")
            .unwrap();
        service.alter_schedule(&request("E1", "2024-02-01", "5x2")).unwrap();
        assert_eq!(service.confirm_schedule("E1").unwrap().value.schedule_version, 3);
        assert!(service.pending_confirmations("ADM").unwrap().value.is_empty());
    }
}
