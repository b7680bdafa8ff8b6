use super::{is_unique_violation, weekdays_from_json, weekdays_to_json, RosterStore};
use crate::{
    cycle_spec::CyclePattern,
    employee::PopulationFilter,
    error::{RosterError, RosterResult},
    schedule::ScheduleAssignment,
    types::{ScheduleVersion, Timestamp},
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

const ASSIGNMENT_COLUMNS: &str = "employee_id, version, cycle_token, work_days, rest_days,
     weekly_rest_days, uses_weekly_override, start_date, assigned_at";

fn assignment_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleAssignment> {
    let weekly_raw: String = row.get(5)?;
    Ok(ScheduleAssignment {
        employee_id: row.get(0)?,
        version:     row.get(1)?,
        cycle_token: row.get(2)?,
        pattern: CyclePattern {
            work_days:            row.get(3)?,
            rest_days:            row.get(4)?,
            weekly_rest_days:     weekdays_from_json(5, &weekly_raw)?,
            uses_weekly_override: row.get(6)?,
        },
        start_date:  row.get(7)?,
        assigned_at: row.get(8)?,
    })
}

impl RosterStore {
    // ── Schedule assignment ────────────────────────────────────────

    /// Insert the first assignment for an employee (version 1).
    ///
    /// The existence check and the insert are one statement: the primary key
    /// on `schedule_assignment.employee_id` rejects a second schedule, which
    /// surfaces as `ConflictingAssignment`. Commits before returning.
    pub fn insert_assignment(&self, a: &ScheduleAssignment) -> RosterResult<()> {
        let weekly = weekdays_to_json(&a.pattern.weekly_rest_days)?;
        let tx = self.conn.unchecked_transaction()?;

        let inserted = tx.execute(
            "INSERT INTO schedule_assignment (
                employee_id, version, cycle_token, work_days, rest_days,
                weekly_rest_days, uses_weekly_override, start_date, assigned_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &a.employee_id,
                a.version,
                &a.cycle_token,
                a.pattern.work_days,
                a.pattern.rest_days,
                &weekly,
                a.pattern.uses_weekly_override,
                a.start_date,
                a.assigned_at,
            ],
        );
        if let Err(e) = inserted {
            return Err(if is_unique_violation(&e) {
                RosterError::ConflictingAssignment {
                    what: "schedule",
                    employee_id: a.employee_id.clone(),
                }
            } else {
                e.into()
            });
        }

        Self::record_history(&tx, a, &weekly)?;
        tx.commit()?;
        Ok(())
    }

    /// Replace the whole assignment with a new pattern and start date, bumping
    /// the version. Returns the stored assignment. Commits before returning.
    pub fn replace_assignment(
        &self,
        employee_id: &str,
        cycle_token: &str,
        pattern: &CyclePattern,
        start_date: NaiveDate,
        assigned_at: Timestamp,
    ) -> RosterResult<ScheduleAssignment> {
        let weekly = weekdays_to_json(&pattern.weekly_rest_days)?;
        let tx = self.conn.unchecked_transaction()?;

        let version: Option<ScheduleVersion> = tx
            .query_row(
                "UPDATE schedule_assignment SET
                    version = version + 1, cycle_token = ?2, work_days = ?3, rest_days = ?4,
                    weekly_rest_days = ?5, uses_weekly_override = ?6, start_date = ?7,
                    assigned_at = ?8
                 WHERE employee_id = ?1
                 RETURNING version",
                params![
                    employee_id,
                    cycle_token,
                    pattern.work_days,
                    pattern.rest_days,
                    &weekly,
                    pattern.uses_weekly_override,
                    start_date,
                    assigned_at,
                ],
                |row| row.get(0),
            )
            .optional()?;
        let Some(version) = version else {
            return Err(RosterError::NotFound {
                what: "schedule",
                employee_id: employee_id.to_string(),
            });
        };

        let assignment = ScheduleAssignment {
            employee_id: employee_id.to_string(),
            version,
            cycle_token: cycle_token.to_string(),
            pattern: pattern.clone(),
            start_date,
            assigned_at,
        };
        Self::record_history(&tx, &assignment, &weekly)?;
        tx.commit()?;
        Ok(assignment)
    }

    fn record_history(
        tx: &rusqlite::Transaction<'_>,
        a: &ScheduleAssignment,
        weekly: &str,
    ) -> RosterResult<()> {
        tx.execute(
            "INSERT INTO schedule_history (
                employee_id, version, cycle_token, work_days, rest_days,
                weekly_rest_days, uses_weekly_override, start_date, assigned_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &a.employee_id,
                a.version,
                &a.cycle_token,
                a.pattern.work_days,
                a.pattern.rest_days,
                weekly,
                a.pattern.uses_weekly_override,
                a.start_date,
                a.assigned_at,
            ],
        )?;
        tx.execute(
            "UPDATE employee SET current_schedule_version = ?1 WHERE employee_id = ?2",
            params![a.version, &a.employee_id],
        )?;
        Ok(())
    }

    pub fn get_assignment(&self, employee_id: &str) -> RosterResult<Option<ScheduleAssignment>> {
        self.conn
            .query_row(
                &format!("SELECT {ASSIGNMENT_COLUMNS} FROM schedule_assignment WHERE employee_id = ?1"),
                params![employee_id],
                assignment_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Every version ever assigned to the employee, oldest first.
    pub fn assignment_history(&self, employee_id: &str) -> RosterResult<Vec<ScheduleAssignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM schedule_history
             WHERE employee_id = ?1 ORDER BY version ASC"
        ))?;
        let rows = stmt.query_map(params![employee_id], assignment_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Current assignments of every employee in `filter`, by employee id.
    pub fn assignments_in(&self, filter: &PopulationFilter) -> RosterResult<Vec<ScheduleAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.employee_id, a.version, a.cycle_token, a.work_days, a.rest_days,
                    a.weekly_rest_days, a.uses_weekly_override, a.start_date, a.assigned_at
             FROM schedule_assignment a
             JOIN employee e ON e.employee_id = a.employee_id
             WHERE ?1 IS NULL OR e.sector = ?1
             ORDER BY a.employee_id ASC",
        )?;
        let rows = stmt.query_map(params![filter.sector()], assignment_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
