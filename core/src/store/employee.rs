use super::RosterStore;
use crate::{
    employee::{Employee, PopulationFilter},
    error::RosterResult,
    types::ScheduleVersion,
};
use rusqlite::{params, OptionalExtension};

fn employee_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        employee_id: row.get(0)?,
        name:        row.get(1)?,
        sector:      row.get(2)?,
    })
}

impl RosterStore {
    // ── Employee ───────────────────────────────────────────────────

    /// Insert or update name/sector. Schedule and confirmation references
    /// are left alone on update.
    pub fn upsert_employee(&self, e: &Employee) -> RosterResult<()> {
        self.conn.execute(
            "INSERT INTO employee (employee_id, name, sector) VALUES (?1, ?2, ?3)
             ON CONFLICT (employee_id) DO UPDATE SET name = excluded.name, sector = excluded.sector",
            params![&e.employee_id, &e.name, e.sector.as_deref()],
        )?;
        Ok(())
    }

    pub fn get_employee(&self, employee_id: &str) -> RosterResult<Option<Employee>> {
        self.conn
            .query_row(
                "SELECT employee_id, name, sector FROM employee WHERE employee_id = ?1",
                params![employee_id],
                employee_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Version of the schedule the employee holds, None if unscheduled or
    /// unknown.
    pub fn current_schedule_version(&self, employee_id: &str) -> RosterResult<Option<ScheduleVersion>> {
        let version: Option<Option<ScheduleVersion>> = self
            .conn
            .query_row(
                "SELECT current_schedule_version FROM employee WHERE employee_id = ?1",
                params![employee_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version.flatten())
    }

    pub fn employees_in(&self, filter: &PopulationFilter) -> RosterResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_id, name, sector FROM employee
             WHERE ?1 IS NULL OR sector = ?1
             ORDER BY employee_id ASC",
        )?;
        let rows = stmt.query_map(params![filter.sector()], employee_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn employee_count(&self) -> RosterResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count)
    }
}
