use super::RosterStore;
use crate::{
    confirmation::{Confirmation, ConfirmationStatus},
    employee::PopulationFilter,
    error::RosterResult,
    types::{EmployeeId, Timestamp},
};
use rusqlite::{params, types::Type, OptionalExtension};

fn status_from_sql(idx: usize, raw: &str) -> rusqlite::Result<ConfirmationStatus> {
    ConfirmationStatus::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown confirmation status '{raw}'").into(),
        )
    })
}

// Helper function for mapping confirmation rows
fn confirmation_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Confirmation> {
    let status: String = row.get(3)?;
    Ok(Confirmation {
        confirmation_id:  row.get(0)?,
        employee_id:      row.get(1)?,
        schedule_version: row.get(2)?,
        status:           status_from_sql(3, &status)?,
        created_at:       row.get(4)?,
        confirmed_at:     row.get(5)?,
    })
}

impl RosterStore {
    // ── Confirmation ───────────────────────────────────────────────

    /// Insert a confirmation and point the employee at it, atomically.
    pub fn open_confirmation(&self, c: &Confirmation) -> RosterResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO confirmation (
                confirmation_id, employee_id, schedule_version, status, created_at, confirmed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &c.confirmation_id,
                &c.employee_id,
                c.schedule_version,
                c.status.as_str(),
                c.created_at,
                c.confirmed_at,
            ],
        )?;
        tx.execute(
            "UPDATE employee SET current_confirmation_id = ?1 WHERE employee_id = ?2",
            params![&c.confirmation_id, &c.employee_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// The confirmation the employee record points at.
    pub fn current_confirmation(&self, employee_id: &str) -> RosterResult<Option<Confirmation>> {
        self.conn
            .query_row(
                "SELECT c.confirmation_id, c.employee_id, c.schedule_version, c.status,
                        c.created_at, c.confirmed_at
                 FROM employee e
                 JOIN confirmation c ON c.confirmation_id = e.current_confirmation_id
                 WHERE e.employee_id = ?1",
                params![employee_id],
                confirmation_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Most recently created confirmation, ties broken by insertion order.
    pub fn latest_confirmation(&self, employee_id: &str) -> RosterResult<Option<Confirmation>> {
        self.conn
            .query_row(
                "SELECT confirmation_id, employee_id, schedule_version, status,
                        created_at, confirmed_at
                 FROM confirmation WHERE employee_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT 1",
                params![employee_id],
                confirmation_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All confirmations for the employee, oldest first.
    pub fn confirmations_for(&self, employee_id: &str) -> RosterResult<Vec<Confirmation>> {
        let mut stmt = self.conn.prepare(
            "SELECT confirmation_id, employee_id, schedule_version, status,
                    created_at, confirmed_at
             FROM confirmation WHERE employee_id = ?1
             ORDER BY created_at ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![employee_id], confirmation_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Pending -> Confirmed, only if still pending. Returns whether a row
    /// changed.
    pub fn mark_confirmed(&self, confirmation_id: &str, at: Timestamp) -> RosterResult<bool> {
        let changed = self.conn.execute(
            "UPDATE confirmation SET status = 'confirmed', confirmed_at = ?1
             WHERE confirmation_id = ?2 AND status = 'pending'",
            params![at, confirmation_id],
        )?;
        Ok(changed == 1)
    }

    /// For every employee in `filter` holding a schedule: the status of their
    /// current confirmation, or None if they have none for the schedule
    /// version they hold.
    pub fn scheduled_confirmation_states(
        &self,
        filter: &PopulationFilter,
    ) -> RosterResult<Vec<(EmployeeId, Option<ConfirmationStatus>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.employee_id, c.status
             FROM employee e
             JOIN schedule_assignment a ON a.employee_id = e.employee_id
             LEFT JOIN confirmation c ON c.confirmation_id = e.current_confirmation_id
                                     AND c.schedule_version = e.current_schedule_version
             WHERE ?1 IS NULL OR e.sector = ?1
             ORDER BY e.employee_id ASC",
        )?;
        let rows = stmt.query_map(params![filter.sector()], |row| {
            let employee_id: String = row.get(0)?;
            let status: Option<String> = row.get(1)?;
            let status = status.map(|s| status_from_sql(1, &s)).transpose()?;
            Ok((employee_id, status))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
