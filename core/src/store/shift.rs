use super::{is_unique_violation, RosterStore};
use crate::{
    error::{RosterError, RosterResult},
    shift::ShiftWindow,
    types::Timestamp,
};
use rusqlite::{params, OptionalExtension};

impl RosterStore {
    // ── Shift window ───────────────────────────────────────────────

    pub fn insert_shift(
        &self,
        employee_id: &str,
        w: &ShiftWindow,
        at: Timestamp,
    ) -> RosterResult<()> {
        self.conn
            .execute(
                "INSERT INTO shift_window (
                    employee_id, start_time, end_time, duration_hours, break_minutes, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![employee_id, w.start, w.end, w.duration_hours, w.break_minutes, at],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RosterError::ConflictingAssignment {
                        what: "shift window",
                        employee_id: employee_id.to_string(),
                    }
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Overwrite all four fields in one statement.
    pub fn update_shift(
        &self,
        employee_id: &str,
        w: &ShiftWindow,
        at: Timestamp,
    ) -> RosterResult<()> {
        let changed = self.conn.execute(
            "UPDATE shift_window SET start_time = ?1, end_time = ?2, duration_hours = ?3,
                break_minutes = ?4, updated_at = ?5
             WHERE employee_id = ?6",
            params![w.start, w.end, w.duration_hours, w.break_minutes, at, employee_id],
        )?;
        if changed == 0 {
            return Err(RosterError::NotFound {
                what: "shift window",
                employee_id: employee_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_shift(&self, employee_id: &str) -> RosterResult<Option<ShiftWindow>> {
        self.conn
            .query_row(
                "SELECT start_time, end_time, duration_hours, break_minutes
                 FROM shift_window WHERE employee_id = ?1",
                params![employee_id],
                |row| {
                    Ok(ShiftWindow {
                        start:          row.get(0)?,
                        end:            row.get(1)?,
                        duration_hours: row.get(2)?,
                        break_minutes:  row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}
