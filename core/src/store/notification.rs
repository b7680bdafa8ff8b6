use super::RosterStore;
use crate::{
    error::RosterResult,
    notifier::{Notification, NotificationRecord},
    types::Timestamp,
};
use rusqlite::params;

impl RosterStore {
    // ── Notification ───────────────────────────────────────────────

    pub fn insert_notification(&self, n: &Notification, sent_at: Timestamp) -> RosterResult<i64> {
        self.conn.execute(
            "INSERT INTO notification (employee_id, category, message, created_by, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![n.employee_id.as_deref(), &n.category, &n.message, &n.created_by, sent_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Notifications addressed to the employee plus broadcasts, newest first.
    pub fn notifications_for(&self, employee_id: &str) -> RosterResult<Vec<NotificationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, employee_id, category, message, created_by, sent_at
             FROM notification
             WHERE employee_id = ?1 OR employee_id IS NULL
             ORDER BY sent_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![employee_id], |row| {
            Ok(NotificationRecord {
                id: row.get(0)?,
                notification: Notification {
                    employee_id: row.get(1)?,
                    category:    row.get(2)?,
                    message:     row.get(3)?,
                    created_by:  row.get(4)?,
                },
                sent_at: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn notification_count(&self) -> RosterResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notification", [], |row| row.get(0))?;
        Ok(count)
    }
}
