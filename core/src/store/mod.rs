//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Everything else calls store methods and never executes SQL directly.

use crate::error::RosterResult;
use chrono::Weekday;
use rusqlite::{types::Type, Connection};

mod confirmation;
mod employee;
mod notification;
mod schedule;
mod shift;

pub struct RosterStore {
    conn: Connection,
}

impl RosterStore {
    pub fn open(path: &str) -> RosterResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RosterResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to call repeatedly.
    pub fn migrate(&self) -> RosterResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_employees.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_schedules.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_confirmations.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_shift_windows.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/005_notifications.sql"))?;
        Ok(())
    }
}

#[cfg(test)]
impl RosterStore {
    /// Raw SQL for tests that need to break the schema on purpose.
    pub(crate) fn execute_batch(&self, sql: &str) -> RosterResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

/// True for PRIMARY KEY / UNIQUE violations, not for foreign-key or CHECK
/// failures.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => matches!(
            e.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        ),
        _ => false,
    }
}

fn weekdays_to_json(days: &[Weekday]) -> RosterResult<String> {
    Ok(serde_json::to_string(days)?)
}

fn weekdays_from_json(idx: usize, raw: &str) -> rusqlite::Result<Vec<Weekday>> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_database_opens_in_wal_mode() {
        let path = std::env::temp_dir().join(format!("roster-wal-{}.db", std::process::id()));
        let path_str = path.to_string_lossy().into_owned();

        let store = RosterStore::open(&path_str).expect("open file store");
        store.migrate().expect("migration");
        let mode: String = store
            .conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");

        drop(store);
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
        }
    }
}
