//! Shared primitive types used across the roster engine.

/// An employee's registration number. Stable for the employee's lifetime.
pub type EmployeeId = String;

/// Per-employee schedule version. Starts at 1 and increments on every
/// assignment replacement.
pub type ScheduleVersion = u32;

/// Identifier of a single confirmation row.
pub type ConfirmationId = String;

/// Wall-clock instant, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
