use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cycle token '{token}': expected NxM with 1-2 digit positive values")]
    InvalidFormat { token: String },

    #[error("Invalid weekly rest days ({reason}): {values:?}")]
    InvalidWeeklyOverride { reason: String, values: Vec<String> },

    #[error("Invalid date '{input}': expected YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDate { input: String },

    #[error("Most recent schedule for employee '{employee_id}' is already confirmed")]
    AlreadyConfirmed { employee_id: String },

    #[error("No {what} found for employee '{employee_id}'")]
    NotFound { what: &'static str, employee_id: String },

    #[error("Employee '{employee_id}' already has an active {what}")]
    ConflictingAssignment { what: &'static str, employee_id: String },

    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Invalid shift window: {reason}")]
    InvalidShift { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// Stable machine-readable code for the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_)                   => "database",
            Self::Serialization(_)              => "serialization",
            Self::InvalidFormat { .. }          => "invalid_format",
            Self::InvalidWeeklyOverride { .. }  => "invalid_weekly_override",
            Self::InvalidDate { .. }            => "invalid_date",
            Self::AlreadyConfirmed { .. }       => "already_confirmed",
            Self::NotFound { .. }               => "not_found",
            Self::ConflictingAssignment { .. }  => "conflicting_assignment",
            Self::MissingFields { .. }          => "missing_fields",
            Self::InvalidShift { .. }           => "invalid_shift",
            Self::Other(_)                      => "other",
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
