//! The slice of an employee record the engine needs: identity and the
//! sector used to scope roster and reminder queries.

use crate::types::EmployeeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Which employees a population query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulationFilter {
    All,
    Sector(String),
}

impl PopulationFilter {
    /// Scope of an administrator: their own sector, or everyone if they
    /// have none.
    pub fn for_admin(admin: &Employee) -> Self {
        match &admin.sector {
            Some(sector) => Self::Sector(sector.clone()),
            None => Self::All,
        }
    }

    pub fn sector(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Sector(s) => Some(s),
        }
    }
}
