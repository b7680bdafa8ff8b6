//! Declarative required-field checks for incoming request bodies.
//!
//! Each command declares its required fields once; the check reports every
//! missing one, in declaration order.

use crate::error::{RosterError, RosterResult};
use serde_json::Value;

/// Absent, null and blank-string fields count as missing.
pub fn missing_fields(body: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| match body.get(**field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .map(|field| field.to_string())
        .collect()
}

pub fn require_fields(body: &Value, required: &[&str]) -> RosterResult<()> {
    let fields = missing_fields(body, required);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(RosterError::MissingFields { fields })
    }
}
