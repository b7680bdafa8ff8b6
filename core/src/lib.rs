//! Shift-cycle and confirmation engine for employee rosters.
//!
//! Leaf-first:
//!   cycle_spec    "6x1" / "12x36" tokens -> CyclePattern
//!   cycle_status  is the employee on duty on a date?
//!   confirmation  acknowledgment ledger per schedule version
//!   roster        who is on duty on a date
//!   service       the above wired to the store, returning events

pub mod clock;
pub mod command;
pub mod config;
pub mod confirmation;
pub mod cycle_spec;
pub mod cycle_status;
pub mod dates;
pub mod employee;
pub mod error;
pub mod event;
pub mod notifier;
pub mod roster;
pub mod schedule;
pub mod service;
pub mod shift;
pub mod store;
pub mod types;
pub mod validation;
