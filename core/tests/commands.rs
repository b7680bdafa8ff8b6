//! Command surface and notification dispatch tests.
//!
//! Covers: required-field validation, command execution, and delivery of
//! the resulting events through a notifier that may fail.

use chrono::{TimeZone, Utc};
use roster_core::{
    clock::{Clock, FixedClock},
    command::RosterCommand,
    config::RosterConfig,
    error::{RosterError, RosterResult},
    event::RosterEvent,
    notifier::{dispatch, LogNotifier, Notification, Notifier, StoreNotifier},
    service::ScheduleService,
    store::RosterStore,
};
use serde_json::json;
use std::cell::RefCell;

fn build() -> ScheduleService<FixedClock> {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = RosterStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
    ScheduleService::new(store, clock)
}

fn run(service: &ScheduleService<FixedClock>, body: serde_json::Value) -> RosterResult<serde_json::Value> {
    let command = RosterCommand::from_json(body)?;
    Ok(service.execute(command)?.value)
}

/// Records what it is given and rejects one category.
struct FlakyNotifier {
    reject:    &'static str,
    delivered: RefCell<Vec<Notification>>,
}

impl Notifier for FlakyNotifier {
    fn deliver(&self, notification: &Notification) -> RosterResult<()> {
        if notification.category == self.reject {
            return Err(RosterError::Other(anyhow::anyhow!("mail relay unavailable")));
        }
        self.delivered.borrow_mut().push(notification.clone());
        Ok(())
    }
}

#[test]
fn missing_fields_are_all_reported() {
    let err = RosterCommand::from_json(json!({
        "cmd": "create_schedule",
        "employee_id": "E1",
        "cycle": "",
    }))
    .unwrap_err();
    match err {
        RosterError::MissingFields { fields } => assert_eq!(fields, vec!["start_date", "cycle"]),
        other => panic!("expected MissingFields, got {other:?}"),
    }
}

#[test]
fn missing_cmd_is_a_missing_field() {
    let err = RosterCommand::from_json(json!({ "employee_id": "E1" })).unwrap_err();
    assert!(matches!(err, RosterError::MissingFields { ref fields } if fields == &["cmd"]));
    assert_eq!(err.kind(), "missing_fields");
}

#[test]
fn unknown_cmd_is_a_serialization_error() {
    let err = RosterCommand::from_json(json!({ "cmd": "fire_everyone" })).unwrap_err();
    assert!(matches!(err, RosterError::Serialization(_)), "got {err:?}");
}

#[test]
fn optional_fields_take_defaults() {
    let command = RosterCommand::from_json(json!({
        "cmd": "create_schedule",
        "employee_id": "E1",
        "start_date": "2024-01-01",
        "cycle": "6x1",
    }))
    .unwrap();
    match command {
        RosterCommand::CreateSchedule(req) => {
            assert!(!req.uses_weekly_override);
            assert!(req.weekly_rest_days.is_empty());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn commands_drive_the_full_flow() {
    let service = build();
    run(&service, json!({ "cmd": "register_employee", "employee_id": "ADM", "name": "Admin", "sector": "ops" })).unwrap();
    run(&service, json!({ "cmd": "register_employee", "employee_id": "E1", "name": "Ana", "sector": "ops" })).unwrap();

    let assignment = run(&service, json!({
        "cmd": "create_schedule",
        "employee_id": "E1",
        "start_date": "01/01/2024",
        "cycle": "5x2",
        "uses_weekly_override": true,
        "weekly_rest_days": ["saturday", "SUN"],
    }))
    .unwrap();
    assert_eq!(assignment["version"], 1);
    assert_eq!(assignment["start_date"], "2024-01-01");

    let active = run(&service, json!({ "cmd": "active_on", "admin_id": "ADM", "date": "2024-01-06" })).unwrap();
    assert_eq!(active["active"], json!([]), "Saturday is a weekly rest day");
    let active = run(&service, json!({ "cmd": "active_on", "admin_id": "ADM", "date": "2024-01-08" })).unwrap();
    assert_eq!(active["active"], json!(["E1"]));

    let pending = run(&service, json!({ "cmd": "pending_confirmations", "admin_id": "ADM" })).unwrap();
    assert_eq!(pending["pending"], json!(["E1"]));

    let confirmed = run(&service, json!({ "cmd": "confirm_schedule", "employee_id": "E1" })).unwrap();
    assert_eq!(confirmed["status"], "confirmed");

    let err = run(&service, json!({ "cmd": "confirm_schedule", "employee_id": "E1" })).unwrap_err();
    assert_eq!(err.kind(), "already_confirmed");

    let calendar = run(&service, json!({
        "cmd": "duty_calendar", "employee_id": "E1", "from": "2024-01-05", "to": "2024-01-07",
    }))
    .unwrap();
    assert_eq!(calendar.as_array().map(Vec::len), Some(3));
}

#[test]
fn store_notifier_persists_one_notification_per_event() {
    let service = build();
    let config = RosterConfig::default_test();
    run(&service, json!({ "cmd": "register_employee", "employee_id": "E1", "name": "Ana" })).unwrap();

    let applied = service
        .execute(RosterCommand::from_json(json!({
            "cmd": "create_schedule", "employee_id": "E1", "start_date": "2024-03-01", "cycle": "24x72",
        })).unwrap())
        .unwrap();
    assert_eq!(applied.events.len(), 2);

    let notifier = StoreNotifier::new(service.store(), service.clock().now());
    assert!(dispatch(&applied.events, &notifier, &config).is_empty());

    let stored = service.store().notifications_for("E1").unwrap();
    assert_eq!(stored.len(), 2);
    let categories: Vec<&str> = stored.iter().map(|r| r.notification.category.as_str()).collect();
    assert!(categories.contains(&"schedule_assigned"));
    assert!(categories.contains(&"confirmation_requested"));
    let assigned = stored
        .iter()
        .find(|r| r.notification.category == "schedule_assigned")
        .unwrap();
    assert_eq!(
        assigned.notification.message,
        "A 24x72 schedule starting 2024-03-01 was assigned to you."
    );
    assert_eq!(assigned.notification.created_by, "roster-test");
}

#[test]
fn broadcasts_reach_every_employee() {
    let service = build();
    let at = service.clock().now();
    service
        .store()
        .insert_notification(
            &Notification {
                employee_id: None,
                category: "announcement".into(),
                message: "Roster for March is published.".into(),
                created_by: "ADM".into(),
            },
            at,
        )
        .unwrap();

    assert_eq!(service.store().notifications_for("anyone").unwrap().len(), 1);
}

#[test]
fn failed_delivery_does_not_undo_the_operation() {
    let service = build();
    let config = RosterConfig::default_test();
    run(&service, json!({ "cmd": "register_employee", "employee_id": "E1", "name": "Ana" })).unwrap();

    let applied = service
        .execute(RosterCommand::from_json(json!({
            "cmd": "create_schedule", "employee_id": "E1", "start_date": "2024-01-01", "cycle": "6x1",
        })).unwrap())
        .unwrap();

    let notifier = FlakyNotifier {
        reject: "confirmation_requested",
        delivered: RefCell::new(vec![]),
    };
    let failures = dispatch(&applied.events, &notifier, &config);

    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0].event,
        RosterEvent::ConfirmationRequested { version: 1, .. }
    ));
    assert_eq!(notifier.delivered.borrow().len(), 1, "other events still delivered");

    // Schedule and confirmation are committed regardless.
    assert!(service.store().get_assignment("E1").unwrap().is_some());
    assert!(service.ledger().current("E1").unwrap().unwrap().is_pending());
}

#[test]
fn log_notifier_accepts_everything() {
    let events = vec![RosterEvent::ShiftAssigned { employee_id: "E1".into() }];
    assert!(dispatch(&events, &LogNotifier, &RosterConfig::default_test()).is_empty());
}

#[test]
fn config_fills_defaults() {
    let config: RosterConfig = serde_json::from_value(json!({
        "database": "roster.db",
        "messages": { "shift_altered": "Shift moved." },
    }))
    .unwrap();
    assert_eq!(config.system_actor, "system");
    assert_eq!(config.messages.shift_altered, "Shift moved.");
    assert_eq!(
        config.messages.confirmation_requested,
        "Please confirm schedule version {version}."
    );
}
