//! Notification rendering and fire-and-forget delivery.
//!
//! Each event is rendered and delivered on its own. A failed delivery is
//! logged and handed back to the caller; it never undoes the schedule or
//! confirmation change that produced the event.

use crate::{
    config::RosterConfig,
    error::RosterResult,
    event::RosterEvent,
    store::RosterStore,
    types::{EmployeeId, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// None for a broadcast.
    pub employee_id: Option<EmployeeId>,
    pub category:    String,
    pub message:     String,
    pub created_by:  String,
}

impl Notification {
    pub fn from_event(event: &RosterEvent, config: &RosterConfig) -> Self {
        Self {
            employee_id: Some(event.employee_id().to_string()),
            category: event.category().to_string(),
            message: render(config.messages.template_for(event), event),
            created_by: config.system_actor.clone(),
        }
    }
}

/// A notification as stored, with its delivery stamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id:           i64,
    pub notification: Notification,
    pub sent_at:      Timestamp,
}

fn render(template: &str, event: &RosterEvent) -> String {
    let mut out = template.to_string();
    match event {
        RosterEvent::ScheduleAssigned { version, cycle, start_date, .. }
        | RosterEvent::ScheduleAltered { version, cycle, start_date, .. } => {
            out = out
                .replace("{version}", &version.to_string())
                .replace("{cycle}", cycle)
                .replace("{date}", &start_date.format("%Y-%m-%d").to_string());
        }
        RosterEvent::ConfirmationRequested { version, .. }
        | RosterEvent::ScheduleConfirmed { version, .. } => {
            out = out.replace("{version}", &version.to_string());
        }
        _ => {}
    }
    out
}

pub trait Notifier {
    fn deliver(&self, notification: &Notification) -> RosterResult<()>;
}

/// Writes notifications to the store's notification table, stamped with
/// the supplied clock reading.
pub struct StoreNotifier<'a> {
    store:   &'a RosterStore,
    sent_at: Timestamp,
}

impl<'a> StoreNotifier<'a> {
    pub fn new(store: &'a RosterStore, sent_at: Timestamp) -> Self {
        Self { store, sent_at }
    }
}

impl Notifier for StoreNotifier<'_> {
    fn deliver(&self, notification: &Notification) -> RosterResult<()> {
        self.store.insert_notification(notification, self.sent_at)?;
        Ok(())
    }
}

/// Logs every notification instead of storing it. Used by the runner's
/// `--log-notifications` mode.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn deliver(&self, n: &Notification) -> RosterResult<()> {
        log::info!(
            "notify {} [{}]: {}",
            n.employee_id.as_deref().unwrap_or("*"),
            n.category,
            n.message
        );
        Ok(())
    }
}

#[derive(Debug)]
pub struct DispatchFailure {
    pub event: RosterEvent,
    pub error: crate::error::RosterError,
}

/// Deliver one notification per event. Returns the events that failed.
pub fn dispatch(
    events: &[RosterEvent],
    notifier: &dyn Notifier,
    config: &RosterConfig,
) -> Vec<DispatchFailure> {
    let mut failures = Vec::new();
    for event in events {
        let notification = Notification::from_event(event, config);
        if let Err(error) = notifier.deliver(&notification) {
            log::warn!(
                "notification '{}' for {} not delivered: {error}",
                notification.category,
                event.employee_id()
            );
            failures.push(DispatchFailure {
                event: event.clone(),
                error,
            });
        }
    }
    failures
}
