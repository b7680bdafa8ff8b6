use crate::event::RosterEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// SQLite path. `:memory:` gives a throwaway database.
    pub database: String,
    /// Recorded as `created_by` on notifications the engine generates.
    #[serde(default = "default_system_actor")]
    pub system_actor: String,
    #[serde(default)]
    pub messages: MessageTemplates,
}

fn default_system_actor() -> String {
    "system".into()
}

/// One template per notification category.
/// Placeholders: `{version}`, `{cycle}`, `{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub schedule_assigned:      String,
    pub schedule_altered:       String,
    pub confirmation_requested: String,
    pub schedule_confirmed:     String,
    pub confirmation_reminder:  String,
    pub shift_assigned:         String,
    pub shift_altered:          String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            schedule_assigned:      "A {cycle} schedule starting {date} was assigned to you.".into(),
            schedule_altered:       "Your schedule changed to {cycle} starting {date}.".into(),
            confirmation_requested: "Please confirm schedule version {version}.".into(),
            schedule_confirmed:     "Schedule version {version} confirmed.".into(),
            confirmation_reminder:  "You still have a schedule waiting for confirmation.".into(),
            shift_assigned:         "A daily shift window was assigned to you.".into(),
            shift_altered:          "Your daily shift window changed.".into(),
        }
    }
}

impl MessageTemplates {
    pub fn template_for(&self, event: &RosterEvent) -> &str {
        match event {
            RosterEvent::ScheduleAssigned { .. }      => &self.schedule_assigned,
            RosterEvent::ScheduleAltered { .. }       => &self.schedule_altered,
            RosterEvent::ConfirmationRequested { .. } => &self.confirmation_requested,
            RosterEvent::ScheduleConfirmed { .. }     => &self.schedule_confirmed,
            RosterEvent::ConfirmationReminder { .. }  => &self.confirmation_reminder,
            RosterEvent::ShiftAssigned { .. }         => &self.shift_assigned,
            RosterEvent::ShiftAltered { .. }          => &self.shift_altered,
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            database: "roster.db".into(),
            system_actor: default_system_actor(),
            messages: MessageTemplates::default(),
        }
    }
}

impl RosterConfig {
    /// Load from a JSON file. Missing optional fields take their defaults.
    /// In tests, use RosterConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RosterConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            database: ":memory:".into(),
            system_actor: "roster-test".into(),
            messages: MessageTemplates::default(),
        }
    }
}
