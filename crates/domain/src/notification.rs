use serde::{Deserialize, Serialize};

/// Delivery channels and event subscriptions for one collaborator.
///
/// Channels and event types are independent toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Email channel.
    pub email_notifications: bool,
    /// SMS channel.
    pub sms_notifications: bool,
    /// Mobile push channel.
    pub push_notifications: bool,
    /// New job assignments.
    pub job_assignments: bool,
    /// Job status changes.
    pub status_updates: bool,
    /// Upcoming deadlines.
    pub deadline_reminders: bool,
    /// Platform alerts.
    pub system_alerts: bool,
}

impl NotificationSettings {
    /// Returns settings with every toggle off.
    #[must_use]
    pub fn muted() -> Self {
        Self {
            email_notifications: false,
            sms_notifications: false,
            push_notifications: false,
            job_assignments: false,
            status_updates: false,
            deadline_reminders: false,
            system_alerts: false,
        }
    }

    /// Returns true when at least one delivery channel is enabled.
    #[must_use]
    pub fn has_channel(&self) -> bool {
        self.email_notifications || self.sms_notifications || self.push_notifications
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            sms_notifications: false,
            push_notifications: true,
            job_assignments: true,
            status_updates: true,
            deadline_reminders: true,
            system_alerts: true,
        }
    }
}
