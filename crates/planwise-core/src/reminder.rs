//! Due-reminder detection.
//!
//! A poller calls [`due_reminders`] periodically (every 30 seconds in the
//! desktop client). A reminder is due when it fell within the last minute,
//! so a poll interval under one minute sees each reminder at least once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Category, Task};

/// Width of the window in which a passed reminder still fires.
pub const FIRING_WINDOW_SECS: i64 = 60;

/// A reminder ready to be shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotice {
    pub task_id: String,
    pub title: String,
    pub category: String,
    pub reminder_time: DateTime<Utc>,
}

impl ReminderNotice {
    pub fn heading(&self) -> String {
        format!("Reminder: {}", self.title)
    }

    /// Body text, using the category's label when it is registered.
    pub fn body(&self, categories: &[Category]) -> String {
        let label = categories
            .iter()
            .find(|c| c.id == self.category)
            .map(|c| c.label.as_str())
            .unwrap_or(&self.category);
        format!("It's time for your {label} task!")
    }
}

/// Incomplete tasks whose reminder passed less than a minute ago.
pub fn due_reminders(tasks: &[Task], now: DateTime<Utc>) -> Vec<ReminderNotice> {
    let window = Duration::seconds(FIRING_WINDOW_SECS);
    tasks
        .iter()
        .filter(|t| !t.is_completed)
        .filter_map(|t| {
            let reminder = t.reminder_time?;
            let elapsed = now - reminder;
            (elapsed >= Duration::zero() && elapsed < window).then(|| ReminderNotice {
                task_id: t.id.clone(),
                title: t.title.clone(),
                category: t.category.clone(),
                reminder_time: reminder,
            })
        })
        .collect()
}
