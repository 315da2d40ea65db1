//! Task types: scheduled tasks, subtasks, priorities, reminder presets.
//!
//! A [`Task`] is one concrete scheduled occurrence. Tasks generated by the
//! same routine expansion share a `routine_id`.

pub mod draft;

pub use draft::{default_time, TaskDraft, TaskPatch, DEFAULT_HOUR};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected low, medium or high, got '{other}'"),
            }),
        }
    }
}

/// A checklist item inside a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// A scheduled task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    pub title: String,
    /// Opaque category key, resolved by the category registry
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    /// Scheduled instant (date plus time of day)
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_completed: bool,
    /// When to remind; never later than `date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Shared by every instance of one routine expansion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Imported from an external calendar
    #[serde(default)]
    pub is_external: bool,
    /// Label of the external calendar this task came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Task {
    /// Create a standalone medium-priority task.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            priority: Priority::Medium,
            date,
            is_completed: false,
            reminder_time: None,
            duration_minutes: None,
            routine_id: None,
            subtasks: Vec::new(),
            is_external: false,
            source: None,
        }
    }

    /// Check the invariants every stored task must hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyField("category"));
        }
        if let Some(reminder) = self.reminder_time {
            if reminder > self.date {
                return Err(ValidationError::ReminderAfterDate {
                    reminder,
                    date: self.date,
                });
            }
        }
        Ok(())
    }

    /// How long before `date` the reminder fires.
    pub fn reminder_offset(&self) -> Option<Duration> {
        self.reminder_time.map(|reminder| self.date - reminder)
    }

    /// Move the task, keeping the reminder the same distance ahead.
    pub fn reschedule(&mut self, date: DateTime<Utc>) {
        if let Some(offset) = self.reminder_offset() {
            self.reminder_time = Some(date - offset);
        }
        self.date = date;
    }

    /// Lower-cased, trimmed title used to group recurring history.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Reminder presets offered when creating or editing a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReminderLead {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl ReminderLead {
    pub fn minutes(&self) -> i64 {
        match self {
            ReminderLead::FifteenMinutes => 15,
            ReminderLead::OneHour => 60,
            ReminderLead::OneDay => 24 * 60,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }

    pub fn reminder_for(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        date - self.duration()
    }

    /// The preset matching an existing reminder, if any.
    pub fn from_offset(offset: Duration) -> Option<Self> {
        [
            ReminderLead::FifteenMinutes,
            ReminderLead::OneHour,
            ReminderLead::OneDay,
        ]
        .into_iter()
        .find(|lead| lead.duration() == offset)
    }
}

impl fmt::Display for ReminderLead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderLead::FifteenMinutes => write!(f, "15m"),
            ReminderLead::OneHour => write!(f, "1h"),
            ReminderLead::OneDay => write!(f, "1d"),
        }
    }
}

impl FromStr for ReminderLead {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "15m" => Ok(ReminderLead::FifteenMinutes),
            "1h" => Ok(ReminderLead::OneHour),
            "1d" => Ok(ReminderLead::OneDay),
            other => Err(ValidationError::InvalidValue {
                field: "reminder".into(),
                message: format!("expected 15m, 1h or 1d, got '{other}'"),
            }),
        }
    }
}

/// A category registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub label: String,
    pub color: String,
}
