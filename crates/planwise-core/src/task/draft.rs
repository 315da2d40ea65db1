//! Builders for creating and editing tasks.
//!
//! # Usage
//! ```rust,ignore
//! use planwise_core::task::{Priority, ReminderLead, TaskDraft};
//!
//! let draft = TaskDraft::new("Dentist", "Health", date)
//!     .with_priority(Priority::High)
//!     .with_reminder(ReminderLead::OneHour);
//! let task = draft.build(&ids, zone)?;
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, ReminderLead, Subtask, Task};
use crate::calendar::LocalZone;
use crate::clock::IdGenerator;
use crate::error::ValidationError;

/// Hour of day used when a task is given a date only.
pub const DEFAULT_HOUR: u32 = 9;

pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// User input for a new task, before ids and instants are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub category: String,
    pub priority: Priority,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub reminder: Option<ReminderLead>,
    pub duration_minutes: Option<u32>,
    pub subtasks: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            priority: Priority::Medium,
            date,
            time: None,
            reminder: None,
            duration_minutes: None,
            subtasks: Vec::new(),
        }
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_reminder(mut self, reminder: ReminderLead) -> Self {
        self.reminder = Some(reminder);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_subtask(mut self, title: impl Into<String>) -> Self {
        self.subtasks.push(title.into());
        self
    }

    /// Resolve the draft into a validated task.
    pub fn build(self, ids: &dyn IdGenerator, zone: LocalZone) -> Result<Task, ValidationError> {
        let date = zone.combine(self.date, self.time.unwrap_or_else(default_time));
        let subtasks = self
            .subtasks
            .into_iter()
            .filter(|title| !title.trim().is_empty())
            .map(|title| Subtask {
                id: ids.next_id(),
                title,
                is_completed: false,
            })
            .collect();

        let task = Task {
            id: ids.next_id(),
            title: self.title.trim().to_string(),
            category: self.category,
            priority: self.priority,
            date,
            is_completed: false,
            reminder_time: self.reminder.map(|lead| lead.reminder_for(date)),
            duration_minutes: self.duration_minutes,
            routine_id: None,
            subtasks,
            is_external: false,
            source: None,
        };
        task.validate()?;
        Ok(task)
    }
}

/// Partial update applied to an existing task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
    pub duration_minutes: Option<u32>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.date.is_none()
            && self.is_completed.is_none()
            && self.duration_minutes.is_none()
    }

    /// Apply onto `task`. A new date carries the reminder along with it.
    pub fn apply(self, task: &mut Task) -> Result<(), ValidationError> {
        let mut updated = task.clone();
        if let Some(title) = self.title {
            updated.title = title.trim().to_string();
        }
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(priority) = self.priority {
            updated.priority = priority;
        }
        if let Some(date) = self.date {
            updated.reschedule(date);
        }
        if let Some(done) = self.is_completed {
            updated.is_completed = done;
        }
        if let Some(minutes) = self.duration_minutes {
            updated.duration_minutes = Some(minutes);
        }
        updated.validate()?;
        *task = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SequentialIds;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn date_only_draft_lands_at_nine() {
        let ids = SequentialIds::new("t");
        let task = TaskDraft::new("Read", "Personal", day(5))
            .build(&ids, LocalZone::utc())
            .unwrap();
        assert_eq!(task.date, Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        assert_eq!(task.id, "t-1");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn draft_applies_zone_and_reminder() {
        let ids = SequentialIds::new("t");
        let zone = LocalZone::from_offset_minutes(120).unwrap();
        let task = TaskDraft::new("Standup", "Work", day(5))
            .with_time(NaiveTime::from_hms_opt(10, 30, 0).unwrap())
            .with_reminder(ReminderLead::FifteenMinutes)
            .with_subtask("notes")
            .build(&ids, zone)
            .unwrap();
        assert_eq!(task.date, Utc.with_ymd_and_hms(2024, 1, 5, 8, 30, 0).unwrap());
        assert_eq!(
            task.reminder_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 8, 15, 0).unwrap())
        );
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].id, "t-1");
        assert_eq!(task.id, "t-2");
    }

    #[test]
    fn draft_rejects_blank_title() {
        let ids = SequentialIds::new("t");
        let err = TaskDraft::new("  ", "Work", day(5))
            .build(&ids, LocalZone::utc())
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("title"));
    }

    #[test]
    fn patch_moves_reminder_with_date() {
        let ids = SequentialIds::new("t");
        let mut task = TaskDraft::new("Call", "Work", day(5))
            .with_reminder(ReminderLead::OneHour)
            .build(&ids, LocalZone::utc())
            .unwrap();

        let patch = TaskPatch {
            date: Some(Utc.with_ymd_and_hms(2024, 1, 6, 14, 0, 0).unwrap()),
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        patch.apply(&mut task).unwrap();

        assert_eq!(task.priority, Priority::High);
        assert_eq!(
            task.reminder_time,
            Some(Utc.with_ymd_and_hms(2024, 1, 6, 13, 0, 0).unwrap())
        );
    }

    #[test]
    fn rejected_patch_leaves_task_untouched() {
        let ids = SequentialIds::new("t");
        let mut task = TaskDraft::new("Call", "Work", day(5))
            .build(&ids, LocalZone::utc())
            .unwrap();
        let before = task.clone();

        let patch = TaskPatch {
            title: Some(" ".into()),
            priority: Some(Priority::Low),
            ..TaskPatch::default()
        };
        assert!(patch.apply(&mut task).is_err());
        assert_eq!(task, before);
    }
}
