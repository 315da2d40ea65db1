//! Routine expansion: one base task plus a recurrence rule becomes a bounded,
//! date-ordered series of concrete task instances.
//!
//! The walk starts on the base task's local calendar day and moves forward
//! one day at a time (or `intervalDays` at a time for interval routines).
//! It stops at whichever comes first:
//! - the horizon, `now + horizon_months` months
//! - the rule's optional end date
//! - [`MAX_STEPS`] walk steps
//!
//! Every instance keeps the base task's time of day (seconds dropped), the
//! same reminder lead time, and a copy of its checklist under fresh subtask
//! ids.

pub mod rule;

pub use rule::{Recurrence, RecurrenceRule, MIN_INTERVAL_DAYS};

use crate::calendar::{truncate_to_minute, LocalZone};
use crate::clock::{Clock, IdGenerator};
use crate::error::RecurrenceError;
use crate::task::{Subtask, Task};
use chrono::{Days, Months};

/// Default number of months generated ahead of now.
pub const DEFAULT_HORIZON_MONTHS: u32 = 3;

/// Upper bound on walk steps per expansion, so at most this many instances.
pub const MAX_STEPS: usize = 365;

/// Expands routines against an injected clock and id source.
pub struct RecurrenceExpander<'a> {
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
    zone: LocalZone,
}

impl<'a> RecurrenceExpander<'a> {
    pub fn new(clock: &'a dyn Clock, ids: &'a dyn IdGenerator, zone: LocalZone) -> Self {
        Self { clock, ids, zone }
    }

    /// Expand `base` into its instances, ascending by date.
    ///
    /// # Errors
    /// - [`RecurrenceError::InvalidRule`] for an interval under two days, a
    ///   weekly rule without valid weekdays, or an unrepresentable horizon
    /// - [`RecurrenceError::InvalidTask`] when the base task fails validation
    pub fn expand(
        &self,
        base: &Task,
        rule: &RecurrenceRule,
        horizon_months: u32,
    ) -> Result<Vec<Task>, RecurrenceError> {
        rule.validate()?;
        base.validate()
            .map_err(|e| RecurrenceError::InvalidTask(e.to_string()))?;

        let horizon = self
            .zone
            .to_local(self.clock.now())
            .checked_add_months(Months::new(horizon_months))
            .ok_or_else(|| {
                RecurrenceError::InvalidRule(format!(
                    "horizon of {horizon_months} months is out of range"
                ))
            })?;

        let base_local = self.zone.to_local(base.date);
        let time_of_day = truncate_to_minute(base_local.time());
        let reminder_offset = base.reminder_offset();
        let step = Days::new(rule.pattern.step_days());
        let routine_id = self.ids.next_id();

        let mut tasks = Vec::new();
        let mut cursor = base_local;

        for _ in 0..MAX_STEPS {
            if cursor > horizon {
                break;
            }
            let day = cursor.date();
            if rule.end_date.is_some_and(|end| day > end) {
                break;
            }

            if rule.pattern.matches(day) {
                let date = self.zone.combine(day, time_of_day);
                tasks.push(Task {
                    id: self.ids.next_id(),
                    date,
                    routine_id: Some(routine_id.clone()),
                    reminder_time: reminder_offset.map(|offset| date - offset),
                    subtasks: self.fresh_subtasks(&base.subtasks),
                    ..base.clone()
                });
            }

            cursor = match cursor.checked_add_days(step) {
                Some(next) => next,
                None => break,
            };
        }

        tracing::debug!(
            routine_id = %routine_id,
            instances = tasks.len(),
            "expanded routine"
        );
        Ok(tasks)
    }

    /// Same checklist (titles, flags, order) under new ids.
    fn fresh_subtasks(&self, subtasks: &[Subtask]) -> Vec<Subtask> {
        subtasks
            .iter()
            .map(|subtask| Subtask {
                id: self.ids.next_id(),
                ..subtask.clone()
            })
            .collect()
    }
}

/// Expand with the default three-month horizon.
pub fn expand_routine(
    base: &Task,
    rule: &RecurrenceRule,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    zone: LocalZone,
) -> Result<Vec<Task>, RecurrenceError> {
    RecurrenceExpander::new(clock, ids, zone).expand(base, rule, DEFAULT_HORIZON_MONTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SequentialIds};
    use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn base_at(date: DateTime<Utc>) -> Task {
        Task::new("base", "Run", "Sport", date)
    }

    fn dates(tasks: &[Task]) -> Vec<NaiveDate> {
        tasks.iter().map(|t| t.date.date_naive()).collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_starting_wednesday() {
        let clock = FixedClock::new(utc(2024, 1, 1, 8, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let tasks = expander
            .expand(&base_at(utc(2024, 1, 3, 7, 30)), &RecurrenceRule::weekly([1, 3]), 3)
            .unwrap();

        assert_eq!(
            &dates(&tasks)[..3],
            &[ymd(2024, 1, 3), ymd(2024, 1, 8), ymd(2024, 1, 10)]
        );
        assert!(tasks
            .iter()
            .all(|t| matches!(t.date.weekday(), Weekday::Mon | Weekday::Wed)));
    }

    #[test]
    fn interval_every_three_days() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let tasks = expander
            .expand(&base_at(utc(2024, 1, 1, 9, 0)), &RecurrenceRule::every(3), 3)
            .unwrap();

        assert_eq!(
            &dates(&tasks)[..3],
            &[ymd(2024, 1, 1), ymd(2024, 1, 4), ymd(2024, 1, 7)]
        );
    }

    #[test]
    fn daily_stops_at_horizon() {
        let clock = FixedClock::new(utc(2024, 1, 1, 12, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let tasks = expander
            .expand(&base_at(utc(2024, 1, 1, 9, 0)), &RecurrenceRule::daily(), 1)
            .unwrap();

        // Jan 1 .. Feb 1 09:00 (horizon is Feb 1 12:00).
        assert_eq!(tasks.len(), 32);
        assert_eq!(tasks.last().unwrap().date, utc(2024, 2, 1, 9, 0));
    }

    #[test]
    fn daily_hits_step_cap() {
        let clock = FixedClock::new(utc(2024, 1, 1, 12, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let tasks = expander
            .expand(&base_at(utc(2024, 1, 1, 9, 0)), &RecurrenceRule::daily(), 24)
            .unwrap();
        assert_eq!(tasks.len(), MAX_STEPS);
    }

    #[test]
    fn shared_routine_id_and_fresh_ids() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());
        let base = base_at(utc(2024, 1, 1, 9, 0));

        let first = expander.expand(&base, &RecurrenceRule::every(7), 1).unwrap();
        let second = expander.expand(&base, &RecurrenceRule::every(7), 1).unwrap();

        let routine = first[0].routine_id.clone().unwrap();
        assert!(first.iter().all(|t| t.routine_id.as_deref() == Some(routine.as_str())));
        assert_ne!(second[0].routine_id.as_deref(), Some(routine.as_str()));

        let mut all_ids: Vec<_> = first.iter().chain(&second).map(|t| t.id.clone()).collect();
        let total = all_ids.len();
        all_ids.sort();
        all_ids.dedup();
        assert_eq!(all_ids.len(), total);
        assert!(!all_ids.contains(&base.id));
    }

    #[test]
    fn copies_base_fields_and_reminder_offset() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let mut base = base_at(Utc.with_ymd_and_hms(2024, 1, 2, 18, 45, 33).unwrap());
        base.reminder_time = Some(utc(2024, 1, 2, 18, 15));
        base.duration_minutes = Some(40);

        let tasks = expander.expand(&base, &RecurrenceRule::daily(), 1).unwrap();
        let offset = base.date - base.reminder_time.unwrap();

        for task in &tasks {
            assert_eq!(task.title, "Run");
            assert_eq!(task.category, "Sport");
            assert_eq!(task.duration_minutes, Some(40));
            assert_eq!(task.date.format("%H:%M:%S").to_string(), "18:45:00");
            assert_eq!(task.date - task.reminder_time.unwrap(), offset);
        }
    }

    #[test]
    fn subtasks_keep_shape_under_new_ids() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let mut base = base_at(utc(2024, 1, 1, 9, 0));
        base.subtasks = vec![
            Subtask {
                id: "s-1".into(),
                title: "warm up".into(),
                is_completed: false,
            },
            Subtask {
                id: "s-2".into(),
                title: "stretch".into(),
                is_completed: true,
            },
        ];

        let tasks = expander.expand(&base, &RecurrenceRule::every(7), 1).unwrap();
        assert!(tasks.len() > 1);

        let mut subtask_ids = Vec::new();
        for task in &tasks {
            let shape: Vec<_> = task
                .subtasks
                .iter()
                .map(|s| (s.title.as_str(), s.is_completed))
                .collect();
            assert_eq!(shape, vec![("warm up", false), ("stretch", true)]);
            subtask_ids.extend(task.subtasks.iter().map(|s| s.id.clone()));
        }

        let total = subtask_ids.len();
        subtask_ids.sort();
        subtask_ids.dedup();
        assert_eq!(subtask_ids.len(), total);
        assert!(!subtask_ids.contains(&"s-1".to_string()));
    }

    #[test]
    fn time_of_day_is_local() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let zone = LocalZone::from_offset_minutes(-300).unwrap();
        let expander = RecurrenceExpander::new(&clock, &ids, zone);

        // 22:00 local on Wed 2024-01-03 is 03:00 UTC on Thursday.
        let base = base_at(utc(2024, 1, 4, 3, 0));
        let tasks = expander
            .expand(&base, &RecurrenceRule::weekly([3]), 1)
            .unwrap();

        assert_eq!(tasks[0].date, utc(2024, 1, 4, 3, 0));
        assert_eq!(tasks[1].date, utc(2024, 1, 11, 3, 0));
    }

    #[test]
    fn end_date_bounds_the_walk() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let rule = RecurrenceRule::daily().until(ymd(2024, 1, 5));
        let tasks = expander
            .expand(&base_at(utc(2024, 1, 1, 9, 0)), &rule, 3)
            .unwrap();
        assert_eq!(tasks.len(), 5);
    }

    #[test]
    fn base_past_horizon_yields_nothing() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());

        let tasks = expander
            .expand(&base_at(utc(2024, 6, 1, 9, 0)), &RecurrenceRule::daily(), 3)
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn invalid_inputs_are_rejected_up_front() {
        let clock = FixedClock::new(utc(2024, 1, 1, 0, 0));
        let ids = SequentialIds::new("id");
        let expander = RecurrenceExpander::new(&clock, &ids, LocalZone::utc());
        let base = base_at(utc(2024, 1, 1, 9, 0));

        assert!(matches!(
            expander.expand(&base, &RecurrenceRule::weekly([]), 3),
            Err(RecurrenceError::InvalidRule(_))
        ));
        assert!(matches!(
            expander.expand(&base, &RecurrenceRule::every(1), 3),
            Err(RecurrenceError::InvalidRule(_))
        ));

        let mut late_reminder = base.clone();
        late_reminder.reminder_time = Some(utc(2024, 1, 1, 10, 0));
        assert!(matches!(
            expander.expand(&late_reminder, &RecurrenceRule::daily(), 3),
            Err(RecurrenceError::InvalidTask(_))
        ));
    }
}
