//! Routine commands: expand a recurring task into instances, or remove them.

use clap::{Subcommand, ValueEnum};
use planwise_core::{Priority, RecurrenceRule, ReminderLead, TaskDraft};

use crate::common::{open_planner, parse_date, parse_time, parse_weekdays, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum RepeatKind {
    Daily,
    Weekly,
    Interval,
}

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Create a routine and store its instances
    Create {
        /// Task title
        title: String,
        /// How the routine repeats
        #[arg(long, value_enum)]
        repeat: RepeatKind,
        /// Weekdays for weekly routines, Sunday = 0 (e.g. "1,3")
        #[arg(long)]
        days: Option<String>,
        /// Spacing in days for interval routines (at least 2)
        #[arg(long)]
        every: Option<u32>,
        /// Last day that may carry an instance, YYYY-MM-DD
        #[arg(long)]
        until: Option<String>,
        /// Category key
        #[arg(long, default_value = "Personal")]
        category: String,
        /// First day, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Time of day, HH:MM (default 09:00)
        #[arg(long)]
        time: Option<String>,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Reminder lead: 15m, 1h or 1d
        #[arg(long)]
        reminder: Option<ReminderLead>,
        /// Expected duration in minutes
        #[arg(long)]
        duration: Option<u32>,
        /// Checklist item copied to every instance (repeatable)
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// Delete every instance of a routine
    Remove {
        /// Routine ID
        routine_id: String,
    },
}

fn build_rule(
    repeat: RepeatKind,
    days: Option<String>,
    every: Option<u32>,
    until: Option<String>,
) -> Result<RecurrenceRule, Box<dyn std::error::Error>> {
    let rule = match repeat {
        RepeatKind::Daily => RecurrenceRule::daily(),
        RepeatKind::Weekly => {
            let raw = days.ok_or("weekly routines need --days")?;
            RecurrenceRule::weekly(parse_weekdays(&raw)?)
        }
        RepeatKind::Interval => {
            let every = every.ok_or("interval routines need --every")?;
            RecurrenceRule::every(every)
        }
    };
    Ok(match until {
        Some(raw) => rule.until(parse_date(&raw)?),
        None => rule,
    })
}

pub fn run(action: RoutineAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        RoutineAction::Create {
            title,
            repeat,
            days,
            every,
            until,
            category,
            date,
            time,
            priority,
            reminder,
            duration,
            subtasks,
        } => {
            let rule = build_rule(repeat, days, every, until)?;
            let mut draft = TaskDraft::new(title, category, parse_date(&date)?).with_priority(priority);
            if let Some(time) = time {
                draft = draft.with_time(parse_time(&time)?);
            }
            if let Some(lead) = reminder {
                draft = draft.with_reminder(lead);
            }
            if let Some(minutes) = duration {
                draft = draft.with_duration(minutes);
            }
            for subtask in subtasks {
                draft = draft.with_subtask(subtask);
            }

            let instances = planner.create_routine(draft, &rule)?;
            match instances.first().and_then(|t| t.routine_id.as_deref()) {
                Some(routine_id) => {
                    println!("Routine created: {routine_id}");
                    println!("{} instances", instances.len());
                }
                None => println!("Routine produced no instances within the horizon."),
            }
        }
        RoutineAction::Remove { routine_id } => {
            let removed = planner.remove_routine(&routine_id)?;
            if removed == 0 {
                return Err(format!("routine not found: {routine_id}").into());
            }
            println!("Routine removed: {routine_id} ({removed} tasks)");
        }
    }
    Ok(())
}
