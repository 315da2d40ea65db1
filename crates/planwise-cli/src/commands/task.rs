//! Task management commands for CLI.

use clap::Subcommand;
use planwise_core::{Priority, ReminderLead, TaskDraft, TaskPatch};

use crate::common::{open_planner, parse_date, parse_time, print_json, task_line, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Category key (e.g. "Work")
        #[arg(long, default_value = "Personal")]
        category: String,
        /// Day, YYYY-MM-DD
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
        /// Checklist item (repeatable)
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// List tasks
    List {
        /// Only tasks on this day, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Hide completed tasks
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get task details
    Get {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
        /// New day, YYYY-MM-DD (keeps the time of day unless --time is given)
        #[arg(long)]
        date: Option<String>,
        /// New time of day, HH:MM
        #[arg(long)]
        time: Option<String>,
        /// New duration in minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Toggle a task's completion
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Search tasks by title
    Search {
        /// Case-insensitive text to look for
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TaskAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        TaskAction::Add {
            title,
            category,
            date,
            time,
            priority,
            reminder,
            duration,
            subtasks,
        } => {
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
            let task = planner.add_task(draft)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List {
            date,
            pending,
            json,
        } => {
            let day = date.as_deref().map(parse_date).transpose()?;
            let zone = planner.zone();
            let tasks: Vec<_> = planner
                .tasks()?
                .into_iter()
                .filter(|t| day.map_or(true, |d| zone.day_of(t.date) == d))
                .filter(|t| !pending || !t.is_completed)
                .collect();

            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                for task in &tasks {
                    println!("{}", task_line(task, &planner));
                }
            }
        }
        TaskAction::Get { id } => {
            let task = planner.task(&id)?;
            print_json(&task)?;
        }
        TaskAction::Update {
            id,
            title,
            category,
            priority,
            date,
            time,
            duration,
        } => {
            let zone = planner.zone();
            let current = planner.task(&id)?;
            let new_date = if date.is_some() || time.is_some() {
                let local = zone.to_local(current.date);
                let day = match date {
                    Some(raw) => parse_date(&raw)?,
                    None => local.date(),
                };
                let time = match time {
                    Some(raw) => parse_time(&raw)?,
                    None => local.time(),
                };
                Some(zone.combine(day, time))
            } else {
                None
            };

            let patch = TaskPatch {
                title,
                category,
                priority,
                date: new_date,
                is_completed: None,
                duration_minutes: duration,
            };
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            let task = planner.update_task(&id, patch)?;
            println!("Task updated: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::Done { id } => {
            let task = planner.toggle_task(&id)?;
            let state = if task.is_completed { "completed" } else { "reopened" };
            println!("Task {state}: {}", task.id);
        }
        TaskAction::Delete { id } => {
            if !planner.remove_task(&id)? {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
        TaskAction::Search { query, json } => {
            let tasks = planner.search(&query)?;
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks match '{query}'.");
            } else {
                for task in &tasks {
                    println!("{}", task_line(task, &planner));
                }
            }
        }
    }
    Ok(())
}
