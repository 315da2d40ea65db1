//! Shared helpers for CLI commands.

use chrono::{NaiveDate, NaiveTime};
use planwise_core::storage::Config;
use planwise_core::{Planner, Task, TaskDb};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk store with settings from the user's config.
pub fn open_planner() -> Result<Planner<TaskDb>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = TaskDb::open()?;
    let planner = Planner::from_config(db, &config);
    tracing::debug!(
        utc_offset_minutes = planner.zone().offset_minutes(),
        horizon_months = config.routine.horizon_months,
        "planner opened"
    );
    Ok(planner)
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{raw}' (expected YYYY-MM-DD): {e}"))
}

/// Parse `HH:MM`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|e| format!("invalid time '{raw}' (expected HH:MM): {e}"))
}

/// Parse a comma-separated weekday list, Sunday = 0 (e.g. "1,3,5").
pub fn parse_weekdays(raw: &str) -> Result<Vec<u8>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|_| format!("invalid weekday '{s}' (expected 0-6, Sunday = 0)"))
        })
        .collect()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line summary of a task in the planner's zone.
pub fn task_line(task: &Task, planner: &Planner<TaskDb>) -> String {
    let local = planner.zone().to_local(task.date);
    let check = if task.is_completed { "x" } else { " " };
    let routine = if task.routine_id.is_some() { " (routine)" } else { "" };
    format!(
        "[{check}] {}  {}  {:<8} {:<6} {}{routine}",
        task.id,
        local.format("%Y-%m-%d %H:%M"),
        task.category,
        task.priority.as_str(),
        task.title,
    )
}
