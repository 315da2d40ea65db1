//! Statistics over the task list.
//!
//! - Completion rate across all tasks
//! - Task counts per registered category
//! - Completed/pending counts for each day of the current week (Monday first)

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::LocalZone;
use crate::task::{Category, Task};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    /// Rounded percentage, 0 when there are no tasks
    pub rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category_id: String,
    pub label: String,
    pub color: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub label: String,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
    pub completion: CompletionStats,
    pub by_category: Vec<CategoryCount>,
    pub week: Vec<DayActivity>,
}

pub fn completion(tasks: &[Task]) -> CompletionStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.is_completed).count();
    let rate = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };
    CompletionStats {
        total,
        completed,
        rate,
    }
}

/// Counts for registered categories, in registry order. Empty ones are left out.
pub fn by_category(tasks: &[Task], categories: &[Category]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(task.category.as_str()).or_insert(0) += 1;
    }

    categories
        .iter()
        .filter_map(|category| {
            let count = counts.get(category.id.as_str()).copied().unwrap_or(0);
            (count > 0).then(|| CategoryCount {
                category_id: category.id.clone(),
                label: category.label.clone(),
                color: category.color.clone(),
                count,
            })
        })
        .collect()
}

/// Monday-to-Sunday activity for the week containing `now`.
pub fn weekly_activity(tasks: &[Task], now: DateTime<Utc>, zone: LocalZone) -> Vec<DayActivity> {
    let today = zone.day_of(now);
    let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));

    monday
        .iter_days()
        .take(7)
        .map(|day| {
            let (completed, pending) = tasks
                .iter()
                .filter(|t| zone.day_of(t.date) == day)
                .fold((0, 0), |(done, open), t| {
                    if t.is_completed {
                        (done + 1, open)
                    } else {
                        (done, open + 1)
                    }
                });
            DayActivity {
                date: day,
                label: day.format("%a").to_string(),
                completed,
                pending,
            }
        })
        .collect()
}

pub fn compute(
    tasks: &[Task],
    categories: &[Category],
    now: DateTime<Utc>,
    zone: LocalZone,
) -> Statistics {
    Statistics {
        completion: completion(tasks),
        by_category: by_category(tasks, categories),
        week: weekly_activity(tasks, now, zone),
    }
}
