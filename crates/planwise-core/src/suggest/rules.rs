//! The individual suggestion rules.
//!
//! Each rule reads the history and pushes zero or more proposals. Rules never
//! fail; a rule whose precondition does not hold contributes nothing.

use chrono::{DateTime, Duration, Utc, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Suggestion;
use crate::calendar::LocalZone;
use crate::clock::IdGenerator;
use crate::task::{normalize_title, Task};

/// Minimum occurrences before a title counts as a habit.
pub const MIN_OCCURRENCES: usize = 3;
/// Habit predictions further out than this are dropped.
pub const LOOKAHEAD_DAYS: i64 = 7;
/// A health category untouched this long gets resurfaced.
pub const NEGLECT_DAYS: i64 = 5;

pub const WEEKLY_REVIEW_TITLE: &str = "Weekly Review";
pub const WEEKLY_REVIEW_MINUTES: u32 = 30;
pub const CLEAR_INBOX_TITLE: &str = "Clear inbox";
pub const CLEAR_INBOX_MINUTES: u32 = 15;
pub const WORKOUT_TITLE: &str = "Workout / Walk";
pub const WORKOUT_MINUTES: u32 = 45;
pub const CALL_SOMEONE_TITLE: &str = "Call a friend or relative";
pub const CALL_SOMEONE_MINUTES: u32 = 20;

/// Category keys the contextual rules read and write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRules {
    /// Category of the weekly review nudge
    #[serde(default = "default_review_category")]
    pub review_category: String,
    /// Category of the Friday wrap-up
    #[serde(default = "default_wrap_up_category")]
    pub wrap_up_category: String,
    /// Categories that count as health activity; the first is used for
    /// resurfacing suggestions
    #[serde(default = "default_health_categories")]
    pub health_categories: Vec<String>,
    /// Category checked and used by the weekend nudge
    #[serde(default = "default_social_category")]
    pub social_category: String,
}

fn default_review_category() -> String {
    "Productivity".into()
}
fn default_wrap_up_category() -> String {
    "Work".into()
}
fn default_health_categories() -> Vec<String> {
    vec!["Health".into(), "Sport".into()]
}
fn default_social_category() -> String {
    "Social".into()
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            review_category: default_review_category(),
            wrap_up_category: default_wrap_up_category(),
            health_categories: default_health_categories(),
            social_category: default_social_category(),
        }
    }
}

impl SuggestionRules {
    fn health_category(&self) -> String {
        self.health_categories
            .first()
            .cloned()
            .unwrap_or_else(|| default_health_categories().remove(0))
    }
}

/// Everything a rule may look at.
pub(crate) struct RuleContext<'a> {
    pub history: &'a [Task],
    pub now: DateTime<Utc>,
    pub zone: LocalZone,
    pub ids: &'a dyn IdGenerator,
    pub rules: &'a SuggestionRules,
}

impl RuleContext<'_> {
    fn fixed(
        &self,
        title: &str,
        category: &str,
        date: DateTime<Utc>,
        minutes: u32,
        reason: &str,
    ) -> Suggestion {
        Suggestion {
            id: self.ids.next_id(),
            title: title.to_string(),
            category: category.to_string(),
            duration_minutes: Some(minutes),
            suggested_date: date,
            reason: reason.to_string(),
            original_task_id: None,
        }
    }
}

/// Habits: titles seen at least three times, projected forward by their
/// average spacing.
pub(crate) fn habits(ctx: &RuleContext<'_>, out: &mut Vec<Suggestion>) {
    let mut groups: IndexMap<String, Vec<&Task>> = IndexMap::new();
    for task in ctx.history {
        groups.entry(task.normalized_title()).or_default().push(task);
    }

    let window_start = ctx.zone.start_of_day(ctx.now);
    let window_end = ctx.now + Duration::days(LOOKAHEAD_DAYS);

    for (key, mut group) in groups {
        if group.len() < MIN_OCCURRENCES {
            continue;
        }
        group.sort_by(|a, b| b.date.cmp(&a.date));

        let latest = group[0];
        let total_days: i64 = group
            .windows(2)
            .map(|pair| (pair[0].date - pair[1].date).num_days())
            .sum();
        let average = (total_days as f64 / (group.len() - 1) as f64).round() as i64;

        let Some(next) = ctx.zone.add_days(latest.date, average) else {
            continue;
        };
        if next < window_start || next > window_end {
            continue;
        }

        let planned = ctx
            .history
            .iter()
            .any(|t| normalize_title(&t.title) == key && ctx.zone.same_day(t.date, next));
        if planned {
            continue;
        }

        tracing::debug!(title = %latest.title, every_days = average, "habit detected");
        out.push(Suggestion {
            id: ctx.ids.next_id(),
            title: latest.title.clone(),
            category: latest.category.clone(),
            duration_minutes: latest.duration_minutes,
            suggested_date: next,
            reason: habit_reason(average),
            original_task_id: Some(latest.id.clone()),
        });
    }
}

fn habit_reason(days: i64) -> String {
    if days == 1 {
        "Usually done about every day".to_string()
    } else {
        format!("Usually done about every {days} days")
    }
}

/// Sunday or Monday: plan the week, unless a review already exists.
pub(crate) fn weekly_review(ctx: &RuleContext<'_>, out: &mut Vec<Suggestion>) {
    if !matches!(ctx.zone.weekday(ctx.now), Weekday::Sun | Weekday::Mon) {
        return;
    }

    let has_review = ctx.history.iter().any(|t| {
        let title = t.title.to_lowercase();
        title.contains("review")
            || title.contains("bilan")
            || (ctx.zone.same_day(t.date, ctx.now) && t.title.contains("Planification"))
    });
    if has_review {
        return;
    }

    out.push(ctx.fixed(
        WEEKLY_REVIEW_TITLE,
        &ctx.rules.review_category,
        ctx.now,
        WEEKLY_REVIEW_MINUTES,
        "Start the week on the right foot",
    ));
}

/// Friday: clear the inbox before the weekend.
pub(crate) fn friday_wrap_up(ctx: &RuleContext<'_>, out: &mut Vec<Suggestion>) {
    if ctx.zone.weekday(ctx.now) != Weekday::Fri {
        return;
    }
    out.push(ctx.fixed(
        CLEAR_INBOX_TITLE,
        &ctx.rules.wrap_up_category,
        ctx.now,
        CLEAR_INBOX_MINUTES,
        "Finish the week with a clear mind",
    ));
}

/// No health activity in the last five days: suggest some for tomorrow.
pub(crate) fn neglected_health(ctx: &RuleContext<'_>, out: &mut Vec<Suggestion>) {
    // Future tasks count as recent, matching "less than five whole days ago".
    let recent = ctx.history.iter().any(|t| {
        ctx.rules.health_categories.contains(&t.category)
            && (ctx.now - t.date).num_days() < NEGLECT_DAYS
    });
    if recent {
        return;
    }

    let Some(tomorrow) = ctx.zone.add_days(ctx.now, 1) else {
        return;
    };
    out.push(ctx.fixed(
        WORKOUT_TITLE,
        &ctx.rules.health_category(),
        tomorrow,
        WORKOUT_MINUTES,
        "No health activity detected recently",
    ));
}

/// Weekend without anything social planned today.
pub(crate) fn weekend_social(ctx: &RuleContext<'_>, out: &mut Vec<Suggestion>) {
    if !ctx.zone.is_weekend(ctx.now) {
        return;
    }

    let has_social = ctx
        .history
        .iter()
        .any(|t| t.category == ctx.rules.social_category && ctx.zone.same_day(t.date, ctx.now));
    if has_social {
        return;
    }

    out.push(ctx.fixed(
        CALL_SOMEONE_TITLE,
        &ctx.rules.social_category,
        ctx.now,
        CALL_SOMEONE_MINUTES,
        "It's the weekend, make the most of it",
    ));
}
