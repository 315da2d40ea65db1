//! Suggestion engine.
//!
//! Mines the task history for habits and adds a handful of contextual
//! nudges for the coming week:
//! - Habits: titles seen at least three times, projected by average spacing
//! - Weekly review on Sunday or Monday
//! - Inbox wrap-up on Friday
//! - Health activity when none happened in the last five days
//! - A social call on weekends
//!
//! Results are deduplicated on (title, local calendar day) and capped at
//! [`MAX_SUGGESTIONS`], keeping rule order. Suggestions are ephemeral; the
//! engine only reads history.

mod rules;

pub use rules::{
    SuggestionRules, CALL_SOMEONE_TITLE, CLEAR_INBOX_TITLE, LOOKAHEAD_DAYS, MIN_OCCURRENCES,
    NEGLECT_DAYS, WEEKLY_REVIEW_TITLE, WORKOUT_TITLE,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::LocalZone;
use crate::clock::{Clock, IdGenerator};
use crate::task::Task;
use rules::RuleContext;

/// Upper bound on suggestions returned per run.
pub const MAX_SUGGESTIONS: usize = 5;

/// An advisory proposal for a new task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub suggested_date: DateTime<Utc>,
    /// Human-readable explanation
    pub reason: String,
    /// Most recent task the suggestion was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_task_id: Option<String>,
}

/// Suggestion engine over an injected clock and id source.
pub struct SuggestionEngine<'a> {
    clock: &'a dyn Clock,
    ids: &'a dyn IdGenerator,
    zone: LocalZone,
    rules: SuggestionRules,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(clock: &'a dyn Clock, ids: &'a dyn IdGenerator, zone: LocalZone) -> Self {
        Self {
            clock,
            ids,
            zone,
            rules: SuggestionRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: SuggestionRules) -> Self {
        self.rules = rules;
        self
    }

    /// Generate suggestions for the week ahead of the clock's "now".
    pub fn generate(&self, history: &[Task]) -> Vec<Suggestion> {
        let ctx = RuleContext {
            history,
            now: self.clock.now(),
            zone: self.zone,
            ids: self.ids,
            rules: &self.rules,
        };

        let mut proposals = Vec::new();
        rules::habits(&ctx, &mut proposals);
        rules::weekly_review(&ctx, &mut proposals);
        rules::friday_wrap_up(&ctx, &mut proposals);
        rules::neglected_health(&ctx, &mut proposals);
        rules::weekend_social(&ctx, &mut proposals);

        let suggestions = finalize(proposals, self.zone);
        tracing::debug!(count = suggestions.len(), "generated suggestions");
        suggestions
    }
}

/// Drop later proposals that repeat an earlier title on the same local day,
/// then keep the first [`MAX_SUGGESTIONS`].
pub fn finalize(proposals: Vec<Suggestion>, zone: LocalZone) -> Vec<Suggestion> {
    let mut kept: Vec<Suggestion> = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        let duplicate = kept.iter().any(|s| {
            s.title == proposal.title && zone.same_day(s.suggested_date, proposal.suggested_date)
        });
        if !duplicate {
            kept.push(proposal);
        }
    }
    kept.truncate(MAX_SUGGESTIONS);
    kept
}
