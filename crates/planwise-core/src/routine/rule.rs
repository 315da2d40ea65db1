//! Recurrence rules for routines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::weekday_index;
use crate::error::RecurrenceError;

/// Smallest step an interval routine may use. A step of one day is `Daily`.
pub const MIN_INTERVAL_DAYS: u32 = 2;

/// How a routine repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Every day.
    Daily,
    /// Days whose weekday index (0 = Sunday .. 6 = Saturday) is listed.
    Weekly {
        #[serde(rename = "weekDays")]
        week_days: Vec<u8>,
    },
    /// Every `days`-th day starting from the base date.
    Interval {
        #[serde(rename = "intervalDays")]
        days: u32,
    },
}

impl Recurrence {
    /// Days the expansion walk advances per step.
    pub fn step_days(&self) -> u64 {
        match self {
            Recurrence::Interval { days } => u64::from(*days),
            Recurrence::Daily | Recurrence::Weekly { .. } => 1,
        }
    }

    /// Whether a walk position produces an instance.
    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            Recurrence::Daily | Recurrence::Interval { .. } => true,
            Recurrence::Weekly { week_days } => week_days.contains(&weekday_index(day)),
        }
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        match self {
            Recurrence::Daily => Ok(()),
            Recurrence::Interval { days } if *days < MIN_INTERVAL_DAYS => {
                Err(RecurrenceError::InvalidRule(format!(
                    "interval must be at least {MIN_INTERVAL_DAYS} days, got {days}"
                )))
            }
            Recurrence::Interval { .. } => Ok(()),
            Recurrence::Weekly { week_days } if week_days.is_empty() => Err(
                RecurrenceError::InvalidRule("weekly routine needs at least one weekday".into()),
            ),
            Recurrence::Weekly { week_days } => match week_days.iter().find(|d| **d > 6) {
                Some(bad) => Err(RecurrenceError::InvalidRule(format!(
                    "weekday index {bad} is outside 0..=6"
                ))),
                None => Ok(()),
            },
        }
    }
}

/// A recurrence pattern with an optional last day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(flatten)]
    pub pattern: Recurrence,
    /// Last local calendar day that may carry an instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(pattern: Recurrence) -> Self {
        Self {
            pattern,
            end_date: None,
        }
    }

    pub fn daily() -> Self {
        Self::new(Recurrence::Daily)
    }

    pub fn weekly(week_days: impl IntoIterator<Item = u8>) -> Self {
        let mut days: Vec<u8> = week_days.into_iter().collect();
        days.sort_unstable();
        days.dedup();
        Self::new(Recurrence::Weekly { week_days: days })
    }

    pub fn every(days: u32) -> Self {
        Self::new(Recurrence::Interval { days })
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        self.pattern.validate()
    }
}
