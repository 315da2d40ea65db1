//! Calendar-day arithmetic in an explicit local zone.
//!
//! Instants are stored as `DateTime<Utc>`. Anything that talks about a
//! *day* ("is this task today", "start of day", "every Monday", "same time
//! three days later") is evaluated in a caller-supplied [`LocalZone`].
//! The zone is a fixed UTC offset, so every local wall time maps to exactly
//! one instant and day arithmetic never lands in a DST gap.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone, Timelike, Utc, Weekday,
};

/// The fixed-offset zone used for every calendar-day decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset_seconds: i32,
}

impl LocalZone {
    pub fn utc() -> Self {
        Self { offset_seconds: 0 }
    }

    /// Zone at `minutes` east of UTC. Returns `None` outside +-24h.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|_| Self {
            offset_seconds: seconds,
        })
    }

    /// The machine's current local offset.
    pub fn system() -> Self {
        Self {
            offset_seconds: chrono::Local::now().offset().local_minus_utc(),
        }
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_seconds / 60
    }

    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_seconds).unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock reading of `at` in this zone.
    pub fn to_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset()).naive_local()
    }

    /// Instant at which this zone's wall clock reads `local`.
    pub fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(self.offset_seconds))))
    }

    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        self.to_local(at).date()
    }

    pub fn start_of_day(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        self.from_local(self.day_of(at).and_time(NaiveTime::MIN))
    }

    pub fn same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_of(a) == self.day_of(b)
    }

    pub fn weekday(&self, at: DateTime<Utc>) -> Weekday {
        self.day_of(at).weekday()
    }

    pub fn is_weekend(&self, at: DateTime<Utc>) -> bool {
        matches!(self.weekday(at), Weekday::Sat | Weekday::Sun)
    }

    /// Same local wall time `days` calendar days later (or earlier).
    pub fn add_days(&self, at: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
        let local = self.to_local(at);
        let shifted = if days >= 0 {
            local.checked_add_days(Days::new(days.unsigned_abs()))?
        } else {
            local.checked_sub_days(Days::new(days.unsigned_abs()))?
        };
        Some(self.from_local(shifted))
    }

    /// Same local wall time `months` months later, clamped to month end.
    pub fn add_months(&self, at: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
        let shifted = self.to_local(at).checked_add_months(Months::new(months))?;
        Some(self.from_local(shifted))
    }

    /// `day` at `time`, with seconds and sub-seconds dropped.
    pub fn combine(&self, day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let minute = truncate_to_minute(time);
        self.from_local(day.and_time(minute))
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::utc()
    }
}

/// Weekday index with Sunday as 0, as used by weekly routines.
pub fn weekday_index(day: NaiveDate) -> u8 {
    day.weekday().num_days_from_sunday() as u8
}

pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(NaiveTime::MIN)
}
