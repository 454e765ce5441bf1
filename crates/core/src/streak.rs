//! Daily completion streaks.
//!
//! A streak counts consecutive calendar days with at least one lesson
//! completion. Calendar days are cut at midnight of a fixed UTC offset
//! (UTC+5 by default), independent of the server zone and of any user zone.
//! Days are persisted as `YYYY-MM-DD` keys.

use std::fmt;

use chrono::{Duration, FixedOffset, NaiveDate};

use crate::types::Timestamp;

/// Offset, in hours east of UTC, used to cut calendar days.
pub const DEFAULT_DAY_BOUNDARY_UTC_OFFSET_HOURS: i32 = 5;

/// Format of a persisted day key.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Maps instants to calendar-day keys in a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Build a boundary `hours` east of UTC. Returns `None` outside (-24, 24).
    pub fn from_utc_offset_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours.checked_mul(3600)?).map(|offset| Self { offset })
    }

    /// Calendar date of `instant` shifted by the configured offset.
    pub fn day_key(&self, instant: Timestamp) -> DayKey {
        DayKey(instant.with_timezone(&self.offset).date_naive())
    }

    /// `(today, yesterday)` relative to `now`.
    pub fn today_and_yesterday(&self, now: Timestamp) -> (DayKey, DayKey) {
        (self.day_key(now), self.day_key(now - Duration::hours(24)))
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::from_utc_offset_hours(DEFAULT_DAY_BOUNDARY_UTC_OFFSET_HOURS)
            .expect("default day boundary offset is in range")
    }
}

/// A calendar day in the streak time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Parse a stored `YYYY-MM-DD` key. Malformed keys yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT).ok().map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_KEY_FORMAT))
    }
}

/// The streak fields of a user row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Streak {
    pub count: i32,
    pub last_day: Option<String>,
}

/// What a lesson completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// No day recorded yet; streak starts at 1.
    Started,
    /// Already credited today.
    Unchanged,
    /// Last credit was yesterday; streak grows by one.
    Extended,
    /// Gap of two or more days, or an unusable stored key; back to 1.
    Reset,
}

/// Decide the next streak after a lesson's first completion.
///
/// Returns the change kind and the streak to persist (equal to `current`
/// when unchanged).
pub fn advance_streak(current: &Streak, today: DayKey, yesterday: DayKey) -> (StreakChange, Streak) {
    let restart = || Streak {
        count: 1,
        last_day: Some(today.to_string()),
    };

    let Some(raw_last) = current.last_day.as_deref() else {
        return (StreakChange::Started, restart());
    };

    match DayKey::parse(raw_last) {
        Some(last) if last == today => (StreakChange::Unchanged, current.clone()),
        Some(last) if last == yesterday => (
            StreakChange::Extended,
            Streak {
                count: current.count.max(0) + 1,
                last_day: Some(today.to_string()),
            },
        ),
        _ => (StreakChange::Reset, restart()),
    }
}
