//! The fixed 7-day export window

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};
use crate::timestamp::parse_date;

/// Number of daily pages in a package.
pub const DAYS_PER_WEEK: usize = 7;

/// A 7-day span starting at `start`; `end` is always `start + 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    /// Create a week starting on the given date
    #[inline]
    #[must_use]
    pub const fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    /// Build a week from the request's `weekStart` / `weekEnd` strings.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidWeek`] if either bound is missing or
    /// unparseable, or if the bounds do not span exactly seven days.
    pub fn from_bounds(week_start: &str, week_end: &str) -> Result<Self> {
        if week_start.trim().is_empty() || week_end.trim().is_empty() {
            return Err(CalendarError::invalid_week("missing weekStart or weekEnd"));
        }
        let start = parse_date(week_start).ok_or_else(|| {
            CalendarError::invalid_week(format!("unparseable weekStart '{week_start}'"))
        })?;
        let end = parse_date(week_end).ok_or_else(|| {
            CalendarError::invalid_week(format!("unparseable weekEnd '{week_end}'"))
        })?;

        let week = Self::starting(start);
        if end != week.end() {
            return Err(CalendarError::invalid_week(format!(
                "weekEnd {end} must be six days after weekStart {start} (expected {})",
                week.end()
            )));
        }
        Ok(week)
    }

    /// First day of the week
    #[inline]
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the week (inclusive)
    #[inline]
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    /// Date of the `index`-th day (0 = first day). Indexes past 6 are clamped.
    #[inline]
    #[must_use]
    pub fn day(&self, index: usize) -> NaiveDate {
        let index = index.min(DAYS_PER_WEEK - 1);
        self.start + Duration::days(index as i64)
    }

    /// All seven dates in page order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..DAYS_PER_WEEK).map(move |i| self.day(i))
    }

    /// Whether `date` falls inside `[start, end]`
    #[inline]
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// Position of `date` within the week, if it falls inside it
    #[must_use]
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            usize::try_from((date - self.start).num_days()).ok()
        } else {
            None
        }
    }

    /// ISO week number of the first day
    #[inline]
    #[must_use]
    pub fn iso_week(&self) -> u32 {
        self.start.iso_week().week()
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}
