//! Event normalizer: raw records in, the week's canonical events out
//!
//! Pure function over its input. Records that cannot be used are counted in
//! a [`NormalizeReport`] and dropped; nothing here fails an export.

use serde::{Deserialize, Serialize};

use crate::event::{Event, RawEvent, Rejection};
use crate::week::Week;

/// Diagnostic counts from one normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizeReport {
    /// Records received
    pub received: usize,
    /// Records that parsed into events (inside or outside the week)
    pub parsed: usize,
    /// Records dropped for malformed shape or unparseable timestamps
    pub skipped_unparseable: usize,
    /// Records dropped because end was not after start
    pub skipped_invalid_range: usize,
    /// Parsed events whose start date lies outside the week
    pub outside_week: usize,
}

impl NormalizeReport {
    /// Total records that did not make it into the week
    #[inline]
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.skipped_unparseable + self.skipped_invalid_range + self.outside_week
    }

    /// Records skipped for data-quality reasons
    #[inline]
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_unparseable + self.skipped_invalid_range
    }
}

impl std::fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} received, {} parsed, {} unparseable, {} invalid range, {} outside week",
            self.received,
            self.parsed,
            self.skipped_unparseable,
            self.skipped_invalid_range,
            self.outside_week
        )
    }
}

/// The week plus the events that belong to it, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedWeek {
    /// Export window
    pub week: Week,
    /// Events whose start date falls inside the week, input order preserved
    pub events: Vec<Event>,
    /// Diagnostics
    pub report: NormalizeReport,
}

impl NormalizedWeek {
    /// Events for the `index`-th day of the week, input order preserved
    pub fn events_on(&self, index: usize) -> impl Iterator<Item = &Event> + '_ {
        let date = self.week.day(index);
        self.events.iter().filter(move |e| e.date() == date)
    }

    /// Per-day buckets in page order
    #[must_use]
    pub fn by_day(&self) -> Vec<Vec<&Event>> {
        (0..crate::DAYS_PER_WEEK)
            .map(|i| self.events_on(i).collect())
            .collect()
    }
}

/// Normalize already-decoded records against a week.
///
/// Keeps only events whose start date lies in `[week.start, week.end]`
/// (inclusive of the whole final day). Output order is input order.
#[must_use]
pub fn normalize_events<I>(records: I, week: &Week) -> NormalizedWeek
where
    I: IntoIterator<Item = RawEvent>,
{
    normalize_inner(records.into_iter().map(Some), week)
}

/// Normalize JSON records, counting non-object or mistyped records as
/// unparseable instead of failing.
#[must_use]
pub fn normalize_records(records: &[serde_json::Value], week: &Week) -> NormalizedWeek {
    normalize_inner(records.iter().map(RawEvent::from_value), week)
}

fn normalize_inner<I>(records: I, week: &Week) -> NormalizedWeek
where
    I: Iterator<Item = Option<RawEvent>>,
{
    let mut report = NormalizeReport::default();
    let mut events = Vec::new();

    for (position, record) in records.enumerate() {
        report.received += 1;

        let Some(raw) = record else {
            report.skipped_unparseable += 1;
            log::warn!("Skipping event #{position}: malformed record");
            continue;
        };

        match Event::from_raw(raw, position) {
            Ok(event) => {
                report.parsed += 1;
                if week.contains(event.date()) {
                    events.push(event);
                } else {
                    report.outside_week += 1;
                    log::debug!(
                        "Event '{}' on {} is outside week {week}",
                        event.title,
                        event.date()
                    );
                }
            }
            Err(Rejection::Unparseable) => {
                report.skipped_unparseable += 1;
                log::warn!("Skipping event #{position}: unparseable start or end time");
            }
            Err(Rejection::InvalidRange) => {
                report.skipped_invalid_range += 1;
                log::warn!("Skipping event #{position}: end time is not after start time");
            }
        }
    }

    log::info!("Normalized events for {week}: {report}");

    NormalizedWeek {
        week: *week,
        events,
        report,
    }
}
