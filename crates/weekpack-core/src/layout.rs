//! Layout Calculator: event times to grid coordinates
//!
//! The planner grid runs from 06:00 to 24:00 in 30-minute slots (36 rows).
//! Both page types place events through the single [`slot_index`] function,
//! so an event lands in the same slot on the weekly page and on its daily
//! page. Only the points-per-slot constant differs between the two views.
//!
//! Starts before 06:00 clamp to the first slot and starts at or after 23:30
//! clamp to the last one. A block's time span is capped at the rows left
//! below its start, so time alone never pushes a block past the grid; only
//! the content bonus on daily pages can, and that is logged.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use weekpack_calendar::Event;

use crate::font::TextMeasure;
use crate::geometry::{BoundingBox, Size};
use crate::text::wrap_text;

/// Minutes after midnight at which the grid starts (06:00)
pub const GRID_START_MINUTES: u32 = 6 * 60;

/// Length of one slot
pub const SLOT_MINUTES: u32 = 30;

/// Slots per day (06:00 through 23:30)
pub const SLOT_COUNT: usize = 36;

/// Hours covered by the grid
pub const GRID_HOURS: f64 = 18.0;

/// Extra height per wrapped note or action item line
pub const LINE_BONUS: f64 = 15.0;

/// Extra height per present section header ("Notes", "Action Items")
pub const SECTION_HEADER_BONUS: f64 = 20.0;

/// Inner padding of a daily event block
pub const BLOCK_PADDING: f64 = 3.0;

/// Font size and line advance for daily block titles
pub const TITLE_SIZE: f64 = 8.0;
/// Line advance for titles that fit the time-based block
pub const TITLE_LEAD: f64 = 10.0;

/// Font size and line advance for the time/source line
pub const META_SIZE: f64 = 6.5;
/// Line advance of the time/source line
pub const META_LEAD: f64 = 9.0;

/// Font size for note and action item lines
pub const BODY_SIZE: f64 = 7.0;

/// Font size for weekly block text
pub const WEEKLY_TEXT_SIZE: f64 = 6.0;
/// Line advance for weekly block text
pub const WEEKLY_TEXT_LEAD: f64 = 7.0;

/// Prefix for note lines
pub const NOTE_BULLET: &str = "\u{2022} ";
/// Prefix for action item lines
pub const ACTION_BULLET: &str = "- ";

/// Convert a 24-hour `HH:MM` clock string to minutes after midnight.
///
/// Seconds (`HH:MM:SS`) are accepted and ignored. Anything else maps to 0,
/// which [`slot_index`] then clamps into the first slot.
///
/// # Examples
///
/// ```
/// use weekpack_core::layout::time_to_minutes;
///
/// assert_eq!(time_to_minutes("08:00"), 480);
/// assert_eq!(time_to_minutes("23:30"), 1410);
/// assert_eq!(time_to_minutes("quarter past"), 0);
/// ```
#[must_use]
pub fn time_to_minutes(clock: &str) -> u32 {
    let mut parts = clock.trim().split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return 0;
    };
    if parts.next().is_some_and(|s| s.parse::<u32>().map_or(true, |s| s >= 60)) {
        return 0;
    }
    match (h.parse::<u32>(), m.parse::<u32>()) {
        (Ok(h), Ok(m)) if h < 24 && m < 60 => h * 60 + m,
        _ => 0,
    }
}

/// Minutes after midnight of a timestamp's wall clock
#[inline]
#[must_use]
pub fn minutes_of_day(ts: &NaiveDateTime) -> u32 {
    ts.hour() * 60 + ts.minute()
}

/// Slot row for a start time: `floor((minutes - 360) / 30)` clamped to
/// `[0, 35]`.
#[must_use]
pub fn slot_index(minutes: u32) -> usize {
    let offset = i64::from(minutes) - i64::from(GRID_START_MINUTES);
    let slot = offset.div_euclid(i64::from(SLOT_MINUTES));
    usize::try_from(slot.clamp(0, SLOT_COUNT as i64 - 1)).unwrap_or(0)
}

/// Slot row of an event's start
#[inline]
#[must_use]
pub fn event_slot(event: &Event) -> usize {
    slot_index(minutes_of_day(&event.start))
}

/// Whether the slot starts on the hour (rendered shaded)
#[inline]
#[must_use]
pub const fn is_top_of_hour(slot: usize) -> bool {
    slot % 2 == 0
}

/// `HH:MM` label of a slot's start
#[must_use]
pub fn slot_label(slot: usize) -> String {
    let minutes = GRID_START_MINUTES as usize + slot * SLOT_MINUTES as usize;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Rows an event spans by time: `max(1, duration // 30)`, capped at the
/// rows remaining below `start_slot`.
#[must_use]
pub fn span_slots(duration_minutes: i64, start_slot: usize) -> usize {
    let by_time = usize::try_from(duration_minutes / i64::from(SLOT_MINUTES))
        .unwrap_or(0)
        .max(1);
    let remaining = SLOT_COUNT.saturating_sub(start_slot).max(1);
    by_time.min(remaining)
}

/// Height added for wrapped content lines and section headers
#[inline]
#[must_use]
pub fn content_bonus(lines: usize, sections: usize) -> f64 {
    lines as f64 * LINE_BONUS + sections as f64 * SECTION_HEADER_BONUS
}

/// Block height: time-based height plus the content bonus.
///
/// # Examples
///
/// ```
/// use weekpack_core::layout::block_height;
///
/// // 60 minutes, no extra content: exactly two slots
/// assert_eq!(block_height(60, 4, 17.0, 0.0), 34.0);
/// // 10 minutes still gets one slot
/// assert_eq!(block_height(10, 4, 17.0, 0.0), 17.0);
/// ```
#[must_use]
pub fn block_height(duration_minutes: i64, start_slot: usize, slot_height: f64, bonus: f64) -> f64 {
    let time_height = span_slots(duration_minutes, start_slot) as f64 * slot_height;
    time_height.max(time_height + bonus)
}

/// How many title lines fit a block of `time_height`, and whether the
/// time/source line fits below them.
///
/// A block too short for both shows the title alone.
#[must_use]
pub fn title_capacity(time_height: f64) -> (usize, bool) {
    let usable = time_height - 2.0 * BLOCK_PADDING;
    let with_meta = ((usable - META_LEAD) / TITLE_LEAD).floor();
    if with_meta >= 1.0 {
        (with_meta as usize, true)
    } else {
        ((usable / TITLE_LEAD).floor().max(1.0) as usize, false)
    }
}

// ============================================================================
// Weekly page
// ============================================================================

/// Fixed geometry of the landscape weekly overview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyGeometry {
    /// Page size
    pub size: Size,
    /// Left edge of the time column
    pub grid_left: f64,
    /// Top edge of the header row
    pub grid_top: f64,
    /// Width of the time label column
    pub time_col_width: f64,
    /// Width of one day column
    pub day_col_width: f64,
    /// Height of every row (header and slots)
    pub row_height: f64,
}

/// Placement of one event on the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBlock {
    /// Day column (0..7)
    pub day: usize,
    /// Start row
    pub slot: usize,
    /// Rows spanned
    pub span: usize,
    /// Block rectangle (top-left origin)
    pub rect: BoundingBox,
}

impl WeeklyGeometry {
    /// Rows on the weekly grid: one header row plus the slots
    pub const ROWS: usize = SLOT_COUNT + 1;

    /// US Letter landscape layout
    #[must_use]
    pub fn letter() -> Self {
        let size = Size::LETTER_LANDSCAPE;
        let margin = 30.0;
        let grid_top = 72.0;
        let grid_bottom = size.height - 24.0;
        let time_col_width = 50.0;
        Self {
            size,
            grid_left: margin,
            grid_top,
            time_col_width,
            day_col_width: (size.width - 2.0 * margin - time_col_width) / 7.0,
            row_height: (grid_bottom - grid_top) / Self::ROWS as f64,
        }
    }

    /// Right edge of the grid
    #[must_use]
    pub fn grid_right(&self) -> f64 {
        self.day_left(7)
    }

    /// Bottom edge of the grid
    #[must_use]
    pub fn grid_bottom(&self) -> f64 {
        self.grid_top + Self::ROWS as f64 * self.row_height
    }

    /// Left edge of a day column (`day == 7` gives the right edge)
    #[must_use]
    pub fn day_left(&self, day: usize) -> f64 {
        self.grid_left + self.time_col_width + day as f64 * self.day_col_width
    }

    /// Top edge of a slot row
    #[must_use]
    pub fn slot_top(&self, slot: usize) -> f64 {
        self.grid_top + (slot + 1) as f64 * self.row_height
    }

    /// Day header cell; also the weekly→day link region
    #[must_use]
    pub fn header_rect(&self, day: usize) -> BoundingBox {
        BoundingBox::from_xywh(
            self.day_left(day),
            self.grid_top,
            self.day_col_width,
            self.row_height,
        )
    }

    /// Full-width slot row (time column through last day)
    #[must_use]
    pub fn row_rect(&self, slot: usize) -> BoundingBox {
        BoundingBox::top_left(
            self.grid_left,
            self.slot_top(slot),
            self.grid_right(),
            self.slot_top(slot) + self.row_height,
        )
    }

    /// Place an event in a day column
    #[must_use]
    pub fn block(&self, event: &Event, day: usize) -> WeeklyBlock {
        let slot = event_slot(event);
        let span = span_slots(event.duration_minutes(), slot);
        let inset = 1.5;
        let top = self.slot_top(slot);
        WeeklyBlock {
            day,
            slot,
            span,
            rect: BoundingBox::top_left(
                self.day_left(day) + inset,
                top,
                self.day_left(day) + self.day_col_width - inset,
                top + span as f64 * self.row_height,
            ),
        }
    }
}

// ============================================================================
// Daily page
// ============================================================================

/// Fixed geometry of a portrait daily page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGeometry {
    /// Page size
    pub size: Size,
    /// Left edge of the time column
    pub grid_left: f64,
    /// Right edge of the grid
    pub grid_right: f64,
    /// Top edge of the first slot
    pub grid_top: f64,
    /// Width of the time label column
    pub time_col_width: f64,
    /// Height of one slot
    pub slot_height: f64,
    /// Title baseline
    pub title_y: f64,
    /// Statistics baseline
    pub stats_y: f64,
    /// Top of the navigation button row
    pub nav_top: f64,
    /// Height of the navigation buttons
    pub nav_height: f64,
}

/// Placement and wrapped content of one event on a daily page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBlock {
    /// Start row
    pub slot: usize,
    /// Rows spanned by time
    pub span: usize,
    /// Height from the time span alone
    pub time_height: f64,
    /// Height added for content that does not fit
    pub bonus: f64,
    /// Block rectangle (top-left origin); height is `time_height + bonus`
    pub rect: BoundingBox,
    /// Wrapped title
    pub title_lines: Vec<String>,
    /// Title lines that fit the time-based height
    pub title_capacity: usize,
    /// Whether the time/source line is shown
    pub show_meta: bool,
    /// Wrapped note lines, bullets included
    pub note_lines: Vec<String>,
    /// Wrapped action item lines, bullets included
    pub action_lines: Vec<String>,
    /// Points the drawn top was moved up from its slot so the block ends
    /// inside the grid; 0 for blocks that fit where they start
    pub lift: f64,
}

impl DailyBlock {
    /// Title lines beyond what the time-based height holds
    #[must_use]
    pub fn extra_title_lines(&self) -> usize {
        self.title_lines.len().saturating_sub(self.title_capacity)
    }

    /// Whether the block ends inside the grid of `geometry`
    #[must_use]
    pub fn fits_grid(&self, geometry: &DailyGeometry) -> bool {
        self.rect.b <= geometry.grid_bottom() + 1e-9
    }

    /// Number of section headers drawn
    #[must_use]
    pub fn sections(&self) -> usize {
        usize::from(!self.note_lines.is_empty()) + usize::from(!self.action_lines.is_empty())
    }
}

impl DailyGeometry {
    /// US Letter portrait layout
    #[must_use]
    pub fn letter() -> Self {
        let size = Size::LETTER_PORTRAIT;
        let grid_top = 140.0;
        let grid_bottom = size.height - 40.0;
        Self {
            size,
            grid_left: 50.0,
            grid_right: size.width - 50.0,
            grid_top,
            time_col_width: 50.0,
            slot_height: (grid_bottom - grid_top) / SLOT_COUNT as f64,
            title_y: 50.0,
            stats_y: 80.0,
            nav_top: 100.0,
            nav_height: 25.0,
        }
    }

    /// Bottom edge of the last slot
    #[must_use]
    pub fn grid_bottom(&self) -> f64 {
        self.grid_top + SLOT_COUNT as f64 * self.slot_height
    }

    /// Left edge of the event lane
    #[must_use]
    pub fn lane_left(&self) -> f64 {
        self.grid_left + self.time_col_width
    }

    /// Top edge of a slot row
    #[must_use]
    pub fn slot_top(&self, slot: usize) -> f64 {
        self.grid_top + slot as f64 * self.slot_height
    }

    /// Full-width slot row
    #[must_use]
    pub fn row_rect(&self, slot: usize) -> BoundingBox {
        BoundingBox::from_xywh(
            self.grid_left,
            self.slot_top(slot),
            self.grid_right - self.grid_left,
            self.slot_height,
        )
    }

    /// "Weekly Overview" button; links to the weekly page
    #[must_use]
    pub fn weekly_button(&self) -> BoundingBox {
        BoundingBox::from_xywh(50.0, self.nav_top, 100.0, self.nav_height)
    }

    /// Previous-day button
    #[must_use]
    pub fn prev_button(&self) -> BoundingBox {
        BoundingBox::from_xywh(200.0, self.nav_top, 80.0, self.nav_height)
    }

    /// Next-day button
    #[must_use]
    pub fn next_button(&self) -> BoundingBox {
        BoundingBox::from_xywh(320.0, self.nav_top, 80.0, self.nav_height)
    }

    /// Width available for text inside a block
    #[must_use]
    pub fn block_text_width(&self) -> f64 {
        let inset = 3.0;
        (self.grid_right - inset) - (self.lane_left() + inset) - 2.0 * BLOCK_PADDING
    }

    /// Place an event and wrap its content.
    ///
    /// Height is `max(1, duration // 30) * slot_height` plus
    /// [`content_bonus`] for note and action lines, section headers and
    /// title lines the time-based height cannot hold.
    #[must_use]
    pub fn block(&self, event: &Event, measure: &impl TextMeasure) -> DailyBlock {
        let slot = event_slot(event);
        let span = span_slots(event.duration_minutes(), slot);
        let time_height = span as f64 * self.slot_height;
        let text_width = self.block_text_width();

        let title_lines = wrap_text(&event.title, text_width, TITLE_SIZE, measure);
        let (title_capacity, show_meta) = title_capacity(time_height);
        let note_lines = wrap_items(&event.notes, NOTE_BULLET, text_width, measure);
        let action_lines = wrap_items(&event.action_items, ACTION_BULLET, text_width, measure);

        let mut block = DailyBlock {
            slot,
            span,
            time_height,
            bonus: 0.0,
            rect: BoundingBox::default(),
            title_lines,
            title_capacity,
            show_meta,
            note_lines,
            action_lines,
            lift: 0.0,
        };

        block.bonus = content_bonus(
            block.extra_title_lines() + block.note_lines.len() + block.action_lines.len(),
            block.sections(),
        );
        let height = block_height(event.duration_minutes(), slot, self.slot_height, block.bonus);
        // Blocks grown past the grid by their content move up; the slot
        // index stays, only the drawn top changes.
        let slot_top = self.slot_top(slot);
        let top = slot_top.min(self.grid_bottom() - height).max(self.grid_top);
        block.lift = slot_top - top;
        if block.lift > 0.0 {
            log::debug!(
                "Event '{}' lifted {:.0}pt to stay inside the daily grid",
                event.title,
                block.lift
            );
        }
        let inset = 3.0;
        block.rect = BoundingBox::top_left(
            self.lane_left() + inset,
            top,
            self.grid_right - inset,
            top + height,
        );
        block
    }
}

/// Wrap each item with a bullet prefix
fn wrap_items(
    items: &[String],
    bullet: &str,
    width: f64,
    measure: &impl TextMeasure,
) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| wrap_text(&format!("{bullet}{item}"), width, BODY_SIZE, measure))
        .collect()
}

// ============================================================================
// Day statistics
// ============================================================================

/// Summary shown under a daily page title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    /// Events on the day
    pub appointments: usize,
    /// Sum of durations, hours, rounded to 0.1
    pub scheduled_hours: f64,
    /// Grid hours minus scheduled, floored at 0
    pub available_hours: f64,
    /// Available share of the grid, percent
    pub free_percent: u32,
}

impl DayStats {
    /// Compute from a day's events
    #[must_use]
    pub fn compute<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let (appointments, minutes) = events
            .into_iter()
            .fold((0usize, 0i64), |(n, m), e| (n + 1, m + e.duration_minutes()));
        let scheduled = round_tenth(minutes as f64 / 60.0);
        let available = round_tenth((GRID_HOURS - scheduled).max(0.0));
        Self {
            appointments,
            scheduled_hours: scheduled,
            available_hours: available,
            free_percent: (available / GRID_HOURS * 100.0).round() as u32,
        }
    }

    /// `"3 appointments"`
    #[must_use]
    pub fn appointments_label(&self) -> String {
        if self.appointments == 1 {
            "1 appointment".to_string()
        } else {
            format!("{} appointments", self.appointments)
        }
    }

    /// `"10.5h Scheduled | 7.5h Available | 42% Free Time"`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{:.1}h Scheduled | {:.1}h Available | {}% Free Time",
            self.scheduled_hours, self.available_hours, self.free_percent
        )
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekpack_calendar::{EventSource, RawEvent};

    fn event(title: &str, start: &str, end: &str) -> Event {
        let raw = RawEvent {
            title: Some(title.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            ..RawEvent::default()
        };
        Event::from_raw(raw, 0).unwrap()
    }

    #[test]
    fn test_time_to_minutes() {
        assert_eq!(time_to_minutes("06:00"), 360);
        assert_eq!(time_to_minutes("8:05"), 485);
        assert_eq!(time_to_minutes("08:00:30"), 480);
        assert_eq!(time_to_minutes("24:00"), 0);
        assert_eq!(time_to_minutes("12:60"), 0);
        assert_eq!(time_to_minutes("12:30:99"), 0);
        assert_eq!(time_to_minutes("noon"), 0);
        assert_eq!(time_to_minutes(""), 0);
    }

    #[test]
    fn test_slot_index_and_clamping() {
        assert_eq!(slot_index(360), 0);
        assert_eq!(slot_index(389), 0);
        assert_eq!(slot_index(390), 1);
        assert_eq!(slot_index(480), 4);
        assert_eq!(slot_index(1410), 35);
        assert_eq!(slot_index(1439), 35);
        // Before 06:00 clamps to the first slot
        assert_eq!(slot_index(0), 0);
        assert_eq!(slot_index(359), 0);
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(0), "06:00");
        assert_eq!(slot_label(5), "08:30");
        assert_eq!(slot_label(35), "23:30");
        assert!(is_top_of_hour(4));
        assert!(!is_top_of_hour(5));
    }

    #[test]
    fn test_span_slots() {
        assert_eq!(span_slots(60, 4), 2);
        assert_eq!(span_slots(50, 4), 1);
        assert_eq!(span_slots(10, 4), 1);
        assert_eq!(span_slots(90, 4), 3);
        // Capped at the rows remaining
        assert_eq!(span_slots(240, 34), 2);
        assert_eq!(span_slots(240, 35), 1);
    }

    #[test]
    fn test_block_height_with_bonus() {
        let bonus = content_bonus(3, 2);
        assert_eq!(bonus, 85.0);
        assert_eq!(block_height(60, 0, 17.0, bonus), 119.0);
    }

    #[test]
    fn test_title_capacity() {
        assert_eq!(title_capacity(17.0), (1, false));
        assert_eq!(title_capacity(34.0), (1, true));
        assert_eq!(title_capacity(51.0), (3, true));
    }

    #[test]
    fn test_weekly_geometry_shape() {
        let g = WeeklyGeometry::letter();
        assert!((g.grid_right() - (g.size.width - 30.0)).abs() < 1e-9);
        assert!((g.grid_bottom() - (g.size.height - 24.0)).abs() < 1e-9);
        for day in 0..7 {
            assert!(g.header_rect(day).fits_within(g.size));
        }
    }

    #[test]
    fn test_coffee_with_nora_placement() {
        let e = event("Coffee with Nora", "2025-07-14T08:00:00Z", "2025-07-14T09:00:00Z");
        let weekly = WeeklyGeometry::letter().block(&e, 0);
        assert_eq!((weekly.slot, weekly.span), (4, 2));

        let g = DailyGeometry::letter();
        let daily = g.block(&e, &crate::font::ResolvedFont::Builtin);
        assert_eq!((daily.slot, daily.span), (4, 2));
        assert_eq!(daily.bonus, 0.0);
        assert!((daily.rect.height() - 2.0 * g.slot_height).abs() < 1e-9);
        assert!(daily.show_meta);
        assert_eq!(daily.lift, 0.0);
    }

    #[test]
    fn test_daily_block_grows_with_notes() {
        let mut e = event("Call with Blake", "2025-07-14T10:00:00Z", "2025-07-14T10:50:00Z");
        e.notes = vec!["Received the receipt".to_string()];
        e.action_items = vec!["Client follow-up".to_string(), "Send invoice".to_string()];
        e.source = EventSource::from_label("SimplePractice");

        let g = DailyGeometry::letter();
        let block = g.block(&e, &crate::font::ResolvedFont::Builtin);
        assert_eq!(block.span, 1);
        assert_eq!(block.sections(), 2);
        assert_eq!(block.bonus, 3.0 * LINE_BONUS + 2.0 * SECTION_HEADER_BONUS);
        assert!((block.rect.height() - (g.slot_height + block.bonus)).abs() < 1e-9);
    }

    #[test]
    fn test_late_block_with_notes_is_lifted_into_grid() {
        let mut e = event("Late", "2025-07-14T23:30:00Z", "2025-07-14T23:59:00Z");
        e.notes = vec!["one".to_string(), "two".to_string()];
        let g = DailyGeometry::letter();
        let block = g.block(&e, &crate::font::ResolvedFont::Builtin);

        assert_eq!(block.slot, 35);
        assert!(block.lift > 0.0);
        assert!(block.fits_grid(&g));
        assert!((block.rect.b - g.grid_bottom()).abs() < 1e-9);
        assert!((block.rect.t + block.lift - g.slot_top(35)).abs() < 1e-9);
    }

    #[test]
    fn test_block_taller_than_grid_does_not_fit() {
        let mut e = event("Long notes", "2025-07-14T06:00:00Z", "2025-07-14T07:00:00Z");
        e.notes = (0..60).map(|i| format!("note {i}")).collect();
        let g = DailyGeometry::letter();
        let block = g.block(&e, &crate::font::ResolvedFont::Builtin);

        assert_eq!(block.lift, 0.0);
        assert!((block.rect.t - g.grid_top).abs() < 1e-9);
        assert!(!block.fits_grid(&g));
    }

    #[test]
    fn test_day_stats() {
        let events = vec![
            event("A", "2025-07-14T08:00:00", "2025-07-14T09:00:00"),
            event("B", "2025-07-14T10:00:00", "2025-07-14T10:50:00"),
        ];
        let stats = DayStats::compute(&events);
        assert_eq!(stats.appointments, 2);
        assert_eq!(stats.scheduled_hours, 1.8);
        assert_eq!(stats.available_hours, 16.2);
        assert_eq!(stats.free_percent, 90);
        assert_eq!(stats.appointments_label(), "2 appointments");
        assert_eq!(
            stats.summary_line(),
            "1.8h Scheduled | 16.2h Available | 90% Free Time"
        );
    }

    #[test]
    fn test_day_stats_overbooked() {
        let events = vec![event("Marathon", "2025-07-14T00:00:00", "2025-07-15T00:00:00")];
        let stats = DayStats::compute(&events);
        assert_eq!(stats.scheduled_hours, 24.0);
        assert_eq!(stats.available_hours, 0.0);
        assert_eq!(stats.free_percent, 0);
        assert_eq!(stats.appointments_label(), "1 appointment");
    }
}
