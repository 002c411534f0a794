//! Portrait daily page

use chrono::NaiveDate;
use weekpack_calendar::{Event, NormalizedWeek};

use super::canvas::{band_baseline, source_style, PageCanvas, Rgb};
use super::RenderedPage;
use crate::error::{PlannerError, Result};
use crate::font::ResolvedFont;
use crate::geometry::BoundingBox;
use crate::layout::{
    is_top_of_hour, slot_label, DailyBlock, DailyGeometry, DayStats, BLOCK_PADDING, BODY_SIZE,
    LINE_BONUS, META_LEAD, META_SIZE, SECTION_HEADER_BONUS, SLOT_COUNT, TITLE_LEAD, TITLE_SIZE,
};
use crate::links::{NavRegions, PageId, DAILY_PAGES};

const TITLE_FONT_SIZE: f64 = 20.0;
const COUNT_SIZE: f64 = 12.0;
const SUMMARY_SIZE: f64 = 10.0;
const BUTTON_TEXT_SIZE: f64 = 9.0;
const TIME_LABEL_SIZE: f64 = 7.0;

/// `Monday, July 14, 2025`
#[must_use]
pub fn day_title(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `08:00 - 09:00 | GOOGLE CALENDAR`
#[must_use]
pub fn meta_line(event: &Event) -> String {
    format!(
        "{} - {} | {}",
        event.start_clock(),
        event.end_clock(),
        event.source.label
    )
}

/// One line of text inside a daily block, positioned relative to the block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLine {
    /// Baseline offset from the block top
    pub offset: f64,
    /// Font size
    pub size: f64,
    /// Whether the line is secondary text
    pub muted: bool,
    /// The text
    pub text: String,
}

/// Lay out a block's text top to bottom.
///
/// Title lines the time-based height holds use the title lead; overflow
/// title lines, notes and action items each take the bonus height the block
/// was grown by, so the text always ends inside the block.
#[must_use]
pub fn block_lines(event: &Event, block: &DailyBlock) -> Vec<BlockLine> {
    let mut lines = Vec::new();
    let mut y = BLOCK_PADDING;
    let mut push = |y: &mut f64, lead: f64, size: f64, muted: bool, text: &str| {
        lines.push(BlockLine {
            offset: band_baseline(*y, lead, size),
            size,
            muted,
            text: text.to_string(),
        });
        *y += lead;
    };

    for (i, title) in block.title_lines.iter().enumerate() {
        let lead = if i < block.title_capacity {
            TITLE_LEAD
        } else {
            LINE_BONUS
        };
        push(&mut y, lead, TITLE_SIZE, false, title);
    }
    if block.show_meta {
        push(&mut y, META_LEAD, META_SIZE, true, &meta_line(event));
    }
    for (header, items) in [
        ("Notes", &block.note_lines),
        ("Action Items", &block.action_lines),
    ] {
        if items.is_empty() {
            continue;
        }
        push(&mut y, SECTION_HEADER_BONUS, TITLE_SIZE, false, header);
        for item in items {
            push(&mut y, LINE_BONUS, BODY_SIZE, false, item);
        }
    }
    lines
}

fn draw_button(canvas: &mut PageCanvas<'_>, rect: BoundingBox, label: &str) {
    canvas.fill_rect(rect, Rgb::BUTTON_FILL);
    canvas.stroke_rect(rect, Rgb::BUTTON_BORDER, 1.0);
    canvas.text_centered(rect, BUTTON_TEXT_SIZE, Rgb::BLACK, label);
}

/// Render the daily page for day `day` (0..7) of the week.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidInput`] if `day` is not a day of the
/// week or an event's content is taller than the whole grid, or an error
/// if the content stream cannot be encoded.
pub fn render_daily(week: &NormalizedWeek, day: usize, font: &ResolvedFont) -> Result<RenderedPage> {
    if day >= DAILY_PAGES {
        return Err(PlannerError::invalid_input(format!(
            "day {day} is outside the week (0..{DAILY_PAGES})"
        )));
    }
    let g = DailyGeometry::letter();
    let mut canvas = PageCanvas::new(g.size, font);
    let date = week.week.day(day);
    let events: Vec<&Event> = week.events_on(day).collect();

    canvas.text(g.grid_left, g.title_y, TITLE_FONT_SIZE, Rgb::BLACK, &day_title(date));
    let stats = DayStats::compute(events.iter().copied());
    canvas.text(g.grid_left, g.stats_y, COUNT_SIZE, Rgb::BLACK, &stats.appointments_label());
    canvas.text(200.0, g.stats_y, SUMMARY_SIZE, Rgb::MUTED, &stats.summary_line());

    // Navigation
    let weekly = g.weekly_button();
    draw_button(&mut canvas, weekly, "Weekly Overview");
    let prev = (day > 0).then(|| {
        let rect = g.prev_button();
        let label = format!("< {}", week.week.day(day - 1).format("%a"));
        draw_button(&mut canvas, rect, &label);
        rect
    });
    let next = (day + 1 < DAILY_PAGES).then(|| {
        let rect = g.next_button();
        let label = format!("{} >", week.week.day(day + 1).format("%a"));
        draw_button(&mut canvas, rect, &label);
        rect
    });

    // Time grid
    for slot in 0..SLOT_COUNT {
        let row = g.row_rect(slot);
        if is_top_of_hour(slot) {
            canvas.fill_rect(row, Rgb::HOUR_SHADE);
        }
        canvas.text(
            g.grid_left + 4.0,
            band_baseline(row.t, g.slot_height, TIME_LABEL_SIZE),
            TIME_LABEL_SIZE,
            Rgb::MUTED,
            &slot_label(slot),
        );
        canvas.line((g.grid_left, row.t), (g.grid_right, row.t), Rgb::RULE, 0.5);
    }
    let bottom = g.grid_bottom();
    canvas.line((g.grid_left, bottom), (g.grid_right, bottom), Rgb::RULE, 0.5);
    for x in [g.grid_left, g.lane_left(), g.grid_right] {
        canvas.line((x, g.grid_top), (x, bottom), Rgb::RULE, 0.5);
    }

    // Events, in start order so later blocks sit on top
    let mut placed: Vec<(&Event, DailyBlock)> =
        events.iter().map(|e| (*e, g.block(e, font))).collect();
    placed.sort_by_key(|(e, _)| e.start);
    if let Some((event, block)) = placed.iter().find(|(_, b)| !b.fits_grid(&g)) {
        return Err(PlannerError::invalid_input(format!(
            "event '{}' on {date} needs {:.0}pt, more than the {:.0}pt daily grid",
            event.title,
            block.rect.height(),
            g.grid_bottom() - g.grid_top
        )));
    }
    for (event, block) in &placed {
        canvas.block(block.rect, source_style(event.source.kind));
        for line in block_lines(event, block) {
            let color = if line.muted { Rgb::MUTED } else { Rgb::BLACK };
            canvas.text(
                block.rect.l + BLOCK_PADDING,
                block.rect.t + line.offset,
                line.size,
                color,
                &line.text,
            );
        }
    }
    log::debug!("Daily page {} ({date}): {} events", day + 1, placed.len());

    Ok(RenderedPage {
        id: PageId::Daily(day),
        size: g.size,
        content: canvas.finish()?,
        regions: NavRegions::daily_page(vec![weekly], prev, next),
    })
}
