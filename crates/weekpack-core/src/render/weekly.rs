//! Landscape weekly overview

use chrono::{Datelike, NaiveDate};
use weekpack_calendar::{Event, NormalizedWeek};

use super::canvas::{band_baseline, source_style, PageCanvas, Rgb};
use super::RenderedPage;
use crate::error::Result;
use crate::font::ResolvedFont;
use crate::layout::{
    is_top_of_hour, slot_label, WeeklyBlock, WeeklyGeometry, SLOT_COUNT, WEEKLY_TEXT_LEAD,
    WEEKLY_TEXT_SIZE,
};
use crate::links::{NavRegions, PageId, DAILY_PAGES};
use crate::text::{fit_lines, wrap_text};

const HEADING: &str = "WEEKLY PLANNER";
const HEADING_SIZE: f64 = 18.0;
const SUBTITLE_SIZE: f64 = 10.0;
const HEADER_TEXT_SIZE: f64 = 8.0;
const TIME_LABEL_SIZE: f64 = 6.0;

/// `Week 29 — 7/14-7/20`
#[must_use]
pub fn week_subtitle(week: &NormalizedWeek) -> String {
    format!(
        "Week {} \u{2014} {}-{}",
        week.week.iso_week(),
        short_date(week.week.start()),
        short_date(week.week.end())
    )
}

/// `Mon 7/14`
#[must_use]
pub fn day_header_label(date: NaiveDate) -> String {
    format!("{} {}", date.format("%a"), short_date(date))
}

fn short_date(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Text lines drawn inside a weekly block: `HH:MM Title`, wrapped to the
/// column and cut with a visible marker when the block is too short.
#[must_use]
pub fn weekly_block_lines(event: &Event, block: &WeeklyBlock, font: &ResolvedFont) -> Vec<String> {
    let width = block.rect.width() - 4.0;
    let text = format!("{} {}", event.start_clock(), event.title);
    let lines = wrap_text(&text, width, WEEKLY_TEXT_SIZE, font);
    let max_lines = (((block.rect.height() - 2.0) / WEEKLY_TEXT_LEAD).floor() as usize).max(1);
    fit_lines(lines, max_lines, width, WEEKLY_TEXT_SIZE, font)
}

/// Render the weekly overview page.
///
/// # Errors
///
/// Returns an error if the content stream cannot be encoded.
pub fn render_weekly(week: &NormalizedWeek, font: &ResolvedFont) -> Result<RenderedPage> {
    let g = WeeklyGeometry::letter();
    let mut canvas = PageCanvas::new(g.size, font);

    canvas.text(g.grid_left, 40.0, HEADING_SIZE, Rgb::BLACK, HEADING);
    canvas.text(g.grid_left, 58.0, SUBTITLE_SIZE, Rgb::MUTED, &week_subtitle(week));

    // Header row
    let time_header = crate::geometry::BoundingBox::from_xywh(
        g.grid_left,
        g.grid_top,
        g.time_col_width,
        g.row_height,
    );
    canvas.fill_rect(time_header, Rgb::HEADER_FILL);
    canvas.text_centered(time_header, HEADER_TEXT_SIZE, Rgb::BLACK, "Time");

    let mut headers = Vec::with_capacity(DAILY_PAGES);
    for (day, date) in week.week.days().enumerate() {
        let cell = g.header_rect(day);
        canvas.fill_rect(cell, Rgb::HEADER_FILL);
        canvas.text_centered(cell, HEADER_TEXT_SIZE, Rgb::BLACK, &day_header_label(date));
        headers.push(cell);
    }

    // Slot rows
    for slot in 0..SLOT_COUNT {
        let row = g.row_rect(slot);
        if is_top_of_hour(slot) {
            canvas.fill_rect(row, Rgb::HOUR_SHADE);
        }
        canvas.text(
            g.grid_left + 3.0,
            band_baseline(row.t, g.row_height, TIME_LABEL_SIZE),
            TIME_LABEL_SIZE,
            Rgb::MUTED,
            &slot_label(slot),
        );
    }

    // Grid rules
    for row in 0..=WeeklyGeometry::ROWS {
        let y = g.grid_top + row as f64 * g.row_height;
        canvas.line((g.grid_left, y), (g.grid_right(), y), Rgb::RULE, 0.5);
    }
    canvas.line(
        (g.grid_left, g.grid_top),
        (g.grid_left, g.grid_bottom()),
        Rgb::RULE,
        0.5,
    );
    for day in 0..=DAILY_PAGES {
        let x = g.day_left(day);
        canvas.line((x, g.grid_top), (x, g.grid_bottom()), Rgb::RULE, 0.5);
    }

    // Events
    let mut drawn = 0usize;
    for day in 0..DAILY_PAGES {
        for event in week.events_on(day) {
            let block = g.block(event, day);
            canvas.block(block.rect, source_style(event.source.kind));
            for (i, line) in weekly_block_lines(event, &block, font).iter().enumerate() {
                let top = block.rect.t + 1.0 + i as f64 * WEEKLY_TEXT_LEAD;
                canvas.text(
                    block.rect.l + 2.0,
                    band_baseline(top, WEEKLY_TEXT_LEAD, WEEKLY_TEXT_SIZE),
                    WEEKLY_TEXT_SIZE,
                    Rgb::BLACK,
                    line,
                );
            }
            drawn += 1;
        }
    }
    log::debug!("Weekly overview: {drawn} event blocks");

    Ok(RenderedPage {
        id: PageId::WeeklyOverview,
        size: g.size,
        content: canvas.finish()?,
        regions: NavRegions::weekly_page(headers),
    })
}
