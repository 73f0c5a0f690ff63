//! Fixed page furniture: headings, the notes section, the month weekday
//! header and the day schedule.
//!
//! Every page is split vertically at the notes divider. Right-handed pages
//! keep notes on the left and the children (grid or schedule) on the right;
//! left-handed pages swap the two.

use chrono::Weekday;

use crate::canvas::{Canvas, PageId, Rect};
use crate::config::PageLayout;
use crate::error::Result;
use crate::layout::grid::{visual_column, GridOptions};

/// Space kept between section content and the notes divider.
const GUTTER: f64 = 20.0;
/// Distance between ruled note lines.
const RULE_SPACING: f64 = 20.0;

/// Full-height column holding the notes.
pub(super) fn notes_area(layout: &PageLayout) -> Rect {
    let divider = layout.notes_divider_x();
    let (x0, x1) = if layout.left_handed {
        (divider, layout.width)
    } else {
        (0.0, divider)
    };
    Rect::new(x0, layout.header_height(), x1, layout.height - layout.margin)
}

/// Full-height column holding the children grid or the schedule.
pub(super) fn children_area(layout: &PageLayout) -> Rect {
    let divider = layout.notes_divider_x();
    let (x0, x1) = if layout.left_handed {
        (0.0, divider)
    } else {
        (divider, layout.width)
    };
    Rect::new(x0, layout.header_height(), x1, layout.height - layout.margin)
}

fn heading_baseline(layout: &PageLayout) -> f64 {
    layout.header_height() + layout.note_title_font_size + 10.0
}

/// Area under a section heading, padded by the margin at the page edges
/// and by the gutter at the divider.
pub(super) fn body_region(layout: &PageLayout, area: &Rect) -> Rect {
    let x0 = if area.x0 <= 0.0 {
        layout.margin
    } else {
        area.x0 + GUTTER
    };
    let x1 = if area.x1 >= layout.width {
        layout.width - layout.margin
    } else {
        area.x1 - GUTTER
    };
    Rect::new(x0, heading_baseline(layout) + 10.0, x1, area.y1)
}

pub(super) fn draw_heading<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageId,
    layout: &PageLayout,
    area: &Rect,
    text: &str,
) -> Result<()> {
    canvas.draw_centered_text(
        page,
        text,
        area.x0,
        area.x1,
        heading_baseline(layout),
        layout.note_title_font_size,
    )
}

/// Divider, "Notes" heading and ruled lines. Nothing when the notes take
/// no width.
pub(super) fn draw_notes<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageId,
    layout: &PageLayout,
) -> Result<()> {
    let area = notes_area(layout);
    if area.width() < 1.0 {
        return Ok(());
    }

    let divider = layout.notes_divider_x();
    if divider > 0.0 && divider < layout.width {
        canvas.draw_line(page, (divider, area.y0), (divider, area.y1), 0.5)?;
    }

    draw_heading(canvas, page, layout, &area, "Notes")?;

    let body = body_region(layout, &area);
    let mut y = body.y0 + RULE_SPACING;
    while y <= body.y1 {
        canvas.draw_line(page, (body.x0, y), (body.x1, y), 0.25)?;
        y += RULE_SPACING;
    }
    Ok(())
}

/// Hour lines for a day page, starting at `time_start`.
///
/// Each labeled hour is followed by `time_gap_lines` blank lines. Labels go
/// in the outer page margin when `time_in_margin` is set, otherwise at the
/// start of each labeled line.
pub(super) fn draw_schedule<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageId,
    layout: &PageLayout,
    region: &Rect,
) -> Result<()> {
    let font_size = layout.label_font_size;
    let row_height = font_size * 2.0;
    let lines_per_hour = layout.time_gap_lines as usize + 1;
    let margin_column = if layout.left_handed {
        (0.0, layout.margin)
    } else {
        (layout.width - layout.margin, layout.width)
    };

    let mut line = 0usize;
    loop {
        let y = region.y0 + row_height * (line + 1) as f64;
        if y > region.y1 {
            break;
        }

        let mut x0 = region.x0;
        if line % lines_per_hour == 0 {
            let hour = layout.time_start as usize + line / lines_per_hour;
            if hour > 23 {
                break;
            }
            let label = format!("{:02}:00", hour);
            let baseline = y - font_size * 0.3;
            if layout.time_in_margin {
                let (m0, m1) = margin_column;
                canvas.draw_centered_text(page, &label, m0, m1, baseline, font_size)?;
            } else {
                canvas.draw_text(page, x0, baseline, font_size, &label)?;
                x0 += canvas.measure_text_width(&label, font_size) + 4.0;
            }
            canvas.draw_line(page, (x0, y), (region.x1, y), 0.5)?;
        } else {
            canvas.draw_line(page, (x0, y), (region.x1, y), 0.25)?;
        }
        line += 1;
    }
    Ok(())
}

/// Blank calendar cells before the first of a month whose first day falls
/// on `first`, for weeks starting on `week_start`.
pub(super) fn leading_blank_days(first: Weekday, week_start: Weekday) -> usize {
    ((first.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7) as usize
}

/// Weekday names above the month grid columns. Returns the y where the
/// grid itself should start.
pub(super) fn draw_weekday_header<C: Canvas + ?Sized>(
    canvas: &mut C,
    page: PageId,
    layout: &PageLayout,
    region: &Rect,
    options: &GridOptions,
) -> Result<f64> {
    let font_size = layout.label_font_size;
    let cell_width = region.width() / options.columns as f64;
    let baseline = region.y0 + font_size * 1.2;

    let mut weekday = layout.first_day_of_week;
    for logical in 0..options.columns {
        let column = visual_column(options, logical);
        let x0 = region.x0 + column as f64 * cell_width;
        canvas.draw_centered_text(
            page,
            &weekday.to_string(),
            x0,
            x0 + cell_width,
            baseline,
            font_size,
        )?;
        weekday = weekday.succ();
    }

    Ok(region.y0 + font_size * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasOp, RecordingCanvas};
    use crate::config::PlannerConfig;

    fn layout_with(config: PlannerConfig) -> PageLayout {
        PageLayout::from_config(&config)
    }

    #[test]
    fn test_leading_blank_days() {
        // 1 March 2021 was a Monday.
        assert_eq!(leading_blank_days(Weekday::Mon, Weekday::Mon), 0);
        assert_eq!(leading_blank_days(Weekday::Mon, Weekday::Sun), 1);
        // 1 May 2021 was a Saturday.
        assert_eq!(leading_blank_days(Weekday::Sat, Weekday::Mon), 5);
        assert_eq!(leading_blank_days(Weekday::Sun, Weekday::Mon), 6);
    }

    #[test]
    fn test_right_handed_notes_on_left() {
        let layout = layout_with(PlannerConfig::default());
        let notes = notes_area(&layout);
        let children = children_area(&layout);
        assert!((notes.x0 - 0.0).abs() < 0.001);
        assert!((notes.x1 - children.x0).abs() < 0.001);
        assert!((children.x1 - layout.width).abs() < 0.001);
    }

    #[test]
    fn test_left_handed_notes_on_right() {
        let layout = layout_with(PlannerConfig {
            left_handed: true,
            notes_fraction: 0.3,
            ..Default::default()
        });
        let notes = notes_area(&layout);
        let children = children_area(&layout);
        assert!((notes.x1 - layout.width).abs() < 0.001);
        assert!((notes.width() - layout.width * 0.3).abs() < 0.001);
        assert!((children.x0 - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_no_notes_when_fraction_is_zero() {
        let layout = layout_with(PlannerConfig {
            notes_fraction: 0.0,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new();
        let page = canvas.new_page(layout.width, layout.height).unwrap();
        draw_notes(&mut canvas, page, &layout).unwrap();
        assert!(canvas.ops().is_empty());
        assert!((children_area(&layout).width() - layout.width).abs() < 0.001);
    }

    #[test]
    fn test_schedule_labels_every_other_line() {
        let layout = layout_with(PlannerConfig {
            time_gap_lines: 1,
            time_start: 20,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new();
        let page = canvas.new_page(layout.width, layout.height).unwrap();
        let region = Rect::new(300.0, 100.0, 550.0, 800.0);
        draw_schedule(&mut canvas, page, &layout, &region).unwrap();

        // 20:00 .. 23:00, each followed by one blank line.
        assert_eq!(canvas.texts_on(page), vec!["20:00", "21:00", "22:00", "23:00"]);
        let lines = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::Line { .. }))
            .count();
        assert_eq!(lines, 8);
    }

    #[test]
    fn test_schedule_labels_in_margin() {
        let layout = layout_with(PlannerConfig {
            time_in_margin: true,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new();
        let page = canvas.new_page(layout.width, layout.height).unwrap();
        let region = Rect::new(300.0, 100.0, layout.width - layout.margin, 140.0);
        draw_schedule(&mut canvas, page, &layout, &region).unwrap();

        for op in canvas.ops() {
            match op {
                CanvasOp::Text { x, .. } => assert!(*x > layout.width - layout.margin),
                CanvasOp::Line { from, .. } => assert!((from.0 - 300.0).abs() < 0.001),
                _ => {}
            }
        }
    }

    #[test]
    fn test_weekday_header_follows_week_start() {
        let layout = layout_with(PlannerConfig {
            first_day_of_week: 0,
            ..Default::default()
        });
        let mut canvas = RecordingCanvas::new();
        let page = canvas.new_page(layout.width, layout.height).unwrap();
        let region = Rect::new(0.0, 100.0, 70.0, 160.0);
        let top = draw_weekday_header(&mut canvas, page, &layout, &region, &GridOptions::new(6, 7))
            .unwrap();

        assert_eq!(
            canvas.texts_on(page),
            vec!["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
        );
        assert!(top > region.y0);
    }
}
