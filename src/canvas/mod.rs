//! # Canvas Port
//!
//! The narrow drawing surface the planner renders through. Everything the
//! page hierarchy needs from a document backend goes through [`Canvas`]:
//! allocating pages, drawing text and rules, measuring text, and creating
//! link annotations between pages.
//!
//! All coordinates are in points with the origin at the **top-left** of the
//! page and y growing downward. Backends that use a different convention
//! (PDF puts the origin at the bottom-left) flip at write time.
//!
//! Two implementations ship with the crate: [`crate::pdf::PdfCanvas`]
//! writes a real document, and [`RecordingCanvas`] keeps every operation in
//! memory so a build can be inspected without producing a file.

mod recording;

pub use recording::{CanvasOp, RecordingCanvas};

use crate::error::Result;

/// Handle to a page allocated by a canvas. Only meaningful for the canvas
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub usize);

/// An axis-aligned rectangle in top-down page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Shrink the rectangle by `amount` on every side. Never inverts.
    pub fn inset(&self, amount: f64) -> Rect {
        let dx = amount.min(self.width() / 2.0).max(0.0);
        let dy = amount.min(self.height() / 2.0).max(0.0);
        Rect::new(self.x0 + dx, self.y0 + dy, self.x1 - dx, self.y1 - dy)
    }

    /// True when the two rectangles share interior area. Touching edges
    /// do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        self.x0 < other.x1 - EPS
            && other.x0 < self.x1 - EPS
            && self.y0 < other.y1 - EPS
            && other.y0 < self.y1 - EPS
    }
}

/// A document backend the planner can draw into.
///
/// Creating the canvas is creating the document; dropping it frees it.
/// Every fallible call is fatal to the build that made it.
pub trait Canvas {
    /// Allocate a new page at the end of the document.
    fn new_page(&mut self, width: f64, height: f64) -> Result<PageId>;

    /// Number of pages allocated so far.
    fn page_count(&self) -> usize;

    /// Draw a single line of text with its baseline starting at `(x, y)`.
    fn draw_text(
        &mut self,
        page: PageId,
        x: f64,
        y: f64,
        font_size: f64,
        text: &str,
    ) -> Result<()>;

    /// Stroke a straight line.
    fn draw_line(
        &mut self,
        page: PageId,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
    ) -> Result<()>;

    /// Stroke the outline of a rectangle.
    fn draw_rect(&mut self, page: PageId, rect: &Rect, width: f64) -> Result<()>;

    /// Make `rect` on `source` a clickable link that jumps to `destination`.
    fn add_link(&mut self, source: PageId, rect: Rect, destination: PageId) -> Result<()>;

    /// Width of `text` in points when drawn at `font_size`.
    fn measure_text_width(&self, text: &str, font_size: f64) -> f64;

    /// Draw `text` horizontally centered between `x_start` and `x_stop`.
    fn draw_centered_text(
        &mut self,
        page: PageId,
        text: &str,
        x_start: f64,
        x_stop: f64,
        y: f64,
        font_size: f64,
    ) -> Result<()> {
        let x = centered_x(self.measure_text_width(text, font_size), x_start, x_stop);
        self.draw_text(page, x, y, font_size, text)
    }
}

/// Left edge that centers a run of `text_width` between two x positions.
pub fn centered_x(text_width: f64, x_start: f64, x_stop: f64) -> f64 {
    x_start + ((x_stop - x_start) - text_width) / 2.0
}

/// Page sizes a canvas is willing to allocate.
pub(crate) fn check_page_size(width: f64, height: f64) -> Result<()> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(crate::error::PlannerError::PageAllocation { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_x() {
        assert!((centered_x(20.0, 0.0, 100.0) - 40.0).abs() < 0.001);
        assert!((centered_x(20.0, 50.0, 100.0) - 65.0).abs() < 0.001);
    }

    #[test]
    fn test_inset_never_inverts() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).inset(5.0);
        assert!(r.width() >= 0.0);
        assert!(r.height() >= 0.0);
        assert!((r.y0 - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(5.0, 5.0, 15.0, 15.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_page_size_must_be_positive() {
        assert!(check_page_size(595.28, 841.89).is_ok());
        assert!(check_page_size(0.0, 841.89).is_err());
        assert!(check_page_size(595.28, f64::NAN).is_err());
    }
}
