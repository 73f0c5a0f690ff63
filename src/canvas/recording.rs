//! In-memory canvas that records every drawing operation.

use super::{check_page_size, Canvas, PageId, Rect};
use crate::error::{PlannerError, Result};
use crate::font::HELVETICA;

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOp {
    Text {
        page: PageId,
        x: f64,
        y: f64,
        font_size: f64,
        text: String,
    },
    Line {
        page: PageId,
        from: (f64, f64),
        to: (f64, f64),
    },
    Rect {
        page: PageId,
        rect: Rect,
    },
    Link {
        source: PageId,
        rect: Rect,
        destination: PageId,
    },
}

/// A canvas that produces no output, only a log of what was drawn.
///
/// Measures text with the same metrics as the PDF backend, so layouts
/// computed against it match the real document.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pages: Vec<(f64, f64)>,
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Page sizes in allocation order, as `(width, height)`.
    pub fn pages(&self) -> &[(f64, f64)] {
        &self.pages
    }

    /// All link annotations placed on `source`, as `(rect, destination)`.
    pub fn links_from(&self, source: PageId) -> Vec<(Rect, PageId)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Link {
                    source: s,
                    rect,
                    destination,
                } if *s == source => Some((*rect, *destination)),
                _ => None,
            })
            .collect()
    }

    pub fn link_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Link { .. }))
            .count()
    }

    /// Every string drawn on `page`, in drawing order.
    pub fn texts_on(&self, page: PageId) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check(&self, page: PageId) -> Result<()> {
        if page.0 < self.pages.len() {
            Ok(())
        } else {
            Err(PlannerError::UnknownPage(page))
        }
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self, width: f64, height: f64) -> Result<PageId> {
        check_page_size(width, height)?;
        self.pages.push((width, height));
        Ok(PageId(self.pages.len() - 1))
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn draw_text(
        &mut self,
        page: PageId,
        x: f64,
        y: f64,
        font_size: f64,
        text: &str,
    ) -> Result<()> {
        self.check(page)?;
        self.ops.push(CanvasOp::Text {
            page,
            x,
            y,
            font_size,
            text: text.to_string(),
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        page: PageId,
        from: (f64, f64),
        to: (f64, f64),
        _width: f64,
    ) -> Result<()> {
        self.check(page)?;
        self.ops.push(CanvasOp::Line { page, from, to });
        Ok(())
    }

    fn draw_rect(&mut self, page: PageId, rect: &Rect, _width: f64) -> Result<()> {
        self.check(page)?;
        self.ops.push(CanvasOp::Rect { page, rect: *rect });
        Ok(())
    }

    fn add_link(&mut self, source: PageId, rect: Rect, destination: PageId) -> Result<()> {
        self.check(source)?;
        self.check(destination)?;
        self.ops.push(CanvasOp::Link {
            source,
            rect,
            destination,
        });
        Ok(())
    }

    fn measure_text_width(&self, text: &str, font_size: f64) -> f64 {
        HELVETICA.measure_string(text, font_size)
    }
}
