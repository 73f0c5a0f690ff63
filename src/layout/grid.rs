//! # Grid Layout
//!
//! Partitions a rectangular region into `rows × columns` equal cells and
//! places one child per cell as a clickable thumbnail:
//! - row-major fill, row 0 at the top of the region
//! - optional leading blank cells (calendar offset)
//! - optional reversed fill order
//! - optional column mirroring for left-handed layouts
//!
//! Placement is a pure function of its inputs ([`compute_placements`]);
//! drawing and linking happen in [`place_children`].

use tracing::warn;

use crate::canvas::{Canvas, PageId, Rect};
use crate::error::{PlannerError, Result};

/// Something the grid can place: a label and the page a click should open.
pub trait GridChild {
    /// Short label drawn inside the cell.
    fn label(&self) -> String;
    /// The child's page, once it has been allocated.
    fn page(&self) -> Option<PageId>;
}

/// How to partition the region and what to draw in each cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub rows: usize,
    pub columns: usize,
    /// Assign children to cells last-first. No planner level sets this;
    /// left-handed pages mirror through `left_handed` instead.
    pub reversed: bool,
    /// Mirror columns so the first column is on the right.
    pub left_handed: bool,
    /// Large, vertically centered labels instead of small top-aligned ones.
    pub top_level: bool,
    /// Inset of the drawn cell border from the cell edge.
    pub divider_offset: f64,
    pub draw_border: bool,
    /// Cells to leave empty before the first child.
    pub leading_cells: usize,
    pub label_font_size: f64,
}

impl GridOptions {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            reversed: false,
            left_handed: false,
            top_level: false,
            divider_offset: 0.0,
            draw_border: false,
            leading_cells: 0,
            label_font_size: 10.0,
        }
    }

    pub fn capacity(&self) -> usize {
        (self.rows * self.columns).saturating_sub(self.leading_cells)
    }
}

/// Where one child landed in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index of the child in the input sequence.
    pub child_index: usize,
    /// Visual row, 0 at the top.
    pub row: usize,
    /// Visual column, 0 on the left.
    pub column: usize,
    pub rect: Rect,
}

/// Rectangle of the cell at visual `(row, column)`.
pub fn cell_rect(region: &Rect, options: &GridOptions, row: usize, column: usize) -> Rect {
    let cell_width = region.width() / options.columns as f64;
    let cell_height = region.height() / options.rows as f64;
    Rect::new(
        region.x0 + column as f64 * cell_width,
        region.y0 + row as f64 * cell_height,
        region.x0 + (column + 1) as f64 * cell_width,
        region.y0 + (row + 1) as f64 * cell_height,
    )
}

/// Visual column for a logical column, honoring left-handed mirroring.
pub fn visual_column(options: &GridOptions, column: usize) -> usize {
    if options.left_handed {
        options.columns - 1 - column
    } else {
        column
    }
}

/// Compute the cell of every child that fits.
///
/// Children past the grid's capacity get no placement, whatever the fill
/// order.
pub fn compute_placements(
    region: &Rect,
    options: &GridOptions,
    child_count: usize,
) -> Vec<Placement> {
    if options.rows == 0 || options.columns == 0 || child_count == 0 {
        return vec![];
    }

    let placed = child_count.min(options.capacity());
    let mut result = Vec::with_capacity(placed);

    for slot in 0..placed {
        let child_index = if options.reversed {
            placed - 1 - slot
        } else {
            slot
        };
        let cell = slot + options.leading_cells;
        let row = cell / options.columns;
        let column = visual_column(options, cell % options.columns);

        result.push(Placement {
            child_index,
            row,
            column,
            rect: cell_rect(region, options, row, column),
        });
    }

    result
}

/// Draw and link every child that fits into `region` on `page`.
///
/// Each placed child gets its label, an optional border, and exactly one
/// link annotation from its cell to the child's page.
pub fn place_children<C, T>(
    canvas: &mut C,
    page: PageId,
    region: &Rect,
    options: &GridOptions,
    children: &[T],
) -> Result<Vec<Placement>>
where
    C: Canvas + ?Sized,
    T: GridChild,
{
    if children.is_empty() {
        return Ok(vec![]);
    }

    let placements = compute_placements(region, options, children.len());
    if placements.len() < children.len() {
        warn!(
            children = children.len(),
            capacity = options.capacity(),
            "grid too small, dropping children"
        );
    }

    for placement in &placements {
        let child = &children[placement.child_index];
        let label = child.label();
        let destination = child.page().ok_or_else(|| PlannerError::NotBuilt(label.clone()))?;
        let cell = placement.rect;

        if options.draw_border {
            canvas.draw_rect(page, &cell.inset(options.divider_offset), 0.5)?;
        }

        let font_size = options.label_font_size;
        let baseline = if options.top_level {
            // Cap height of Helvetica is ~0.72em.
            cell.y0 + (cell.height() + font_size * 0.72) / 2.0
        } else {
            cell.y0 + options.divider_offset + font_size * 1.2
        };
        canvas.draw_centered_text(page, &label, cell.x0, cell.x1, baseline, font_size)?;
        canvas.add_link(page, cell, destination)?;
    }

    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasOp, RecordingCanvas};

    struct Thumb {
        label: &'static str,
        page: PageId,
    }

    impl GridChild for Thumb {
        fn label(&self) -> String {
            self.label.to_string()
        }

        fn page(&self) -> Option<PageId> {
            Some(self.page)
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_three_columns_one_row() {
        let region = Rect::new(0.0, 0.0, 100.0, 50.0);
        let placements = compute_placements(&region, &GridOptions::new(1, 3), 3);
        assert_eq!(placements.len(), 3);

        let expected = [(0.0, 33.33), (33.33, 66.67), (66.67, 100.0)];
        for (p, (x0, x1)) in placements.iter().zip(expected) {
            assert!(approx(p.rect.x0, x0), "{:?}", p.rect);
            assert!(approx(p.rect.x1, x1), "{:?}", p.rect);
            assert!(approx(p.rect.y0, 0.0));
            assert!(approx(p.rect.y1, 50.0));
        }
    }

    #[test]
    fn test_row_major_fill() {
        let region = Rect::new(0.0, 0.0, 30.0, 20.0);
        let placements = compute_placements(&region, &GridOptions::new(2, 3), 5);
        let cells: Vec<(usize, usize)> = placements.iter().map(|p| (p.row, p.column)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_reversed_fill() {
        let region = Rect::new(0.0, 0.0, 30.0, 20.0);
        let options = GridOptions {
            reversed: true,
            ..GridOptions::new(2, 2)
        };
        let placements = compute_placements(&region, &options, 4);
        // The last child takes the top-left cell, the first the bottom-right.
        assert_eq!(placements[0].child_index, 3);
        assert_eq!((placements[0].row, placements[0].column), (0, 0));
        let first = placements.iter().find(|p| p.child_index == 0).unwrap();
        assert_eq!((first.row, first.column), (1, 1));
    }

    #[test]
    fn test_left_handed_mirrors_columns() {
        let region = Rect::new(0.0, 0.0, 30.0, 20.0);
        let options = GridOptions {
            left_handed: true,
            ..GridOptions::new(1, 3)
        };
        let placements = compute_placements(&region, &options, 3);
        let columns: Vec<usize> = placements.iter().map(|p| p.column).collect();
        assert_eq!(columns, vec![2, 1, 0]);
        assert!(approx(placements[0].rect.x0, 20.0));
    }

    #[test]
    fn test_leading_cells_offset_calendar() {
        let region = Rect::new(0.0, 0.0, 70.0, 60.0);
        let options = GridOptions {
            leading_cells: 4,
            ..GridOptions::new(6, 7)
        };
        let placements = compute_placements(&region, &options, 31);
        assert_eq!(placements.len(), 31);
        assert_eq!((placements[0].row, placements[0].column), (0, 4));
        assert_eq!((placements[3].row, placements[3].column), (1, 0));
        assert_eq!((placements[30].row, placements[30].column), (4, 6));
    }

    #[test]
    fn test_overflow_children_are_dropped() {
        let region = Rect::new(0.0, 0.0, 10.0, 10.0);
        let placements = compute_placements(&region, &GridOptions::new(2, 2), 7);
        assert_eq!(placements.len(), 4);
        assert!(placements.iter().all(|p| p.child_index < 4));
    }

    #[test]
    fn test_degenerate_grid_places_nothing() {
        let region = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(compute_placements(&region, &GridOptions::new(0, 3), 2).is_empty());
        assert!(compute_placements(&region, &GridOptions::new(3, 0), 2).is_empty());
    }

    #[test]
    fn test_place_children_links_each_child_once() {
        let mut canvas = RecordingCanvas::new();
        let parent = canvas.new_page(200.0, 200.0).unwrap();
        let children: Vec<Thumb> = ["Jan", "Feb", "Mar"]
            .iter()
            .map(|&label| Thumb {
                label,
                page: canvas.new_page(200.0, 200.0).unwrap(),
            })
            .collect();

        let region = Rect::new(0.0, 0.0, 90.0, 30.0);
        let options = GridOptions {
            draw_border: true,
            divider_offset: 2.0,
            ..GridOptions::new(1, 3)
        };
        let placements = place_children(&mut canvas, parent, &region, &options, &children).unwrap();

        assert_eq!(placements.len(), 3);
        let links = canvas.links_from(parent);
        assert_eq!(links.len(), 3);
        for (placement, (rect, destination)) in placements.iter().zip(&links) {
            assert_eq!(*rect, placement.rect);
            assert_eq!(*destination, children[placement.child_index].page);
        }
        assert_eq!(canvas.texts_on(parent), vec!["Jan", "Feb", "Mar"]);
        let borders = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::Rect { .. }))
            .count();
        assert_eq!(borders, 3);
    }

    #[test]
    fn test_place_children_with_no_children_draws_nothing() {
        let mut canvas = RecordingCanvas::new();
        let parent = canvas.new_page(200.0, 200.0).unwrap();
        let children: Vec<Thumb> = vec![];
        let placements = place_children(
            &mut canvas,
            parent,
            &Rect::new(0.0, 0.0, 10.0, 10.0),
            &GridOptions::new(2, 2),
            &children,
        )
        .unwrap();
        assert!(placements.is_empty());
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_labels_are_centered_in_cells() {
        let mut canvas = RecordingCanvas::new();
        let parent = canvas.new_page(200.0, 200.0).unwrap();
        let child = Thumb {
            label: "May",
            page: canvas.new_page(200.0, 200.0).unwrap(),
        };
        let options = GridOptions {
            top_level: true,
            ..GridOptions::new(1, 1)
        };
        place_children(
            &mut canvas,
            parent,
            &Rect::new(100.0, 0.0, 200.0, 50.0),
            &options,
            &[child],
        )
        .unwrap();

        match &canvas.ops()[0] {
            CanvasOp::Text { x, y, .. } => {
                // "May" at 10pt is 18.89pt wide.
                assert!(approx(*x, 100.0 + (100.0 - 18.89) / 2.0));
                assert!(*y > 0.0 && *y < 50.0);
            }
            other => panic!("expected label text, got {:?}", other),
        }
    }
}
