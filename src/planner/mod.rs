//! # Page Tree
//!
//! The planner is a tree of [`PageNode`]s: one root, a page per year, a
//! page per month, a page per day. Each node owns its children outright.
//! Navigation relations (left/right sibling, parent) are plain indices and
//! page handles stored alongside the tree and never keep anything alive.
//!
//! Building is depth-first and single-threaded. A node allocates its page,
//! creates its children, draws its title, builds every child, lets every
//! child link to its siblings, then draws its notes section and a grid of
//! links to its children.

pub mod hierarchy;
mod sections;

use std::fmt;
use std::rc::Rc;

use chrono::{Datelike, Months, NaiveDate};
use tracing::debug;

use crate::canvas::{Canvas, PageId, Rect};
use crate::config::PageLayout;
use crate::error::{PlannerError, Result};
use crate::layout::{place_children, GridChild, GridOptions};

/// Which level of the calendar a page represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Root,
    Year,
    Month,
    Day,
}

impl PageKind {
    /// The level one step down, if any.
    pub fn child_kind(self) -> Option<PageKind> {
        match self {
            PageKind::Root => Some(PageKind::Year),
            PageKind::Year => Some(PageKind::Month),
            PageKind::Month => Some(PageKind::Day),
            PageKind::Day => None,
        }
    }

    /// Heading above the section that lists this page's children.
    fn section_heading(self) -> &'static str {
        match self {
            PageKind::Root => "Years",
            PageKind::Year => "Months",
            PageKind::Month => "Days",
            PageKind::Day => "Schedule",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageKind::Root => "root",
            PageKind::Year => "year",
            PageKind::Month => "month",
            PageKind::Day => "day",
        };
        f.write_str(name)
    }
}

/// One page of the planner.
#[derive(Debug)]
pub struct PageNode {
    kind: PageKind,
    date: NaiveDate,
    title: String,
    /// Number of children this node creates when built.
    periods: usize,
    layout: Rc<PageLayout>,
    page: Option<PageId>,
    parent: Option<PageId>,
    sibling_left: Option<usize>,
    sibling_right: Option<usize>,
    children: Vec<PageNode>,
}

impl PageNode {
    /// A node for the period starting at `date`. Root nodes come from
    /// [`PageNode::root`] instead, since only they choose their own span.
    pub fn new(kind: PageKind, date: NaiveDate, layout: Rc<PageLayout>) -> Self {
        let periods = match kind {
            PageKind::Root => 0,
            PageKind::Year => 12,
            PageKind::Month => days_in_month(date),
            PageKind::Day => 0,
        };
        Self {
            kind,
            date,
            title: title_for(kind, date),
            periods,
            layout,
            page: None,
            parent: None,
            sibling_left: None,
            sibling_right: None,
            children: Vec::new(),
        }
    }

    /// The root of a planner covering `num_years` years from `base_year`.
    pub fn root(layout: Rc<PageLayout>, base_year: i32, num_years: usize) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(base_year, 1, 1).ok_or_else(|| {
            PlannerError::InvalidConfig(format!("baseYear {} is out of range", base_year))
        })?;
        let mut root = Self::new(PageKind::Root, date, layout);
        root.periods = num_years;
        Ok(root)
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// The page allocated for this node, once built.
    pub fn page(&self) -> Option<PageId> {
        self.page
    }

    pub fn parent(&self) -> Option<PageId> {
        self.parent
    }

    /// Index of the previous sibling in the parent's children.
    pub fn sibling_left(&self) -> Option<usize> {
        self.sibling_left
    }

    /// Index of the next sibling in the parent's children.
    pub fn sibling_right(&self) -> Option<usize> {
        self.sibling_right
    }

    pub fn children(&self) -> &[PageNode] {
        &self.children
    }

    /// Total number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PageNode::node_count).sum::<usize>()
    }

    /// Draw this page and, recursively, everything below it.
    pub fn build<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<()> {
        let page = canvas.new_page(self.layout.width, self.layout.height)?;
        self.page = Some(page);

        if let Some(kind) = self.kind.child_kind() {
            self.children =
                hierarchy::build_level(page, kind, self.date, self.periods, &self.layout)?;
        }

        self.draw_title(canvas, page)?;

        for child in &mut self.children {
            child.build(canvas)?;
        }
        for child in &self.children {
            child.create_navigation(canvas, &self.children)?;
        }

        sections::draw_notes(canvas, page, &self.layout)?;
        self.draw_children_section(canvas, page)?;

        debug!(kind = %self.kind, title = %self.title, page = page.0, "page built");
        Ok(())
    }

    /// Link this page to its previous and next siblings.
    ///
    /// `siblings` is the parent's child sequence this node belongs to.
    /// A node without siblings draws nothing.
    pub fn create_navigation<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        siblings: &[PageNode],
    ) -> Result<()> {
        let page = self.built_page()?;
        let layout = &self.layout;
        let font_size = layout.title_font_size;
        let baseline = font_size * 1.5;
        let arrow_box = |x0: f64| Rect::new(x0, 0.0, x0 + font_size * 1.5, layout.header_height());

        if let Some(index) = self.sibling_left {
            let destination = sibling_page(siblings, index)?;
            let rect = arrow_box(layout.margin);
            canvas.draw_centered_text(page, "<", rect.x0, rect.x1, baseline, font_size)?;
            canvas.add_link(page, rect, destination)?;
        }

        if let Some(index) = self.sibling_right {
            let destination = sibling_page(siblings, index)?;
            let rect = arrow_box(layout.width - layout.margin - font_size * 1.5);
            canvas.draw_centered_text(page, ">", rect.x0, rect.x1, baseline, font_size)?;
            canvas.add_link(page, rect, destination)?;
        }

        Ok(())
    }

    fn built_page(&self) -> Result<PageId> {
        self.page.ok_or_else(|| PlannerError::NotBuilt(self.title.clone()))
    }

    /// Title centered across the page; clicking it goes up a level.
    fn draw_title<C: Canvas + ?Sized>(&self, canvas: &mut C, page: PageId) -> Result<()> {
        let layout = &self.layout;
        let font_size = layout.title_font_size;
        let baseline = font_size * 1.5;
        canvas.draw_centered_text(page, &self.title, 0.0, layout.width, baseline, font_size)?;

        if let Some(parent) = self.parent {
            let width = canvas.measure_text_width(&self.title, font_size);
            let x0 = crate::canvas::centered_x(width, 0.0, layout.width);
            let rect = Rect::new(
                x0,
                baseline - font_size,
                x0 + width,
                baseline + font_size * 0.25,
            );
            canvas.add_link(page, rect, parent)?;
        }
        Ok(())
    }

    /// Everything beside the notes: a grid of children, or a schedule.
    fn draw_children_section<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        page: PageId,
    ) -> Result<()> {
        let layout = &self.layout;
        let area = sections::children_area(layout);
        sections::draw_heading(canvas, page, layout, &area, self.kind.section_heading())?;
        let mut region = sections::body_region(layout, &area);

        let options = match self.kind {
            PageKind::Day => return sections::draw_schedule(canvas, page, layout, &region),
            PageKind::Root => GridOptions {
                top_level: true,
                left_handed: layout.left_handed,
                divider_offset: 10.0,
                draw_border: true,
                label_font_size: layout.note_title_font_size,
                ..GridOptions::new(self.children.len(), 1)
            },
            PageKind::Year => {
                let (rows, columns) = if layout.portrait { (4, 3) } else { (3, 4) };
                GridOptions {
                    left_handed: layout.left_handed,
                    divider_offset: 4.0,
                    draw_border: true,
                    label_font_size: layout.note_title_font_size,
                    ..GridOptions::new(rows, columns)
                }
            }
            PageKind::Month => {
                let options = GridOptions {
                    divider_offset: 1.0,
                    draw_border: true,
                    leading_cells: sections::leading_blank_days(
                        self.date.weekday(),
                        layout.first_day_of_week,
                    ),
                    label_font_size: layout.label_font_size,
                    ..GridOptions::new(6, 7)
                };
                region.y0 = sections::draw_weekday_header(canvas, page, layout, &region, &options)?;
                options
            }
        };

        place_children(canvas, page, &region, &options, &self.children)?;
        Ok(())
    }
}

impl GridChild for PageNode {
    fn label(&self) -> String {
        match self.kind {
            PageKind::Root => self.title.clone(),
            PageKind::Year => self.date.format("%Y").to_string(),
            PageKind::Month => self.date.format("%b").to_string(),
            PageKind::Day => self.date.format("%-d").to_string(),
        }
    }

    fn page(&self) -> Option<PageId> {
        self.page
    }
}

fn sibling_page(siblings: &[PageNode], index: usize) -> Result<PageId> {
    match siblings.get(index) {
        Some(sibling) => sibling.built_page(),
        None => Err(PlannerError::NotBuilt(format!("sibling #{}", index))),
    }
}

fn title_for(kind: PageKind, date: NaiveDate) -> String {
    match kind {
        PageKind::Root => "Planner".to_string(),
        PageKind::Year => date.format("%Y").to_string(),
        PageKind::Month => date.format("%B %Y").to_string(),
        PageKind::Day => date.format("%A, %-d %B %Y").to_string(),
    }
}

/// Number of days in the month containing `date`.
fn days_in_month(date: NaiveDate) -> usize {
    let first = date.with_day(1).unwrap_or(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as usize,
        // December of the last representable year.
        None => 31,
    }
}
