//! # Planner
//!
//! Generates a linked PDF planner: a root page listing years, a page per
//! year listing its months, a page per month laid out as a calendar, and a
//! page per day with notes and a schedule. Every listing is a grid of
//! clickable links, every page links to its previous and next sibling, and
//! every title links back up to its parent.
//!
//! ## Architecture
//!
//! ```text
//! PlannerConfig (JSON / CLI)
//!       ↓
//!   [config]   — Normalized page geometry shared by every page
//!       ↓
//!   [planner]  — Page tree: hierarchy builder + depth-first build
//!       ↓
//!   [layout]   — Grid placement of child links
//!       ↓
//!   [canvas]   — Drawing port
//!       ↓
//!   [pdf]      — Serialize to PDF bytes
//! ```

pub mod canvas;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod pdf;
pub mod planner;

use std::rc::Rc;

use tracing::info;

use canvas::Canvas;
use config::{PageLayout, PlannerConfig};
use error::Result;
use pdf::PdfCanvas;
use planner::PageNode;

pub use error::PlannerError;

/// Counts reported after a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub links: usize,
}

/// Build the whole page tree for `config` into `canvas`.
///
/// Returns the built tree. The canvas is left ready to be finalized; any
/// error leaves it in an undefined, partially drawn state.
pub fn build_planner<C: Canvas + ?Sized>(
    config: &PlannerConfig,
    canvas: &mut C,
) -> Result<PageNode> {
    let layout = Rc::new(PageLayout::from_config(config));
    let mut root = PageNode::root(layout, config.base_year, config.num_years as usize)?;

    info!(
        base_year = config.base_year,
        years = config.num_years,
        "building planner"
    );
    root.build(canvas)?;
    info!(pages = canvas.page_count(), "planner built");

    Ok(root)
}

/// Render a planner to PDF bytes.
pub fn render(config: &PlannerConfig) -> Result<Vec<u8>> {
    let mut canvas = PdfCanvas::new();
    let root = build_planner(config, &mut canvas)?;
    canvas.set_title(&document_title(config, &root));
    Ok(canvas.to_bytes())
}

/// Render a planner and write it to `config.filename`.
///
/// The file is only written once the whole tree has been built, so a
/// failed build never leaves a partial document behind.
pub fn generate(config: &PlannerConfig) -> Result<BuildSummary> {
    let mut canvas = PdfCanvas::new();
    let root = build_planner(config, &mut canvas)?;
    canvas.set_title(&document_title(config, &root));
    canvas.save(&config.filename)?;

    let summary = BuildSummary {
        pages: canvas.page_count(),
        links: canvas.link_count(),
    };
    info!(
        path = %config.filename.display(),
        pages = summary.pages,
        links = summary.links,
        "planner written"
    );
    Ok(summary)
}

fn document_title(config: &PlannerConfig, root: &PageNode) -> String {
    match config.num_years {
        0 => root.title().to_string(),
        1 => format!("{} {}", root.title(), config.base_year),
        n => format!(
            "{} {}-{}",
            root.title(),
            config.base_year,
            i64::from(config.base_year) + i64::from(n) - 1
        ),
    }
}
