//! # Hierarchy Builder
//!
//! Materializes one level of the page tree: `count` consecutive periods
//! starting at a base date, each one level-unit after the previous, with
//! the sibling chain threaded through them.
//!
//! Construction is two-phase. Nodes are created first; the parent handle
//! and the sibling indices are attached afterwards, once the whole
//! sequence exists.

use std::rc::Rc;

use chrono::{Datelike, Days, Months, NaiveDate};

use super::{PageKind, PageNode};
use crate::canvas::PageId;
use crate::config::PageLayout;
use crate::error::{PlannerError, Result};

/// Date of the `index`-th period after `base`, in the unit of `kind`.
///
/// Years and months step from the start of the period, so `base` is
/// expected to be the first day of one.
pub fn offset_date(kind: PageKind, base: NaiveDate, index: usize) -> Result<NaiveDate> {
    let out_of_range = || PlannerError::DateOutOfRange {
        base,
        offset: index,
    };

    match kind {
        PageKind::Root | PageKind::Year => i32::try_from(index)
            .ok()
            .and_then(|years| base.year().checked_add(years))
            .and_then(|year| base.with_year(year))
            .ok_or_else(out_of_range),
        PageKind::Month => u32::try_from(index)
            .ok()
            .and_then(|months| base.checked_add_months(Months::new(months)))
            .ok_or_else(out_of_range),
        PageKind::Day => base
            .checked_add_days(Days::new(index as u64))
            .ok_or_else(out_of_range),
    }
}

/// Build the ordered children of the node whose page is `parent`.
///
/// Produces exactly `count` nodes of `kind` dated `base + 0 .. base + count`,
/// linked left/right to their neighbours with no wraparound. Nothing is
/// drawn.
pub fn build_level(
    parent: PageId,
    kind: PageKind,
    base: NaiveDate,
    count: usize,
    layout: &Rc<PageLayout>,
) -> Result<Vec<PageNode>> {
    let mut nodes = Vec::with_capacity(count);
    for index in 0..count {
        let date = offset_date(kind, base, index)?;
        nodes.push(PageNode::new(kind, date, Rc::clone(layout)));
    }

    for node in &mut nodes {
        node.parent = Some(parent);
    }
    thread_siblings(&mut nodes);

    Ok(nodes)
}

/// Link every node to its neighbours in sequence order.
pub fn thread_siblings(nodes: &mut [PageNode]) {
    let len = nodes.len();
    for (index, node) in nodes.iter_mut().enumerate() {
        node.sibling_left = index.checked_sub(1);
        node.sibling_right = (index + 1 < len).then_some(index + 1);
    }
}
