//! # Layout
//!
//! Geometry shared by every level of the planner. The grid engine is the
//! only placement primitive: years on the root page, months on a year page
//! and days on a month page all go through [`grid::place_children`].

pub mod grid;

pub use grid::{compute_placements, place_children, GridChild, GridOptions, Placement};
