//! Core data model for tourguide.
//!
//! These types are shared by every layer: tours and their steps (static
//! configuration), viewport geometry, and the target snapshot the
//! controller publishes for the overlay.

mod geometry;
mod target;
mod tour;

pub use geometry::{Position, Rect, Size};
pub use target::TargetSnapshot;
pub use tour::{Category, Side, TourConfig, TourStep};
