//! Viewport geometry.
//!
//! All values are in viewport coordinates: the origin is the top-left
//! corner of the visible area, and a target scrolled above the fold has a
//! negative `top`. Units are whatever the host measures in (pixels in a
//! browser, cells in a terminal).

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            top: self.top - amount,
            left: self.left - amount,
            width: self.width + 2.0 * amount,
            height: self.height + 2.0 * amount,
        }
    }

    /// Whether the point lies inside the rectangle (edges inclusive on the
    /// top-left, exclusive on the bottom-right).
    pub fn contains(&self, left: f64, top: f64) -> bool {
        left >= self.left && left < self.right() && top >= self.top && top < self.bottom()
    }
}

/// Width and height of a box: a viewport or a tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a positioned box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
}

impl Position {
    /// The rectangle a box of `size` occupies when placed here.
    pub fn with_size(self, size: Size) -> Rect {
        Rect::new(self.top, self.left, size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_grows_every_side() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0).expand(8.0);
        assert_eq!(rect, Rect::new(2.0, 12.0, 116.0, 56.0));
    }

    #[test]
    fn expand_degenerate_rect() {
        let rect = Rect::new(50.0, 50.0, 0.0, 0.0).expand(8.0);
        assert_eq!(rect, Rect::new(42.0, 42.0, 16.0, 16.0));
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(0.0, 0.0));
        assert!(rect.contains(9.5, 9.5));
        assert!(!rect.contains(10.0, 5.0));
        assert!(!rect.contains(5.0, 10.0));
    }
}
