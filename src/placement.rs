//! Placement engine: where the cutout and tooltip go.
//!
//! Pure functions over already-measured geometry. Given the target's
//! rectangle, the step's preferred side, the tooltip's size, and the
//! viewport, compute:
//!
//! - the cutout: the target grown by `padding`, carved out of the dim layer;
//! - the tooltip position, clamped so it never leaves the viewport.
//!
//! `top` and `bottom` always stay on their side and only clamp. `left` and
//! `right` are used only when the tooltip fits between the target edge and
//! the viewport margin; otherwise the `bottom` rule is used instead. There
//! is no scoring between sides: it is that one substitution or nothing.

use serde::Serialize;
use tracing::debug;

use crate::model::{Position, Rect, Side, Size};

/// Spacing constants for placement, in the host's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// How far the cutout extends past the target on every side.
    pub padding: f64,

    /// Distance between the cutout edge and the tooltip.
    pub gap: f64,

    /// Minimum distance between the tooltip and the viewport edge.
    pub margin: f64,
}

impl PlacementConfig {
    /// Spacing for a character-cell terminal.
    pub const TERMINAL: Self = Self {
        padding: 1.0,
        gap: 1.0,
        margin: 1.0,
    };

    fn offset(&self) -> f64 {
        self.padding + self.gap
    }
}

impl Default for PlacementConfig {
    /// Pixel spacing: 8px padding, 16px gap, 12px margin.
    fn default() -> Self {
        Self {
            padding: 8.0,
            gap: 16.0,
            margin: 12.0,
        }
    }
}

/// Where the tooltip goes and which side it ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub position: Position,

    /// The side actually used. May differ from the preferred side after a
    /// left/right fallback; the arrow is drawn from this.
    pub resolved_side: Side,
}

/// The region carved out of the dim layer around a target.
pub fn compute_cutout(rect: Rect, padding: f64) -> Rect {
    rect.expand(padding)
}

/// Computes the tooltip position for a target.
///
/// Degenerate (zero-sized) targets are placed like any other.
pub fn compute_placement(
    rect: Rect,
    preferred: Side,
    tooltip: Size,
    viewport: Size,
    config: &PlacementConfig,
) -> Placement {
    let offset = config.offset();
    let margin = config.margin;

    let (left, top, side) = match preferred {
        Side::Bottom => {
            let (left, top) = below(rect, tooltip, offset);
            (left, top, Side::Bottom)
        }
        Side::Top => (
            rect.center_x() - tooltip.width / 2.0,
            rect.top - offset - tooltip.height,
            Side::Top,
        ),
        Side::Right => {
            let edge = rect.right() + offset;
            if edge + tooltip.width > viewport.width - margin {
                fall_back(preferred, rect, tooltip, offset)
            } else {
                (edge, beside(rect, tooltip), Side::Right)
            }
        }
        Side::Left => {
            let edge = rect.left - offset;
            if edge - tooltip.width < margin {
                fall_back(preferred, rect, tooltip, offset)
            } else {
                (edge - tooltip.width, beside(rect, tooltip), Side::Left)
            }
        }
    };

    Placement {
        position: Position {
            top: clamp_axis(top, tooltip.height, viewport.height, margin),
            left: clamp_axis(left, tooltip.width, viewport.width, margin),
        },
        resolved_side: side,
    }
}

/// The centered dialog used when a step's target cannot be found.
pub fn center_in(viewport: Size, size: Size, config: &PlacementConfig) -> Position {
    Position {
        top: clamp_axis(
            (viewport.height - size.height) / 2.0,
            size.height,
            viewport.height,
            config.margin,
        ),
        left: clamp_axis(
            (viewport.width - size.width) / 2.0,
            size.width,
            viewport.width,
            config.margin,
        ),
    }
}

fn below(rect: Rect, tooltip: Size, offset: f64) -> (f64, f64) {
    (rect.center_x() - tooltip.width / 2.0, rect.bottom() + offset)
}

fn beside(rect: Rect, tooltip: Size) -> f64 {
    rect.center_y() - tooltip.height / 2.0
}

fn fall_back(preferred: Side, rect: Rect, tooltip: Size, offset: f64) -> (f64, f64, Side) {
    debug!(side = preferred.as_str(), "tooltip does not fit, placing below");
    let (left, top) = below(rect, tooltip, offset);
    (left, top, Side::Bottom)
}

/// Clamps one axis into `[margin, extent - size - margin]`.
///
/// When the box is too large for the viewport the range is empty and the
/// lower bound wins, so the box starts at `margin` rather than going
/// negative.
fn clamp_axis(value: f64, size: f64, extent: f64, margin: f64) -> f64 {
    value.min(extent - size - margin).max(margin)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOLTIP: Size = Size::new(360.0, 160.0);

    fn target() -> Rect {
        Rect::new(10.0, 10.0, 100.0, 40.0)
    }

    fn place(rect: Rect, side: Side, viewport: Size) -> Placement {
        compute_placement(rect, side, TOOLTIP, viewport, &PlacementConfig::default())
    }

    #[test]
    fn cutout_adds_padding() {
        let cutout = compute_cutout(target(), 8.0);
        assert_eq!(cutout, Rect::new(2.0, 2.0, 116.0, 56.0));
    }

    #[test]
    fn right_fits_in_wide_viewport() {
        // Right edge: 10 + 100 + 8 + 16 = 134; 134 + 360 = 494 < 800 - 12.
        let placement = place(target(), Side::Right, Size::new(800.0, 600.0));
        assert_eq!(placement.resolved_side, Side::Right);
        assert_eq!(placement.position.left, 134.0);
    }

    #[test]
    fn right_falls_back_to_bottom_in_narrow_viewport() {
        // 134 + 360 = 494 > 300 - 12; the bottom range [12, -72] is empty.
        let placement = place(target(), Side::Right, Size::new(300.0, 600.0));
        assert_eq!(placement.resolved_side, Side::Bottom);
        assert_eq!(placement.position.left, 12.0);
        assert_eq!(placement.position.top, 10.0 + 40.0 + 8.0 + 16.0);
    }

    #[test]
    fn left_falls_back_when_target_hugs_left_edge() {
        let placement = place(target(), Side::Left, Size::new(800.0, 600.0));
        assert_eq!(placement.resolved_side, Side::Bottom);
    }

    #[test]
    fn left_fits_when_there_is_room() {
        let rect = Rect::new(200.0, 500.0, 100.0, 40.0);
        let placement = place(rect, Side::Left, Size::new(1000.0, 600.0));
        assert_eq!(placement.resolved_side, Side::Left);
        // Edge: 500 - 24 = 476; tooltip ends there.
        assert_eq!(placement.position.left, 476.0 - 360.0);
        // Vertically centered on the target: 220 - 80.
        assert_eq!(placement.position.top, 140.0);
    }

    #[test]
    fn bottom_centers_on_target() {
        let rect = Rect::new(100.0, 300.0, 200.0, 50.0);
        let placement = place(rect, Side::Bottom, Size::new(1000.0, 800.0));
        assert_eq!(placement.resolved_side, Side::Bottom);
        assert_eq!(placement.position.left, 400.0 - 180.0);
        assert_eq!(placement.position.top, 150.0 + 24.0);
    }

    #[test]
    fn top_sits_above_target() {
        let rect = Rect::new(400.0, 300.0, 200.0, 50.0);
        let placement = place(rect, Side::Top, Size::new(1000.0, 800.0));
        assert_eq!(placement.resolved_side, Side::Top);
        assert_eq!(placement.position.top, 400.0 - 24.0 - 160.0);
    }

    #[test]
    fn top_never_falls_back_only_clamps() {
        let placement = place(target(), Side::Top, Size::new(800.0, 600.0));
        assert_eq!(placement.resolved_side, Side::Top);
        assert_eq!(placement.position.top, 12.0);
    }

    #[test]
    fn bottom_clamps_near_viewport_bottom() {
        let rect = Rect::new(580.0, 300.0, 100.0, 20.0);
        let placement = place(rect, Side::Bottom, Size::new(800.0, 600.0));
        assert_eq!(placement.position.top, 600.0 - 160.0 - 12.0);
    }

    #[test]
    fn degenerate_target_still_places() {
        let rect = Rect::new(300.0, 400.0, 0.0, 0.0);
        let placement = place(rect, Side::Bottom, Size::new(800.0, 600.0));
        assert_eq!(placement.position.left, 400.0 - 180.0);
        assert_eq!(placement.position.top, 324.0);
        assert_eq!(compute_cutout(rect, 8.0), Rect::new(292.0, 392.0, 16.0, 16.0));
    }

    #[test]
    fn position_stays_inside_viewport_for_any_target() {
        let viewports = [Size::new(800.0, 600.0), Size::new(1440.0, 900.0), Size::new(400.0, 200.0)];
        let sides = [Side::Top, Side::Bottom, Side::Left, Side::Right];
        let config = PlacementConfig::default();

        for viewport in viewports {
            for side in sides {
                for top in (-400..1200).step_by(97) {
                    for left in (-400..1600).step_by(113) {
                        let rect = Rect::new(f64::from(top), f64::from(left), 120.0, 30.0);
                        let p = compute_placement(rect, side, TOOLTIP, viewport, &config);

                        assert!(p.position.left >= config.margin);
                        assert!(p.position.top >= config.margin);
                        if viewport.width >= TOOLTIP.width + 2.0 * config.margin {
                            assert!(p.position.left + TOOLTIP.width <= viewport.width - config.margin);
                        }
                        if viewport.height >= TOOLTIP.height + 2.0 * config.margin {
                            assert!(p.position.top + TOOLTIP.height <= viewport.height - config.margin);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn side_fallback_is_always_bottom() {
        let config = PlacementConfig::default();
        let viewport = Size::new(500.0, 600.0);
        for left in (0..500).step_by(25) {
            let rect = Rect::new(100.0, f64::from(left), 80.0, 30.0);
            for side in [Side::Left, Side::Right] {
                let p = compute_placement(rect, side, TOOLTIP, viewport, &config);
                assert!(p.resolved_side == side || p.resolved_side == Side::Bottom);
                if p.resolved_side == Side::Bottom {
                    let expected = compute_placement(rect, Side::Bottom, TOOLTIP, viewport, &config);
                    assert_eq!(p, expected);
                }
            }
        }
    }

    #[test]
    fn center_in_viewport() {
        let pos = center_in(Size::new(800.0, 600.0), TOOLTIP, &PlacementConfig::default());
        assert_eq!(pos.left, 220.0);
        assert_eq!(pos.top, 220.0);
    }
}
