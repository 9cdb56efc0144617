//! Overlay view: everything a renderer needs to paint the current step.
//!
//! [`OverlayView::build`] turns controller state into render-ready
//! geometry and labels. It holds no state of its own and is rebuilt every
//! frame. Renderers paint it; they do not decide anything.

use crate::anchor::Page;
use crate::controller::TourController;
use crate::model::{Category, Rect, Size, TargetSnapshot, TourConfig, TourStep};
use crate::placement::{Placement, PlacementConfig, center_in, compute_cutout, compute_placement};
use crate::schedule::Clock;

/// Shown when a step's anchor is missing and the step has no hint of its own.
pub const DEFAULT_MISSING_HINT: &str = "This part of the page isn't available right now.";

/// A navigation control on the tooltip or dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Back,
    Close,
    Next,
    Done,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Self::Back => "Back",
            Self::Close => "Close",
            Self::Next => "Next",
            Self::Done => "Done",
        }
    }

    /// Performs the control's action on the controller.
    pub fn apply<P: Page, C: Clock>(self, controller: &mut TourController<P, C>) {
        match self {
            Self::Back => controller.back(),
            Self::Close => {
                controller.stop();
            }
            Self::Next | Self::Done => {
                controller.next();
            }
        }
    }
}

/// The two buttons at the bottom of a step. Renderers add their own close
/// affordance next to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// `Back`, or `Close` on the first step.
    pub leading: Control,

    /// `Next`, or `Done` on the last step.
    pub trailing: Control,
}

impl Controls {
    pub fn for_step(index: usize, count: usize) -> Self {
        Self {
            leading: if index == 0 {
                Control::Close
            } else {
                Control::Back
            },
            trailing: if index + 1 >= count {
                Control::Done
            } else {
                Control::Next
            },
        }
    }
}

/// What sits on top of the dim layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The target was found but is still being scrolled into view.
    Settling,

    /// A highlighted target with a tooltip beside it.
    Anchored {
        /// The target as measured.
        target: Rect,

        /// Hole in the dim layer; also where the highlight ring goes.
        cutout: Rect,
        placement: Placement,
        tooltip: Rect,
    },

    /// The target could not be found: a centered dialog.
    Missing { dialog: Rect, hint: String },
}

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The dimmed area. Clicking here stops the tour.
    Backdrop,

    /// Inside the cutout. Swallowed, not passed through.
    Cutout,

    /// Inside the tooltip or dialog.
    Panel,

    /// Nothing is shown yet while the target settles. Swallowed, so a quick
    /// second click on a control that just moved does not stop the tour.
    Settling,
}

/// Render-ready state for the current step.
#[derive(Debug, Clone)]
pub struct OverlayView<'a> {
    pub tour: &'a TourConfig,
    pub step: &'a TourStep,
    pub index: usize,
    pub count: usize,
    pub viewport: Size,
    pub body: Body,
    pub controls: Controls,
}

impl<'a> OverlayView<'a> {
    /// Builds the view for the running tour, or `None` when idle.
    ///
    /// `panel` is the size of the tooltip (and of the missing-target
    /// dialog) in the host's units.
    pub fn build<P: Page, C: Clock>(
        controller: &'a TourController<P, C>,
        panel: Size,
        config: &PlacementConfig,
    ) -> Option<Self> {
        let tour = controller.tour()?;
        let step = controller.current_step()?;
        let (number, count) = controller.progress()?;
        let index = number - 1;
        let viewport = controller.page().viewport();

        let body = match controller.target() {
            None => Body::Settling,
            Some(TargetSnapshot::Found { rect }) => {
                let placement =
                    compute_placement(rect, step.preferred_side, panel, viewport, config);
                Body::Anchored {
                    target: rect,
                    cutout: compute_cutout(rect, config.padding),
                    placement,
                    tooltip: placement.position.with_size(panel),
                }
            }
            Some(TargetSnapshot::Missing) => Body::Missing {
                dialog: center_in(viewport, panel, config).with_size(panel),
                hint: step
                    .missing_hint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MISSING_HINT.to_string()),
            },
        };

        Some(Self {
            tour,
            step,
            index,
            count,
            viewport,
            body,
            controls: Controls::for_step(index, count),
        })
    }

    pub fn category(&self) -> Category {
        self.tour.category
    }

    /// The hole in the dim layer, if a target is shown.
    pub fn cutout(&self) -> Option<Rect> {
        match &self.body {
            Body::Anchored { cutout, .. } => Some(*cutout),
            _ => None,
        }
    }

    /// The tooltip or dialog box, if one is shown.
    pub fn panel(&self) -> Option<Rect> {
        match &self.body {
            Body::Anchored { tooltip, .. } => Some(*tooltip),
            Body::Missing { dialog, .. } => Some(*dialog),
            Body::Settling => None,
        }
    }

    /// "Step N of M".
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.index + 1, self.count)
    }

    /// Classifies a pointer position in viewport coordinates.
    pub fn hit_test(&self, left: f64, top: f64) -> Hit {
        if self.body == Body::Settling {
            Hit::Settling
        } else if self.panel().is_some_and(|p| p.contains(left, top)) {
            Hit::Panel
        } else if self.cutout().is_some_and(|c| c.contains(left, top)) {
            Hit::Cutout
        } else {
            Hit::Backdrop
        }
    }
}
