//! Output formatting for CLI display.

use crate::model::{TourConfig, TourStep};

/// One line of `list` output: id, title, category, step count, seen marker.
pub(super) fn format_tour_line(tour: &TourConfig, seen: bool) -> String {
    let marker = if seen { " " } else { "*" };
    let steps = if tour.len() == 1 { "step" } else { "steps" };
    format!(
        "{marker} {:<16} {:<28} {:<10} {} {steps}",
        tour.id,
        tour.display_title,
        tour.category.as_str(),
        tour.len(),
    )
}

/// A step as shown by `show`, numbered from 1. Ends with a newline.
pub(super) fn format_step(index: usize, step: &TourStep) -> String {
    let mut out = format!(
        "{}. {}  (#{}, {})\n   {}\n",
        index + 1,
        step.title,
        step.anchor,
        step.preferred_side.as_str(),
        step.body,
    );
    if let Some(action) = &step.action_hint {
        out.push_str(&format!("   → {action}\n"));
    }
    if let Some(expect) = &step.expectation_hint {
        out.push_str(&format!("   ✓ {expect}\n"));
    }
    if let Some(missing) = &step.missing_hint {
        out.push_str(&format!("   if missing: {missing}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::Side;
    use crate::testing::{step, tour};

    #[test]
    fn unseen_tours_are_starred() {
        let t = tour("basics", &["header", "footer"]);
        assert!(format_tour_line(&t, false).starts_with("* basics"));
        assert!(format_tour_line(&t, true).starts_with("  basics"));
        assert!(format_tour_line(&t, true).ends_with("2 steps"));
    }

    #[test]
    fn single_step_is_singular() {
        let t = tour("deep", &["appendix"]);
        assert!(format_tour_line(&t, true).ends_with("1 step"));
    }

    #[test]
    fn step_lists_hints() {
        let mut s = step("sidebar", Side::Right);
        s.action_hint = Some("Click a section".into());
        let out = format_step(1, &s);
        assert!(out.starts_with("2. About sidebar  (#sidebar, right)\n"));
        assert!(out.contains("   → Click a section\n"));
        assert!(out.contains("   if missing: sidebar is not on this page.\n"));
        assert!(!out.contains('✓'));
    }
}
