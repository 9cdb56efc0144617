//! Tour types: the static, declarative description of a walkthrough.

use serde::{Deserialize, Serialize};

/// Which side of the target the tooltip prefers to sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Presentation grouping for a tour. Only affects the overlay theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    General,
    Handbook,
    Leave,
    Pto,
    Onboarding,
    Loyalty,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Handbook => "handbook",
            Self::Leave => "leave",
            Self::Pto => "pto",
            Self::Onboarding => "onboarding",
            Self::Loyalty => "loyalty",
        }
    }
}

/// One stop on a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TourStep {
    /// Logical name of the UI element this step points at.
    pub anchor: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub preferred_side: Side,

    /// What the user should do at this step.
    #[serde(default)]
    pub action_hint: Option<String>,

    /// What the user should expect to happen.
    #[serde(default)]
    pub expectation_hint: Option<String>,

    /// Shown instead of anchored UI when the anchor cannot be found.
    #[serde(default)]
    pub missing_hint: Option<String>,
}

/// A complete tour: identity, presentation, and an ordered, non-empty
/// list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TourConfig {
    pub id: String,
    pub display_title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(rename = "step")]
    pub steps: Vec<TourStep>,
}

impl TourConfig {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}
