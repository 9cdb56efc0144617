//! Target snapshot: where the current step's anchor is right now.

use serde::Serialize;

use super::Rect;

/// The result of resolving an anchor.
///
/// Derived on demand, never persisted. A missing anchor carries no
/// rectangle, so "not found but has geometry" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetSnapshot {
    /// Exactly one element matched; its current bounding rectangle.
    Found { rect: Rect },

    /// No element (or more than one) matched the anchor.
    Missing,
}

impl TargetSnapshot {
    pub fn found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Self::Found { rect } => Some(*rect),
            Self::Missing => None,
        }
    }
}
