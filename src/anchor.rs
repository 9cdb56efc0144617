//! Anchor resolution and the host page a tour runs over.
//!
//! The controller never looks at a widget tree directly. It asks an
//! [`AnchorResolver`] for the rectangle of a named anchor, and a [`Page`]
//! for the viewport size, programmatic scrolling, and the background
//! scroll lock. Any environment (terminal, browser bridge, test harness)
//! can implement these.

use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;

use crate::model::{Rect, Size, TargetSnapshot};

/// Looks up the on-screen rectangle for an anchor name.
pub trait AnchorResolver {
    /// Resolves `anchor` against the currently rendered tree.
    ///
    /// Must be callable at any time. Never fails: zero matches (or an
    /// ambiguous name) is [`TargetSnapshot::Missing`].
    fn resolve(&self, anchor: &str) -> TargetSnapshot;
}

/// The host surface a tour is drawn over.
pub trait Page: AnchorResolver {
    /// Current size of the visible area.
    fn viewport(&self) -> Size;

    /// Scrolls so the anchor sits at the vertical center of the viewport.
    ///
    /// Programmatic: must work while the scroll lock is held.
    fn scroll_to_center(&mut self, anchor: &str);

    /// Suppresses user scrolling of the page until the returned guard drops.
    fn lock_scroll(&self) -> ScrollLock;
}

/// Picks the single rectangle registered under `anchor`.
///
/// Hosts that keep a flat list of named regions can delegate
/// [`AnchorResolver::resolve`] here.
pub fn resolve_unique<'a>(
    anchor: &str,
    regions: impl IntoIterator<Item = (&'a str, Rect)>,
) -> TargetSnapshot {
    let mut matches = regions.into_iter().filter(|(name, _)| *name == anchor);
    match (matches.next(), matches.next()) {
        (Some((_, rect)), None) => TargetSnapshot::Found { rect },
        (Some(_), Some(_)) => {
            warn!(anchor, "anchor is not unique, treating as missing");
            TargetSnapshot::Missing
        }
        (None, _) => TargetSnapshot::Missing,
    }
}

/// Shared scroll-lock state owned by a page.
///
/// Counts outstanding [`ScrollLock`] guards; the page is locked while any
/// guard is alive.
#[derive(Debug, Clone, Default)]
pub struct ScrollLatch {
    holders: Rc<Cell<usize>>,
}

impl ScrollLatch {
    pub fn lock(&self) -> ScrollLock {
        self.holders.set(self.holders.get() + 1);
        ScrollLock {
            holders: Rc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }
}

/// Guard that keeps the page's background scroll suppressed.
///
/// Releasing happens in `Drop`, so the lock is lifted on every exit path:
/// stop, completion, a restarted tour, or the controller itself going away.
#[derive(Debug)]
#[must_use = "the scroll lock is released as soon as the guard is dropped"]
pub struct ScrollLock {
    holders: Rc<Cell<usize>>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.holders.set(self.holders.get().saturating_sub(1));
    }
}
