//! Test doubles shared across module tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::anchor::{AnchorResolver, Page, ScrollLatch, ScrollLock, resolve_unique};
use crate::catalog::Catalog;
use crate::model::{Category, Rect, Side, Size, TargetSnapshot, TourConfig, TourStep};
use crate::schedule::Clock;
use crate::seen::SeenStore;
use crate::storage::{Result, StorageError};

/// In-memory seen store that counts writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    seen: Rc<RefCell<HashSet<(String, String)>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn contains(&self, tour_id: &str, user_id: &str) -> bool {
        self.seen
            .borrow()
            .contains(&(tour_id.to_string(), user_id.to_string()))
    }
}

impl SeenStore for MemoryStore {
    fn get(&self, tour_id: &str, user_id: &str) -> Result<bool> {
        Ok(self.contains(tour_id, user_id))
    }

    fn set(&self, tour_id: &str, user_id: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.seen
            .borrow_mut()
            .insert((tour_id.to_string(), user_id.to_string()));
        Ok(())
    }
}

/// A store that is always unavailable.
pub struct BrokenStore;

impl SeenStore for BrokenStore {
    fn get(&self, _tour_id: &str, _user_id: &str) -> Result<bool> {
        Err(StorageError::Io(io::Error::other("store offline")))
    }

    fn set(&self, _tour_id: &str, _user_id: &str) -> Result<()> {
        Err(StorageError::Io(io::Error::other("store offline")))
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A scrollable document with named regions in document coordinates.
#[derive(Debug, Default)]
pub struct FakePage {
    anchors: Vec<(String, Rect)>,
    scroll_y: f64,
    viewport: Size,
    latch: ScrollLatch,
    pub scroll_requests: Vec<String>,
}

impl FakePage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn with_anchor(mut self, name: &str, rect: Rect) -> Self {
        self.anchors.push((name.to_string(), rect));
        self
    }

    pub fn move_anchor(&mut self, name: &str, rect: Rect) {
        for (n, r) in &mut self.anchors {
            if n == name {
                *r = rect;
            }
        }
    }

    pub fn remove_anchor(&mut self, name: &str) {
        self.anchors.retain(|(n, _)| n != name);
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// User-initiated scroll; ignored while the scroll lock is held.
    pub fn user_scroll(&mut self, dy: f64) -> bool {
        if self.latch.is_locked() {
            return false;
        }
        self.scroll_y = (self.scroll_y + dy).max(0.0);
        true
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.latch.is_locked()
    }

    pub fn latch(&self) -> ScrollLatch {
        self.latch.clone()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }
}

impl AnchorResolver for FakePage {
    fn resolve(&self, anchor: &str) -> TargetSnapshot {
        resolve_unique(
            anchor,
            self.anchors.iter().map(|(name, rect)| {
                (
                    name.as_str(),
                    Rect {
                        top: rect.top - self.scroll_y,
                        ..*rect
                    },
                )
            }),
        )
    }
}

impl Page for FakePage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_to_center(&mut self, anchor: &str) {
        self.scroll_requests.push(anchor.to_string());
        if let Some((_, rect)) = self.anchors.iter().find(|(n, _)| n == anchor) {
            self.scroll_y = (rect.center_y() - self.viewport.height / 2.0).max(0.0);
        }
    }

    fn lock_scroll(&self) -> ScrollLock {
        self.latch.lock()
    }
}

pub fn step(anchor: &str, side: Side) -> TourStep {
    TourStep {
        anchor: anchor.to_string(),
        title: format!("About {anchor}"),
        body: format!("This is {anchor}."),
        preferred_side: side,
        action_hint: None,
        expectation_hint: None,
        missing_hint: Some(format!("{anchor} is not on this page.")),
    }
}

pub fn tour(id: &str, anchors: &[&str]) -> TourConfig {
    TourConfig {
        id: id.to_string(),
        display_title: format!("Tour {id}"),
        category: Category::General,
        steps: anchors.iter().map(|a| step(a, Side::Bottom)).collect(),
    }
}

/// Three tours: `basics` (three present anchors), `gaps` (middle anchor
/// missing), and `deep` (one anchor far below the fold).
pub fn sample_catalog() -> Catalog {
    Catalog::new([
        tour("basics", &["header", "sidebar", "footer"]),
        tour("gaps", &["header", "nowhere", "footer"]),
        tour("deep", &["appendix"]),
    ])
    .unwrap()
}

pub fn sample_page() -> FakePage {
    FakePage::new(Size::new(800.0, 600.0))
        .with_anchor("header", Rect::new(10.0, 10.0, 780.0, 40.0))
        .with_anchor("sidebar", Rect::new(60.0, 10.0, 200.0, 500.0))
        .with_anchor("footer", Rect::new(560.0, 10.0, 780.0, 30.0))
        .with_anchor("appendix", Rect::new(2000.0, 100.0, 300.0, 100.0))
}
