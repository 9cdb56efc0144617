//! The demo HR dashboard the terminal host runs tours over.
//!
//! A fixed document of named sections, taller than most terminals, laid
//! out in columns that follow the terminal width. Coordinates are cells.

use crate::anchor::{AnchorResolver, Page, ScrollLatch, ScrollLock, resolve_unique};
use crate::model::{Rect, Size, TargetSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Left,
    Right,
    Full,
}

/// One named block of the dashboard.
#[derive(Debug)]
pub struct Section {
    pub anchor: &'static str,
    pub title: &'static str,
    pub lines: &'static [&'static str],
    row: u16,
    height: u16,
    column: Column,

    /// Fixed width in cells; `None` fills the column.
    width: Option<u16>,
}

const SECTIONS: &[Section] = &[
    Section {
        anchor: "nav-bar",
        title: "HR Portal",
        lines: &["Home · Handbook · Leave · PTO · Onboarding · Loyalty CRM"],
        row: 0,
        height: 3,
        column: Column::Full,
        width: None,
    },
    Section {
        anchor: "profile-card",
        title: "Profile",
        lines: &["Ana Lima", "People Operations", "Lisbon office", "Emergency contact: none"],
        row: 4,
        height: 7,
        column: Column::Left,
        width: None,
    },
    Section {
        anchor: "leave-balance",
        title: "Leave balance",
        lines: &["Annual      14.5 days", "Sick         8.0 days", "Parental    20.0 days"],
        row: 4,
        height: 7,
        column: Column::Right,
        width: None,
    },
    Section {
        anchor: "leave-request-button",
        title: "",
        lines: &["[ Request leave ]"],
        row: 12,
        height: 3,
        column: Column::Left,
        width: Some(22),
    },
    Section {
        anchor: "pto-calendar",
        title: "Team calendar",
        lines: &[
            "Mo Tu We Th Fr",
            " 3  4  5  6  7    Ben out",
            "10 11 12 13 14    Cy out Wed–Fri",
            "17 18 19 20 21",
            "24 25 26 27 28    Office closed Fri",
        ],
        row: 16,
        height: 10,
        column: Column::Full,
        width: None,
    },
    Section {
        anchor: "handbook-search",
        title: "Search the handbook",
        lines: &["> _"],
        row: 27,
        height: 3,
        column: Column::Left,
        width: None,
    },
    Section {
        anchor: "handbook-sections",
        title: "Handbook",
        lines: &[
            "1. Working hours",
            "2. Leave and absence",
            "3. Expenses",
            "4. Parental leave",
            "5. Code of conduct",
            "6. Leaving the company",
        ],
        row: 27,
        height: 9,
        column: Column::Right,
        width: None,
    },
    Section {
        anchor: "announcements",
        title: "Announcements",
        lines: &[
            "Benefits enrolment closes on the 30th.",
            "New expense tool goes live next month.",
            "Summer hours start in June.",
        ],
        row: 37,
        height: 8,
        column: Column::Full,
        width: None,
    },
    Section {
        anchor: "onboarding-checklist",
        title: "Onboarding checklist",
        lines: &[
            "[x] Signed contract",
            "[x] Laptop collected",
            "[ ] Bank details",
            "[ ] Tax form",
            "[ ] Meet your buddy",
        ],
        row: 46,
        height: 9,
        column: Column::Left,
        width: None,
    },
    Section {
        anchor: "loyalty-points",
        title: "Loyalty points",
        lines: &["Customer: Rua Nova Café", "Balance: 1,240 pts", "Last redemption: 300 pts"],
        row: 46,
        height: 9,
        column: Column::Right,
        width: None,
    },
    Section {
        anchor: "footer",
        title: "",
        lines: &["Questions? people-ops@example.com"],
        row: 56,
        height: 3,
        column: Column::Full,
        width: None,
    },
];

/// Total document height in rows.
const DOCUMENT_HEIGHT: f64 = 60.0;

/// The dashboard, scrolled to some offset within a viewport.
#[derive(Debug)]
pub struct DemoPage {
    viewport: Size,
    scroll: f64,
    latch: ScrollLatch,
}

impl DemoPage {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll: 0.0,
            latch: ScrollLatch::default(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scrolls on behalf of the user. Returns `false` if the page is locked.
    pub fn user_scroll(&mut self, rows: f64) -> bool {
        if self.latch.is_locked() {
            return false;
        }
        self.scroll = (self.scroll + rows).clamp(0.0, self.max_scroll());
        true
    }

    /// Every section with its rectangle in viewport coordinates.
    pub fn sections(&self) -> impl Iterator<Item = (&'static Section, Rect)> + '_ {
        SECTIONS.iter().map(|s| {
            let mut rect = self.document_rect(s);
            rect.top -= self.scroll;
            (s, rect)
        })
    }

    fn document_rect(&self, section: &Section) -> Rect {
        let width = self.viewport.width;
        let column = ((width - 3.0) / 2.0).floor().max(1.0);
        let (left, fill) = match section.column {
            Column::Left => (1.0, column),
            Column::Right => (2.0 + column, column),
            Column::Full => (1.0, (width - 2.0).max(1.0)),
        };
        let w = section.width.map_or(fill, |w| f64::from(w).min(fill));
        Rect::new(f64::from(section.row), left, w, f64::from(section.height))
    }

    fn max_scroll(&self) -> f64 {
        (DOCUMENT_HEIGHT - self.viewport.height).max(0.0)
    }
}

impl AnchorResolver for DemoPage {
    fn resolve(&self, anchor: &str) -> TargetSnapshot {
        resolve_unique(anchor, self.sections().map(|(s, rect)| (s.anchor, rect)))
    }
}

impl Page for DemoPage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_to_center(&mut self, anchor: &str) {
        if let Some(section) = SECTIONS.iter().find(|s| s.anchor == anchor) {
            let rect = self.document_rect(section);
            let target = (rect.center_y() - self.viewport.height / 2.0).floor();
            self.scroll = target.clamp(0.0, self.max_scroll());
        }
    }

    fn lock_scroll(&self) -> ScrollLock {
        self.latch.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::catalog::Catalog;

    fn page() -> DemoPage {
        DemoPage::new(Size::new(80.0, 24.0))
    }

    #[test]
    fn anchors_are_unique() {
        let mut names: Vec<&str> = SECTIONS.iter().map(|s| s.anchor).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SECTIONS.len());
    }

    #[test]
    fn builtin_tours_point_at_this_page() {
        // Every anchor in the demo catalog exists here, except the ones
        // deliberately left out to show the missing-target dialog.
        let catalog = Catalog::builtin().unwrap();
        let page = page();
        let missing: Vec<&str> = catalog
            .iter()
            .flat_map(|t| t.steps.iter())
            .filter(|s| !page.resolve(&s.anchor).found())
            .map(|s| s.anchor.as_str())
            .collect();
        assert_eq!(missing, ["payroll-export"]);
    }

    #[test]
    fn columns_follow_viewport_width() {
        let mut page = page();
        let narrow = page.resolve("leave-balance").rect().unwrap();
        page.set_viewport(Size::new(120.0, 24.0));
        let wide = page.resolve("leave-balance").rect().unwrap();

        assert!(wide.left > narrow.left);
        assert!(wide.width > narrow.width);
    }

    #[test]
    fn scroll_to_center_brings_far_section_into_view() {
        let mut page = page();
        let before = page.resolve("onboarding-checklist").rect().unwrap();
        assert!(before.top > 24.0);

        page.scroll_to_center("onboarding-checklist");
        let after = page.resolve("onboarding-checklist").rect().unwrap();
        assert!(after.top >= 0.0);
        assert!(after.bottom() <= 24.0);
    }

    #[test]
    fn scroll_is_clamped_to_document() {
        let mut page = page();
        page.scroll_to_center("footer");
        let footer = page.resolve("footer").rect().unwrap();
        assert_eq!(footer.bottom(), 24.0 - 1.0);

        assert!(page.user_scroll(-1000.0));
        assert_eq!(page.resolve("nav-bar").rect().unwrap().top, 0.0);
    }

    #[test]
    fn locked_page_ignores_user_scroll() {
        let mut page = page();
        let lock = page.lock_scroll();
        assert!(!page.user_scroll(5.0));
        assert_eq!(page.resolve("nav-bar").rect().unwrap().top, 0.0);

        drop(lock);
        assert!(page.user_scroll(5.0));
        assert_eq!(page.resolve("nav-bar").rect().unwrap().top, -5.0);
    }
}
