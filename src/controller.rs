//! Tour controller: the state machine behind a running tour.
//!
//! The controller is either idle or running exactly one tour at one step.
//! Every step change re-resolves the step's anchor. A found anchor is
//! scrolled to the center of the viewport and re-measured after the
//! settle delay; a missing anchor is published immediately. While a run is
//! live, scroll and resize events re-measure the target after a debounce
//! window.
//!
//! Everything a run installs (event subscriptions, the background scroll
//! lock, pending timers) lives inside [`Run`], so ending a run by any path
//! drops all of it at once.

use std::rc::Rc;

use tracing::{debug, info};

use crate::anchor::{Page, ScrollLock};
use crate::catalog::Catalog;
use crate::events::{Channel, HostEvent, Listeners, Subscription, TourKey};
use crate::model::{TargetSnapshot, TourConfig, TourStep};
use crate::schedule::{Clock, Debounce, DelayedTask, SystemClock, Timing, earliest};
use crate::seen::SeenGate;

/// Misuse of the controller. These indicate a bad catalog or a caller bug
/// and are never produced by ordinary user interaction.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TourError {
    #[error("unknown tour: {0}")]
    UnknownTour(String),

    #[error("step {index} is out of range for a tour with {len} steps")]
    StepIndexOutOfRange { index: usize, len: usize },

    #[error("no tour is running")]
    Inactive,
}

pub type Result<T> = core::result::Result<T, TourError>;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// `next()` on the last step.
    Completed,

    /// Explicit stop: Escape, close, backdrop click, or a restart.
    Stopped,
}

impl EndReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        }
    }
}

/// State owned by one run, from `start` until it ends.
struct Run {
    tour: Rc<TourConfig>,
    step: usize,

    /// `None` while the post-scroll re-measure is pending.
    target: Option<TargetSnapshot>,
    settle: DelayedTask<usize>,
    layout: Debounce,

    _subscriptions: [Subscription; 3],
    _scroll_lock: ScrollLock,
}

impl Run {
    fn anchor(&self) -> &str {
        &self.tour.steps[self.step].anchor
    }
}

/// Drives a tour over a host [`Page`].
///
/// One controller owns the page for the lifetime of the application; at
/// most one run exists at a time.
pub struct TourController<P, C = SystemClock> {
    catalog: Catalog,
    page: P,
    clock: C,
    seen: SeenGate,
    user: Option<String>,
    timing: Timing,
    listeners: Listeners,
    run: Option<Run>,
}

impl<P: Page, C: Clock> TourController<P, C> {
    pub fn new(
        catalog: Catalog,
        page: P,
        clock: C,
        seen: SeenGate,
        user: Option<String>,
        timing: Timing,
    ) -> Self {
        Self {
            catalog,
            page,
            clock,
            seen,
            user,
            timing,
            listeners: Listeners::default(),
            run: None,
        }
    }

    // ── Transitions ──

    /// Starts `tour_id` at its first step.
    ///
    /// A run already in progress (of any tour) is stopped first, and its
    /// listeners and timers are gone before the new run installs its own.
    pub fn start(&mut self, tour_id: &str) -> Result<()> {
        let tour = self
            .catalog
            .get(tour_id)
            .ok_or_else(|| TourError::UnknownTour(tour_id.to_string()))?;

        self.end(EndReason::Stopped);

        self.seen.mark_seen(&tour.id, self.user.as_deref());

        info!(tour = %tour.id, steps = tour.len(), "tour started");
        self.run = Some(Run {
            tour,
            step: 0,
            target: None,
            settle: DelayedTask::new(),
            layout: Debounce::new(self.timing.debounce),
            _subscriptions: [
                self.listeners.subscribe(Channel::Keyboard),
                self.listeners.subscribe(Channel::Layout),
                self.listeners.subscribe(Channel::Pointer),
            ],
            _scroll_lock: self.page.lock_scroll(),
        });
        self.resolve_current();
        Ok(())
    }

    /// Advances one step, or completes the tour from the last step.
    ///
    /// Returns how the run ended if this call ended it. No-op when idle.
    pub fn next(&mut self) -> Option<EndReason> {
        let run = self.run.as_mut()?;
        if run.step >= run.tour.last_index() {
            return self.end(EndReason::Completed);
        }
        run.step += 1;
        self.resolve_current();
        None
    }

    /// Goes back one step. No-op on the first step or when idle.
    pub fn back(&mut self) {
        if let Some(run) = self.run.as_mut()
            && run.step > 0
        {
            run.step -= 1;
            self.resolve_current();
        }
    }

    /// Ends the run. Returns `None` if nothing was running.
    pub fn stop(&mut self) -> Option<EndReason> {
        self.end(EndReason::Stopped)
    }

    /// Moves directly to `index`.
    pub fn jump_to(&mut self, index: usize) -> Result<()> {
        let run = self.run.as_mut().ok_or(TourError::Inactive)?;
        let len = run.tour.len();
        if index >= len {
            return Err(TourError::StepIndexOutOfRange { index, len });
        }
        run.step = index;
        self.resolve_current();
        Ok(())
    }

    fn end(&mut self, reason: EndReason) -> Option<EndReason> {
        let run = self.run.take()?;
        info!(
            tour = %run.tour.id,
            step = run.step,
            reason = reason.as_str(),
            "tour ended"
        );
        drop(run);
        debug!(listeners = self.listeners.count(), "run torn down");
        Some(reason)
    }

    // ── Resolution and timers ──

    /// Resolves the current step's anchor and publishes (or schedules) the
    /// target snapshot.
    fn resolve_current(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let anchor = run.anchor().to_string();

        // A pending layout refresh belongs to the previous step.
        run.layout.cancel();

        if self.page.resolve(&anchor).found() {
            self.page.scroll_to_center(&anchor);
            run.target = None;
            run.settle
                .schedule(run.step, self.clock.now() + self.timing.settle_delay);
            debug!(anchor = %anchor, step = run.step, "anchor found, waiting for scroll to settle");
        } else {
            run.settle.cancel();
            run.target = Some(TargetSnapshot::Missing);
            debug!(anchor = %anchor, step = run.step, "anchor missing");
        }
    }

    /// Runs whatever delayed work is due.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        let Some(run) = self.run.as_mut() else {
            return;
        };

        if let Some(issued_for) = run.settle.take_due(now) {
            if issued_for == run.step {
                let target = self.page.resolve(run.anchor());
                debug!(step = run.step, rect = ?target.rect(), "target settled");
                run.target = Some(target);
            } else {
                debug!(issued_for, current = run.step, "discarding stale re-measure");
            }
        }

        // While a settle is pending it will measure anyway.
        if run.layout.fire(now) && !run.settle.is_pending() {
            run.target = Some(self.page.resolve(run.anchor()));
        }
    }

    /// When `poll` next has work to do.
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        let run = self.run.as_ref()?;
        earliest(run.settle.deadline(), run.layout.deadline())
    }

    /// Feeds a host event to the running tour.
    ///
    /// Returns `false` (and does nothing) when no run is listening.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        if self.run.is_none() {
            return false;
        }
        match event {
            HostEvent::Key(TourKey::Escape) | HostEvent::BackdropClick => {
                self.stop();
            }
            HostEvent::Key(TourKey::ArrowRight) => {
                self.next();
            }
            HostEvent::Key(TourKey::ArrowLeft) => self.back(),
            HostEvent::Scroll | HostEvent::Resize => {
                let now = self.clock.now();
                if let Some(run) = self.run.as_mut() {
                    run.layout.trigger(now);
                }
            }
        }
        true
    }

    // ── Queries ──

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    pub fn tour(&self) -> Option<&TourConfig> {
        self.run.as_ref().map(|r| r.tour.as_ref())
    }

    pub fn step_index(&self) -> Option<usize> {
        self.run.as_ref().map(|r| r.step)
    }

    pub fn current_step(&self) -> Option<&TourStep> {
        self.run.as_ref().and_then(|r| r.tour.step(r.step))
    }

    /// The published target. `None` when idle or while settling.
    pub fn target(&self) -> Option<TargetSnapshot> {
        self.run.as_ref().and_then(|r| r.target)
    }

    /// One-based step number and step count, for "step N of M".
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.run.as_ref().map(|r| (r.step + 1, r.tour.len()))
    }

    /// Whether the current user has started `tour_id` before.
    pub fn has_seen(&self, tour_id: &str) -> bool {
        self.seen.has_seen(tour_id, self.user.as_deref())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }
}
