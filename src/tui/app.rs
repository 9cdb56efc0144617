//! Event loop: terminal input in, controller events out.
//!
//! Each terminal event is first mapped to an [`Action`] by [`action_for`],
//! which only looks at the last frame. [`perform`] then applies it.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use ratatui::layout::Rect as Area;
use tracing::debug;

use crate::controller::{Result, TourController};
use crate::events::{HostEvent, TourKey};
use crate::model::Size;
use crate::overlay::{Control, Hit, OverlayView};
use crate::placement::PlacementConfig;
use crate::schedule::Clock;

use super::page::DemoPage;
use super::render::{self, Hits, PANEL};

/// How long to wait for input when no timer is pending.
const IDLE_TICK: Duration = Duration::from_millis(250);

/// Rows scrolled per wheel notch.
const WHEEL_ROWS: f64 = 3.0;

/// What the host does in response to one terminal event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Quit,

    /// Start the tour again after it ended.
    Restart,

    /// Forward to the tour, if it is listening.
    Tour(HostEvent),
    Control(Control),

    /// Jump to a zero-based step.
    Jump(usize),

    /// User scroll by this many rows.
    Scroll(f64),

    /// The page viewport changed to this size.
    Resize(Size),
    Ignore,
}

/// Runs the terminal UI until the user quits.
///
/// The tour is started as soon as the terminal is ready; `t` restarts it
/// after it ends.
pub fn run(controller: &mut TourController<DemoPage>, tour_id: &str) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .and_then(|()| event_loop(&mut terminal, controller, tour_id));
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        debug!(error = %e, "failed to disable mouse capture");
    }
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    controller: &mut TourController<DemoPage>,
    tour_id: &str,
) -> io::Result<()> {
    let size = terminal.size()?;
    controller.page_mut().set_viewport(page_viewport(size.width, size.height));
    controller.start(tour_id).map_err(io::Error::other)?;

    loop {
        let mut hits = Hits::default();
        terminal.draw(|frame| hits = render::draw(frame, &*controller, tour_id))?;

        let timeout = controller
            .next_deadline()
            .map_or(IDLE_TICK, |d| d.saturating_duration_since(Instant::now()));

        if event::poll(timeout)? {
            let event = event::read()?;
            let action = {
                let view = OverlayView::build(&*controller, PANEL, &PlacementConfig::TERMINAL);
                action_for(&event, controller.is_active(), &hits, view.as_ref())
            };
            if !perform(controller, action, tour_id).map_err(io::Error::other)? {
                return Ok(());
            }
        }

        controller.poll();
    }
}

/// Maps a terminal event to an action, given the frame the user saw.
///
/// `view` is `None` when no tour is running.
fn action_for(event: &Event, active: bool, hits: &Hits, view: Option<&OverlayView>) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if let Some(k) = tour_key(key.code) {
                return Action::Tour(HostEvent::Key(k));
            }
            match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Char(c @ '1'..='9') if active => c
                    .to_digit(10)
                    .map_or(Action::Ignore, |n| Action::Jump(n as usize - 1)),
                KeyCode::Char('t') if !active => Action::Restart,
                KeyCode::Up | KeyCode::Char('k') => Action::Scroll(-1.0),
                KeyCode::Down | KeyCode::Char('j') => Action::Scroll(1.0),
                _ => Action::Ignore,
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Action::Scroll(-WHEEL_ROWS),
            MouseEventKind::ScrollDown => Action::Scroll(WHEEL_ROWS),
            MouseEventKind::Down(MouseButton::Left) => click(hits, view, mouse.column, mouse.row),
            _ => Action::Ignore,
        },
        Event::Resize(width, height) => Action::Resize(page_viewport(*width, *height)),
        _ => Action::Ignore,
    }
}

fn click(hits: &Hits, view: Option<&OverlayView>, column: u16, row: u16) -> Action {
    if let Some(control) = hits.control_at(column, row) {
        return Action::Control(control);
    }
    let Some(view) = view else {
        return Action::Ignore;
    };
    let area = Area::new(0, 0, view.viewport.width as u16, view.viewport.height as u16);
    let (left, top) = render::to_viewport(column, row, area);
    match view.hit_test(left, top) {
        Hit::Backdrop => Action::Tour(HostEvent::BackdropClick),
        Hit::Cutout | Hit::Panel | Hit::Settling => Action::Ignore,
    }
}

/// Applies an action. Returns `false` when the UI should exit.
fn perform<C: Clock>(
    controller: &mut TourController<DemoPage, C>,
    action: Action,
    tour_id: &str,
) -> Result<bool> {
    match action {
        Action::Quit => return Ok(false),
        Action::Restart => controller.start(tour_id)?,
        Action::Tour(event) => dispatch(controller, event),
        Action::Control(control) => control.apply(controller),
        Action::Jump(index) => jump(controller, index),
        Action::Scroll(rows) => {
            // The page ignores it while locked; the tour still hears it.
            controller.page_mut().user_scroll(rows);
            dispatch(controller, HostEvent::Scroll);
        }
        Action::Resize(viewport) => {
            controller.page_mut().set_viewport(viewport);
            dispatch(controller, HostEvent::Resize);
        }
        Action::Ignore => {}
    }
    Ok(true)
}

/// Forwards an event if the running tour is listening for it.
fn dispatch<C: Clock>(controller: &mut TourController<DemoPage, C>, event: HostEvent) {
    if controller.listeners().wants(event) {
        controller.handle(event);
    }
}

fn tour_key(code: KeyCode) -> Option<TourKey> {
    match code {
        KeyCode::Esc => Some(TourKey::Escape),
        KeyCode::Left => Some(TourKey::ArrowLeft),
        KeyCode::Right => Some(TourKey::ArrowRight),
        _ => None,
    }
}

fn jump<C: Clock>(controller: &mut TourController<DemoPage, C>, index: usize) {
    if controller.step_index() == Some(index) {
        return;
    }
    if let Err(e) = controller.jump_to(index) {
        debug!(error = %e, "ignoring jump");
    }
}

/// The page gets the whole terminal except the status line.
fn page_viewport(width: u16, height: u16) -> Size {
    Size::new(f64::from(width), f64::from(height.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};

    use crate::anchor::{AnchorResolver, Page};
    use crate::catalog::Catalog;
    use crate::schedule::Timing;
    use crate::seen::SeenGate;
    use crate::testing::{ManualClock, MemoryStore};

    const TOUR: &str = "leave-request";

    type Controller = TourController<DemoPage, ManualClock>;

    fn controller() -> (Controller, ManualClock) {
        let clock = ManualClock::new();
        let c = TourController::new(
            Catalog::builtin().unwrap(),
            DemoPage::new(page_viewport(80, 24)),
            clock.clone(),
            SeenGate::new(MemoryStore::default()),
            Some("ana".into()),
            Timing::default(),
        );
        (c, clock)
    }

    fn settle(c: &mut Controller, clock: &ManualClock) {
        clock.advance(Timing::default().settle_delay);
        c.poll();
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn left_click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Maps `event` against the controller's current frame.
    fn action(c: &Controller, event: &Event, hits: &Hits) -> Action {
        let view = OverlayView::build(c, PANEL, &PlacementConfig::TERMINAL);
        action_for(event, c.is_active(), hits, view.as_ref())
    }

    /// First cell, in reading order, that the overlay classifies as `hit`.
    fn cell_with(c: &Controller, hit: Hit) -> (u16, u16) {
        let view = OverlayView::build(c, PANEL, &PlacementConfig::TERMINAL).unwrap();
        (0..23u16)
            .flat_map(|row| (0..80u16).map(move |column| (column, row)))
            .find(|&(column, row)| {
                view.hit_test(f64::from(column) + 0.5, f64::from(row) + 0.5) == hit
            })
            .unwrap()
    }

    #[test]
    fn keys_map_to_actions() {
        let (mut c, _clock) = controller();
        let hits = Hits::default();
        assert_eq!(action(&c, &key(KeyCode::Char('t')), &hits), Action::Restart);
        assert_eq!(action(&c, &key(KeyCode::Char('2')), &hits), Action::Ignore);

        c.start(TOUR).unwrap();
        assert_eq!(
            action(&c, &key(KeyCode::Right), &hits),
            Action::Tour(HostEvent::Key(TourKey::ArrowRight))
        );
        assert_eq!(action(&c, &key(KeyCode::Char('2')), &hits), Action::Jump(1));
        assert_eq!(action(&c, &key(KeyCode::Char('t')), &hits), Action::Ignore);
        assert_eq!(action(&c, &key(KeyCode::Char('j')), &hits), Action::Scroll(1.0));
        assert_eq!(action(&c, &key(KeyCode::Char('q')), &hits), Action::Quit);
    }

    #[test]
    fn quit_and_restart() {
        let (mut c, _clock) = controller();
        assert!(!perform(&mut c, Action::Quit, TOUR).unwrap());

        assert!(perform(&mut c, Action::Restart, TOUR).unwrap());
        assert_eq!(c.tour().unwrap().id, TOUR);
        assert!(perform(&mut c, Action::Restart, "nope").is_err());
    }

    #[test]
    fn clicking_a_control_applies_it() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);

        let hits = Hits {
            controls: vec![(Area::new(40, 10, 8, 1), Control::Next)],
        };
        let a = action(&c, &left_click(42, 10), &hits);
        assert_eq!(a, Action::Control(Control::Next));

        perform(&mut c, a, TOUR).unwrap();
        assert_eq!(c.step_index(), Some(1));
    }

    #[test]
    fn backdrop_click_stops_the_tour() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);

        let (column, row) = cell_with(&c, Hit::Backdrop);
        let a = action(&c, &left_click(column, row), &Hits::default());
        assert_eq!(a, Action::Tour(HostEvent::BackdropClick));

        perform(&mut c, a, TOUR).unwrap();
        assert!(!c.is_active());
    }

    #[test]
    fn clicks_inside_cutout_are_swallowed() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);

        let (column, row) = cell_with(&c, Hit::Cutout);
        assert_eq!(action(&c, &left_click(column, row), &Hits::default()), Action::Ignore);
    }

    #[test]
    fn quick_second_click_while_settling_keeps_tour_running() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);
        let (column, row) = cell_with(&c, Hit::Panel);

        Control::Next.apply(&mut c);
        // The frame drawn while settling has no controls to hit.
        let a = action(&c, &left_click(column, row), &Hits::default());
        assert_eq!(a, Action::Ignore);

        perform(&mut c, a, TOUR).unwrap();
        assert!(c.is_active());
        assert_eq!(c.step_index(), Some(1));
    }

    #[test]
    fn clicks_when_idle_do_nothing() {
        let (c, _clock) = controller();
        assert_eq!(action(&c, &left_click(1, 1), &Hits::default()), Action::Ignore);
    }

    #[test]
    fn digit_jumps_to_step_and_ignores_out_of_range() {
        let (mut c, _clock) = controller();
        c.start(TOUR).unwrap();

        perform(&mut c, Action::Jump(2), TOUR).unwrap();
        assert_eq!(c.step_index(), Some(2));

        perform(&mut c, Action::Jump(8), TOUR).unwrap();
        assert_eq!(c.step_index(), Some(2));
    }

    #[test]
    fn scroll_is_blocked_while_running_but_still_heard() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);
        let before = c.page().resolve("nav-bar").rect().unwrap();
        assert_eq!(c.next_deadline(), None);

        perform(&mut c, Action::Scroll(WHEEL_ROWS), TOUR).unwrap();
        assert_eq!(c.page().resolve("nav-bar").rect().unwrap(), before);
        assert!(c.next_deadline().is_some());

        c.stop();
        perform(&mut c, Action::Scroll(WHEEL_ROWS), TOUR).unwrap();
        assert_eq!(c.page().resolve("nav-bar").rect().unwrap().top, before.top - WHEEL_ROWS);
    }

    #[test]
    fn resize_updates_page_and_remeasures() {
        let (mut c, clock) = controller();
        c.start(TOUR).unwrap();
        settle(&mut c, &clock);

        let a = action(&c, &Event::Resize(120, 31), &Hits::default());
        assert_eq!(a, Action::Resize(Size::new(120.0, 30.0)));

        perform(&mut c, a, TOUR).unwrap();
        assert_eq!(c.page().viewport(), Size::new(120.0, 30.0));
        assert!(c.next_deadline().is_some());
    }
}
