//! Painting the dashboard and the tour overlay.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect as Area};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::controller::TourController;
use crate::model::{Category, Rect, Side, Size};
use crate::overlay::{Body, Control, Controls, OverlayView};
use crate::placement::PlacementConfig;

use super::page::DemoPage;

/// Tooltip and dialog size, in cells.
pub const PANEL: Size = Size::new(44.0, 10.0);

/// Clickable regions from the last frame, in terminal cells.
#[derive(Debug, Default)]
pub struct Hits {
    pub controls: Vec<(Area, Control)>,
}

impl Hits {
    pub fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        self.controls
            .iter()
            .find(|(area, _)| area.contains((column, row).into()))
            .map(|(_, control)| *control)
    }
}

/// Draws one frame and returns its clickable regions.
pub fn draw(frame: &mut Frame, controller: &TourController<DemoPage>, tour_id: &str) -> Hits {
    let [page_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    draw_page(frame, controller.page(), page_area);

    let mut hits = Hits::default();
    match OverlayView::build(controller, PANEL, &PlacementConfig::TERMINAL) {
        Some(view) => {
            draw_overlay(frame, &view, page_area, &mut hits);
            draw_status(frame, status_area, &view.progress_label(), true);
        }
        None => {
            let title = controller
                .catalog()
                .get(tour_id)
                .map_or_else(|| tour_id.to_string(), |t| t.display_title.clone());
            let badge = if controller.has_seen(tour_id) { "" } else { " (new)" };
            draw_status(frame, status_area, &format!("Tour: {title}{badge}"), false);
        }
    }
    hits
}

fn draw_page(frame: &mut Frame, page: &DemoPage, area: Area) {
    let normal = Style::default().fg(Color::Gray);
    let heading = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    for (section, rect) in page.sections() {
        let Some(cells) = to_cells(rect, area) else {
            continue;
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(section.title, heading));
        let lines: Vec<Line> = section
            .lines
            .iter()
            .map(|l| Line::from(Span::styled(*l, normal)))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), cells);
    }
}

fn draw_overlay(frame: &mut Frame, view: &OverlayView, area: Area, hits: &mut Hits) {
    let theme = theme(view.category());
    let cutout = view.cutout().and_then(|c| to_cells(c, area));
    dim(frame.buffer_mut(), area, cutout);

    match &view.body {
        Body::Settling => {}
        Body::Anchored {
            target,
            cutout: ring,
            placement,
            tooltip,
        } => {
            if let Some(ring) = to_cells(*ring, area) {
                frame.render_widget(
                    Block::bordered().border_style(Style::default().fg(theme)),
                    ring,
                );
            }
            if let Some(panel) = to_cells(*tooltip, area) {
                draw_panel(frame, view, panel, theme, None, hits);
                draw_arrow(frame.buffer_mut(), panel, *target, placement.resolved_side, theme);
            }
        }
        Body::Missing { dialog, hint } => {
            if let Some(panel) = to_cells(*dialog, area) {
                draw_panel(frame, view, panel, theme, Some(hint.as_str()), hits);
            }
        }
    }
}

fn draw_panel(
    frame: &mut Frame,
    view: &OverlayView,
    panel: Area,
    theme: Color,
    missing: Option<&str>,
    hits: &mut Hits,
) {
    let step = view.step;
    let muted = Style::default().fg(Color::DarkGray);
    let text = Style::default().fg(Color::White);

    let mut lines = Vec::new();
    match missing {
        Some(hint) => lines.push(Line::from(Span::styled(hint, text))),
        None => {
            lines.push(Line::from(Span::styled(step.body.as_str(), text)));
            if let Some(action) = &step.action_hint {
                lines.push(Line::from(Span::styled(format!("→ {action}"), muted)));
            }
            if let Some(expect) = &step.expectation_hint {
                lines.push(Line::from(Span::styled(format!("✓ {expect}"), muted)));
            }
        }
    }

    let block = Block::bordered()
        .border_style(Style::default().fg(theme))
        .title(Span::styled(
            format!(" {} ", step.title),
            Style::default().fg(theme).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(Span::styled(format!(" {} ", view.progress_label()), muted)).centered(),
        );

    frame.render_widget(Clear, panel);
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let [text_area, controls_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text_area);

    draw_controls(frame, view.controls, controls_area, panel, theme, hits);
}

fn draw_controls(
    frame: &mut Frame,
    controls: Controls,
    row: Area,
    panel: Area,
    theme: Color,
    hits: &mut Hits,
) {
    let button = Style::default().fg(theme).add_modifier(Modifier::BOLD);

    let leading = format!("[ {} ]", controls.leading.label());
    let trailing = format!("[ {} ]", controls.trailing.label());
    let leading_area = Area::new(row.x, row.y, leading.chars().count() as u16, 1).intersection(row);
    let trailing_width = trailing.chars().count() as u16;
    let trailing_area = Area::new(
        row.right().saturating_sub(trailing_width),
        row.y,
        trailing_width,
        1,
    )
    .intersection(row);

    frame.render_widget(Paragraph::new(Span::styled(leading, button)), leading_area);
    frame.render_widget(Paragraph::new(Span::styled(trailing, button)), trailing_area);
    hits.controls.push((leading_area, controls.leading));
    hits.controls.push((trailing_area, controls.trailing));

    // Close button on the top border, always available.
    if panel.width >= 5 {
        let close = Area::new(panel.right() - 4, panel.y, 3, 1);
        frame.render_widget(Paragraph::new(Span::styled("[x]", button)), close);
        hits.controls.push((close, Control::Close));
    }
}

/// Marks the tooltip border with an arrow pointing at the target.
fn draw_arrow(buf: &mut Buffer, panel: Area, target: Rect, side: Side, theme: Color) {
    if panel.width < 3 || panel.height < 3 {
        return;
    }
    let along_x = (target.center_x().floor() as i64)
        .clamp(i64::from(panel.x) + 1, i64::from(panel.right()) - 2) as u16;
    let along_y = (target.center_y().floor() as i64)
        .clamp(i64::from(panel.y) + 1, i64::from(panel.bottom()) - 2) as u16;

    let (x, y, symbol) = match side {
        Side::Bottom => (along_x, panel.y, "▲"),
        Side::Top => (along_x, panel.bottom() - 1, "▼"),
        Side::Right => (panel.x, along_y, "◀"),
        Side::Left => (panel.right() - 1, along_y, "▶"),
    };
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_fg(theme);
    }
}

/// Dims every cell of `area` outside the cutout.
fn dim(buf: &mut Buffer, area: Area, cutout: Option<Area>) {
    let style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if cutout.is_some_and(|c| c.contains((x, y).into())) {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(style);
            }
        }
    }
}

fn draw_status(frame: &mut Frame, area: Area, label: &str, active: bool) {
    let muted = Style::default().fg(Color::DarkGray);
    let help = if active {
        "  ← back  → next  1-9 jump  esc close  q quit"
    } else {
        "  t start tour  ↑↓ scroll  q quit"
    };
    let line = Line::from(vec![
        Span::styled(format!(" {label}"), Style::default().fg(Color::Gray)),
        Span::styled(help, muted),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn theme(category: Category) -> Color {
    match category {
        Category::General => Color::Cyan,
        Category::Handbook => Color::Blue,
        Category::Leave => Color::Green,
        Category::Pto => Color::Yellow,
        Category::Onboarding => Color::Magenta,
        Category::Loyalty => Color::LightRed,
    }
}

/// Converts a viewport rectangle to terminal cells inside `area`, clipped.
///
/// `None` when nothing of it is visible.
pub fn to_cells(rect: Rect, area: Area) -> Option<Area> {
    let left = rect.left.floor().max(0.0);
    let top = rect.top.floor().max(0.0);
    let right = rect.right().ceil().min(f64::from(area.width));
    let bottom = rect.bottom().ceil().min(f64::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Area::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Converts a terminal cell to viewport coordinates (its center).
pub fn to_viewport(column: u16, row: u16, area: Area) -> (f64, f64) {
    (
        f64::from(column.saturating_sub(area.x)) + 0.5,
        f64::from(row.saturating_sub(area.y)) + 0.5,
    )
}
