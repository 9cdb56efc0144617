//! CLI interface for tourguide.
//!
//! Most subcommands are non-interactive: arguments in, text or JSON out.
//! `run` takes over the terminal and walks a tour over the demo dashboard.
//!
//! The catalog comes from `--catalog`, then the config's `catalog`, then
//! the built-in demo catalog. The user comes from `--as`, then
//! `TOURGUIDE_USER`, then the config's `user`; with none, seen-state is
//! neither read nor written.

mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::controller::TourController;
use crate::identity::resolve_user;
use crate::model::{Rect, Side, Size};
use crate::placement::{Placement, PlacementConfig, compute_cutout, compute_placement};
use crate::schedule::SystemClock;
use crate::seen::SeenGate;
use crate::storage::Storage;
use crate::tui::{self, DemoPage};

use format::{format_step, format_tour_line};

/// Tourguide: guided product tours.
#[derive(Debug, Parser)]
#[command(name = "tourguide", after_long_help = EXAMPLES_HELP)]
pub struct Cli {
    /// Tour catalog (TOML) to use instead of the configured or built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// User whose seen-state is read and written (e.g. "ana").
    #[arg(long = "as", global = true)]
    user: Option<String>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

const EXAMPLES_HELP: &str = r"Examples:
  tourguide list --as ana
  tourguide show onboarding
  tourguide run leave-request --as ana
  tourguide place --target 10,10,100,40 --side right --viewport 800x600

Keys while a tour runs:
  →  next    ←  back    esc  close    q  quit";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tours, marking the ones the user hasn't started yet.
    List,

    /// Show a tour's steps.
    Show {
        /// Tour id.
        tour: String,
    },

    /// Run a tour over the demo dashboard in the terminal.
    ///
    /// Starting a tour marks it as seen for the current user.
    Run {
        /// Tour id.
        tour: String,
    },

    /// Print whether the user has started a tour before.
    Seen {
        /// Tour id.
        tour: String,
    },

    /// Compute the cutout and tooltip placement for a target, as JSON.
    Place {
        /// Target rectangle: `TOP,LEFT,WIDTH,HEIGHT`.
        #[arg(long, value_parser = parse_rect)]
        target: Rect,

        /// Preferred tooltip side.
        #[arg(long, value_enum, default_value = "bottom")]
        side: SideArg,

        /// Tooltip size: `WIDTHxHEIGHT`.
        #[arg(long, value_parser = parse_size, default_value = "360x160")]
        tooltip: Size,

        /// Viewport size: `WIDTHxHEIGHT`.
        #[arg(long, value_parser = parse_size)]
        viewport: Size,

        /// Cutout padding around the target.
        #[arg(long, value_parser = parse_spacing, default_value_t = PlacementConfig::default().padding)]
        padding: f64,

        /// Gap between cutout and tooltip.
        #[arg(long, value_parser = parse_spacing, default_value_t = PlacementConfig::default().gap)]
        gap: f64,

        /// Minimum distance from the viewport edge.
        #[arg(long, value_parser = parse_spacing, default_value_t = PlacementConfig::default().margin)]
        margin: f64,
    },
}

impl Cli {
    /// Whether this invocation takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Command::Run { .. })
    }
}

/// CLI-facing side, mapped to the domain `Side`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Top,
    Bottom,
    Left,
    Right,
}

impl SideArg {
    fn to_domain(self) -> Side {
        match self {
            Self::Top => Side::Top,
            Self::Bottom => Side::Bottom,
            Self::Left => Side::Left,
            Self::Right => Side::Right,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli, config: &Config) -> Result<(), String> {
    let user = resolve_user(cli.user.as_deref(), config);

    match cli.command {
        Command::List => {
            let catalog = load_catalog(cli.catalog, config)?;
            cmd_list(&catalog, &open_gate(), user.as_deref());
            Ok(())
        }
        Command::Show { tour } => {
            let catalog = load_catalog(cli.catalog, config)?;
            cmd_show(&catalog, &tour)
        }
        Command::Run { tour } => {
            let catalog = load_catalog(cli.catalog, config)?;
            cmd_run(catalog, config, user, &tour)
        }
        Command::Seen { tour } => {
            let catalog = load_catalog(cli.catalog, config)?;
            cmd_seen(&catalog, &open_gate(), user.as_deref(), &tour)
        }
        Command::Place {
            target,
            side,
            tooltip,
            viewport,
            padding,
            gap,
            margin,
        } => {
            let config = PlacementConfig {
                padding,
                gap,
                margin,
            };
            cmd_place(target, side.to_domain(), tooltip, viewport, &config)
        }
    }
}

fn load_catalog(explicit: Option<PathBuf>, config: &Config) -> Result<Catalog, String> {
    match explicit.or_else(|| config.catalog.clone()) {
        Some(path) => {
            Catalog::load(&path).map_err(|e| format!("failed to load {}: {e}", path.display()))
        }
        None => Catalog::builtin().map_err(|e| format!("built-in catalog is broken: {e}")),
    }
}

/// Opens seen-state storage. An unavailable store disables seen-state
/// rather than failing the command.
fn open_gate() -> SeenGate {
    let Some(root) = Storage::default_root() else {
        warn!("could not determine home directory, seen-state disabled");
        return SeenGate::disabled();
    };
    match Storage::new(&root) {
        Ok(storage) => SeenGate::new(storage),
        Err(e) => {
            warn!(root = %root.display(), error = %e, "failed to open storage, seen-state disabled");
            SeenGate::disabled()
        }
    }
}

fn cmd_list(catalog: &Catalog, gate: &SeenGate, user: Option<&str>) {
    if catalog.is_empty() {
        println!("No tours");
        return;
    }
    for tour in catalog.iter() {
        let seen = gate.has_seen(&tour.id, user);
        println!("{}", format_tour_line(tour, seen));
    }
}

fn cmd_show(catalog: &Catalog, tour_id: &str) -> Result<(), String> {
    let tour = catalog
        .get(tour_id)
        .ok_or_else(|| format!("unknown tour '{tour_id}'"))?;

    println!("{} [{}]", tour.display_title, tour.category.as_str());
    for (i, step) in tour.steps.iter().enumerate() {
        println!();
        print!("{}", format_step(i, step));
    }
    Ok(())
}

fn cmd_run(
    catalog: Catalog,
    config: &Config,
    user: Option<String>,
    tour_id: &str,
) -> Result<(), String> {
    if catalog.get(tour_id).is_none() {
        return Err(format!("unknown tour '{tour_id}'"));
    }

    // The real size is applied once the terminal is initialised.
    let page = DemoPage::new(Size::new(80.0, 23.0));
    let mut controller = TourController::new(
        catalog,
        page,
        SystemClock,
        open_gate(),
        user,
        config.timing(),
    );

    tui::run(&mut controller, tour_id).map_err(|e| format!("terminal error: {e}"))
}

fn cmd_seen(
    catalog: &Catalog,
    gate: &SeenGate,
    user: Option<&str>,
    tour_id: &str,
) -> Result<(), String> {
    if catalog.get(tour_id).is_none() {
        return Err(format!("unknown tour '{tour_id}'"));
    }
    println!("{}", seen_report(gate, user, tour_id));
    Ok(())
}

/// Unreadable seen-state reads as "not seen"; an unreadable timestamp is
/// left out.
fn seen_report(gate: &SeenGate, user: Option<&str>, tour_id: &str) -> String {
    let Some(user) = user else {
        return "not seen (no user: pass --as or set TOURGUIDE_USER)".to_string();
    };
    if !gate.has_seen(tour_id, Some(user)) {
        return format!("not seen by {user}");
    }
    match gate.first_seen(tour_id, Some(user)) {
        Some(at) => format!("seen by {user} (first started {at})"),
        None => format!("seen by {user}"),
    }
}

/// JSON shape printed by `place`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOutput {
    cutout: Rect,
    #[serde(flatten)]
    placement: Placement,
}

fn cmd_place(
    target: Rect,
    side: Side,
    tooltip: Size,
    viewport: Size,
    config: &PlacementConfig,
) -> Result<(), String> {
    let output = PlaceOutput {
        cutout: compute_cutout(target, config.padding),
        placement: compute_placement(target, side, tooltip, viewport, config),
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| format!("failed to serialize placement: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Parses `TOP,LEFT,WIDTH,HEIGHT`.
fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;
    if let Some(bad) = parts.iter().find(|v| !v.is_finite()) {
        return Err(format!("{bad} is not a finite number"));
    }
    match parts[..] {
        [top, left, width, height] if width >= 0.0 && height >= 0.0 => {
            Ok(Rect::new(top, left, width, height))
        }
        [_, _, _, _] => Err("width and height must not be negative".to_string()),
        _ => Err(format!("expected TOP,LEFT,WIDTH,HEIGHT, got '{s}'")),
    }
}

/// Parses `WIDTHxHEIGHT`.
fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid width '{w}': {e}"))?;
    let height = h
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid height '{h}': {e}"))?;
    if !width.is_finite() || !height.is_finite() {
        return Err(format!("'{s}' is not a finite size"));
    }
    if width < 0.0 || height < 0.0 {
        return Err("width and height must not be negative".to_string());
    }
    Ok(Size::new(width, height))
}

/// Parses a spacing value: finite and not negative.
fn parse_spacing(s: &str) -> Result<f64, String> {
    let value = s
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid number '{s}': {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("'{s}' must be a finite, non-negative number"));
    }
    Ok(value)
}
