//! Tourguide configuration.
//!
//! Loaded from `~/.tourguide/config.toml`. Every key is optional and a
//! missing file means defaults; a file that exists but does not parse is
//! an error.

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::schedule::Timing;

/// Tourguide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Default user for seen-state. Overridden by `--as` and `TOURGUIDE_USER`.
    pub user: Option<String>,

    /// Tour catalog to use instead of the built-in demo catalog.
    pub catalog: Option<PathBuf>,

    /// Milliseconds to wait after scrolling a target into view.
    pub settle_delay_ms: u64,

    /// Quiet period, in milliseconds, before re-measuring after scroll/resize.
    pub debounce_ms: u64,

    /// Enable debug logging.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            user: None,
            catalog: None,
            settle_delay_ms: timing.settle_delay.as_millis() as u64,
            debounce_ms: timing.debounce.as_millis() as u64,
            debug: false,
        }
    }
}

impl Config {
    /// Load config from `~/.tourguide/config.toml`, or defaults if absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.tourguide/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tourguide").join("config.toml"))
    }

    pub fn timing(&self) -> Timing {
        Timing {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}
