//! Tour catalog: the read-only table of tours, keyed by id.
//!
//! Tours are declared in TOML, one `[[tour]]` table per tour with its
//! steps as `[[tour.step]]`:
//!
//! ```toml
//! [[tour]]
//! id = "leave-request"
//! display-title = "Requesting leave"
//! category = "leave"
//!
//! [[tour.step]]
//! anchor = "leave-balance"
//! title = "Your balance"
//! body = "Days you can still take this year."
//! preferred-side = "right"
//! ```
//!
//! A catalog is validated as a whole when loaded. A tour without steps or
//! a repeated id rejects the entire file rather than starting a broken run
//! later.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use std::{fs, io};

use serde::Deserialize;

use crate::model::TourConfig;

/// The catalog that ships with the binary, used by the demo page.
const BUILTIN: &str = include_str!("../assets/demo_catalog.toml");

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("tour '{0}' has no steps")]
    EmptyTour(String),

    #[error("tour '{0}' is declared more than once")]
    DuplicateTour(String),

    #[error("tour '{tour}' step {index} has an empty anchor")]
    EmptyAnchor { tour: String, index: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid catalog: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = core::result::Result<T, CatalogError>;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "tour")]
    tours: Vec<TourConfig>,
}

/// Read-only table mapping a tour id to its configuration.
///
/// Tours are reference-counted so a running tour can hold on to its
/// configuration without borrowing the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tours: BTreeMap<String, Rc<TourConfig>>,
}

impl Catalog {
    /// Builds a catalog from already-constructed tours.
    pub fn new(tours: impl IntoIterator<Item = TourConfig>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for tour in tours {
            validate(&tour)?;
            let id = tour.id.clone();
            if map.insert(id.clone(), Rc::new(tour)).is_some() {
                return Err(CatalogError::DuplicateTour(id));
            }
        }
        Ok(Self { tours: map })
    }

    /// Parses a catalog from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.tours)
    }

    /// Loads a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// The built-in demo catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN)
    }

    pub fn get(&self, id: &str) -> Option<Rc<TourConfig>> {
        self.tours.get(id).cloned()
    }

    /// All tours, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &TourConfig> {
        self.tours.values().map(AsRef::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }
}

fn validate(tour: &TourConfig) -> Result<()> {
    if tour.is_empty() {
        return Err(CatalogError::EmptyTour(tour.id.clone()));
    }
    if let Some(index) = tour.steps.iter().position(|s| s.anchor.trim().is_empty()) {
        return Err(CatalogError::EmptyAnchor {
            tour: tour.id.clone(),
            index,
        });
    }
    Ok(())
}
