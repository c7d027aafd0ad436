//! Board configuration types.
//!
//! Matches configure the engine at startup by providing:
//! - `ShipSpec`: a single ship definition (symbol, length)
//! - `ShipCatalog`: the ordered list of ships placed on every board
//! - `BoardConfig`: board dimensions plus the catalog
//!
//! Catalog order is significant: ships are placed in this order and the
//! encoded state carries one "still afloat" block per ship in this order.

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Symbols reserved for the observed view (unknown, miss, hit).
pub const RESERVED_SYMBOLS: [char; 3] = ['-', 'X', 'O'];

/// A ship definition. Immutable, defined by configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipSpec {
    /// Symbol written into ground truth and shown on the view once sunk.
    pub symbol: char,

    /// Number of contiguous cells the ship occupies.
    pub length: usize,
}

impl ShipSpec {
    /// Create a new ship definition.
    #[must_use]
    pub const fn new(symbol: char, length: usize) -> Self {
        Self { symbol, length }
    }
}

/// Ordered list of ship definitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShipCatalog {
    ships: Vec<ShipSpec>,
}

impl ShipCatalog {
    /// Create a catalog from ship definitions, in placement order.
    pub fn new(ships: impl Into<Vec<ShipSpec>>) -> Self {
        Self { ships: ships.into() }
    }

    /// Number of ships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    /// Check if the catalog has no ships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Iterate over ship definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ShipSpec> {
        self.ships.iter()
    }

    /// Get a ship definition by catalog index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ShipSpec> {
        self.ships.get(index)
    }

    /// Sum of all ship lengths.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.ships.iter().map(|s| s.length).sum()
    }

    /// Check symbols and lengths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ships.is_empty() {
            return Err(ConfigError::Invalid("ship catalog is empty".into()));
        }
        let mut seen = FxHashSet::default();
        for ship in &self.ships {
            if ship.length == 0 {
                return Err(ConfigError::Invalid(format!(
                    "ship '{}' has zero length",
                    ship.symbol
                )));
            }
            if RESERVED_SYMBOLS.contains(&ship.symbol) {
                return Err(ConfigError::Invalid(format!(
                    "ship symbol '{}' is reserved for the board view",
                    ship.symbol
                )));
            }
            if !seen.insert(ship.symbol) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate ship symbol '{}'",
                    ship.symbol
                )));
            }
        }
        Ok(())
    }
}

impl Default for ShipCatalog {
    fn default() -> Self {
        Self::new(vec![ShipSpec::new('@', 3), ShipSpec::new('#', 2)])
    }
}

impl<'a> IntoIterator for &'a ShipCatalog {
    type Item = &'a ShipSpec;
    type IntoIter = std::slice::Iter<'a, ShipSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.ships.iter()
    }
}

/// Board dimensions and ship catalog for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of rows.
    pub height: usize,

    /// Number of columns.
    pub width: usize,

    /// Ships placed on every board, in order.
    pub ships: ShipCatalog,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            height: 6,
            width: 6,
            ships: ShipCatalog::default(),
        }
    }
}

impl BoardConfig {
    /// Create a config with the given dimensions and the default catalog.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            ships: ShipCatalog::default(),
        }
    }

    /// Replace the ship catalog.
    #[must_use]
    pub fn with_ships(mut self, ships: impl Into<Vec<ShipSpec>>) -> Self {
        self.ships = ShipCatalog::new(ships);
        self
    }

    /// Total number of cells (and of distinct moves).
    #[must_use]
    pub fn board_size(&self) -> usize {
        self.height * self.width
    }

    /// Length of an encoded state: one signal block plus one block per ship.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.board_size() * (self.ships.len() + 1)
    }

    /// Check dimensions and catalog.
    ///
    /// Does not check that the ships actually fit; that is only known at
    /// placement time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height == 0 || self.width == 0 {
            return Err(ConfigError::Invalid(format!(
                "board dimensions must be non-zero, got {}x{}",
                self.height, self.width
            )));
        }
        self.ships.validate()
    }

    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}
