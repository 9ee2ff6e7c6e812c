//! Load custom boards from TOML files
//!
//! ```toml
//! [[continent]]
//! name = "Australia"
//! bonus = 2
//! territories = ["Indonesia", "NewGuinea"]
//!
//! [adjacency]
//! Indonesia = ["NewGuinea", "Siam"]
//!
//! [[placement]]
//! territory = "Indonesia"
//! owner = "Sun Tzu"
//! armies = 4
//! ```
//!
//! Adjacency entries naming a territory that no continent or `unaffiliated`
//! list declares are rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::Board;
use crate::core::error::{Result, StrategyError};
use crate::core::types::{ContinentId, PlayerId, TerritoryId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardFile {
    #[serde(default, rename = "continent")]
    pub continents: Vec<ContinentEntry>,
    /// Territories that belong to no continent
    #[serde(default)]
    pub unaffiliated: Vec<String>,
    #[serde(default)]
    pub adjacency: BTreeMap<String, Vec<String>>,
    #[serde(default, rename = "placement")]
    pub placements: Vec<PlacementEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentEntry {
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementEntry {
    pub territory: String,
    pub owner: String,
    pub armies: u32,
}

impl BoardFile {
    /// Build a validated board from the parsed file
    pub fn into_board(self) -> Result<Board> {
        let mut board = Board::new();

        for entry in &self.continents {
            let continent = ContinentId::from(entry.name.as_str());
            board.add_continent(continent.clone(), entry.bonus)?;
            for territory in &entry.territories {
                board.add_territory(territory.as_str(), Some(&continent))?;
            }
        }

        for territory in &self.unaffiliated {
            board.add_territory(territory.as_str(), None)?;
        }

        for (from, neighbors) in &self.adjacency {
            let from = TerritoryId::from(from.as_str());
            for to in neighbors {
                board.connect(&from, &TerritoryId::from(to.as_str()))?;
            }
        }

        for placement in &self.placements {
            board.place(
                &TerritoryId::from(placement.territory.as_str()),
                &PlayerId::from(placement.owner.as_str()),
                placement.armies,
            )?;
        }

        board.validate()?;
        Ok(board)
    }
}

impl Board {
    /// Parse a board from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: BoardFile = toml::from_str(content)?;
        file.into_board()
    }

    /// Load a board from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StrategyError::InvalidBoard(format!("failed to read {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }
}
