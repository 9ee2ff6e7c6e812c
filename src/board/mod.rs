//! Board view - read access to territories, continents and adjacency
//!
//! The strategy engine only ever reads the board through [`BoardView`].
//! [`Board`] is the in-memory implementation used by tools and tests;
//! orchestrators with their own state can implement the trait directly.

mod classic;
mod loader;
mod map;

pub use loader::BoardFile;
pub use map::Board;

use serde::{Deserialize, Serialize};

use crate::core::types::{Armies, ContinentId, PlayerId, TerritoryId};

/// Smallest ownable unit on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    pub id: TerritoryId,
    pub owner: Option<PlayerId>,
    pub armies: Armies,
}

impl Territory {
    pub fn new(id: impl Into<TerritoryId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            armies: 0,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<PlayerId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_armies(mut self, armies: Armies) -> Self {
        self.armies = armies;
        self
    }

    /// Whether the given player holds this territory
    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

/// Fixed group of territories granting a bonus to whoever holds all of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub id: ContinentId,
    pub bonus: u32,
    pub territories: Vec<TerritoryId>,
}

impl Continent {
    pub fn new(id: impl Into<ContinentId>, bonus: u32) -> Self {
        Self {
            id: id.into(),
            bonus,
            territories: Vec::new(),
        }
    }

    pub fn contains(&self, territory: &TerritoryId) -> bool {
        self.territories.contains(territory)
    }
}

/// Read-only access to board state
///
/// Lookups of unknown ids return `None` or an empty slice rather than failing.
pub trait BoardView {
    /// Look up a territory by id
    fn territory(&self, id: &TerritoryId) -> Option<&Territory>;

    /// Neighbors of a territory (empty if unknown)
    fn adjacent(&self, id: &TerritoryId) -> &[TerritoryId];

    /// All continents, in a stable order
    fn continents(&self) -> &[Continent];

    /// All territories, in a stable order
    fn territories(&self) -> &[Territory];

    /// Look up a continent by id
    fn continent(&self, id: &ContinentId) -> Option<&Continent> {
        self.continents().iter().find(|c| &c.id == id)
    }

    /// The continent a territory belongs to, if any
    fn continent_of(&self, id: &TerritoryId) -> Option<&ContinentId> {
        self.continents()
            .iter()
            .find(|c| c.contains(id))
            .map(|c| &c.id)
    }
}
