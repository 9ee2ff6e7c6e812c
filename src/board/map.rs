//! In-memory board with insertion-ordered territories and continents

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{BoardView, Continent, Territory};
use crate::core::error::{Result, StrategyError};
use crate::core::types::{Armies, ContinentId, PlayerId, TerritoryId};

/// Territory graph plus current ownership and army counts
#[derive(Debug, Clone, Default)]
pub struct Board {
    territories: Vec<Territory>,
    index: AHashMap<TerritoryId, usize>,
    continents: Vec<Continent>,
    /// territory -> index into `continents`
    membership: AHashMap<TerritoryId, usize>,
    adjacency: AHashMap<TerritoryId, Vec<TerritoryId>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a continent; territories join it through `add_territory`
    pub fn add_continent(&mut self, id: impl Into<ContinentId>, bonus: u32) -> Result<()> {
        let id = id.into();
        if self.continents.iter().any(|c| c.id == id) {
            return Err(StrategyError::InvalidBoard(format!(
                "duplicate continent {}",
                id
            )));
        }
        self.continents.push(Continent::new(id, bonus));
        Ok(())
    }

    /// Register a territory, optionally as a member of a known continent
    pub fn add_territory(
        &mut self,
        id: impl Into<TerritoryId>,
        continent: Option<&ContinentId>,
    ) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(StrategyError::InvalidBoard(format!(
                "duplicate territory {}",
                id
            )));
        }

        if let Some(continent_id) = continent {
            let idx = self
                .continents
                .iter()
                .position(|c| &c.id == continent_id)
                .ok_or_else(|| StrategyError::UnknownContinent(continent_id.clone()))?;
            self.continents[idx].territories.push(id.clone());
            self.membership.insert(id.clone(), idx);
        }

        self.index.insert(id.clone(), self.territories.len());
        self.adjacency.insert(id.clone(), Vec::new());
        self.territories.push(Territory::new(id));
        Ok(())
    }

    /// Connect two territories in both directions
    pub fn connect(&mut self, a: &TerritoryId, b: &TerritoryId) -> Result<()> {
        for id in [a, b] {
            if !self.index.contains_key(id) {
                return Err(StrategyError::UnknownTerritory(id.clone()));
            }
        }
        if a == b {
            return Err(StrategyError::InvalidBoard(format!(
                "territory {} cannot border itself",
                a
            )));
        }

        for (from, to) in [(a, b), (b, a)] {
            let neighbors = self.adjacency.entry(from.clone()).or_default();
            if !neighbors.contains(to) {
                neighbors.push(to.clone());
            }
        }
        Ok(())
    }

    /// Set or clear the owner of a territory
    pub fn set_owner(&mut self, id: &TerritoryId, owner: Option<PlayerId>) -> Result<()> {
        self.territory_mut(id)?.owner = owner;
        Ok(())
    }

    pub fn set_armies(&mut self, id: &TerritoryId, armies: Armies) -> Result<()> {
        self.territory_mut(id)?.armies = armies;
        Ok(())
    }

    /// Set owner and armies in one step
    pub fn place(&mut self, id: &TerritoryId, owner: &PlayerId, armies: Armies) -> Result<()> {
        let territory = self.territory_mut(id)?;
        territory.owner = Some(owner.clone());
        territory.armies = armies;
        Ok(())
    }

    fn territory_mut(&mut self, id: &TerritoryId) -> Result<&mut Territory> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| StrategyError::UnknownTerritory(id.clone()))?;
        Ok(&mut self.territories[idx])
    }

    /// Territories currently held by a player, in board order
    pub fn territories_of(&self, player: &PlayerId) -> Vec<TerritoryId> {
        self.territories
            .iter()
            .filter(|t| t.is_owned_by(player))
            .map(|t| t.id.clone())
            .collect()
    }

    /// Shuffle territories and hand them out round-robin
    ///
    /// Every territory starts with `armies` armies. Used to open a fresh game.
    pub fn deal<R: Rng + ?Sized>(
        &mut self,
        players: &[PlayerId],
        armies: Armies,
        rng: &mut R,
    ) -> Result<()> {
        if players.is_empty() {
            return Err(StrategyError::InvalidBoard(
                "cannot deal a board to zero players".into(),
            ));
        }

        let mut order: Vec<usize> = (0..self.territories.len()).collect();
        order.shuffle(rng);

        for (turn, idx) in order.into_iter().enumerate() {
            let territory = &mut self.territories[idx];
            territory.owner = Some(players[turn % players.len()].clone());
            territory.armies = armies;
        }
        Ok(())
    }

    /// Check structural consistency: non-empty, symmetric adjacency
    pub fn validate(&self) -> Result<()> {
        if self.territories.is_empty() {
            return Err(StrategyError::InvalidBoard("board has no territories".into()));
        }

        for (from, neighbors) in &self.adjacency {
            for to in neighbors {
                let back = self.adjacency.get(to).map(|n| n.contains(from));
                if back != Some(true) {
                    return Err(StrategyError::InvalidBoard(format!(
                        "adjacency {} -> {} is not symmetric",
                        from, to
                    )));
                }
            }
        }
        Ok(())
    }
}

impl BoardView for Board {
    fn territory(&self, id: &TerritoryId) -> Option<&Territory> {
        self.index.get(id).map(|&idx| &self.territories[idx])
    }

    fn adjacent(&self, id: &TerritoryId) -> &[TerritoryId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn continents(&self) -> &[Continent] {
        &self.continents
    }

    fn territories(&self) -> &[Territory] {
        &self.territories
    }

    fn continent_of(&self, id: &TerritoryId) -> Option<&ContinentId> {
        self.membership.get(id).map(|&idx| &self.continents[idx].id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn id(name: &str) -> TerritoryId {
        TerritoryId::from(name)
    }

    fn two_island_board() -> Board {
        let mut board = Board::new();
        let north = ContinentId::from("North");
        board.add_continent(north.clone(), 2).unwrap();
        board.add_territory("A", Some(&north)).unwrap();
        board.add_territory("B", Some(&north)).unwrap();
        board.add_territory("Strait", None).unwrap();
        board.connect(&id("A"), &id("B")).unwrap();
        board.connect(&id("B"), &id("Strait")).unwrap();
        board
    }

    #[test]
    fn test_connect_is_symmetric_and_deduplicated() {
        let mut board = two_island_board();
        board.connect(&id("B"), &id("A")).unwrap();
        assert_eq!(board.adjacent(&id("A")), &[id("B")]);
        assert_eq!(board.adjacent(&id("B")), &[id("A"), id("Strait")]);
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_unknown_lookups_are_empty() {
        let board = two_island_board();
        assert!(board.territory(&id("Atlantis")).is_none());
        assert!(board.adjacent(&id("Atlantis")).is_empty());
        assert!(board.continent_of(&id("Strait")).is_none());
        assert_eq!(board.continent_of(&id("A")), Some(&ContinentId::from("North")));
    }

    #[test]
    fn test_connect_unknown_territory_fails() {
        let mut board = two_island_board();
        let err = board.connect(&id("A"), &id("Atlantis")).unwrap_err();
        assert!(matches!(err, StrategyError::UnknownTerritory(_)));
    }

    #[test]
    fn test_duplicate_territory_rejected() {
        let mut board = two_island_board();
        assert!(board.add_territory("A", None).is_err());
    }

    #[test]
    fn test_place_and_territories_of() {
        let mut board = two_island_board();
        let red = PlayerId::from("Red");
        board.place(&id("B"), &red, 4).unwrap();
        assert_eq!(board.territories_of(&red), vec![id("B")]);
        assert_eq!(board.territory(&id("B")).unwrap().armies, 4);
    }

    #[test]
    fn test_deal_covers_every_territory() {
        let mut board = Board::classic();
        let players = vec![PlayerId::from("Red"), PlayerId::from("Blue"), PlayerId::from("Green")];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        board.deal(&players, 2, &mut rng).unwrap();

        assert!(board.territories().iter().all(|t| t.owner.is_some() && t.armies == 2));
        for player in &players {
            assert_eq!(board.territories_of(player).len(), 14);
        }
    }

    #[test]
    fn test_deal_to_nobody_fails() {
        let mut board = two_island_board();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(board.deal(&[], 1, &mut rng).is_err());
    }
}
