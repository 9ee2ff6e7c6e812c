//! One player's read-only view of the board
//!
//! Bundles the board, the deciding player and the tuning constants, and
//! answers the topology and ownership questions every heuristic asks.

use crate::board::{BoardView, Continent, Territory};
use crate::core::config::StrategyConfig;
use crate::core::error::{Result, StrategyError};
use crate::core::types::{Armies, ContinentId, PlayerId, TerritoryId};

/// Decision-making context for a single player
pub struct DecisionContext<'a, B: BoardView + ?Sized> {
    pub board: &'a B,
    pub player: &'a PlayerId,
    pub config: &'a StrategyConfig,
}

impl<'a, B: BoardView + ?Sized> Clone for DecisionContext<'a, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, B: BoardView + ?Sized> Copy for DecisionContext<'a, B> {}

impl<'a, B: BoardView + ?Sized> DecisionContext<'a, B> {
    pub fn new(board: &'a B, player: &'a PlayerId, config: &'a StrategyConfig) -> Self {
        Self {
            board,
            player,
            config,
        }
    }

    /// Look up a territory the caller asserts exists
    pub fn require(&self, id: &TerritoryId) -> Result<&'a Territory> {
        self.board
            .territory(id)
            .ok_or_else(|| StrategyError::UnknownTerritory(id.clone()))
    }

    pub fn territory(&self, id: &TerritoryId) -> Option<&'a Territory> {
        self.board.territory(id)
    }

    pub fn armies(&self, id: &TerritoryId) -> Armies {
        self.board.territory(id).map(|t| t.armies).unwrap_or(0)
    }

    pub fn owns(&self, id: &TerritoryId) -> bool {
        self.board
            .territory(id)
            .is_some_and(|t| t.is_owned_by(self.player))
    }

    /// Adjacency degree
    pub fn degree(&self, id: &TerritoryId) -> usize {
        self.board.adjacent(id).len()
    }

    pub fn continent_of(&self, id: &TerritoryId) -> Option<&'a ContinentId> {
        self.board.continent_of(id)
    }

    pub fn in_continent(&self, id: &TerritoryId, continent: Option<&ContinentId>) -> bool {
        match continent {
            Some(c) => self.continent_of(id) == Some(c),
            None => false,
        }
    }

    /// A territory with a neighbor in a different continent (or in none)
    pub fn is_gateway(&self, id: &TerritoryId) -> bool {
        let Some(home) = self.continent_of(id) else {
            return false;
        };
        self.board
            .adjacent(id)
            .iter()
            .any(|n| self.continent_of(n) != Some(home))
    }

    /// Members of a continent bordering a territory outside it, floored
    ///
    /// Each member counts at most once however many outside neighbors it has.
    pub fn entry_points(&self, continent: &Continent) -> u32 {
        let count = continent
            .territories
            .iter()
            .filter(|member| {
                self.board
                    .adjacent(member)
                    .iter()
                    .any(|n| self.continent_of(n) != Some(&continent.id))
            })
            .count() as u32;
        count.max(self.config.min_entry_points)
    }

    /// Members of the continent held by `player`
    pub fn owned_in(&self, continent: &Continent, player: &PlayerId) -> usize {
        continent
            .territories
            .iter()
            .filter(|m| {
                self.board
                    .territory(m)
                    .is_some_and(|t| t.is_owned_by(player))
            })
            .count()
    }

    /// Fraction of a continent held by `player` (0.0 for empty continents)
    pub fn control_of(&self, continent: &Continent, player: &PlayerId) -> f64 {
        if continent.territories.is_empty() {
            return 0.0;
        }
        self.owned_in(continent, player) as f64 / continent.territories.len() as f64
    }

    /// Fraction of a continent held by the deciding player
    pub fn control(&self, continent: &Continent) -> f64 {
        self.control_of(continent, self.player)
    }

    /// Control of the continent a territory sits in
    pub fn control_around(&self, id: &TerritoryId) -> f64 {
        self.continent_of(id)
            .and_then(|c| self.board.continent(c))
            .map(|c| self.control(c))
            .unwrap_or(0.0)
    }

    /// Members of a continent the deciding player still has to take
    pub fn missing_territories(&self, continent: &'a Continent) -> Vec<&'a TerritoryId> {
        continent
            .territories
            .iter()
            .filter(|m| {
                self.board
                    .territory(m)
                    .is_some_and(|t| !t.is_owned_by(self.player))
            })
            .collect()
    }

    /// Whether taking `id` would give the deciding player its whole continent
    pub fn completes_continent(&self, id: &TerritoryId) -> bool {
        let Some(continent) = self.continent_of(id).and_then(|c| self.board.continent(c)) else {
            return false;
        };
        let missing = self.missing_territories(continent);
        missing.len() == 1 && missing[0] == id
    }

    /// Owned territory with at least one neighbor held by someone else
    pub fn is_front_line(&self, id: &TerritoryId) -> bool {
        self.board.adjacent(id).iter().any(|n| {
            self.board
                .territory(n)
                .is_some_and(|t| !t.is_owned_by(self.player))
        })
    }

    /// Neighbors not held by the deciding player
    pub fn enemy_neighbors(&self, id: &TerritoryId) -> impl Iterator<Item = &'a Territory> + 'a {
        let board = self.board;
        let player = self.player;
        board
            .adjacent(id)
            .iter()
            .filter_map(move |n| board.territory(n))
            .filter(move |t| !t.is_owned_by(player))
    }

    /// Neighbors held by the deciding player
    pub fn friendly_neighbors(&self, id: &TerritoryId) -> impl Iterator<Item = &'a Territory> + 'a {
        let board = self.board;
        let player = self.player;
        board
            .adjacent(id)
            .iter()
            .filter_map(move |n| board.territory(n))
            .filter(move |t| t.is_owned_by(player))
    }

    /// Threat to an owned territory in 0.0..=1.0
    ///
    /// Enemy armies next door relative to the garrison, normalized by the
    /// threat divisor. Territories the player does not hold carry no threat.
    pub fn threat(&self, id: &TerritoryId) -> f64 {
        let Some(territory) = self.board.territory(id) else {
            return 0.0;
        };
        if !territory.is_owned_by(self.player) {
            return 0.0;
        }

        let enemy_armies: Armies = self.enemy_neighbors(id).map(|t| t.armies).sum();
        let ratio = enemy_armies as f64 / territory.armies.max(1) as f64;
        (ratio / self.config.threat_divisor).clamp(0.0, 1.0)
    }

    /// Territory count and army total folded into one number
    pub fn strength_of(&self, player: &PlayerId) -> f64 {
        let (territories, armies) = self
            .board
            .territories()
            .iter()
            .filter(|t| t.is_owned_by(player))
            .fold((0u32, 0u32), |(count, armies), t| (count + 1, armies + t.armies));
        territories as f64 * 2.0 + armies as f64
    }

    /// Other players present on the board, in board order
    pub fn opponents(&self) -> Vec<&'a PlayerId> {
        let mut seen: Vec<&'a PlayerId> = Vec::new();
        for territory in self.board.territories() {
            if let Some(owner) = territory.owner.as_ref() {
                if owner != self.player && !seen.contains(&owner) {
                    seen.push(owner);
                }
            }
        }
        seen
    }
}

/// Attacker-to-defender army ratio
///
/// An empty defender counts as maximally vulnerable: the ratio is the raw
/// attacker count.
pub fn advantage(attacker: Armies, defender: Armies) -> f64 {
    if defender == 0 {
        attacker as f64
    } else {
        attacker as f64 / defender as f64
    }
}
