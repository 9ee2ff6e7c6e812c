//! Adjustment rules personas layer on the base heuristics
//!
//! Each rule is a bounded multiplicative (or reordering) step. Rules never
//! replace the base formula: they run after it, in list order, on its output.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ai::context::{advantage, DecisionContext};
use crate::ai::fortify::FortifyMove;
use crate::board::{BoardView, Territory};
use crate::core::types::TerritoryId;

/// Territory value adjustment, applied to the whole value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueRule {
    /// `× (1 + (degree - average) * per_degree)`
    Connectivity { per_degree: f64 },
    /// `× factor` for continent gateways
    Gateway { factor: f64 },
    /// `× factor` for territories with more than `min_degree` neighbors
    Hub { min_degree: usize, factor: f64 },
    /// `× (1 + degree * per_degree)`
    Mobility { per_degree: f64 },
    /// `× factor` for the `count` highest-valued territories
    Capitals { count: usize, factor: f64 },
    /// `× (1 + friendly_share * weight)` where friendly_share is the fraction
    /// of neighbors the player holds
    Security { weight: f64 },
}

impl ValueRule {
    pub fn apply<B: BoardView + ?Sized>(
        &self,
        ctx: &DecisionContext<'_, B>,
        values: &mut AHashMap<TerritoryId, f64>,
    ) {
        match *self {
            ValueRule::Connectivity { per_degree } => {
                let average = ctx.config.average_degree;
                for (id, value) in values.iter_mut() {
                    *value *= 1.0 + (ctx.degree(id) as f64 - average) * per_degree;
                }
            }
            ValueRule::Gateway { factor } => {
                for (id, value) in values.iter_mut() {
                    if ctx.is_gateway(id) {
                        *value *= factor;
                    }
                }
            }
            ValueRule::Hub { min_degree, factor } => {
                for (id, value) in values.iter_mut() {
                    if ctx.degree(id) > min_degree {
                        *value *= factor;
                    }
                }
            }
            ValueRule::Mobility { per_degree } => {
                for (id, value) in values.iter_mut() {
                    *value *= 1.0 + ctx.degree(id) as f64 * per_degree;
                }
            }
            ValueRule::Capitals { count, factor } => {
                let mut ranked: Vec<(&TerritoryId, f64)> =
                    values.iter().map(|(id, v)| (id, *v)).collect();
                // Equal values fall back to id order so the pick is stable
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                let capitals: Vec<TerritoryId> =
                    ranked.into_iter().take(count).map(|(id, _)| id.clone()).collect();
                for id in capitals {
                    if let Some(value) = values.get_mut(&id) {
                        *value *= factor;
                    }
                }
            }
            ValueRule::Security { weight } => {
                for (id, value) in values.iter_mut() {
                    let degree = ctx.degree(id);
                    if degree == 0 {
                        continue;
                    }
                    let friendly = ctx.friendly_neighbors(id).count();
                    *value *= 1.0 + (friendly as f64 / degree as f64) * weight;
                }
            }
        }
    }
}

/// Everything an attack rule may look at for one candidate
pub struct AttackSituation<'t> {
    pub source: &'t Territory,
    pub target: &'t Territory,
    pub advantage: f64,
    pub completes_continent: bool,
}

impl<'t> AttackSituation<'t> {
    pub fn new<B: BoardView + ?Sized>(
        ctx: &DecisionContext<'_, B>,
        source: &'t Territory,
        target: &'t Territory,
    ) -> Self {
        Self {
            source,
            target,
            advantage: advantage(source.armies, target.armies),
            completes_continent: ctx.completes_continent(&target.id),
        }
    }
}

/// Attack score adjustment, applied per candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackRule {
    /// Flat `× factor`
    Scale { factor: f64 },
    /// `× factor` when attacker armies exceed `ratio` × defender armies
    Overwhelming { ratio: f64, factor: f64 },
    /// `× factor` when the capture completes a continent
    CompletesContinent { factor: f64 },
    /// `× j` with j drawn once per agent from `[min, max]`
    Jitter { min: f64, max: f64 },
    /// `× factor` when a single opponent holds more than `control` of the
    /// target's continent
    BreakContinent { control: f64, factor: f64 },
    /// `× factor` when the defending player's strength is below `ratio` ×
    /// the attacker's (strength = 2 × territories + armies)
    WeakerOpponent { ratio: f64, factor: f64 },
    /// `× factor` when the defender holds more than `min_armies`
    Concentration { min_armies: u32, factor: f64 },
    /// `× factor` when the advantage exceeds `above` (defended targets only)
    StrongAdvantage { above: f64, factor: f64 },
    /// `× factor` when the advantage falls below `below` (defended targets only)
    WeakAdvantage { below: f64, factor: f64 },
    /// `× factor` when the target already borders another owned territory
    Momentum { factor: f64 },
    /// `× factor` for gateway targets
    GatewayTarget { factor: f64 },
    /// `× factor` when the source borders at least `min_enemies` enemy territories
    MultiFront { min_enemies: usize, factor: f64 },
    /// `× (1 + per_neighbor × owned neighbors of the target besides the source)`
    Consolidation { per_neighbor: f64 },
}

impl AttackRule {
    /// Multiplier this rule contributes for one candidate
    pub fn factor<B: BoardView + ?Sized>(
        &self,
        ctx: &DecisionContext<'_, B>,
        situation: &AttackSituation<'_>,
        jitter: f64,
    ) -> f64 {
        let source = situation.source;
        let target = situation.target;

        match *self {
            AttackRule::Scale { factor } => factor,
            AttackRule::Overwhelming { ratio, factor } => {
                if source.armies as f64 > target.armies as f64 * ratio {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::CompletesContinent { factor } => {
                if situation.completes_continent {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::Jitter { .. } => jitter,
            AttackRule::BreakContinent { control, factor } => {
                let Some(continent) = ctx
                    .continent_of(&target.id)
                    .and_then(|c| ctx.board.continent(c))
                else {
                    return 1.0;
                };
                let broken = ctx
                    .opponents()
                    .into_iter()
                    .any(|other| ctx.control_of(continent, other) > control);
                if broken {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::WeakerOpponent { ratio, factor } => {
                let Some(defender) = target.owner.as_ref() else {
                    return 1.0;
                };
                if ctx.strength_of(defender) < ctx.strength_of(ctx.player) * ratio {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::Concentration { min_armies, factor } => {
                if target.armies > min_armies {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::StrongAdvantage { above, factor } => {
                if target.armies > 0 && situation.advantage > above {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::WeakAdvantage { below, factor } => {
                if target.armies > 0 && situation.advantage < below {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::Momentum { factor } => {
                let continuing = ctx
                    .friendly_neighbors(&target.id)
                    .any(|t| t.id != source.id);
                if continuing {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::GatewayTarget { factor } => {
                if ctx.is_gateway(&target.id) {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::MultiFront {
                min_enemies,
                factor,
            } => {
                if ctx.enemy_neighbors(&source.id).count() >= min_enemies {
                    factor
                } else {
                    1.0
                }
            }
            AttackRule::Consolidation { per_neighbor } => {
                let owned = ctx
                    .friendly_neighbors(&target.id)
                    .filter(|t| t.id != source.id)
                    .count();
                1.0 + per_neighbor * owned as f64
            }
        }
    }
}

/// Reordering of the reinforcement list, applied after base scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReinforcementRule {
    /// Move territories in continents held above `threshold` to the front,
    /// ordered by `control × weight`
    ContinentControl { threshold: f64, weight: f64 },
    /// Order by number of adjacent enemy territories
    EnemyBorders,
    /// Drop non-front-line territories unless that would empty the list
    FrontLineOnly,
}

impl ReinforcementRule {
    /// Reorder in place; every sort is stable so earlier order breaks ties
    pub fn apply<B: BoardView + ?Sized>(
        &self,
        ctx: &DecisionContext<'_, B>,
        territories: &mut Vec<TerritoryId>,
    ) {
        match *self {
            ReinforcementRule::ContinentControl { threshold, weight } => {
                let key = |id: &TerritoryId| {
                    let control = ctx.control_around(id);
                    if control > threshold {
                        control * weight
                    } else {
                        0.0
                    }
                };
                territories.sort_by(|a, b| key(b).total_cmp(&key(a)));
            }
            ReinforcementRule::EnemyBorders => {
                territories.sort_by_key(|id| std::cmp::Reverse(ctx.enemy_neighbors(id).count()));
            }
            ReinforcementRule::FrontLineOnly => {
                if territories.iter().any(|id| ctx.is_front_line(id)) {
                    territories.retain(|id| ctx.is_front_line(id));
                }
            }
        }
    }
}

/// Fortification preference, consulted after the best move is chosen
///
/// A preference may only swap the destination for another candidate from
/// the same source, so the move stays reachable through owned territory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FortifyRule {
    /// If the destination has fewer than `min_degree` neighbors, take the
    /// first alternative with more neighbors
    PreferConnected { min_degree: usize },
    /// If the destination is not a gateway, take the first gateway
    /// alternative whose threat exceeds `min_threat`
    PreferGateway { min_threat: f64 },
}

impl FortifyRule {
    pub fn redirect<B: BoardView + ?Sized>(
        &self,
        ctx: &DecisionContext<'_, B>,
        chosen: &FortifyMove,
        candidates: &[FortifyMove],
    ) -> Option<FortifyMove> {
        let mut alternatives = candidates
            .iter()
            .filter(|c| c.source == chosen.source && c.destination != chosen.destination);

        match *self {
            FortifyRule::PreferConnected { min_degree } => {
                let degree = ctx.degree(&chosen.destination);
                if degree >= min_degree {
                    return None;
                }
                alternatives
                    .find(|c| ctx.degree(&c.destination) > degree)
                    .cloned()
            }
            FortifyRule::PreferGateway { min_threat } => {
                if ctx.is_gateway(&chosen.destination) {
                    return None;
                }
                alternatives
                    .find(|c| ctx.is_gateway(&c.destination) && ctx.threat(&c.destination) > min_threat)
                    .cloned()
            }
        }
    }
}
