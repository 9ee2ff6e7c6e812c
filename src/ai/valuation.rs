//! Strategic valuation - continent priorities and territory values
//!
//! Continent priority rewards high bonuses, few entry points, existing
//! ownership (quadratically) and small size. Territory value inherits its
//! continent's priority and rewards gateways and connectivity. A persona's
//! value rules are layered on top of the base table.

use ahash::AHashMap;
use serde::Serialize;

use crate::ai::context::DecisionContext;
use crate::ai::persona::Persona;
use crate::board::{BoardView, Continent};
use crate::core::types::{ContinentId, TerritoryId};

/// Value assumed for territories missing from the table
pub const DEFAULT_TERRITORY_VALUE: f64 = 1.0;

/// Per-territory values and per-continent priorities for one player
#[derive(Debug, Clone, Default, Serialize)]
pub struct Valuation {
    pub territory_values: AHashMap<TerritoryId, f64>,
    pub continent_priorities: AHashMap<ContinentId, f64>,
}

impl Valuation {
    pub fn value(&self, id: &TerritoryId) -> f64 {
        self.territory_values
            .get(id)
            .copied()
            .unwrap_or(DEFAULT_TERRITORY_VALUE)
    }

    pub fn priority(&self, id: &ContinentId) -> f64 {
        self.continent_priorities.get(id).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.territory_values.is_empty() && self.continent_priorities.is_empty()
    }
}

/// `(bonus / E) * ((O/T)^2 + offset) * sizeFactor`
///
/// Empty continents have no priority.
pub fn continent_priority<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    continent: &Continent,
) -> f64 {
    let total = continent.territories.len();
    if total == 0 {
        return 0.0;
    }

    let config = ctx.config;
    let owned = ctx.owned_in(continent, ctx.player) as f64;
    let share = owned / total as f64;
    let entry_points = ctx.entry_points(continent) as f64;

    let size_factor = (1.0 + (config.size_factor_pivot - total as f64) * config.size_factor_step)
        .max(config.min_size_factor);

    (continent.bonus as f64 / entry_points) * (share * share + config.ownership_offset) * size_factor
}

/// Base value before persona adjustments
pub fn base_territory_value<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    priorities: &AHashMap<ContinentId, f64>,
    id: &TerritoryId,
) -> f64 {
    let config = ctx.config;
    let mut value = 1.0;

    if let Some(continent) = ctx.continent_of(id) {
        let priority = priorities.get(continent).copied().unwrap_or(1.0);
        value *= priority * config.continent_value_factor;
    }

    if ctx.is_gateway(id) {
        value *= config.gateway_factor;
    }

    let degree = ctx.degree(id) as f64;
    let connectivity = 1.0 + (degree - config.average_degree) * config.connectivity_step;
    value *= connectivity.max(config.connectivity_floor);

    floored(value, config.min_territory_value)
}

/// Substitute `floor` for values that are not strictly positive and finite
///
/// Positive values pass through untouched, however small.
fn floored(value: f64, floor: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        floor
    }
}

/// Recompute the full valuation for the context's player
///
/// Pure in the board state: calling it twice on an unchanged board yields
/// identical tables.
pub fn evaluate<B: BoardView + ?Sized>(ctx: &DecisionContext<'_, B>, persona: &Persona) -> Valuation {
    let continent_priorities: AHashMap<ContinentId, f64> = ctx
        .board
        .continents()
        .iter()
        .map(|c| (c.id.clone(), continent_priority(ctx, c)))
        .collect();

    let mut territory_values: AHashMap<TerritoryId, f64> = ctx
        .board
        .territories()
        .iter()
        .map(|t| (t.id.clone(), base_territory_value(ctx, &continent_priorities, &t.id)))
        .collect();

    for rule in &persona.value_rules {
        rule.apply(ctx, &mut territory_values);
    }

    let floor = ctx.config.min_territory_value;
    for value in territory_values.values_mut() {
        *value = floored(*value, floor);
    }

    tracing::trace!(
        player = %ctx.player,
        persona = %persona.name,
        territories = territory_values.len(),
        "valuation recomputed"
    );

    Valuation {
        territory_values,
        continent_priorities,
    }
}
