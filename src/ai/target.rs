//! Target continent selection
//!
//! Weight = priority * (control + offset)^2 * U, with U drawn uniformly from
//! the configured jitter range for every continent on every call. The
//! squared control term pulls agents toward continents they already hold
//! part of; the jitter lets them occasionally try a fresh one.

use rand::Rng;

use crate::ai::context::DecisionContext;
use crate::ai::valuation::Valuation;
use crate::board::BoardView;
use crate::core::types::ContinentId;

/// Deterministic part of the selection weight
pub fn target_weight(priority: f64, control: f64, control_offset: f64, jitter: f64) -> f64 {
    let pull = control + control_offset;
    priority * pull * pull * jitter
}

/// Pick the continent to focus on this turn
///
/// Ties keep the first continent in board order. Continents without
/// members are never picked; a board with none yields `None`.
pub fn select_target_continent<B, R>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    rng: &mut R,
) -> Option<ContinentId>
where
    B: BoardView + ?Sized,
    R: Rng + ?Sized,
{
    let config = ctx.config;
    let mut best: Option<(&ContinentId, f64)> = None;

    for continent in ctx.board.continents() {
        if continent.territories.is_empty() {
            continue;
        }

        let jitter = rng.gen_range(config.target_jitter_min..=config.target_jitter_max);
        let weight = target_weight(
            valuation.priority(&continent.id),
            ctx.control(continent),
            config.target_control_offset,
            jitter,
        );

        tracing::trace!(continent = %continent.id, weight, "target continent weight");

        match best {
            Some((_, best_weight)) if weight <= best_weight => {}
            _ => best = Some((&continent.id, weight)),
        }
    }

    best.map(|(id, _)| id.clone())
}
