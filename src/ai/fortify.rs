//! Fortification planning
//!
//! At most one move per turn. Interior garrisons flow to the front lines
//! they can reach through owned territory; when no interior garrison can
//! move, quiet front-line territories may shore up a more threatened
//! neighbor instead.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::ai::context::DecisionContext;
use crate::ai::persona::Persona;
use crate::ai::valuation::Valuation;
use crate::board::BoardView;
use crate::core::types::{Armies, ContinentId, TerritoryId};

/// A single troop transfer through owned territory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FortifyMove {
    pub source: TerritoryId,
    pub destination: TerritoryId,
    pub amount: Armies,
    pub score: f64,
    /// Owned territories walked from source to destination, both included
    pub path: Vec<TerritoryId>,
}

/// How much the destination benefits from extra armies
pub fn fortification_score<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    destination: &TerritoryId,
) -> f64 {
    if !ctx.owns(destination) {
        return 0.0;
    }

    let config = ctx.config;
    let mut score = valuation.value(destination) * (1.0 + config.threat_weight * ctx.threat(destination));

    if ctx.in_continent(destination, target_continent) {
        score *= config.fortify_target_bonus;
    }
    if ctx.control_around(destination) > config.majority_control {
        score *= config.majority_bonus;
    }

    score
}

/// Owned-only adjacency for the territories in `owned`
fn owned_graph<'o, B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    owned: &'o [TerritoryId],
) -> AHashMap<&'o TerritoryId, Vec<&'o TerritoryId>> {
    let members: AHashSet<&TerritoryId> = owned.iter().collect();
    owned
        .iter()
        .map(|id| {
            let neighbors = ctx
                .board
                .adjacent(id)
                .iter()
                .filter_map(|n| members.get(n).copied())
                .collect();
            (id, neighbors)
        })
        .collect()
}

/// Front-line territories reachable from `start`, with the path to each
///
/// Breadth-first over the owned graph. A front-line node is recorded but
/// not expanded further.
fn reachable_front_lines<'o>(
    graph: &AHashMap<&'o TerritoryId, Vec<&'o TerritoryId>>,
    front_line: &AHashSet<&'o TerritoryId>,
    start: &'o TerritoryId,
) -> Vec<(&'o TerritoryId, Vec<TerritoryId>)> {
    let mut found = Vec::new();
    let mut visited: AHashSet<&'o TerritoryId> = AHashSet::new();
    let mut parent: AHashMap<&'o TerritoryId, &'o TerritoryId> = AHashMap::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current != start && front_line.contains(current) {
            found.push((current, trace_path(&parent, start, current)));
            continue;
        }

        for &neighbor in graph.get(current).map(Vec::as_slice).unwrap_or(&[]) {
            if visited.insert(neighbor) {
                parent.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    found
}

fn trace_path<'o>(
    parent: &AHashMap<&'o TerritoryId, &'o TerritoryId>,
    start: &'o TerritoryId,
    end: &'o TerritoryId,
) -> Vec<TerritoryId> {
    let mut path = vec![end.clone()];
    let mut current = end;
    while current != start {
        match parent.get(current) {
            Some(&previous) => {
                path.push(previous.clone());
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Every candidate move: interior sources first, the front-line fallback
/// only when the interior pass finds nothing
pub fn fortification_candidates<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    owned: &[TerritoryId],
) -> Vec<FortifyMove> {
    let owned: Vec<TerritoryId> = owned.iter().filter(|id| ctx.owns(id)).cloned().collect();
    let graph = owned_graph(ctx, &owned);
    let front_line: AHashSet<&TerritoryId> = owned.iter().filter(|id| ctx.is_front_line(id)).collect();

    let mut candidates = Vec::new();

    for source in owned.iter().filter(|id| !front_line.contains(id)) {
        let armies = ctx.armies(source);
        if armies <= 1 {
            continue;
        }
        for (destination, path) in reachable_front_lines(&graph, &front_line, source) {
            candidates.push(FortifyMove {
                source: source.clone(),
                destination: destination.clone(),
                amount: armies - 1,
                score: fortification_score(ctx, valuation, target_continent, destination),
                path,
            });
        }
    }

    if !candidates.is_empty() {
        return candidates;
    }

    let ceiling = ctx.config.fallback_source_threat;
    for source in owned.iter().filter(|id| front_line.contains(id)) {
        let armies = ctx.armies(source);
        if armies <= 1 {
            continue;
        }
        let source_threat = ctx.threat(source);
        if source_threat > ceiling {
            continue;
        }
        let neighbors = graph.get(source).map(Vec::as_slice).unwrap_or(&[]);
        for &destination in neighbors.iter().filter(|n| front_line.contains(*n)) {
            if ctx.threat(destination) > source_threat {
                candidates.push(FortifyMove {
                    source: source.clone(),
                    destination: destination.clone(),
                    amount: armies - 1,
                    score: fortification_score(ctx, valuation, target_continent, destination),
                    path: vec![source.clone(), destination.clone()],
                });
            }
        }
    }

    candidates
}

/// Best single move, or `None` when nothing can usefully move
///
/// The first highest-scoring candidate wins; persona fortify rules may then
/// swap its destination for another reachable from the same source.
pub fn plan_fortification<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    owned: &[TerritoryId],
    persona: &Persona,
) -> Option<FortifyMove> {
    let candidates = fortification_candidates(ctx, valuation, target_continent, owned);

    let mut best: Option<&FortifyMove> = None;
    for candidate in &candidates {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    let mut chosen = best?.clone();

    for rule in &persona.fortify_rules {
        if let Some(redirected) = rule.redirect(ctx, &chosen, &candidates) {
            tracing::trace!(
                from = %chosen.destination,
                to = %redirected.destination,
                persona = %persona.name,
                "fortify destination redirected"
            );
            chosen = redirected;
        }
    }

    Some(chosen)
}
