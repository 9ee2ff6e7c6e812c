//! Reinforcement prioritization
//!
//! Orders the player's front line by how badly each territory needs
//! reserves: valuable, thinly held, inside the target continent, close to
//! completing a continent, or poised for a profitable attack.

use crate::ai::attack::attack_opportunity_score;
use crate::ai::context::DecisionContext;
use crate::ai::persona::Persona;
use crate::ai::valuation::Valuation;
use crate::board::BoardView;
use crate::core::types::{ContinentId, TerritoryId};

/// Whether `id` borders a territory still missing from a nearly complete continent
///
/// "Nearly complete" means the player lacks between the configured window
/// bounds (1 to 3 by default) of the territory's own continent.
pub fn helps_complete_continent<B: BoardView + ?Sized>(ctx: &DecisionContext<'_, B>, id: &TerritoryId) -> bool {
    let config = ctx.config;
    let Some(continent) = ctx.continent_of(id).and_then(|c| ctx.board.continent(c)) else {
        return false;
    };

    let missing = ctx.missing_territories(continent);
    if missing.len() < config.completion_window_min || missing.len() > config.completion_window_max {
        return false;
    }

    ctx.board
        .adjacent(id)
        .iter()
        .any(|neighbor| missing.contains(&neighbor))
}

/// Need score for one front-line territory
pub fn reinforcement_score<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    id: &TerritoryId,
) -> f64 {
    let config = ctx.config;
    let mut score = valuation.value(id) * (config.reinforce_army_numerator / (ctx.armies(id) as f64 + 1.0));

    if ctx.in_continent(id, target_continent) {
        score *= config.reinforce_target_bonus;
    }
    if helps_complete_continent(ctx, id) {
        score *= config.completion_bonus;
    }

    score * (1.0 + attack_opportunity_score(ctx, valuation, target_continent, id))
}

/// Order owned territories for reserve placement, neediest first
///
/// Only front-line territories are returned. If none of `owned` is on the
/// front line the input comes back in its original order. Persona
/// reinforcement rules reorder the result afterwards.
pub fn prioritize_reinforcement<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    owned: &[TerritoryId],
    persona: &Persona,
) -> Vec<TerritoryId> {
    let front_line: Vec<&TerritoryId> = owned.iter().filter(|id| ctx.is_front_line(id)).collect();

    let mut ordered: Vec<TerritoryId> = if front_line.is_empty() {
        owned.to_vec()
    } else {
        let mut scored: Vec<(&TerritoryId, f64)> = front_line
            .into_iter()
            .map(|id| (id, reinforcement_score(ctx, valuation, target_continent, id)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(id, _)| id.clone()).collect()
    };

    for rule in &persona.reinforcement_rules {
        rule.apply(ctx, &mut ordered);
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::persona::Archetype;
    use crate::ai::valuation::evaluate;
    use crate::board::Board;
    use crate::core::config::StrategyConfig;
    use crate::core::types::PlayerId;

    fn id(name: &str) -> TerritoryId {
        TerritoryId::from(name)
    }

    /// Line of five in one continent: R1 - R2 - R3 - B1 - B2
    fn line_board() -> Board {
        let mut board = Board::new();
        let land = ContinentId::from("Land");
        board.add_continent(land.clone(), 4).unwrap();
        for name in ["R1", "R2", "R3", "B1", "B2"] {
            board.add_territory(name, Some(&land)).unwrap();
        }
        board.connect(&id("R1"), &id("R2")).unwrap();
        board.connect(&id("R2"), &id("R3")).unwrap();
        board.connect(&id("R3"), &id("B1")).unwrap();
        board.connect(&id("B1"), &id("B2")).unwrap();

        let red = PlayerId::from("Red");
        let blue = PlayerId::from("Blue");
        board.place(&id("R1"), &red, 3).unwrap();
        board.place(&id("R2"), &red, 1).unwrap();
        board.place(&id("R3"), &red, 1).unwrap();
        board.place(&id("B1"), &blue, 2).unwrap();
        board.place(&id("B2"), &blue, 2).unwrap();
        board
    }

    #[test]
    fn test_only_front_line_returned() {
        let board = line_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Balanced);
        let valuation = evaluate(&ctx, &persona);

        let owned = vec![id("R1"), id("R2"), id("R3")];
        let ordered = prioritize_reinforcement(&ctx, &valuation, None, &owned, &persona);
        assert_eq!(ordered, vec![id("R3")]);
    }

    #[test]
    fn test_no_front_line_returns_input_order() {
        let mut board = line_board();
        let red = PlayerId::from("Red");
        board.place(&id("B1"), &red, 1).unwrap();
        board.place(&id("B2"), &red, 1).unwrap();
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Balanced);
        let valuation = evaluate(&ctx, &persona);

        let owned = vec![id("B2"), id("R1"), id("R3")];
        let ordered = prioritize_reinforcement(&ctx, &valuation, None, &owned, &persona);
        assert_eq!(ordered, owned);
    }

    #[test]
    fn test_completion_window() {
        let board = line_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);

        // Two territories missing, R3 borders one of them
        assert!(helps_complete_continent(&ctx, &id("R3")));
        assert!(!helps_complete_continent(&ctx, &id("R1")));
    }

    #[test]
    fn test_order_follows_descending_score() {
        let mut board = line_board();
        let red = PlayerId::from("Red");
        // Second front: R1 now borders a heavily held Blue territory
        let land = ContinentId::from("Land");
        board.add_territory("B0", Some(&land)).unwrap();
        board.connect(&id("R1"), &id("B0")).unwrap();
        board.place(&id("B0"), &PlayerId::from("Blue"), 9).unwrap();

        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Balanced);
        let valuation = evaluate(&ctx, &persona);

        let owned = vec![id("R1"), id("R2"), id("R3")];
        let ordered = prioritize_reinforcement(&ctx, &valuation, None, &owned, &persona);
        assert_eq!(ordered.len(), 2);
        assert!(ordered.contains(&id("R1")));
        assert!(ordered.contains(&id("R3")));

        let scores: Vec<f64> = ordered
            .iter()
            .map(|t| reinforcement_score(&ctx, &valuation, None, t))
            .collect();
        assert!(scores[0] >= scores[1]);
    }

    #[test]
    fn test_target_continent_doubles_score() {
        let board = line_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let valuation = evaluate(&ctx, &Persona::archetype(Archetype::Balanced));

        let land = ContinentId::from("Land");
        let plain = reinforcement_score(&ctx, &valuation, None, &id("R3"));
        let targeted = reinforcement_score(&ctx, &valuation, Some(&land), &id("R3"));
        // R3 holds 1 army, so there is no attack opportunity to change
        assert!((targeted - plain * 2.0).abs() < 1e-9);
    }
}
