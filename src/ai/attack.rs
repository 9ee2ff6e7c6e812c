//! Attack target selection
//!
//! Every owned territory with more than one army is paired with each
//! neighbor it does not own. Base score is win probability times the
//! strategic value of the prize; persona attack rules multiply on top.

use serde::Serialize;

use crate::ai::context::{advantage, DecisionContext};
use crate::ai::persona::{AttackSituation, Persona};
use crate::ai::valuation::Valuation;
use crate::board::{BoardView, Territory};
use crate::core::types::{Armies, ContinentId, PlayerId, TerritoryId};

/// One ranked attack candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackPlan {
    pub source: TerritoryId,
    pub target: TerritoryId,
    /// Owner of the target at ranking time
    pub defender: Option<PlayerId>,
    /// Armies committed to the first roll
    pub committed: Armies,
    pub score: f64,
}

/// `clamp(base + (advantage - 1) * slope, min, max)`
pub fn win_probability<B: BoardView + ?Sized>(ctx: &DecisionContext<'_, B>, advantage: f64) -> f64 {
    let config = ctx.config;
    (config.win_probability_base + (advantage - 1.0) * config.win_probability_slope)
        .clamp(config.win_probability_min, config.win_probability_max)
}

/// Value of taking `target`, with the target-continent and completion bonuses
pub fn capture_value<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    target: &TerritoryId,
) -> f64 {
    let config = ctx.config;
    let mut value = valuation.value(target);
    if ctx.in_continent(target, target_continent) {
        value *= config.attack_target_bonus;
    }
    if ctx.completes_continent(target) {
        value *= config.attack_completion_bonus;
    }
    value
}

/// How promising attacks out of `source` look, in `0.0..=cap`
///
/// Sums `(advantage - 1) * capture value` over enemy neighbors the source
/// outnumbers by at least the opportunity threshold. Territories the player
/// does not hold, or holds with a single army, score zero.
pub fn attack_opportunity_score<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    source: &TerritoryId,
) -> f64 {
    let config = ctx.config;
    let Some(from) = ctx.territory(source) else {
        return 0.0;
    };
    if !from.is_owned_by(ctx.player) || from.armies <= 1 {
        return 0.0;
    }

    let total: f64 = ctx
        .enemy_neighbors(source)
        .filter_map(|enemy| {
            let ratio = advantage(from.armies, enemy.armies);
            (ratio >= config.opportunity_threshold)
                .then(|| (ratio - 1.0) * capture_value(ctx, valuation, target_continent, &enemy.id))
        })
        .sum();

    total.clamp(0.0, config.opportunity_cap)
}

/// Base engine score before persona rules
pub fn base_attack_score<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    source: &Territory,
    target: &Territory,
) -> f64 {
    let config = ctx.config;
    let probability = win_probability(ctx, advantage(source.armies, target.armies));

    let mut value = capture_value(ctx, valuation, target_continent, &target.id);
    if target.armies <= config.weak_defender_armies {
        value *= config.weak_defender_bonus;
    }

    probability * value
}

/// Full score: base engine then every persona attack rule in order
pub fn attack_score<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    persona: &Persona,
    jitter: f64,
    source: &Territory,
    target: &Territory,
) -> f64 {
    let base = base_attack_score(ctx, valuation, target_continent, source, target);
    let situation = AttackSituation::new(ctx, source, target);
    persona
        .attack_rules
        .iter()
        .fold(base, |score, rule| score * rule.factor(ctx, &situation, jitter))
}

/// Enumerate and rank every legal attack out of `owned`
///
/// Ids in `owned` must exist on the board; territories not actually held
/// by the player or holding a single army produce nothing. The sort is
/// stable, so equal scores keep enumeration order.
pub fn rank_attack_targets<B: BoardView + ?Sized>(
    ctx: &DecisionContext<'_, B>,
    valuation: &Valuation,
    target_continent: Option<&ContinentId>,
    owned: &[TerritoryId],
    persona: &Persona,
    jitter: f64,
) -> Vec<AttackPlan> {
    let config = ctx.config;
    let mut plans = Vec::new();

    for id in owned {
        let Some(source) = ctx.territory(id) else {
            continue;
        };
        if !source.is_owned_by(ctx.player) || source.armies <= 1 {
            continue;
        }

        let committed = config.max_committed_force.min(source.armies - 1);
        if committed == 0 {
            continue;
        }

        for target in ctx.enemy_neighbors(id) {
            let score = attack_score(
                ctx,
                valuation,
                target_continent,
                persona,
                jitter,
                source,
                target,
            );
            tracing::trace!(source = %source.id, target = %target.id, score, "attack candidate");
            plans.push(AttackPlan {
                source: source.id.clone(),
                target: target.id.clone(),
                defender: target.owner.clone(),
                committed,
                score,
            });
        }
    }

    plans.sort_by(|a, b| b.score.total_cmp(&a.score));
    plans
}

/// External veto over attacks, typically treaties and alliances
pub trait AttackFilter {
    fn permits(&mut self, plan: &AttackPlan) -> bool;
}

impl<F: FnMut(&AttackPlan) -> bool> AttackFilter for F {
    fn permits(&mut self, plan: &AttackPlan) -> bool {
        self(plan)
    }
}

/// Drop vetoed attacks, keeping the ranked order
pub fn permitted_attacks<F: AttackFilter>(plans: Vec<AttackPlan>, mut filter: F) -> Vec<AttackPlan> {
    plans.into_iter().filter(|plan| filter.permits(plan)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::persona::Archetype;
    use crate::ai::valuation::evaluate;
    use crate::board::Board;
    use crate::core::config::StrategyConfig;

    fn id(name: &str) -> TerritoryId {
        TerritoryId::from(name)
    }

    /// Red "Fort" (5) faces Blue "Camp" (2) and Blue "Keep" (6); Red "Rear" (1)
    /// sits behind Fort. Camp and Keep live in a continent Blue also holds
    /// "Tower" in, so no single capture completes it.
    fn skirmish_board() -> Board {
        let mut board = Board::new();
        let west = ContinentId::from("West");
        let east = ContinentId::from("East");
        board.add_continent(west.clone(), 2).unwrap();
        board.add_continent(east.clone(), 3).unwrap();
        board.add_territory("Rear", Some(&west)).unwrap();
        board.add_territory("Fort", Some(&west)).unwrap();
        board.add_territory("Camp", Some(&east)).unwrap();
        board.add_territory("Keep", Some(&east)).unwrap();
        board.add_territory("Tower", Some(&east)).unwrap();
        board.connect(&id("Rear"), &id("Fort")).unwrap();
        board.connect(&id("Fort"), &id("Camp")).unwrap();
        board.connect(&id("Fort"), &id("Keep")).unwrap();
        board.connect(&id("Keep"), &id("Tower")).unwrap();

        let red = PlayerId::from("Red");
        let blue = PlayerId::from("Blue");
        board.place(&id("Rear"), &red, 1).unwrap();
        board.place(&id("Fort"), &red, 5).unwrap();
        board.place(&id("Camp"), &blue, 2).unwrap();
        board.place(&id("Keep"), &blue, 6).unwrap();
        board.place(&id("Tower"), &blue, 1).unwrap();
        board
    }

    #[test]
    fn test_win_probability_curve() {
        let board = Board::new();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        assert!((win_probability(&ctx, 2.5) - 0.8).abs() < 1e-12);
        assert_eq!(win_probability(&ctx, 10.0), 0.9);
        // 0.5 + (0.1 - 1) * 0.2
        assert!((win_probability(&ctx, 0.1) - 0.32).abs() < 1e-12);
        assert!(win_probability(&ctx, 0.0) > config.win_probability_min);
    }

    #[test]
    fn test_win_probability_lower_clamp() {
        let board = Board::new();
        let red = PlayerId::from("Red");
        let config = StrategyConfig {
            win_probability_slope: 0.5,
            ..StrategyConfig::default()
        };
        let ctx = DecisionContext::new(&board, &red, &config);
        // 0.5 + (0.1 - 1) * 0.5 = 0.05, raised to the 0.1 floor
        assert_eq!(win_probability(&ctx, 0.1), 0.1);
    }

    #[test]
    fn test_five_against_two_scenario() {
        let board = skirmish_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let valuation = evaluate(&ctx, &Persona::archetype(Archetype::Balanced));

        let fort = board.territory(&id("Fort")).unwrap();
        let camp = board.territory(&id("Camp")).unwrap();
        let score = base_attack_score(&ctx, &valuation, None, fort, camp);
        let expected = 0.8 * valuation.value(&id("Camp")) * 1.5;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rank_excludes_single_army_and_own_targets() {
        let board = skirmish_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Balanced);
        let valuation = evaluate(&ctx, &persona);

        let plans = rank_attack_targets(
            &ctx,
            &valuation,
            None,
            &[id("Rear"), id("Fort")],
            &persona,
            1.0,
        );
        assert_eq!(plans.len(), 2);
        for plan in &plans {
            assert_eq!(plan.source, id("Fort"));
            assert_ne!(plan.target, id("Rear"));
            assert_eq!(plan.committed, 3);
            assert_eq!(plan.defender, Some(PlayerId::from("Blue")));
        }
        // Weak Camp outranks the six-army Keep
        assert_eq!(plans[0].target, id("Camp"));
        assert!(plans[0].score >= plans[1].score);
    }

    #[test]
    fn test_committed_force_bounded_by_garrison() {
        let mut board = skirmish_board();
        board.set_armies(&id("Fort"), 2).unwrap();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Aggressive);
        let valuation = evaluate(&ctx, &persona);

        let plans = rank_attack_targets(&ctx, &valuation, None, &[id("Fort")], &persona, 1.0);
        assert!(plans.iter().all(|p| p.committed == 1));
    }

    #[test]
    fn test_opportunity_score_threshold_and_cap() {
        let board = skirmish_board();
        let red = PlayerId::from("Red");
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let valuation = evaluate(&ctx, &Persona::archetype(Archetype::Balanced));

        // Only Camp qualifies (2.5 >= 1.5); Keep (0.83) does not
        let expected = (1.5 * valuation.value(&id("Camp"))).min(3.0);
        let score = attack_opportunity_score(&ctx, &valuation, None, &id("Fort"));
        assert!((score - expected).abs() < 1e-9);

        assert_eq!(attack_opportunity_score(&ctx, &valuation, None, &id("Rear")), 0.0);
        assert_eq!(attack_opportunity_score(&ctx, &valuation, None, &id("Camp")), 0.0);
    }

    #[test]
    fn test_defensive_persona_favors_completion() {
        let mut board = skirmish_board();
        let red = PlayerId::from("Red");
        // Red takes Keep and Tower: capturing Camp now completes East
        board.place(&id("Keep"), &red, 2).unwrap();
        board.place(&id("Tower"), &red, 2).unwrap();
        let config = StrategyConfig::default();
        let ctx = DecisionContext::new(&board, &red, &config);
        let persona = Persona::archetype(Archetype::Defensive);
        let valuation = evaluate(&ctx, &persona);

        let fort = board.territory(&id("Fort")).unwrap();
        let camp = board.territory(&id("Camp")).unwrap();
        let base = base_attack_score(&ctx, &valuation, None, fort, camp);
        let full = attack_score(&ctx, &valuation, None, &persona, 1.0, fort, camp);
        assert!((full - base * 0.7 * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_permitted_attacks_keeps_order() {
        let plan = |target: &str, score: f64| AttackPlan {
            source: id("Fort"),
            target: id(target),
            defender: Some(PlayerId::from("Blue")),
            committed: 3,
            score,
        };
        let plans = vec![plan("A", 3.0), plan("B", 2.0), plan("C", 1.0)];
        let allowed = permitted_attacks(plans, |p: &AttackPlan| p.target != id("B"));
        let targets: Vec<_> = allowed.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(targets, vec!["A", "C"]);
    }
}
