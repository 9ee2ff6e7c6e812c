//! Per-player strategy agent
//!
//! Holds the only cross-turn state the engine keeps: the cached valuation
//! and the current target continent. Everything else is re-derived from
//! the board on every call.

use rand::Rng;
use serde::Serialize;

use crate::ai::attack::{self, AttackPlan};
use crate::ai::context::DecisionContext;
use crate::ai::fortify::{self, FortifyMove};
use crate::ai::persona::Persona;
use crate::ai::reinforce;
use crate::ai::target;
use crate::ai::valuation::{evaluate, Valuation};
use crate::board::BoardView;
use crate::core::config::{config, StrategyConfig};
use crate::core::error::Result;
use crate::core::types::{ContinentId, PlayerId, TerritoryId};

/// Cached per-player strategy tables
#[derive(Debug, Clone, Serialize)]
pub struct AgentStrategyState {
    pub player: PlayerId,
    pub valuation: Valuation,
    pub target_continent: Option<ContinentId>,
}

impl AgentStrategyState {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            valuation: Valuation::default(),
            target_continent: None,
        }
    }
}

/// Everything one agent recommends for a turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnAdvice {
    pub player: PlayerId,
    pub persona: String,
    pub target_continent: Option<ContinentId>,
    pub reinforcement: Vec<TerritoryId>,
    pub attacks: Vec<AttackPlan>,
    pub fortification: Option<FortifyMove>,
}

/// AI decision engine bound to one player
#[derive(Debug, Clone)]
pub struct StrategyAgent {
    state: AgentStrategyState,
    persona: Persona,
    /// Drawn once at creation for personas with a jitter rule
    attack_jitter: f64,
    config: StrategyConfig,
}

impl StrategyAgent {
    pub fn new<R: Rng + ?Sized>(player: PlayerId, persona: Persona, rng: &mut R) -> Self {
        let attack_jitter = persona.draw_jitter(rng);
        tracing::debug!(%player, persona = %persona, attack_jitter, "strategy agent created");
        Self {
            state: AgentStrategyState::new(player),
            persona,
            attack_jitter,
            config: config().clone(),
        }
    }

    /// Agent whose persona is picked from the player's declared name
    pub fn for_player<R: Rng + ?Sized>(player: PlayerId, rng: &mut R) -> Self {
        let persona = Persona::for_player(player.as_str());
        Self::new(player, persona, rng)
    }

    /// Replace the global tuning for this agent; the config is validated first
    pub fn with_config(mut self, config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn player(&self) -> &PlayerId {
        &self.state.player
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn state(&self) -> &AgentStrategyState {
        &self.state
    }

    pub fn valuation(&self) -> &Valuation {
        &self.state.valuation
    }

    pub fn target_continent(&self) -> Option<&ContinentId> {
        self.state.target_continent.as_ref()
    }

    pub fn attack_jitter(&self) -> f64 {
        self.attack_jitter
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Rebuild territory values and continent priorities from the board
    pub fn recompute_valuation<B: BoardView + ?Sized>(&mut self, board: &B) -> &Valuation {
        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let valuation = evaluate(&ctx, &self.persona);
        self.state.valuation = valuation;
        &self.state.valuation
    }

    /// Pick and remember this turn's target continent
    pub fn select_target_continent<B, R>(&mut self, board: &B, rng: &mut R) -> Option<ContinentId>
    where
        B: BoardView + ?Sized,
        R: Rng + ?Sized,
    {
        self.ensure_valuation(board);
        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let chosen = target::select_target_continent(&ctx, &self.state.valuation, rng);
        tracing::debug!(
            player = %self.state.player,
            target = ?chosen.as_ref().map(ContinentId::as_str),
            "target continent selected"
        );
        self.state.target_continent = chosen.clone();
        chosen
    }

    /// Reinforcement phase: refresh valuation and target, then order the front line
    pub fn prioritize_reinforcement<B, R>(
        &mut self,
        board: &B,
        owned: &[TerritoryId],
        rng: &mut R,
    ) -> Result<Vec<TerritoryId>>
    where
        B: BoardView + ?Sized,
        R: Rng + ?Sized,
    {
        let owned = self.checked_owned(board, owned)?;
        self.recompute_valuation(board);
        self.select_target_continent(board, rng);

        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let ordered = reinforce::prioritize_reinforcement(
            &ctx,
            &self.state.valuation,
            self.state.target_continent.as_ref(),
            &owned,
            &self.persona,
        );
        tracing::debug!(player = %self.state.player, count = ordered.len(), "reinforcement prioritized");
        Ok(ordered)
    }

    /// Attack phase: every legal attack, best first
    pub fn rank_attack_targets<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        owned: &[TerritoryId],
    ) -> Result<Vec<AttackPlan>> {
        let owned = self.checked_owned(board, owned)?;
        self.ensure_valuation(board);

        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let plans = attack::rank_attack_targets(
            &ctx,
            &self.state.valuation,
            self.state.target_continent.as_ref(),
            &owned,
            &self.persona,
            self.attack_jitter,
        );
        tracing::debug!(player = %self.state.player, candidates = plans.len(), "attacks ranked");
        Ok(plans)
    }

    /// Fortify phase: the single best transfer, if any
    pub fn plan_fortification<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        owned: &[TerritoryId],
    ) -> Result<Option<FortifyMove>> {
        let owned = self.checked_owned(board, owned)?;
        self.ensure_valuation(board);

        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let plan = fortify::plan_fortification(
            &ctx,
            &self.state.valuation,
            self.state.target_continent.as_ref(),
            &owned,
            &self.persona,
        );
        match &plan {
            Some(m) => tracing::debug!(
                player = %self.state.player,
                source = %m.source,
                destination = %m.destination,
                amount = m.amount,
                "fortification planned"
            ),
            None => tracing::debug!(player = %self.state.player, "no fortification"),
        }
        Ok(plan)
    }

    /// Attack opportunity out of one territory, in `0.0..=3.0` by default
    pub fn attack_opportunity_score<B: BoardView + ?Sized>(
        &mut self,
        board: &B,
        territory: &TerritoryId,
    ) -> Result<f64> {
        self.ensure_valuation(board);
        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        ctx.require(territory)?;
        Ok(attack::attack_opportunity_score(
            &ctx,
            &self.state.valuation,
            self.state.target_continent.as_ref(),
            territory,
        ))
    }

    /// Threat to one territory in `0.0..=1.0`
    pub fn territory_threat<B: BoardView + ?Sized>(&self, board: &B, territory: &TerritoryId) -> Result<f64> {
        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        ctx.require(territory)?;
        Ok(ctx.threat(territory))
    }

    /// All three phases against the current board, without applying any of them
    pub fn plan_turn<B, R>(&mut self, board: &B, rng: &mut R) -> Result<TurnAdvice>
    where
        B: BoardView + ?Sized,
        R: Rng + ?Sized,
    {
        let owned: Vec<TerritoryId> = board
            .territories()
            .iter()
            .filter(|t| t.is_owned_by(&self.state.player))
            .map(|t| t.id.clone())
            .collect();

        let reinforcement = self.prioritize_reinforcement(board, &owned, rng)?;
        let attacks = self.rank_attack_targets(board, &owned)?;
        let fortification = self.plan_fortification(board, &owned)?;

        Ok(TurnAdvice {
            player: self.state.player.clone(),
            persona: self.persona.name.clone(),
            target_continent: self.state.target_continent.clone(),
            reinforcement,
            attacks,
            fortification,
        })
    }

    fn ensure_valuation<B: BoardView + ?Sized>(&mut self, board: &B) {
        if self.state.valuation.is_empty() {
            self.recompute_valuation(board);
        }
    }

    /// Reject unknown ids, drop ones the player no longer holds
    fn checked_owned<B: BoardView + ?Sized>(&self, board: &B, owned: &[TerritoryId]) -> Result<Vec<TerritoryId>> {
        let ctx = DecisionContext::new(board, &self.state.player, &self.config);
        let mut checked = Vec::with_capacity(owned.len());
        for id in owned {
            let territory = ctx.require(id)?;
            if territory.is_owned_by(&self.state.player) {
                checked.push(id.clone());
            } else {
                tracing::warn!(
                    player = %self.state.player,
                    territory = %id,
                    "owned territory list is stale, skipping"
                );
            }
        }
        Ok(checked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::error::StrategyError;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dealt_classic(players: &[PlayerId], seed: u64) -> Board {
        let mut board = Board::classic();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        board.deal(players, 3, &mut rng).unwrap();
        board
    }

    #[test]
    fn test_unknown_territory_fails_fast() {
        let red = PlayerId::from("Red");
        let board = dealt_classic(&[red.clone(), PlayerId::from("Blue")], 1);
        let mut rng = StepRng::new(0, 0);
        let mut agent = StrategyAgent::for_player(red, &mut rng);

        let result = agent.rank_attack_targets(&board, &[TerritoryId::from("Atlantis")]);
        assert!(matches!(result, Err(StrategyError::UnknownTerritory(_))));
        assert!(agent.territory_threat(&board, &TerritoryId::from("Atlantis")).is_err());
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        let red = PlayerId::from("Red");
        let blue = PlayerId::from("Blue");
        let board = dealt_classic(&[red.clone(), blue.clone()], 2);
        let theirs = board.territories_of(&blue);
        let mut rng = StepRng::new(0, 0);
        let mut agent = StrategyAgent::for_player(red, &mut rng);

        let plans = agent.rank_attack_targets(&board, &theirs).unwrap();
        assert!(plans.is_empty());
    }

    #[test]
    fn test_reinforcement_sets_target_continent() {
        let red = PlayerId::from("Red");
        let board = dealt_classic(&[red.clone(), PlayerId::from("Blue")], 3);
        let owned = board.territories_of(&red);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut agent = StrategyAgent::for_player(red, &mut rng);

        assert!(agent.valuation().is_empty());
        let ordered = agent.prioritize_reinforcement(&board, &owned, &mut rng).unwrap();
        assert!(!ordered.is_empty());
        assert!(!agent.valuation().is_empty());
        assert!(agent.target_continent().is_some());
    }

    #[test]
    fn test_jitter_drawn_once_for_balanced() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let agent = StrategyAgent::for_player(PlayerId::from("Gamma"), &mut rng);
        let jitter = agent.attack_jitter();
        assert!((0.9..=1.1).contains(&jitter));

        let aggressive = StrategyAgent::for_player(PlayerId::from("Alpha"), &mut rng);
        assert_eq!(aggressive.attack_jitter(), 1.0);
    }

    #[test]
    fn test_plan_turn_is_consistent() {
        let red = PlayerId::from("Napoleon");
        let board = dealt_classic(&[red.clone(), PlayerId::from("Elizabeth")], 4);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut agent = StrategyAgent::for_player(red.clone(), &mut rng);

        let advice = agent.plan_turn(&board, &mut rng).unwrap();
        assert_eq!(advice.player, red);
        assert_eq!(advice.persona, "Napoleon");
        for plan in &advice.attacks {
            assert!(board.territory(&plan.source).unwrap().is_owned_by(&red));
            assert!(!board.territory(&plan.target).unwrap().is_owned_by(&red));
        }
        if let Some(m) = &advice.fortification {
            assert!(m.amount < board.territory(&m.source).unwrap().armies);
        }
    }
}
