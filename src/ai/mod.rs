//! AI decision engine
//!
//! Turn order, all driven by the orchestrator:
//! - Reinforcement: valuation, target continent, front-line ordering
//! - Attack: ranked (source, target, committed force) candidates
//! - Fortify: at most one transfer through owned territory
//!
//! Every stage reads the board through [`BoardView`](crate::board::BoardView)
//! and never mutates it. Personas layer data-driven rules on each stage.

pub mod agent;
pub mod attack;
pub mod context;
pub mod fortify;
pub mod persona;
pub mod reinforce;
pub mod target;
pub mod valuation;

pub use agent::{AgentStrategyState, StrategyAgent, TurnAdvice};
pub use attack::{permitted_attacks, AttackFilter, AttackPlan};
pub use context::DecisionContext;
pub use fortify::FortifyMove;
pub use persona::{Archetype, Persona, PersonaFile};
pub use valuation::Valuation;
