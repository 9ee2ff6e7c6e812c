pub mod config;
pub mod error;
pub mod types;

pub use config::StrategyConfig;
pub use error::{Result, StrategyError};
pub use types::{Armies, ContinentId, PlayerId, TerritoryId};
