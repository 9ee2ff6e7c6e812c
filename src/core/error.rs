use thiserror::Error;

use crate::core::types::{ContinentId, TerritoryId};

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Territory not found: {0}")]
    UnknownTerritory(TerritoryId),

    #[error("Continent not found: {0}")]
    UnknownContinent(ContinentId),

    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid persona: {0}")]
    InvalidPersona(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StrategyError>;
