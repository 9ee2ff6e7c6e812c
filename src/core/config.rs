//! Strategy engine configuration with documented constants
//!
//! Every coefficient used by the valuation, targeting, reinforcement, attack
//! and fortification heuristics is collected here with its role explained.
//! The defaults reproduce the tuned values the agents were balanced against.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, StrategyError};

/// Tuning constants for the strategy engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    // === CONTINENT PRIORITY ===
    /// Lower bound on a continent's entry-point count
    ///
    /// Keeps `bonus / entry_points` finite for continents with no outside
    /// borders (islands, single-continent maps).
    pub min_entry_points: u32,

    /// Continent size at which the size factor is neutral (1.0)
    pub size_factor_pivot: f64,

    /// Size factor change per territory away from the pivot
    ///
    /// A 4-territory continent gets 1.2, a 9-territory one 0.7.
    pub size_factor_step: f64,

    /// Floor applied to the size factor
    ///
    /// Continents larger than 15 territories would otherwise get a zero or
    /// negative factor and drag their priority below zero.
    pub min_size_factor: f64,

    /// Added to the squared ownership fraction
    ///
    /// Gives unowned continents a small non-zero priority so they can still
    /// be picked as expansion targets.
    pub ownership_offset: f64,

    // === TERRITORY VALUE ===
    /// Multiplier applied to the owning continent's priority
    pub continent_value_factor: f64,

    /// Multiplier for territories bordering another continent
    pub gateway_factor: f64,

    /// Adjacency degree treated as average connectivity
    pub average_degree: f64,

    /// Value change per neighbor above or below the average degree
    pub connectivity_step: f64,

    /// Floor on the connectivity factor
    pub connectivity_floor: f64,

    /// Replacement for territory values that are zero, negative or not finite
    ///
    /// Zero-bonus continents and shrinking persona rules can produce such
    /// values. Small positive values are kept as computed.
    pub min_territory_value: f64,

    // === TARGET CONTINENT ===
    /// Added to the control fraction before squaring
    pub target_control_offset: f64,

    /// Lower bound of the uniform exploration multiplier
    pub target_jitter_min: f64,

    /// Upper bound of the uniform exploration multiplier
    pub target_jitter_max: f64,

    // === REINFORCEMENT ===
    /// Numerator of the army-need factor `n / (armies + 1)`
    pub reinforce_army_numerator: f64,

    /// Multiplier for front-line territories in the target continent
    pub reinforce_target_bonus: f64,

    /// Fewest missing territories for a continent to count as "nearly complete"
    pub completion_window_min: usize,

    /// Most missing territories for a continent to count as "nearly complete"
    pub completion_window_max: usize,

    /// Multiplier for territories bordering a missing piece of a nearly
    /// complete continent
    pub completion_bonus: f64,

    // === ATTACK ===
    /// Minimum army advantage for a neighbor to count as an opportunity
    pub opportunity_threshold: f64,

    /// Cap on the summed attack opportunity score
    pub opportunity_cap: f64,

    /// Win probability at even odds
    pub win_probability_base: f64,

    /// Win probability gained per unit of advantage above 1.0
    pub win_probability_slope: f64,

    /// Lowest win probability estimate
    pub win_probability_min: f64,

    /// Highest win probability estimate
    pub win_probability_max: f64,

    /// Capture value multiplier for targets in the target continent
    pub attack_target_bonus: f64,

    /// Capture value multiplier for the last missing territory of a continent
    pub attack_completion_bonus: f64,

    /// Defender armies at or below which the target counts as weakly held
    pub weak_defender_armies: u32,

    /// Capture value multiplier for weakly held targets
    pub weak_defender_bonus: f64,

    /// Most armies committed to a single attack roll
    pub max_committed_force: u32,

    // === FORTIFICATION ===
    /// Divisor normalizing the enemy/own army ratio into a 0..1 threat
    pub threat_divisor: f64,

    /// Weight of threat in the fortification score `1 + w * threat`
    pub threat_weight: f64,

    /// Multiplier for destinations in the target continent
    pub fortify_target_bonus: f64,

    /// Continent control fraction above which a destination is "held"
    pub majority_control: f64,

    /// Multiplier for destinations in a held continent
    pub majority_bonus: f64,

    /// Highest threat a front-line source may carry in the fallback pass
    pub fallback_source_threat: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            // Continent priority
            min_entry_points: 1,
            size_factor_pivot: 6.0,
            size_factor_step: 0.1,
            min_size_factor: 0.1,
            ownership_offset: 0.1,

            // Territory value
            continent_value_factor: 1.5,
            gateway_factor: 1.5,
            average_degree: 3.0,
            connectivity_step: 0.1,
            connectivity_floor: 0.8,
            min_territory_value: 0.05,

            // Target continent
            target_control_offset: 0.1,
            target_jitter_min: 0.8,
            target_jitter_max: 1.2,

            // Reinforcement
            reinforce_army_numerator: 2.0,
            reinforce_target_bonus: 2.0,
            completion_window_min: 1,
            completion_window_max: 3,
            completion_bonus: 1.5,

            // Attack
            opportunity_threshold: 1.5,
            opportunity_cap: 3.0,
            win_probability_base: 0.5,
            win_probability_slope: 0.2,
            win_probability_min: 0.1,
            win_probability_max: 0.9,
            attack_target_bonus: 2.0,
            attack_completion_bonus: 3.0,
            weak_defender_armies: 2,
            weak_defender_bonus: 1.5,
            max_committed_force: 3,

            // Fortification
            threat_divisor: 3.0,
            threat_weight: 2.0,
            fortify_target_bonus: 1.5,
            majority_control: 0.5,
            majority_bonus: 1.5,
            fallback_source_threat: 0.5,
        }
    }
}

impl StrategyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; omitted keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StrategyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.min_entry_points == 0 {
            return Err(StrategyError::InvalidConfig(
                "min_entry_points must be at least 1".into(),
            ));
        }

        if self.min_size_factor <= 0.0 || self.min_territory_value <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "size factor and territory value floors must be positive".into(),
            ));
        }

        if self.target_jitter_min <= 0.0 || self.target_jitter_min > self.target_jitter_max {
            return Err(StrategyError::InvalidConfig(format!(
                "target jitter range [{}, {}] must be positive and ordered",
                self.target_jitter_min, self.target_jitter_max
            )));
        }

        if self.completion_window_min > self.completion_window_max {
            return Err(StrategyError::InvalidConfig(format!(
                "completion window [{}, {}] is reversed",
                self.completion_window_min, self.completion_window_max
            )));
        }

        if self.win_probability_min > self.win_probability_max {
            return Err(StrategyError::InvalidConfig(format!(
                "win probability clamp [{}, {}] is reversed",
                self.win_probability_min, self.win_probability_max
            )));
        }

        if self.threat_divisor <= 0.0 {
            return Err(StrategyError::InvalidConfig(
                "threat_divisor must be positive".into(),
            ));
        }

        let multipliers = [
            ("continent_value_factor", self.continent_value_factor),
            ("gateway_factor", self.gateway_factor),
            ("connectivity_floor", self.connectivity_floor),
            ("reinforce_army_numerator", self.reinforce_army_numerator),
            ("reinforce_target_bonus", self.reinforce_target_bonus),
            ("completion_bonus", self.completion_bonus),
            ("attack_target_bonus", self.attack_target_bonus),
            ("attack_completion_bonus", self.attack_completion_bonus),
            ("weak_defender_bonus", self.weak_defender_bonus),
            ("fortify_target_bonus", self.fortify_target_bonus),
            ("majority_bonus", self.majority_bonus),
        ];
        for (name, factor) in multipliers {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(StrategyError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, factor
                )));
            }
        }

        let non_negative = [
            ("opportunity_cap", self.opportunity_cap),
            ("win_probability_min", self.win_probability_min),
            ("threat_weight", self.threat_weight),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(StrategyError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.max_committed_force == 0 {
            return Err(StrategyError::InvalidConfig(
                "max_committed_force must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<StrategyConfig> = OnceLock::new();

/// Get the global strategy config (initializes with defaults if not set)
pub fn config() -> &'static StrategyConfig {
    CONFIG.get_or_init(StrategyConfig::default)
}

/// Set the global strategy config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: StrategyConfig) -> std::result::Result<(), StrategyConfig> {
    CONFIG.set(config)
}
