//! Persona variants - named behavioral profiles over the base engine
//!
//! Architecture: data, not subclassing
//! - An [`Archetype`] contributes a base list of adjustment rules
//! - A named persona appends its own rules after its archetype's
//! - Stages apply their rule lists in order, so composing two behaviors is
//!   concatenating their rules
//!
//! Personas are picked once, from the player's declared name, when the
//! agent is created and never change afterwards.

mod rules;

pub use rules::{AttackRule, AttackSituation, FortifyRule, ReinforcementRule, ValueRule};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::error::{Result, StrategyError};

/// Base behavioral families every persona extends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Aggressive,
    Defensive,
    Balanced,
    Opportunistic,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Aggressive,
        Archetype::Defensive,
        Archetype::Balanced,
        Archetype::Opportunistic,
    ];

    /// Parse an archetype name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Aggressive => "aggressive",
            Archetype::Defensive => "defensive",
            Archetype::Balanced => "balanced",
            Archetype::Opportunistic => "opportunistic",
        }
    }

    fn value_rules(&self) -> Vec<ValueRule> {
        match self {
            Archetype::Aggressive => vec![ValueRule::Connectivity { per_degree: 0.15 }],
            Archetype::Defensive => vec![ValueRule::Gateway { factor: 1.5 }],
            Archetype::Balanced | Archetype::Opportunistic => Vec::new(),
        }
    }

    fn attack_rules(&self) -> Vec<AttackRule> {
        match self {
            Archetype::Aggressive => vec![
                AttackRule::Scale { factor: 1.3 },
                AttackRule::Overwhelming {
                    ratio: 2.0,
                    factor: 1.5,
                },
            ],
            Archetype::Defensive => vec![
                AttackRule::Scale { factor: 0.7 },
                AttackRule::CompletesContinent { factor: 3.0 },
            ],
            Archetype::Balanced => vec![
                AttackRule::Jitter { min: 0.9, max: 1.1 },
                AttackRule::BreakContinent {
                    control: 0.6,
                    factor: 1.5,
                },
            ],
            Archetype::Opportunistic => vec![
                AttackRule::WeakerOpponent {
                    ratio: 0.7,
                    factor: 1.5,
                },
                AttackRule::Overwhelming {
                    ratio: 2.0,
                    factor: 1.3,
                },
            ],
        }
    }

    fn reinforcement_rules(&self) -> Vec<ReinforcementRule> {
        match self {
            Archetype::Defensive => vec![ReinforcementRule::ContinentControl {
                threshold: 0.6,
                weight: 2.0,
            }],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete persona: archetype rules followed by the persona's own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub archetype: Archetype,
    pub value_rules: Vec<ValueRule>,
    pub attack_rules: Vec<AttackRule>,
    pub reinforcement_rules: Vec<ReinforcementRule>,
    pub fortify_rules: Vec<FortifyRule>,
}

impl Default for Persona {
    fn default() -> Self {
        Self::archetype(Archetype::Balanced)
    }
}

impl Persona {
    /// Plain archetype with no persona-specific rules
    pub fn archetype(archetype: Archetype) -> Self {
        Self {
            name: archetype.name().to_string(),
            archetype,
            value_rules: archetype.value_rules(),
            attack_rules: archetype.attack_rules(),
            reinforcement_rules: archetype.reinforcement_rules(),
            fortify_rules: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_value_rule(mut self, rule: ValueRule) -> Self {
        self.value_rules.push(rule);
        self
    }

    pub fn with_attack_rule(mut self, rule: AttackRule) -> Self {
        self.attack_rules.push(rule);
        self
    }

    pub fn with_reinforcement_rule(mut self, rule: ReinforcementRule) -> Self {
        self.reinforcement_rules.push(rule);
        self
    }

    pub fn with_fortify_rule(mut self, rule: FortifyRule) -> Self {
        self.fortify_rules.push(rule);
        self
    }

    /// Concentration of force: hubs, enemy strongpoints, crowded borders
    pub fn napoleon() -> Self {
        Self::archetype(Archetype::Aggressive)
            .named("Napoleon")
            .with_value_rule(ValueRule::Hub {
                min_degree: 4,
                factor: 1.5,
            })
            .with_attack_rule(AttackRule::Scale { factor: 1.4 })
            .with_attack_rule(AttackRule::Concentration {
                min_armies: 3,
                factor: 1.2,
            })
            .with_reinforcement_rule(ReinforcementRule::EnemyBorders)
    }

    /// Mobility and crushing odds
    pub fn genghis_khan() -> Self {
        Self::archetype(Archetype::Opportunistic)
            .named("Genghis Khan")
            .with_value_rule(ValueRule::Mobility { per_degree: 0.1 })
            .with_attack_rule(AttackRule::StrongAdvantage {
                above: 2.0,
                factor: 1.7,
            })
            .with_fortify_rule(FortifyRule::PreferConnected { min_degree: 3 })
    }

    /// Capitals and unbroken campaigns
    pub fn alexander() -> Self {
        Self::archetype(Archetype::Aggressive)
            .named("Alexander")
            .with_value_rule(ValueRule::Capitals {
                count: 5,
                factor: 1.8,
            })
            .with_attack_rule(AttackRule::Momentum { factor: 1.4 })
            .with_reinforcement_rule(ReinforcementRule::FrontLineOnly)
    }

    /// Key terrain and only fighting battles already won
    pub fn sun_tzu() -> Self {
        Self::archetype(Archetype::Balanced)
            .named("Sun Tzu")
            .with_value_rule(ValueRule::Gateway { factor: 1.6 })
            .with_value_rule(ValueRule::Connectivity { per_degree: 0.1 })
            .with_attack_rule(AttackRule::WeakAdvantage {
                below: 1.5,
                factor: 0.7,
            })
            .with_attack_rule(AttackRule::StrongAdvantage {
                above: 2.5,
                factor: 1.5,
            })
            .with_attack_rule(AttackRule::GatewayTarget { factor: 1.8 })
            .with_fortify_rule(FortifyRule::PreferGateway { min_threat: 0.3 })
    }

    /// Unexpected routes and multi-front sources
    pub fn hannibal() -> Self {
        Self::archetype(Archetype::Opportunistic)
            .named("Hannibal")
            .with_value_rule(ValueRule::Gateway { factor: 1.3 })
            .with_attack_rule(AttackRule::MultiFront {
                min_enemies: 2,
                factor: 1.3,
            })
            .with_reinforcement_rule(ReinforcementRule::EnemyBorders)
    }

    /// Consolidation and caution
    pub fn elizabeth() -> Self {
        Self::archetype(Archetype::Defensive)
            .named("Elizabeth")
            .with_value_rule(ValueRule::Security { weight: 0.5 })
            .with_attack_rule(AttackRule::Consolidation { per_neighbor: 0.2 })
            .with_attack_rule(AttackRule::WeakAdvantage {
                below: 1.3,
                factor: 0.6,
            })
    }

    /// Pick the persona for a declared player name
    ///
    /// Historical names match by substring first, then the legacy
    /// Alpha/Beta/Gamma/Delta tags, then an exact archetype name. Anything
    /// else plays Balanced.
    pub fn for_player(player_name: &str) -> Self {
        Self::select(player_name, None)
    }

    /// Like [`Persona::for_player`], with an explicit archetype overriding
    /// the name tags (historical names still win)
    pub fn select(player_name: &str, archetype: Option<Archetype>) -> Self {
        let historical: [(&str, fn() -> Persona); 6] = [
            ("Napoleon", Persona::napoleon),
            ("Genghis Khan", Persona::genghis_khan),
            ("Alexander", Persona::alexander),
            ("Sun Tzu", Persona::sun_tzu),
            ("Hannibal", Persona::hannibal),
            ("Elizabeth", Persona::elizabeth),
        ];
        if let Some((_, build)) = historical
            .iter()
            .find(|(needle, _)| player_name.contains(needle))
        {
            return build();
        }

        if let Some(archetype) = archetype {
            return Self::archetype(archetype);
        }

        let tags = [
            ("Alpha", Archetype::Aggressive),
            ("Beta", Archetype::Defensive),
            ("Gamma", Archetype::Balanced),
            ("Delta", Archetype::Opportunistic),
        ];
        if let Some((_, archetype)) = tags.iter().find(|(tag, _)| player_name.contains(tag)) {
            return Self::archetype(*archetype);
        }

        Archetype::from_name(player_name)
            .map(Self::archetype)
            .unwrap_or_default()
    }

    /// Draw the per-agent attack jitter from the first jitter rule
    ///
    /// Personas without one get a neutral 1.0.
    pub fn draw_jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.attack_rules
            .iter()
            .find_map(|rule| match *rule {
                AttackRule::Jitter { min, max } => Some(rng.gen_range(min..=max)),
                _ => None,
            })
            .unwrap_or(1.0)
    }

    /// Parse a custom persona from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PersonaFile = toml::from_str(content)?;
        file.into_persona()
    }

    /// Load a custom persona from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.archetype)
    }
}

/// On-disk persona: an archetype to extend plus extra rules
///
/// ```toml
/// name = "Wellington"
/// extends = "defensive"
///
/// [[attack_rule]]
/// kind = "weak_advantage"
/// below = 1.4
/// factor = 0.8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaFile {
    pub name: String,
    pub extends: Archetype,
    #[serde(default, rename = "value_rule")]
    pub value_rules: Vec<ValueRule>,
    #[serde(default, rename = "attack_rule")]
    pub attack_rules: Vec<AttackRule>,
    #[serde(default, rename = "reinforcement_rule")]
    pub reinforcement_rules: Vec<ReinforcementRule>,
    #[serde(default, rename = "fortify_rule")]
    pub fortify_rules: Vec<FortifyRule>,
}

impl PersonaFile {
    pub fn into_persona(self) -> Result<Persona> {
        if self.name.trim().is_empty() {
            return Err(StrategyError::InvalidPersona("persona name is empty".into()));
        }

        for rule in &self.attack_rules {
            if let AttackRule::Jitter { min, max } = *rule {
                let usable = min.is_finite() && max.is_finite() && min > 0.0 && min <= max;
                if !usable {
                    return Err(StrategyError::InvalidPersona(format!(
                        "{}: jitter range [{}, {}] must be finite, positive and ordered",
                        self.name, min, max
                    )));
                }
            }
        }

        let mut persona = Persona::archetype(self.extends).named(self.name);
        persona.value_rules.extend(self.value_rules);
        persona.attack_rules.extend(self.attack_rules);
        persona.reinforcement_rules.extend(self.reinforcement_rules);
        persona.fortify_rules.extend(self.fortify_rules);

        // One draw per agent feeds every jitter rule, so a second one would square it
        let jitters = persona
            .attack_rules
            .iter()
            .filter(|rule| matches!(rule, AttackRule::Jitter { .. }))
            .count();
        if jitters > 1 {
            return Err(StrategyError::InvalidPersona(format!(
                "{}: at most one jitter rule, including the {} archetype's",
                persona.name, persona.archetype
            )));
        }
        Ok(persona)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_historical_names_select_personas() {
        assert_eq!(Persona::for_player("Napoleon Bonaparte").name, "Napoleon");
        assert_eq!(Persona::for_player("Genghis Khan").archetype, Archetype::Opportunistic);
        assert_eq!(Persona::for_player("Alexander the Great").archetype, Archetype::Aggressive);
        assert_eq!(Persona::for_player("Sun Tzu").archetype, Archetype::Balanced);
        assert_eq!(Persona::for_player("Hannibal Barca").archetype, Archetype::Opportunistic);
        assert_eq!(Persona::for_player("Queen Elizabeth I").archetype, Archetype::Defensive);
    }

    #[test]
    fn test_legacy_tags_and_fallback() {
        assert_eq!(Persona::for_player("Alpha Bot").archetype, Archetype::Aggressive);
        assert_eq!(Persona::for_player("Beta Bot").archetype, Archetype::Defensive);
        assert_eq!(Persona::for_player("Delta Bot").archetype, Archetype::Opportunistic);
        assert_eq!(Persona::for_player("opportunistic").archetype, Archetype::Opportunistic);
        assert_eq!(Persona::for_player("Player 7"), Persona::archetype(Archetype::Balanced));
    }

    #[test]
    fn test_explicit_archetype_overrides_tags_not_history() {
        let tagged = Persona::select("Alpha Bot", Some(Archetype::Defensive));
        assert_eq!(tagged.archetype, Archetype::Defensive);

        let historical = Persona::select("Napoleon", Some(Archetype::Defensive));
        assert_eq!(historical.name, "Napoleon");
    }

    #[test]
    fn test_persona_extends_archetype_rules() {
        let base = Persona::archetype(Archetype::Aggressive);
        let napoleon = Persona::napoleon();
        assert_eq!(&napoleon.attack_rules[..base.attack_rules.len()], &base.attack_rules[..]);
        assert_eq!(&napoleon.value_rules[..base.value_rules.len()], &base.value_rules[..]);
        assert!(napoleon.attack_rules.len() > base.attack_rules.len());
    }

    #[test]
    fn test_jitter_only_for_balanced_family() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let j = Persona::sun_tzu().draw_jitter(&mut rng);
            assert!((0.9..=1.1).contains(&j));
        }
        assert_eq!(Persona::napoleon().draw_jitter(&mut rng), 1.0);
    }

    #[test]
    fn test_persona_from_toml() {
        let content = r#"
            name = "Wellington"
            extends = "defensive"

            [[value_rule]]
            kind = "hub"
            min_degree = 4
            factor = 1.2

            [[attack_rule]]
            kind = "weak_advantage"
            below = 1.4
            factor = 0.8

            [[reinforcement_rule]]
            kind = "enemy_borders"

            [[fortify_rule]]
            kind = "prefer_gateway"
            min_threat = 0.25
        "#;
        let persona = Persona::from_toml_str(content).unwrap();
        assert_eq!(persona.name, "Wellington");
        assert_eq!(persona.archetype, Archetype::Defensive);
        assert_eq!(
            persona.attack_rules.last(),
            Some(&AttackRule::WeakAdvantage {
                below: 1.4,
                factor: 0.8
            })
        );
        assert_eq!(persona.reinforcement_rules.len(), 2);
        assert_eq!(persona.fortify_rules.len(), 1);
    }

    #[test]
    fn test_persona_file_rejects_bad_jitter() {
        let content = r#"
            name = "Erratic"
            extends = "aggressive"

            [[attack_rule]]
            kind = "jitter"
            min = 1.2
            max = 0.8
        "#;
        assert!(matches!(
            Persona::from_toml_str(content),
            Err(StrategyError::InvalidPersona(_))
        ));
    }

    #[test]
    fn test_persona_file_rejects_nan_jitter() {
        let content = r#"
            name = "Erratic"
            extends = "aggressive"

            [[attack_rule]]
            kind = "jitter"
            min = nan
            max = 1.1
        "#;
        let err = Persona::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn test_persona_file_rejects_second_jitter() {
        let content = r#"
            name = "Twitchy"
            extends = "balanced"

            [[attack_rule]]
            kind = "jitter"
            min = 0.5
            max = 1.5
        "#;
        let err = Persona::from_toml_str(content).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidPersona(_)));
        assert!(err.to_string().contains("at most one jitter"));

        let single = content.replace("balanced", "opportunistic");
        let persona = Persona::from_toml_str(&single).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!((0.5..=1.5).contains(&persona.draw_jitter(&mut rng)));
    }

    #[test]
    fn test_load_bundled_persona() {
        let persona = Persona::load(Path::new("data/personas/wellington.toml"))
            .expect("Should load bundled persona");
        assert_eq!(persona.archetype, Archetype::Defensive);
    }
}
