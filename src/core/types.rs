//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a player (the declared name doubles as the id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

/// Identifier for a territory on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerritoryId(pub String);

/// Identifier for a continent on the board
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinentId(pub String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(name: String) -> Self {
                Self(name)
            }
        }
    };
}

string_id!(PlayerId);
string_id!(TerritoryId);
string_id!(ContinentId);

/// Army count on a territory
pub type Armies = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_territory_id_equality() {
        let a = TerritoryId::from("Alaska");
        let b = TerritoryId::new("Alaska".to_string());
        let c = TerritoryId::from("Kamchatka");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_player_id_display() {
        let player = PlayerId::from("Sun Tzu");
        assert_eq!(player.to_string(), "Sun Tzu");
        assert_eq!(player.as_str(), "Sun Tzu");
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = ContinentId::from("Australia");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Australia\"");
        let back: ContinentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<TerritoryId, u32> = HashMap::new();
        map.insert(TerritoryId::from("Siam"), 3);
        assert_eq!(map.get(&TerritoryId::from("Siam")), Some(&3));
    }
}
