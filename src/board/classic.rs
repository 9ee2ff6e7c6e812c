//! The standard 42-territory world map

use super::Board;
use crate::core::types::{ContinentId, TerritoryId};

const CONTINENTS: &[(&str, u32, &[&str])] = &[
    (
        "NorthAmerica",
        5,
        &[
            "Alaska",
            "NorthwestTerritory",
            "Greenland",
            "Alberta",
            "Ontario",
            "Quebec",
            "WesternUS",
            "EasternUS",
            "CentralAmerica",
        ],
    ),
    ("SouthAmerica", 2, &["Venezuela", "Peru", "Brazil", "Argentina"]),
    (
        "Europe",
        5,
        &[
            "Iceland",
            "Scandinavia",
            "GreatBritain",
            "NorthernEurope",
            "Ukraine",
            "WesternEurope",
            "SouthernEurope",
        ],
    ),
    (
        "Africa",
        3,
        &["NorthAfrica", "Egypt", "EastAfrica", "Congo", "SouthAfrica", "Madagascar"],
    ),
    (
        "Asia",
        7,
        &[
            "Ural",
            "Siberia",
            "Yakutsk",
            "Kamchatka",
            "Irkutsk",
            "Mongolia",
            "Japan",
            "Afghanistan",
            "China",
            "MiddleEast",
            "India",
            "Siam",
        ],
    ),
    (
        "Australia",
        2,
        &["Indonesia", "NewGuinea", "WesternAustralia", "EasternAustralia"],
    ),
];

const BORDERS: &[(&str, &[&str])] = &[
    // North America
    ("Alaska", &["NorthwestTerritory", "Alberta", "Kamchatka"]),
    ("NorthwestTerritory", &["Alaska", "Greenland", "Alberta", "Ontario"]),
    ("Greenland", &["NorthwestTerritory", "Ontario", "Quebec", "Iceland"]),
    ("Alberta", &["Alaska", "NorthwestTerritory", "Ontario", "WesternUS"]),
    (
        "Ontario",
        &["NorthwestTerritory", "Greenland", "Alberta", "Quebec", "WesternUS", "EasternUS"],
    ),
    ("Quebec", &["Greenland", "Ontario", "EasternUS"]),
    ("WesternUS", &["Alberta", "Ontario", "EasternUS", "CentralAmerica"]),
    ("EasternUS", &["Ontario", "Quebec", "WesternUS", "CentralAmerica"]),
    ("CentralAmerica", &["WesternUS", "EasternUS", "Venezuela"]),
    // South America
    ("Venezuela", &["CentralAmerica", "Peru", "Brazil"]),
    ("Peru", &["Venezuela", "Brazil", "Argentina"]),
    ("Brazil", &["Venezuela", "Peru", "Argentina", "NorthAfrica"]),
    ("Argentina", &["Peru", "Brazil"]),
    // Europe
    ("Iceland", &["Greenland", "Scandinavia", "GreatBritain"]),
    ("Scandinavia", &["Iceland", "GreatBritain", "NorthernEurope", "Ukraine"]),
    ("GreatBritain", &["Iceland", "Scandinavia", "NorthernEurope", "WesternEurope"]),
    (
        "NorthernEurope",
        &["Scandinavia", "GreatBritain", "Ukraine", "WesternEurope", "SouthernEurope"],
    ),
    (
        "Ukraine",
        &["Scandinavia", "NorthernEurope", "SouthernEurope", "Ural", "Afghanistan", "MiddleEast"],
    ),
    ("WesternEurope", &["GreatBritain", "NorthernEurope", "SouthernEurope", "NorthAfrica"]),
    (
        "SouthernEurope",
        &["NorthernEurope", "Ukraine", "WesternEurope", "NorthAfrica", "Egypt", "MiddleEast"],
    ),
    // Africa
    (
        "NorthAfrica",
        &["Brazil", "WesternEurope", "SouthernEurope", "Egypt", "EastAfrica", "Congo"],
    ),
    ("Egypt", &["SouthernEurope", "NorthAfrica", "EastAfrica", "MiddleEast"]),
    (
        "EastAfrica",
        &["NorthAfrica", "Egypt", "Congo", "SouthAfrica", "Madagascar", "MiddleEast"],
    ),
    ("Congo", &["NorthAfrica", "EastAfrica", "SouthAfrica"]),
    ("SouthAfrica", &["EastAfrica", "Congo", "Madagascar"]),
    ("Madagascar", &["EastAfrica", "SouthAfrica"]),
    // Asia
    ("Ural", &["Ukraine", "Siberia", "China", "Afghanistan"]),
    ("Siberia", &["Ural", "Yakutsk", "Irkutsk", "Mongolia", "China"]),
    ("Yakutsk", &["Siberia", "Kamchatka", "Irkutsk"]),
    ("Kamchatka", &["Alaska", "Yakutsk", "Irkutsk", "Mongolia", "Japan"]),
    ("Irkutsk", &["Siberia", "Yakutsk", "Kamchatka", "Mongolia"]),
    ("Mongolia", &["Siberia", "Irkutsk", "Kamchatka", "Japan", "China"]),
    ("Japan", &["Kamchatka", "Mongolia"]),
    ("Afghanistan", &["Ukraine", "Ural", "China", "MiddleEast", "India"]),
    ("China", &["Ural", "Siberia", "Mongolia", "Afghanistan", "India", "Siam"]),
    (
        "MiddleEast",
        &["Ukraine", "SouthernEurope", "Egypt", "EastAfrica", "Afghanistan", "India"],
    ),
    ("India", &["Afghanistan", "China", "MiddleEast", "Siam"]),
    ("Siam", &["China", "India", "Indonesia"]),
    // Australia
    ("Indonesia", &["Siam", "NewGuinea", "WesternAustralia"]),
    ("NewGuinea", &["Indonesia", "WesternAustralia", "EasternAustralia"]),
    ("WesternAustralia", &["Indonesia", "NewGuinea", "EasternAustralia"]),
    ("EasternAustralia", &["NewGuinea", "WesternAustralia"]),
];

impl Board {
    /// Build the classic six-continent world map with no owners
    pub fn classic() -> Self {
        let mut board = Board::new();

        // The tables above are static and consistent, so construction only
        // fails if they are edited into an invalid state.
        for (name, bonus, members) in CONTINENTS {
            let continent = ContinentId::from(*name);
            if board.add_continent(continent.clone(), *bonus).is_err() {
                continue;
            }
            for member in *members {
                let _ = board.add_territory(*member, Some(&continent));
            }
        }

        for (from, neighbors) in BORDERS {
            let from = TerritoryId::from(*from);
            for to in *neighbors {
                let _ = board.connect(&from, &TerritoryId::from(*to));
            }
        }

        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardView;

    #[test]
    fn test_classic_board_shape() {
        let board = Board::classic();
        assert_eq!(board.territories().len(), 42);
        assert_eq!(board.continents().len(), 6);
        assert!(board.validate().is_ok());

        let bonuses: u32 = board.continents().iter().map(|c| c.bonus).sum();
        assert_eq!(bonuses, 24);
    }

    #[test]
    fn test_classic_cross_continent_links() {
        let board = Board::classic();
        let alaska = TerritoryId::from("Alaska");
        assert!(board.adjacent(&alaska).contains(&TerritoryId::from("Kamchatka")));
        assert_eq!(board.adjacent(&TerritoryId::from("Argentina")).len(), 2);
        assert_eq!(board.adjacent(&TerritoryId::from("Ukraine")).len(), 6);
    }
}
