use std::sync::Arc;

use tracing::{info, warn};

use map::{HexCoord, MapGenerator, MapUnit};
use rules::constants::{SETTLER, WORKER};
use rules::Ruleset;

use crate::civilization::CivilizationInfo;
use crate::error::GameError;
use crate::game_info::GameInfo;
use crate::game_parameters::GameParameters;

const STARTING_TECH: &str = "Agriculture";
const STARTING_UNITS: [&str; 3] = [SETTLER, WORKER, "Warrior"];

/// Builds a fresh session: a generated map and one civilization with its
/// starting units near the centre
pub struct GameStarter;

impl GameStarter {
    pub fn start_new_game(params: &GameParameters, ruleset: Arc<Ruleset>) -> Result<GameInfo, GameError> {
        let mut tile_map = MapGenerator::new(&ruleset, params.seed).generate(&params.map_parameters());

        let mut civ = CivilizationInfo::new(&params.civilization_name);
        civ.gold = params.starting_gold;
        if ruleset.technology(STARTING_TECH).is_some() {
            civ.tech.techs_researched.insert(STARTING_TECH.to_string());
        }

        let start = HexCoord::new(0, 0);
        for name in STARTING_UNITS {
            let unit = ruleset.unit(name).ok_or_else(|| GameError::UnknownUnit(name.to_string()))?;
            let placed = tile_map.place_unit_near_tile(start, MapUnit::new(name, &civ.civ_name, unit.movement), &ruleset);
            if placed.is_none() {
                warn!(unit = name, "no room for starting unit");
            }
        }
        civ.update_explored_tiles(&ruleset, &tile_map);

        info!(
            civ = %civ.civ_name,
            radius = params.map_radius,
            seed = params.seed,
            tiles = tile_map.len(),
            "new game started"
        );
        let mut game = GameInfo::new(vec![civ], tile_map, params.clone(), ruleset);
        let ruleset = Arc::clone(&game.ruleset);
        game.set_transients(ruleset)?;
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u64) -> GameParameters {
        GameParameters { map_radius: 5, seed, ..GameParameters::default() }
    }

    #[test]
    fn test_new_game_places_starting_units() {
        let ruleset = Arc::new(Ruleset::vanilla().unwrap());
        let game = GameStarter::start_new_game(&params(3), ruleset).unwrap();
        let civ = game.current_civ().unwrap();
        assert!(civ.tech.is_researched(STARTING_TECH));
        assert!(civ.cities.is_empty());
        assert!(!civ.explored_tiles.is_empty());

        let units: Vec<&str> = game
            .tile_map
            .tiles()
            .filter_map(|t| t.unit.as_ref())
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(units.len(), 3);
        for name in STARTING_UNITS {
            assert!(units.contains(&name));
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let ruleset = Arc::new(Ruleset::vanilla().unwrap());
        let a = GameStarter::start_new_game(&params(11), Arc::clone(&ruleset)).unwrap();
        let b = GameStarter::start_new_game(&params(11), ruleset).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
