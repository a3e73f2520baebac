use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use map::{HexCoord, TileMap};
use rules::{Ruleset, Stat};

use crate::civilization::{CivContext, CivilizationInfo};
use crate::error::GameError;
use crate::game_parameters::GameParameters;

/// A game session: the map, every civilization and the turn counter.
///
/// Commands act on the current player's civilization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameInfo {
    pub civilizations: Vec<CivilizationInfo>,
    pub tile_map: TileMap,
    pub turns: u32,
    pub game_parameters: GameParameters,
    /// Index of the current player in `civilizations`
    pub current_player: usize,
    #[serde(skip)]
    pub ruleset: Arc<Ruleset>,
}

impl GameInfo {
    pub fn new(civilizations: Vec<CivilizationInfo>, tile_map: TileMap, game_parameters: GameParameters, ruleset: Arc<Ruleset>) -> Self {
        Self { civilizations, tile_map, turns: 0, game_parameters, current_player: 0, ruleset }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn current_civ(&self) -> Result<&CivilizationInfo, GameError> {
        self.civilizations
            .get(self.current_player)
            .ok_or_else(|| GameError::UnknownCivilization(self.current_player.to_string()))
    }

    pub fn civ(&self, name: &str) -> Result<&CivilizationInfo, GameError> {
        self.civilizations
            .iter()
            .find(|c| c.civ_name == name)
            .ok_or_else(|| GameError::UnknownCivilization(name.to_string()))
    }

    /// World wonders standing in every civilization but `index`
    fn foreign_wonders(&self, index: usize) -> BTreeSet<String> {
        self.civilizations
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .flat_map(|(_, c)| c.built_world_wonders(&self.ruleset))
            .collect()
    }

    /// Context for the current civilization against an explicit ruleset
    pub fn context<'r>(&self, ruleset: &'r Ruleset) -> Result<CivContext<'r>, GameError> {
        let foreign = self.foreign_wonders(self.current_player);
        Ok(self.current_civ()?.context(ruleset, &self.tile_map, &foreign))
    }

    /// Post-load fix-up: re-links units, tiles and cities, checks every
    /// name against the ruleset and recomputes the cached city stats
    pub fn set_transients(&mut self, ruleset: Arc<Ruleset>) -> Result<(), GameError> {
        self.ruleset = ruleset;
        self.tile_map.set_transients();
        for civ in &mut self.civilizations {
            let civ_name = civ.civ_name.clone();
            for city in &mut civ.cities {
                city.set_transients(&civ_name, &mut self.tile_map);
            }
        }
        self.validate()?;
        for index in 0..self.civilizations.len() {
            let foreign = self.foreign_wonders(index);
            self.civilizations[index].update_stats(&self.ruleset, &self.tile_map, &foreign);
        }
        Ok(())
    }

    /// Fails on the first name that does not exist in the ruleset
    fn validate(&self) -> Result<(), GameError> {
        let ruleset = &self.ruleset;
        for tile in self.tile_map.tiles() {
            for terrain in std::iter::once(&tile.base_terrain).chain(tile.terrain_feature.iter()) {
                if ruleset.terrain(terrain).is_none() {
                    return Err(GameError::UnknownTerrain(terrain.clone()));
                }
            }
            for improvement in tile.improvement.iter().chain(tile.improvement_in_progress.iter()) {
                if ruleset.improvement(improvement).is_none() {
                    return Err(GameError::UnknownImprovement(improvement.clone()));
                }
            }
            if let Some(unit) = &tile.unit {
                if ruleset.unit(&unit.name).is_none() {
                    return Err(GameError::UnknownUnit(unit.name.clone()));
                }
            }
        }
        for civ in &self.civilizations {
            let tech = &civ.tech;
            let techs = tech
                .techs_researched
                .iter()
                .chain(tech.techs_in_progress.keys())
                .chain(tech.techs_to_research.iter());
            for name in techs {
                if ruleset.technology(name).is_none() {
                    return Err(GameError::UnknownTechnology(name.clone()));
                }
            }
            for policy in &civ.policies.adopted_policies {
                if ruleset.policy(policy).is_none() {
                    return Err(GameError::UnknownPolicy(policy.clone()));
                }
            }
            for city in &civ.cities {
                let constructions = &city.city_constructions;
                let names = constructions
                    .built_buildings
                    .iter()
                    .chain(constructions.in_progress_constructions.keys())
                    .chain(std::iter::once(&constructions.current_construction));
                for name in names {
                    if crate::city::Construction::lookup(name, ruleset).is_none() {
                        return Err(GameError::UnknownConstruction(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    /// Runs every civilization's turn, then advances the counter
    pub fn next_turn(&mut self) -> Result<(), GameError> {
        let ruleset = Arc::clone(&self.ruleset);
        for index in 0..self.civilizations.len() {
            let foreign = self.foreign_wonders(index);
            self.civilizations[index].next_turn(&ruleset, &mut self.tile_map, &foreign)?;
        }
        self.turns += 1;
        info!(turn = self.turns, "turn advanced");
        Ok(())
    }

    /// Splits the session into the current civilization and the shared map
    #[allow(clippy::type_complexity)]
    fn current(&mut self) -> Result<(&mut CivilizationInfo, &mut TileMap, Arc<Ruleset>, BTreeSet<String>), GameError> {
        let index = self.current_player;
        let foreign = self.foreign_wonders(index);
        let ruleset = Arc::clone(&self.ruleset);
        let civ = self
            .civilizations
            .get_mut(index)
            .ok_or_else(|| GameError::UnknownCivilization(index.to_string()))?;
        Ok((civ, &mut self.tile_map, ruleset, foreign))
    }

    pub fn found_city(&mut self, location: HexCoord) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        Ok(civ.found_city(location, &ruleset, map, &foreign))
    }

    pub fn set_construction(&mut self, city: &str, construction: &str) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.set_construction(city, construction, &ruleset, map, &foreign)
    }

    pub fn purchase_construction(&mut self, city: &str) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.purchase_construction(city, &ruleset, map, &foreign)
    }

    pub fn queue_technology(&mut self, tech: &str) -> Result<bool, GameError> {
        let (civ, _, ruleset, _) = self.current()?;
        civ.queue_technology(tech, &ruleset)
    }

    pub fn get_free_technology(&mut self, tech: &str) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        let granted = civ.get_free_technology(tech, &ruleset, map)?;
        if granted {
            civ.update_stats(&ruleset, map, &foreign);
        }
        Ok(granted)
    }

    pub fn adopt_policy(&mut self, policy: &str) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.adopt_policy(policy, &ruleset, map, &foreign)
    }

    pub fn assign_specialist(&mut self, city: &str, stat: Stat) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.assign_specialist(city, stat, &ruleset, map, &foreign)
    }

    pub fn unassign_specialist(&mut self, city: &str, stat: Stat) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.unassign_specialist(city, stat, &ruleset, map, &foreign)
    }

    pub fn assign_tile(&mut self, city: &str, position: HexCoord) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.assign_tile(city, position, &ruleset, map, &foreign)
    }

    pub fn unassign_tile(&mut self, city: &str, position: HexCoord) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.unassign_tile(city, position, &ruleset, map, &foreign)
    }

    pub fn move_unit_to(&mut self, position: HexCoord, destination: HexCoord) -> Result<HexCoord, GameError> {
        let (civ, map, ruleset, _) = self.current()?;
        Ok(civ.move_unit_to(position, destination, &ruleset, map))
    }

    pub fn set_unit_automated(&mut self, position: HexCoord, automated: bool) -> Result<bool, GameError> {
        let (civ, map, ruleset, _) = self.current()?;
        Ok(civ.set_unit_automated(position, automated, &ruleset, map))
    }

    pub fn use_great_person(&mut self, position: HexCoord) -> Result<bool, GameError> {
        let (civ, map, ruleset, foreign) = self.current()?;
        civ.use_great_person(position, &ruleset, map, &foreign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::CityInfo;
    use crate::testing::TestGame;

    #[test]
    fn test_turns_run_and_city_grows() {
        let mut game = TestGame::new();
        game.game.queue_technology("Pottery").unwrap();
        for _ in 0..30 {
            game.game.next_turn().unwrap();
        }
        assert_eq!(game.game.turns, 30);
        assert!(game.city().population.population > 1);
        assert!(game.civ().tech.is_researched("Pottery"));
    }

    #[test]
    fn test_foreign_wonders_come_from_other_civs() {
        let mut game = TestGame::new();
        let mut babylon = CivilizationInfo::new("Babylon");
        let mut city = CityInfo::new("Babylon", HexCoord::new(4, 0), "Babylon");
        city.city_constructions.built_buildings.insert("Pyramids".into());
        babylon.cities.push(city);
        game.game.civilizations.push(babylon);

        assert!(game.game.foreign_wonders(0).contains("Pyramids"));
        assert!(game.game.foreign_wonders(1).is_empty());
        let ctx = game.game.context(&game.ruleset).unwrap();
        assert!(ctx.foreign_wonders.contains("Pyramids"));
    }

    #[test]
    fn test_set_transients_relinks_after_deserializing() {
        let game = TestGame::new();
        let json = serde_json::to_string(&game.game).unwrap();
        let mut loaded: GameInfo = serde_json::from_str(&json).unwrap();
        let center = HexCoord::new(0, 0);
        assert!(loaded.tile_map.get(center).is_none());
        let unlinked = loaded.tile_map.tiles().find(|t| t.position == center).unwrap();
        assert_eq!(unlinked.owning_city, None);
        assert!(loaded.civilizations[0].cities[0].city_stats.is_dirty());

        loaded.set_transients(game.ruleset.clone()).unwrap();
        let tile = loaded.tile_map.get(center).unwrap();
        assert_eq!(tile.owning_city.as_deref(), Some("Rome"));
        assert!(tile.is_city_center());
        let city = &loaded.civilizations[0].cities[0];
        assert_eq!(city.civ_name, "Rome");
        assert!(!city.city_stats.is_dirty());
        assert_eq!(city.city_stats.current, game.city().city_stats.current);
    }

    #[test]
    fn test_commands_reject_unknown_names() {
        let mut game = TestGame::new();
        assert!(matches!(game.game.set_construction("Atlantis", "Monument"), Err(GameError::UnknownCity(_))));
        assert!(matches!(game.game.set_construction("Rome", "Death Star"), Err(GameError::UnknownConstruction(_))));
        assert!(matches!(game.game.queue_technology("Warp Drive"), Err(GameError::UnknownTechnology(_))));
        game.game.current_player = 3;
        assert!(matches!(game.game.next_turn(), Ok(())));
        assert!(matches!(game.game.found_city(HexCoord::new(0, 0)), Err(GameError::UnknownCivilization(_))));
    }
}
