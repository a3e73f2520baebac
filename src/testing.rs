//! Deterministic session used by scenario tests: one civilization with a
//! single city at the centre of a flat grassland map.

use std::collections::BTreeSet;
use std::sync::Arc;

use map::{HexCoord, MapUnit, TileInfo, TileMap};
use rules::constants::{GRASSLAND, SETTLER};
use rules::Ruleset;

use crate::city::CityInfo;
use crate::civilization::{CivContext, CivilizationInfo};
use crate::game_info::GameInfo;
use crate::game_parameters::GameParameters;

pub const TEST_RADIUS: i32 = 5;

pub struct TestGame {
    pub game: GameInfo,
    pub ruleset: Arc<Ruleset>,
}

impl TestGame {
    pub fn new() -> Self {
        let ruleset = Arc::new(Ruleset::vanilla().unwrap());
        let tiles = HexCoord::new(0, 0)
            .disk(TEST_RADIUS)
            .into_iter()
            .map(|position| TileInfo::new(position, GRASSLAND))
            .collect();
        let mut tile_map = TileMap::new(tiles);

        let mut civ = CivilizationInfo::new("Rome");
        civ.tech.techs_researched.insert("Agriculture".to_string());
        let origin = HexCoord::new(0, 0);
        let settler = ruleset.unit(SETTLER).unwrap();
        tile_map.get_mut(origin).unwrap().unit = Some(MapUnit::new(SETTLER, "Rome", settler.movement));
        tile_map.set_transients();
        assert!(civ.found_city(origin, &ruleset, &mut tile_map, &BTreeSet::new()));

        let params = GameParameters { map_radius: TEST_RADIUS, ..GameParameters::default() };
        let game = GameInfo::new(vec![civ], tile_map, params, Arc::clone(&ruleset));
        Self { game, ruleset }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn civ(&self) -> &CivilizationInfo {
        &self.game.civilizations[0]
    }

    pub fn civ_mut(&mut self) -> &mut CivilizationInfo {
        &mut self.game.civilizations[0]
    }

    pub fn city(&self) -> &CityInfo {
        &self.civ().cities[0]
    }

    pub fn city_mut(&mut self) -> &mut CityInfo {
        &mut self.civ_mut().cities[0]
    }

    pub fn context(&self) -> CivContext<'_> {
        self.context_in(&self.ruleset)
    }

    /// Context borrowing a ruleset the caller owns, so the game stays mutable
    pub fn context_in<'r>(&self, ruleset: &'r Ruleset) -> CivContext<'r> {
        self.civ().context(ruleset, &self.game.tile_map, &BTreeSet::new())
    }

    pub fn city_and_map(&mut self) -> (&mut CityInfo, &mut TileMap) {
        let game = &mut self.game;
        (&mut game.civilizations[0].cities[0], &mut game.tile_map)
    }
}
