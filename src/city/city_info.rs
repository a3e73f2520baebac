use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use map::tile_stats::tile_stats;
use map::{HexCoord, MapUnit, RoadStatus, TileInfo, TileMap};
use rules::constants::{policies, uniques, CULTURE_BUILDINGS, FOREST, GREAT_ARTIST, GREAT_SCIENTIST, JUNGLE, MARSH, PALACE, WORKER};
use rules::{Ruleset, Stat, Stats};

use crate::automation::rank_tile;
use crate::city::city_stats::{self, CityStats};
use crate::city::construction::Construction;
use crate::city::{CityConstructions, CityExpansionManager, PopulationChange, PopulationManager};
use crate::civilization::{CivContext, Notification};
use crate::error::GameError;

/// Radii searched, in order, when borders grow
const EXPANSION_RADII: [i32; 2] = [2, 3];

/// Civilization-level consequences of a city's turn, applied by the civilization
#[derive(Debug, Default)]
pub struct CityTurnEffects {
    pub free_techs: i32,
    pub free_policies: i32,
    pub golden_ages: i32,
    pub notifications: Vec<Notification>,
}

impl CityTurnEffects {
    pub fn notify(&mut self, text: impl Into<String>, location: Option<HexCoord>) {
        self.notifications.push(Notification::new(text, location));
    }
}

/// A city and the three managers it owns
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: String,
    pub location: HexCoord,
    /// Tiles owned by this city, the centre included
    pub tiles: BTreeSet<HexCoord>,
    pub population: PopulationManager,
    pub city_constructions: CityConstructions,
    pub expansion: CityExpansionManager,
    #[serde(skip)]
    pub civ_name: String,
    #[serde(skip)]
    pub city_stats: CityStats,
}

impl CityInfo {
    pub fn new(name: &str, location: HexCoord, civ_name: &str) -> Self {
        Self {
            name: name.to_string(),
            location,
            tiles: BTreeSet::new(),
            population: PopulationManager::new(),
            city_constructions: CityConstructions::new(),
            expansion: CityExpansionManager::new(),
            civ_name: civ_name.to_string(),
            city_stats: CityStats::default(),
        }
    }

    /// Sets up the centre tile and claims the surrounding ring
    pub fn found(name: &str, location: HexCoord, civ_name: &str, railroad: bool, map: &mut TileMap) -> Self {
        let mut city = Self::new(name, location, civ_name);
        let claimable: Vec<HexCoord> = map
            .tiles_in_distance(location, 1)
            .into_iter()
            .filter(|t| t.owner.is_none() || t.position == location)
            .map(|t| t.position)
            .collect();
        for position in claimable {
            city.claim_tile(position, map);
        }
        if let Some(center) = map.get_mut(location) {
            center.city_center = true;
            center.working_city = Some(name.to_string());
            if matches!(center.terrain_feature.as_deref(), Some(FOREST | JUNGLE | MARSH)) {
                center.terrain_feature = None;
            }
            center.improvement = None;
            center.improvement_in_progress = None;
            center.road_status = if railroad { RoadStatus::Railroad } else { center.road_status.max(RoadStatus::Road) };
        }
        info!(city = name, civ = civ_name, %location, "city founded");
        city
    }

    /// Re-links tiles to this city after loading
    pub fn set_transients(&mut self, civ_name: &str, map: &mut TileMap) {
        self.civ_name = civ_name.to_string();
        for position in &self.tiles {
            if let Some(tile) = map.get_mut(*position) {
                tile.owner = Some(civ_name.to_string());
                tile.owning_city = Some(self.name.clone());
                if *position == self.location {
                    tile.city_center = true;
                    tile.working_city = Some(self.name.clone());
                }
            }
        }
        self.city_stats.mark_dirty();
    }

    pub fn is_capital(&self) -> bool {
        self.city_constructions.is_built(PALACE)
    }

    pub fn claim_tile(&mut self, position: HexCoord, map: &mut TileMap) {
        if let Some(tile) = map.get_mut(position) {
            tile.owner = Some(self.civ_name.clone());
            tile.owning_city = Some(self.name.clone());
            self.tiles.insert(position);
        }
    }

    /// Drops a tile that another city has taken over
    pub fn release_tile(&mut self, position: HexCoord) {
        if self.tiles.remove(&position) {
            self.city_stats.mark_dirty();
        }
    }

    /// Tiles worked by this city's citizens, the centre included
    pub fn worked_tiles<'a>(&'a self, map: &'a TileMap) -> impl Iterator<Item = &'a TileInfo> + 'a {
        self.tiles
            .iter()
            .filter_map(move |p| map.get(*p))
            .filter(move |t| t.working_city.as_deref() == Some(self.name.as_str()))
    }

    /// Worked tiles that take a citizen, i.e. without the centre
    pub fn worked_tile_count(&self, map: &TileMap) -> usize {
        self.worked_tiles(map).filter(|t| t.position != self.location).count()
    }

    pub fn free_population(&self, map: &TileMap) -> i32 {
        self.population.free_population(self.worked_tile_count(map))
    }

    /// Specialist capacity of the built buildings, per stat
    pub fn specialist_slots(&self, ruleset: &Ruleset) -> Stats {
        self.city_constructions
            .built_buildings
            .iter()
            .filter_map(|b| ruleset.building(b))
            .filter_map(|b| b.specialist_slots)
            .fold(Stats::default(), |total, slots| total + slots)
    }

    pub fn tile_stats(&self, tile: &TileInfo, civ: &CivContext<'_>) -> Stats {
        tile_stats(tile, civ.ruleset, civ, Some(&self.city_constructions))
    }

    fn rank(&self, tile: &TileInfo, civ: &CivContext<'_>) -> f32 {
        rank_tile(tile, &self.tile_stats(tile, civ))
    }

    pub fn update_city_stats(&mut self, civ: &CivContext<'_>, map: &TileMap) {
        self.city_stats = CityStats::compute(self, civ, map);
    }

    pub fn great_person_points(&self, civ: &CivContext<'_>) -> Stats {
        city_stats::great_person_points(self, civ)
    }

    // ---- population ----

    /// Puts an idle citizen on the best unworked tile of the city
    pub fn auto_assign_population(&mut self, civ: &CivContext<'_>, map: &mut TileMap) -> bool {
        let best = self
            .tiles
            .iter()
            .filter(|p| **p != self.location)
            .filter_map(|p| map.get(*p))
            .filter(|t| t.working_city.is_none())
            .map(|t| (t.position, self.rank(t, civ)))
            .max_by(|a, b| a.1.total_cmp(&b.1));
        let Some((position, _)) = best else {
            return false;
        };
        if let Some(tile) = map.get_mut(position) {
            tile.working_city = Some(self.name.clone());
        }
        self.city_stats.mark_dirty();
        true
    }

    pub fn assign_tile(&mut self, position: HexCoord, map: &mut TileMap) -> bool {
        if position == self.location || !self.tiles.contains(&position) || self.free_population(map) <= 0 {
            return false;
        }
        match map.get_mut(position) {
            Some(tile) if tile.working_city.is_none() => {
                tile.working_city = Some(self.name.clone());
                self.city_stats.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub fn unassign_tile(&mut self, position: HexCoord, map: &mut TileMap) -> bool {
        if position == self.location {
            return false;
        }
        match map.get_mut(position) {
            Some(tile) if tile.working_city.as_deref() == Some(self.name.as_str()) => {
                tile.working_city = None;
                self.city_stats.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub fn assign_specialist(&mut self, stat: Stat, ruleset: &Ruleset, map: &TileMap) -> bool {
        let slots = self.specialist_slots(ruleset).get(stat) as i32;
        if self.free_population(map) <= 0 || self.population.specialists.get(&stat) >= slots {
            return false;
        }
        self.population.specialists.add(stat, 1);
        self.city_stats.mark_dirty();
        true
    }

    pub fn unassign_specialist(&mut self, stat: Stat) -> bool {
        if self.population.specialists.get(&stat) <= 0 {
            return false;
        }
        self.population.specialists.add(stat, -1);
        self.city_stats.mark_dirty();
        true
    }

    /// Releases worked tiles (lowest ranked first) and then specialists until
    /// assignments fit the population again
    pub fn unassign_extra_population(&mut self, civ: &CivContext<'_>, map: &mut TileMap) {
        let mut excess = self.population.over_assignment(self.worked_tile_count(map));
        while excess > 0 {
            let worst = self
                .worked_tiles(map)
                .filter(|t| t.position != self.location)
                .map(|t| (t.position, self.rank(t, civ)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(position, _)| position);
            if let Some(position) = worst {
                if let Some(tile) = map.get_mut(position) {
                    tile.working_city = None;
                }
            } else {
                let first = self.population.specialists.iter().next().map(|(stat, _)| *stat);
                let Some(stat) = first else {
                    break;
                };
                self.population.specialists.add(stat, -1);
            }
            excess -= 1;
        }
        self.city_stats.mark_dirty();
    }

    // ---- turn ----

    /// Runs population, production and border growth on the cached stats
    pub fn next_turn(&mut self, civ: &CivContext<'_>, map: &mut TileMap, effects: &mut CityTurnEffects) -> Result<(), GameError> {
        let stats = self.city_stats.current;
        self.population_turn(stats.food.round() as i32, civ, map, effects);
        self.constructions_turn(stats.production.round() as i32, civ, map, effects)?;
        self.expansion_turn(stats.culture.round() as i32, civ, map);
        self.city_stats.mark_dirty();
        Ok(())
    }

    fn population_turn(&mut self, food: i32, civ: &CivContext<'_>, map: &mut TileMap, effects: &mut CityTurnEffects) {
        match self.population.next_turn(food) {
            PopulationChange::Starved => {
                self.unassign_extra_population(civ, map);
                effects.notify(format!("{} is starving!", self.name), Some(self.location));
            }
            PopulationChange::Starving => {
                effects.notify(format!("{} is starving!", self.name), Some(self.location));
            }
            PopulationChange::Grew => {
                self.auto_assign_population(civ, map);
                effects.notify(format!("{} has grown!", self.name), Some(self.location));
            }
            PopulationChange::Unchanged => {}
        }
    }

    fn current_construction<'r>(&self, ruleset: &'r Ruleset) -> Result<Construction<'r>, GameError> {
        let name = &self.city_constructions.current_construction;
        Construction::lookup(name, ruleset).ok_or_else(|| GameError::UnknownConstruction(name.clone()))
    }

    fn constructions_turn(
        &mut self,
        production: i32,
        civ: &CivContext<'_>,
        map: &mut TileMap,
        effects: &mut CityTurnEffects,
    ) -> Result<(), GameError> {
        let mut construction = self.current_construction(civ.ruleset)?;
        if !construction.is_buildable(self, civ, map) {
            effects.notify(
                format!("{} cannot continue work on {}", self.name, construction.name()),
                Some(self.location),
            );
            self.choose_next_construction(civ, map);
            construction = self.current_construction(civ.ruleset)?;
        }
        if construction.is_perpetual() {
            return Ok(());
        }

        self.city_constructions.add_production(production);
        let name = construction.name().to_string();
        let done = self.city_constructions.work_done(&name);
        let cost = construction.production_cost(civ);
        debug!(city = %self.name, construction = %name, done, cost, "production");
        if done < cost {
            return Ok(());
        }
        if !self.has_room_for(construction, map, civ.ruleset) {
            debug!(city = %self.name, construction = %name, "no room for new units, holding production");
            effects.notify(format!("No room to place the units of {name} near {}", self.name), Some(self.location));
            return Ok(());
        }

        self.city_constructions.in_progress_constructions.remove(&name);
        self.complete_construction(construction, civ, map, effects);
        self.choose_next_construction(civ, map);
        effects.notify(
            format!(
                "{name} has been built in {}; work has started on {}",
                self.name, self.city_constructions.current_construction
            ),
            Some(self.location),
        );
        Ok(())
    }

    fn expansion_turn(&mut self, culture: i32, civ: &CivContext<'_>, map: &mut TileMap) {
        let mut reductions = 0;
        let has_reduction_building = self
            .city_constructions
            .built_buildings
            .iter()
            .filter_map(|b| civ.ruleset.building(b))
            .any(|b| b.has_unique(uniques::NEW_TILE_COST_REDUCTION));
        if has_reduction_building {
            reductions += 1;
        }
        if civ.adopted_policies.contains(policies::TRADITION) {
            reductions += 1;
        }
        let Some(cost) = self.expansion.add_culture(culture, reductions) else {
            return;
        };
        if let Some(position) = self.choose_new_tile(civ, map) {
            self.expansion.claim(cost);
            self.claim_tile(position, map);
            debug!(city = %self.name, %position, "borders expanded");
        }
    }

    /// Best unowned tile in the first search radius that has one
    fn choose_new_tile(&self, civ: &CivContext<'_>, map: &TileMap) -> Option<HexCoord> {
        EXPANSION_RADII.iter().find_map(|radius| {
            map.tiles_in_distance(self.location, *radius)
                .into_iter()
                .filter(|t| t.owner.is_none())
                .map(|t| (t.position, self.rank(t, civ)))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(position, _)| position)
        })
    }

    // ---- constructions ----

    /// Cheapest buildable regular building, or a Worker when none is left
    pub fn choose_next_construction(&mut self, civ: &CivContext<'_>, map: &TileMap) {
        let next = civ
            .ruleset
            .buildings
            .values()
            .filter(|b| !b.is_wonder)
            .map(Construction::Building)
            .filter(|c| c.is_buildable(self, civ, map))
            .min_by_key(|c| (c.production_cost(civ), c.name().to_string()))
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| WORKER.to_string());
        debug!(city = %self.name, construction = %next, "next construction chosen");
        self.city_constructions.current_construction = next;
        self.city_stats.mark_dirty();
    }

    pub fn set_construction(&mut self, name: &str, civ: &CivContext<'_>, map: &TileMap) -> Result<bool, GameError> {
        let construction =
            Construction::lookup(name, civ.ruleset).ok_or_else(|| GameError::UnknownConstruction(name.to_string()))?;
        if !construction.is_buildable(self, civ, map) {
            warn!(city = %self.name, construction = name, "construction is not buildable");
            return Ok(false);
        }
        self.city_constructions.current_construction = name.to_string();
        self.city_stats.mark_dirty();
        Ok(true)
    }

    /// Buys `name` outright. Advances the queue if it was the current construction.
    pub fn purchase_construction(
        &mut self,
        name: &str,
        gold: &mut i32,
        civ: &CivContext<'_>,
        map: &mut TileMap,
        effects: &mut CityTurnEffects,
    ) -> Result<bool, GameError> {
        let construction =
            Construction::lookup(name, civ.ruleset).ok_or_else(|| GameError::UnknownConstruction(name.to_string()))?;
        let Some(cost) = construction.gold_cost(civ) else {
            return Ok(false);
        };
        let fulfillable = construction.is_buildable(self, civ, map) && self.has_room_for(construction, map, civ.ruleset);
        if *gold < cost || !fulfillable {
            warn!(city = %self.name, construction = name, cost, gold = *gold, "purchase rejected");
            return Ok(false);
        }
        *gold -= cost;
        self.city_constructions.in_progress_constructions.remove(name);
        self.complete_construction(construction, civ, map, effects);
        if self.city_constructions.current_construction == name {
            self.choose_next_construction(civ, map);
        }
        effects.notify(format!("{name} has been purchased in {}", self.name), Some(self.location));
        self.city_stats.mark_dirty();
        Ok(true)
    }

    fn complete_construction(
        &mut self,
        construction: Construction<'_>,
        civ: &CivContext<'_>,
        map: &mut TileMap,
        effects: &mut CityTurnEffects,
    ) {
        match construction {
            Construction::Building(building) => {
                let built = &mut self.city_constructions.built_buildings;
                built.insert(building.name.clone());
                if let Some(free) = &building.provides_free_building {
                    built.insert(free.clone());
                }
                effects.free_techs += building.free_techs;
                if building.has_unique(uniques::ENTER_GOLDEN_AGE) {
                    effects.golden_ages += 1;
                }
                if building.has_unique(uniques::FREE_SOCIAL_POLICY) {
                    effects.free_policies += 1;
                }
                if building.has_unique(uniques::FREE_GREAT_SCIENTIST) {
                    self.spawn_unit(GREAT_SCIENTIST, civ.ruleset, map);
                }
                if building.has_unique(uniques::FREE_GREAT_ARTIST) {
                    self.spawn_unit(GREAT_ARTIST, civ.ruleset, map);
                }
                if building.has_unique(uniques::TWO_FREE_WORKERS) {
                    self.spawn_unit(WORKER, civ.ruleset, map);
                    self.spawn_unit(WORKER, civ.ruleset, map);
                }
            }
            Construction::Unit(unit) => {
                self.spawn_unit(&unit.name, civ.ruleset, map);
            }
            Construction::Perpetual(_) => {}
        }
        self.city_stats.mark_dirty();
    }

    /// Units a construction places on the map when it completes
    fn units_granted(construction: Construction<'_>) -> usize {
        match construction {
            Construction::Building(building) => {
                let mut units = 0;
                if building.has_unique(uniques::FREE_GREAT_SCIENTIST) {
                    units += 1;
                }
                if building.has_unique(uniques::FREE_GREAT_ARTIST) {
                    units += 1;
                }
                if building.has_unique(uniques::TWO_FREE_WORKERS) {
                    units += 2;
                }
                units
            }
            Construction::Unit(_) => 1,
            Construction::Perpetual(_) => 0,
        }
    }

    /// Whether every unit the construction grants fits near the centre
    pub fn has_room_for(&self, construction: Construction<'_>, map: &TileMap, ruleset: &Ruleset) -> bool {
        let needed = Self::units_granted(construction);
        needed == 0 || map.free_tiles_near(self.location, ruleset).len() >= needed
    }

    /// Places a new unit of this city's civilization near the centre
    pub fn spawn_unit(&self, name: &str, ruleset: &Ruleset, map: &mut TileMap) -> Option<HexCoord> {
        let unit = ruleset.unit(name)?;
        let placed = map.place_unit_near_tile(self.location, MapUnit::new(name, &self.civ_name, unit.movement), ruleset);
        if placed.is_none() {
            warn!(city = %self.name, unit = name, "no free tile for new unit");
        }
        placed
    }

    /// Grants the cheapest culture building this city lacks and can house
    pub fn add_free_culture_building(&mut self, ruleset: &Ruleset) -> Option<&'static str> {
        let built = &self.city_constructions.built_buildings;
        let building = CULTURE_BUILDINGS.into_iter().find(|name| {
            !built.contains(*name)
                && ruleset
                    .building(name)
                    .is_some_and(|b| b.required_building.as_ref().map_or(true, |r| built.contains(r)))
        })?;
        self.city_constructions.built_buildings.insert(building.to_string());
        self.city_stats.mark_dirty();
        Some(building)
    }

    /// Adds production straight to the current construction's ledger
    pub fn add_production(&mut self, production: i32) {
        self.city_constructions.add_production(production);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestGame;

    #[test]
    fn test_found_claims_ring_and_center() {
        let game = TestGame::new();
        let city = game.city();
        assert_eq!(city.tiles.len(), 7);
        let center = game.game.tile_map.get(city.location).unwrap();
        assert!(center.is_city_center());
        assert!(center.has_road());
        assert_eq!(center.working_city.as_deref(), Some(city.name.as_str()));
        assert_eq!(city.worked_tile_count(&game.game.tile_map), 1);
        assert_eq!(city.free_population(&game.game.tile_map), 0);
    }

    #[test]
    fn test_growth_assigns_a_tile() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.population.food_stored = 14;
        let mut effects = CityTurnEffects::default();
        city.population_turn(1, &ctx, map, &mut effects);
        assert_eq!(city.population.population, 2);
        assert_eq!(city.worked_tile_count(map), 2);
        assert_eq!(effects.notifications.len(), 1);
    }

    #[test]
    fn test_starvation_releases_a_tile() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.population.population = 2;
        city.auto_assign_population(&ctx, map);
        assert_eq!(city.worked_tile_count(map), 2);
        city.population.food_stored = 5;
        let mut effects = CityTurnEffects::default();
        city.population_turn(-10, &ctx, map, &mut effects);
        assert_eq!(city.population.population, 1);
        assert_eq!(city.population.food_stored, 0);
        assert_eq!(city.worked_tile_count(map), 1);
        assert_eq!(city.free_population(map), 0);
    }

    #[test]
    fn test_tile_assignment_needs_free_population() {
        let mut game = TestGame::new();
        let (city, map) = game.city_and_map();
        let worked: Vec<HexCoord> = city.worked_tiles(map).map(|t| t.position).filter(|p| *p != city.location).collect();
        let spare = city.tiles.iter().copied().find(|p| *p != city.location && !worked.contains(p)).unwrap();
        assert!(!city.assign_tile(spare, map));
        assert!(!city.unassign_tile(city.location, map));
        assert!(city.unassign_tile(worked[0], map));
        assert!(city.assign_tile(spare, map));
        assert_eq!(city.free_population(map), 0);
    }

    #[test]
    fn test_specialists_need_slots() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let (city, map) = game.city_and_map();
        let worked = city.worked_tiles(map).map(|t| t.position).find(|p| *p != city.location).unwrap();
        city.unassign_tile(worked, map);
        assert!(!city.assign_specialist(Stat::Science, &ruleset, map));
        city.city_constructions.built_buildings.insert("Library".into());
        assert!(city.assign_specialist(Stat::Science, &ruleset, map));
        assert_eq!(city.free_population(map), 0);
        assert!(city.unassign_specialist(Stat::Science));
        assert!(!city.unassign_specialist(Stat::Science));
    }

    #[test]
    fn test_construction_completes_and_queue_advances() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.set_construction("Monument", &ctx, map).unwrap();
        let mut effects = CityTurnEffects::default();
        city.constructions_turn(39, &ctx, map, &mut effects).unwrap();
        assert!(!city.city_constructions.is_built("Monument"));
        city.constructions_turn(1, &ctx, map, &mut effects).unwrap();
        assert!(city.city_constructions.is_built("Monument"));
        assert_eq!(city.city_constructions.work_done("Monument"), 0);
        assert_ne!(city.city_constructions.current_construction, "Monument");
        assert_eq!(effects.notifications.len(), 1);
    }

    #[test]
    fn test_unknown_construction_fails_fast() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        assert!(matches!(city.set_construction("Moon Base", &ctx, map), Err(GameError::UnknownConstruction(_))));
        city.city_constructions.current_construction = "Moon Base".into();
        let mut effects = CityTurnEffects::default();
        assert!(city.next_turn(&ctx, map, &mut effects).is_err());
    }

    #[test]
    fn test_unit_completion_spawns_near_city() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        let cost = ctx.ruleset.unit(WORKER).unwrap().cost;
        let mut effects = CityTurnEffects::default();
        city.constructions_turn(cost, &ctx, map, &mut effects).unwrap();
        let workers = map.tiles().filter(|t| t.unit.as_ref().is_some_and(|u| u.name == WORKER)).count();
        assert_eq!(workers, 1);
    }

    #[test]
    fn test_purchase() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.set_construction("Monument", &ctx, map).unwrap();
        let mut effects = CityTurnEffects::default();
        let mut gold = 10;
        assert!(!city.purchase_construction("Monument", &mut gold, &ctx, map, &mut effects).unwrap());
        assert_eq!(gold, 10);
        let cost = Construction::lookup("Monument", ctx.ruleset).unwrap().gold_cost(&ctx).unwrap();
        gold = cost + 5;
        assert!(city.purchase_construction("Monument", &mut gold, &ctx, map, &mut effects).unwrap());
        assert_eq!(gold, 5);
        assert!(city.city_constructions.is_built("Monument"));
        assert_ne!(city.city_constructions.current_construction, "Monument");
    }

    #[test]
    fn test_borders_grow_when_culture_suffices() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.expansion_turn(9, &ctx, map);
        assert_eq!(city.tiles.len(), 7);
        city.expansion_turn(1, &ctx, map);
        assert_eq!(city.tiles.len(), 8);
        assert_eq!(city.expansion.culture_stored, 0);
        let new_tile = city.tiles.iter().find(|p| p.distance(city.location) == 2).unwrap();
        assert_eq!(map.get(*new_tile).unwrap().owning_city.as_deref(), Some(city.name.as_str()));
    }

    fn crowd_around(map: &mut TileMap, location: HexCoord) {
        let positions: Vec<HexCoord> = map.tiles_in_distance(location, 3).iter().map(|t| t.position).collect();
        for position in positions {
            map.get_mut(position).unwrap().unit = Some(MapUnit::new("Warrior", "Rome", 2));
        }
    }

    #[test]
    fn test_purchase_without_room_is_rejected() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        crowd_around(map, city.location);
        let mut gold = 1000;
        let mut effects = CityTurnEffects::default();
        assert!(!city.purchase_construction(WORKER, &mut gold, &ctx, map, &mut effects).unwrap());
        assert_eq!(gold, 1000);
        assert_eq!(city.city_constructions.current_construction, WORKER);
        assert!(effects.notifications.is_empty());
    }

    #[test]
    fn test_unit_completion_waits_for_room() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        crowd_around(map, city.location);
        let cost = ctx.ruleset.unit(WORKER).unwrap().cost;
        let mut effects = CityTurnEffects::default();
        city.constructions_turn(cost, &ctx, map, &mut effects).unwrap();
        assert_eq!(city.city_constructions.work_done(WORKER), cost);
        assert_eq!(city.city_constructions.current_construction, WORKER);

        let freed = HexCoord::new(3, 0);
        map.get_mut(freed).unwrap().unit = None;
        city.constructions_turn(0, &ctx, map, &mut effects).unwrap();
        assert_eq!(map.get(freed).unwrap().unit.as_ref().map(|u| u.name.as_str()), Some(WORKER));
        assert_eq!(city.city_constructions.work_done(WORKER), 0);
    }

    #[test]
    fn test_over_assignment_drops_tiles_before_specialists() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        city.population.specialists.add(Stat::Science, 1);
        city.unassign_extra_population(&ctx, map);
        assert_eq!(city.worked_tile_count(map), 0);
        assert_eq!(city.population.number_of_specialists(), 1);

        city.population.specialists.add(Stat::Gold, 1);
        city.unassign_extra_population(&ctx, map);
        assert_eq!(city.population.number_of_specialists(), 1);
        assert_eq!(city.free_population(map), 0);
    }

    #[test]
    fn test_single_citizen_city_reports_starvation() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let ctx = game.context_in(&ruleset);
        let (city, map) = game.city_and_map();
        let mut effects = CityTurnEffects::default();
        city.population_turn(-3, &ctx, map, &mut effects);
        assert_eq!(city.population.population, 1);
        assert_eq!(city.worked_tile_count(map), 1);
        assert_eq!(effects.notifications.len(), 1);
        assert!(effects.notifications[0].text.contains("starving"));
    }
}
