use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use map::visibility::viewable_tiles;
use map::pathfinding::MovementContext;
use map::{HexCoord, RoadStatus, TileMap, UnitAction};
use rules::constants::{policies, techs, uniques, PALACE, SETTLER, WORKER};
use rules::{Ruleset, Stat, Stats};

use crate::city::city_stats::city_happiness;
use crate::city::{CityInfo, CityTurnEffects};
use crate::civilization::{CivContext, GoldenAgeManager, GreatPersonManager, Notification, PolicyManager, TechManager};
use crate::error::GameError;
use crate::units::{end_turn_units, great_person_action, head_towards, GreatPersonAction};

const BASE_HAPPINESS: i32 = 15;
const UNIT_SIGHT: i32 = 2;
const CITY_SIGHT: i32 = 3;
/// Cities closer than this to a resource are named in its reveal notification
const RESOURCE_NOTIFICATION_RANGE: i32 = 4;

const CITY_NAMES: [&str; 12] = [
    "Rome", "Antium", "Cumae", "Neapolis", "Ravenna", "Arretium", "Mediolanum", "Arpinum", "Circei", "Setia",
    "Satricum", "Ardea",
];

/// A civilization: its cities, treasury and the four empire-wide managers
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CivilizationInfo {
    pub civ_name: String,
    pub gold: i32,
    /// Happiness as of the last stats update
    pub happiness: i32,
    pub cities: Vec<CityInfo>,
    /// Cities ever founded; drives city naming
    pub cities_created: usize,
    pub tech: TechManager,
    pub policies: PolicyManager,
    pub golden_ages: GoldenAgeManager,
    pub great_people: GreatPersonManager,
    /// Cleared at the start of every turn
    pub notifications: Vec<Notification>,
    pub explored_tiles: BTreeSet<HexCoord>,
}

impl CivilizationInfo {
    pub fn new(civ_name: &str) -> Self {
        Self {
            civ_name: civ_name.to_string(),
            gold: 0,
            happiness: BASE_HAPPINESS,
            cities: Vec::new(),
            cities_created: 0,
            tech: TechManager::new(),
            policies: PolicyManager::new(),
            golden_ages: GoldenAgeManager::new(),
            great_people: GreatPersonManager::new(),
            notifications: Vec::new(),
            explored_tiles: BTreeSet::new(),
        }
    }

    /// Snapshot of this civilization for city and unit computations
    pub fn context<'r>(&self, ruleset: &'r Ruleset, map: &TileMap, foreign_wonders: &BTreeSet<String>) -> CivContext<'r> {
        CivContext::new(
            ruleset,
            &self.civ_name,
            &self.tech.techs_researched,
            &self.policies.adopted_policies,
            self.golden_ages.is_golden_age(),
            self.happiness,
            &self.cities,
            map,
            foreign_wonders,
        )
    }

    pub fn notify(&mut self, text: impl Into<String>, location: Option<HexCoord>) {
        self.notifications.push(Notification::new(text, location));
    }

    pub fn capital(&self) -> Option<&CityInfo> {
        self.cities.iter().find(|c| c.is_capital())
    }

    pub fn city_index(&self, name: &str) -> Result<usize, GameError> {
        self.cities
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| GameError::UnknownCity(name.to_string()))
    }

    /// World wonders standing in this civilization's cities
    pub fn built_world_wonders(&self, ruleset: &Ruleset) -> BTreeSet<String> {
        self.cities
            .iter()
            .flat_map(|c| c.city_constructions.built_buildings.iter())
            .filter(|b| ruleset.building(b).is_some_and(|b| b.is_wonder && !b.is_national_wonder()))
            .cloned()
            .collect()
    }

    fn has_building_unique(&self, ruleset: &Ruleset, unique: &str) -> bool {
        self.cities
            .iter()
            .flat_map(|c| c.city_constructions.built_buildings.iter())
            .filter_map(|b| ruleset.building(b))
            .any(|b| b.has_unique(unique))
    }

    pub fn culture_needed_for_next_policy(&self, ruleset: &Ruleset) -> i32 {
        let reduction = self.has_building_unique(ruleset, uniques::POLICY_COST_REDUCTION);
        self.policies.culture_needed_for_next_policy(ruleset, self.cities.len(), reduction)
    }

    fn golden_age_length_multiplier(&self, ruleset: &Ruleset) -> f32 {
        let mut multiplier = 1.0;
        if self.has_building_unique(ruleset, uniques::GOLDEN_AGE_LENGTH_INCREASE) {
            multiplier *= 1.5;
        }
        if self.policies.is_adopted(policies::FREEDOM_COMPLETE) {
            multiplier *= 1.5;
        }
        multiplier
    }

    fn enter_golden_age(&mut self, ruleset: &Ruleset) {
        let multiplier = self.golden_age_length_multiplier(ruleset);
        self.golden_ages.enter_golden_age(multiplier);
        self.notify("You have entered a golden age!", None);
    }

    // ---- stats ----

    /// Empire happiness from luxuries, cities and policies
    fn happiness_for_next_turn(&self, ctx: &CivContext<'_>, map: &TileMap) -> i32 {
        let per_luxury = if self.policies.is_adopted(policies::PROTECTIONISM) { 6 } else { 5 };
        let mut happiness = BASE_HAPPINESS + per_luxury * ctx.luxury_count() as i32;
        happiness += self.cities.iter().map(|c| city_happiness(c, ctx, map) as i32).sum::<i32>();
        if ctx.has_building_unique(uniques::HAPPINESS_PER_SOCIAL_POLICY) {
            happiness += self.policies.number_of_adopted_policies(ctx.ruleset) as i32;
        }
        happiness
    }

    /// Recomputes happiness and then every city's cached stats
    pub fn update_stats(&mut self, ruleset: &Ruleset, map: &TileMap, foreign_wonders: &BTreeSet<String>) {
        let ctx = self.context(ruleset, map, foreign_wonders);
        self.happiness = self.happiness_for_next_turn(&ctx, map);
        let ctx = self.context(ruleset, map, foreign_wonders);
        for city in &mut self.cities {
            city.update_city_stats(&ctx, map);
        }
    }

    /// Gold spent each turn on roads outside city centres
    fn road_upkeep(&self, map: &TileMap) -> f32 {
        let upkeep: i32 = map
            .tiles()
            .filter(|t| t.owner.as_deref() == Some(self.civ_name.as_str()) && !t.is_city_center())
            .map(|t| match t.road_status {
                RoadStatus::None => 0,
                RoadStatus::Road => 1,
                RoadStatus::Railroad => 2,
            })
            .sum();
        let mut upkeep = upkeep as f32;
        if self.policies.is_adopted(policies::TRADE_UNIONS) {
            upkeep *= 2.0 / 3.0;
        }
        upkeep
    }

    /// Sum of the cities' cached stats plus empire-wide adjustments
    pub fn stats_for_next_turn(&self, map: &TileMap) -> Stats {
        let mut stats = self.cities.iter().fold(Stats::default(), |total, c| total + c.city_stats.current);
        stats.gold -= self.road_upkeep(map);
        if self.policies.is_adopted(policies::MANDATE_OF_HEAVEN) {
            stats.culture += (self.happiness / 2).max(0) as f32;
        }
        stats.happiness = self.happiness as f32;
        stats
    }

    // ---- turn ----

    /// Runs this civilization's turn in its fixed order
    pub fn next_turn(&mut self, ruleset: &Ruleset, map: &mut TileMap, foreign_wonders: &BTreeSet<String>) -> Result<(), GameError> {
        self.notifications.clear();
        if self.cities.iter().any(|c| c.city_stats.is_dirty()) {
            debug!(civ = %self.civ_name, "refreshing stale city stats");
            self.update_stats(ruleset, map, foreign_wonders);
        }

        let stats = self.stats_for_next_turn(map);
        self.gold += stats.gold as i32;

        let culture_needed = self.culture_needed_for_next_policy(ruleset);
        let picker_was_open = self.policies.should_open_policy_picker;
        self.policies.add_culture(stats.culture as i32, culture_needed);
        if self.policies.should_open_policy_picker && !picker_was_open {
            self.notify("You can now adopt a new social policy!", None);
        }

        if let Some(tech) = self.tech.next_turn(stats.science as i32, ruleset) {
            self.on_tech_researched(&tech, ruleset, map);
        }

        for index in 0..self.cities.len() {
            let ctx = self.context(ruleset, map, foreign_wonders);
            let mut effects = CityTurnEffects::default();
            self.cities[index].next_turn(&ctx, map, &mut effects)?;
            self.apply_city_effects(effects, ruleset);
        }

        let ctx = self.context(ruleset, map, foreign_wonders);
        let points = self.cities.iter().fold(Stats::default(), |total, c| total + c.great_person_points(&ctx));
        self.great_people.add_great_person_points(points);
        if let Some(person) = self.great_people.next_great_person() {
            if let Some(location) = self.place_near_capital(person, ruleset, map) {
                self.great_people.get_new_great_person();
                self.notify(format!("A {person} has been born!"), Some(location));
            } else {
                debug!(civ = %self.civ_name, person, "no room near the capital, great person points kept");
            }
        }

        end_turn_units(&ctx, map);

        let multiplier = self.golden_age_length_multiplier(ruleset);
        if self.golden_ages.end_turn(self.happiness, self.cities.len(), multiplier) {
            self.notify("You have entered a golden age!", None);
        }

        self.update_explored_tiles(ruleset, map);
        self.update_stats(ruleset, map, foreign_wonders);
        info!(
            civ = %self.civ_name,
            gold = self.gold,
            happiness = self.happiness,
            science = stats.science,
            culture = stats.culture,
            cities = self.cities.len(),
            "turn processed"
        );
        Ok(())
    }

    fn apply_city_effects(&mut self, effects: CityTurnEffects, ruleset: &Ruleset) {
        self.tech.free_techs += effects.free_techs;
        self.policies.free_policies += effects.free_policies;
        self.notifications.extend(effects.notifications);
        for _ in 0..effects.golden_ages {
            self.enter_golden_age(ruleset);
        }
    }

    fn on_tech_researched(&mut self, tech: &str, ruleset: &Ruleset, map: &mut TileMap) {
        info!(civ = %self.civ_name, tech, "research completed");
        self.notify(format!("Research of {tech} has completed!"), None);

        if tech == techs::RAILROAD {
            for city in &self.cities {
                if let Some(center) = map.get_mut(city.location) {
                    center.road_status = RoadStatus::Railroad;
                }
            }
        }

        let revealed = ruleset.tile_resources.values().filter(|r| r.revealed_by.as_deref() == Some(tech));
        let mut reveals = Vec::new();
        for resource in revealed {
            let found = map
                .tiles()
                .filter(|t| t.owner.as_deref() == Some(self.civ_name.as_str()))
                .filter(|t| t.resource.as_deref() == Some(resource.name.as_str()))
                .find_map(|t| {
                    self.cities
                        .iter()
                        .filter(|c| c.location.distance(t.position) <= RESOURCE_NOTIFICATION_RANGE)
                        .min_by_key(|c| c.location.distance(t.position))
                        .map(|c| (t.position, c.name.clone()))
                });
            if let Some((position, city)) = found {
                reveals.push((format!("{} revealed near {city}", resource.name), position));
            }
        }
        for (text, position) in reveals {
            self.notify(text, Some(position));
        }
    }

    /// Records every tile currently seen by this civilization's units and cities
    pub fn update_explored_tiles(&mut self, ruleset: &Ruleset, map: &TileMap) {
        let units = map
            .tiles()
            .filter(|t| t.unit.as_ref().is_some_and(|u| u.owner == self.civ_name))
            .map(|t| (t.position, UNIT_SIGHT));
        let cities = self.cities.iter().map(|c| (c.location, CITY_SIGHT));
        let seen: Vec<(HexCoord, i32)> = units.chain(cities).collect();
        for (origin, sight) in seen {
            self.explored_tiles.extend(viewable_tiles(map, ruleset, origin, sight));
        }
    }

    fn place_near_capital(&self, unit: &str, ruleset: &Ruleset, map: &mut TileMap) -> Option<HexCoord> {
        let capital = self.capital()?;
        capital.spawn_unit(unit, ruleset, map)
    }

    // ---- commands ----

    fn next_city_name(&mut self) -> String {
        let base = CITY_NAMES[self.cities_created % CITY_NAMES.len()];
        let prefix = match self.cities_created / CITY_NAMES.len() {
            0 => "",
            1 => "New ",
            _ => "Neo ",
        };
        self.cities_created += 1;
        format!("{prefix}{base}")
    }

    /// Founds a city with the Settler standing on `location`
    pub fn found_city(
        &mut self,
        location: HexCoord,
        ruleset: &Ruleset,
        map: &mut TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> bool {
        let Some(tile) = map.get(location) else {
            return false;
        };
        let has_settler = tile
            .unit
            .as_ref()
            .is_some_and(|u| u.owner == self.civ_name && ruleset.unit(&u.name).is_some_and(|b| b.founds_city()));
        let foreign_owner = tile.owner.as_ref().is_some_and(|o| *o != self.civ_name);
        let too_close = map.tiles_in_distance(location, 2).iter().any(|t| t.is_city_center());
        if !has_settler || !tile.is_passable(ruleset) || foreign_owner || too_close {
            warn!(civ = %self.civ_name, %location, "cannot found a city here");
            return false;
        }
        let previous_city = tile.owning_city.clone();
        let was_worked = previous_city.is_some() && tile.working_city == previous_city;
        if let Some(tile) = map.get_mut(location) {
            tile.unit = None;
        }

        let name = self.next_city_name();
        let railroad = self.tech.is_researched(techs::RAILROAD);
        let mut city = CityInfo::found(&name, location, &self.civ_name, railroad, map);
        let first = self.cities.is_empty();
        if first {
            city.city_constructions.built_buildings.insert(PALACE.to_string());
            city.city_constructions.current_construction = WORKER.to_string();
        }
        self.cities.push(city);
        let index = self.cities.len() - 1;

        let ctx = self.context(ruleset, map, foreign_wonders);
        if let Some(previous) = previous_city.and_then(|n| self.city_index(&n).ok()) {
            let old_city = &mut self.cities[previous];
            old_city.release_tile(location);
            if was_worked {
                old_city.auto_assign_population(&ctx, map);
            }
        }
        if !first {
            self.cities[index].choose_next_construction(&ctx, map);
        }
        if self.policies.is_adopted(policies::LEGALISM) && self.cities.len() <= 4 {
            self.cities[index].add_free_culture_building(ruleset);
        }
        self.cities[index].auto_assign_population(&ctx, map);
        self.notify(format!("{name} has been founded!"), Some(location));
        self.update_explored_tiles(ruleset, map);
        self.update_stats(ruleset, map, foreign_wonders);
        true
    }

    pub fn set_construction(
        &mut self,
        city: &str,
        construction: &str,
        ruleset: &Ruleset,
        map: &TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let ctx = self.context(ruleset, map, foreign_wonders);
        let changed = self.cities[index].set_construction(construction, &ctx, map)?;
        if changed {
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(changed)
    }

    /// Rush-buys the city's current construction
    pub fn purchase_construction(
        &mut self,
        city: &str,
        ruleset: &Ruleset,
        map: &mut TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let ctx = self.context(ruleset, map, foreign_wonders);
        let mut effects = CityTurnEffects::default();
        let name = self.cities[index].city_constructions.current_construction.clone();
        let mut gold = self.gold;
        let bought = self.cities[index].purchase_construction(&name, &mut gold, &ctx, map, &mut effects)?;
        self.gold = gold;
        if bought {
            self.apply_city_effects(effects, ruleset);
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(bought)
    }

    pub fn queue_technology(&mut self, tech: &str, ruleset: &Ruleset) -> Result<bool, GameError> {
        self.tech.queue_technology(tech, ruleset)
    }

    pub fn get_free_technology(&mut self, tech: &str, ruleset: &Ruleset, map: &mut TileMap) -> Result<bool, GameError> {
        let granted = self.tech.get_free_technology(tech, ruleset)?;
        if granted {
            self.on_tech_researched(tech, ruleset, map);
        }
        Ok(granted)
    }

    /// Adopts a policy and applies the one-shot effects of everything it
    /// adopted, a completed branch included
    pub fn adopt_policy(
        &mut self,
        policy: &str,
        ruleset: &Ruleset,
        map: &mut TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> Result<bool, GameError> {
        let culture_needed = self.culture_needed_for_next_policy(ruleset);
        let adopted = self.policies.adopt(policy, ruleset, culture_needed)?;
        if adopted.is_empty() {
            warn!(civ = %self.civ_name, policy, "policy cannot be adopted");
            return Ok(false);
        }
        for name in &adopted {
            info!(civ = %self.civ_name, policy = %name, "policy adopted");
            self.apply_policy_effects(name, ruleset, map);
        }
        self.update_stats(ruleset, map, foreign_wonders);
        Ok(true)
    }

    fn apply_policy_effects(&mut self, policy: &str, ruleset: &Ruleset, map: &mut TileMap) {
        match policy {
            policies::COLLECTIVE_RULE => {
                self.place_near_capital(SETTLER, ruleset, map);
            }
            policies::CITIZENSHIP => {
                self.place_near_capital(WORKER, ruleset, map);
            }
            policies::REPRESENTATION | policies::REFORMATION => self.enter_golden_age(ruleset),
            policies::SCIENTIFIC_REVOLUTION => self.tech.free_techs += 2,
            policies::LEGALISM => {
                for city in self.cities.iter_mut().take(4) {
                    city.add_free_culture_building(ruleset);
                }
            }
            policies::FREE_RELIGION => self.policies.free_policies += 1,
            policies::LIBERTY_COMPLETE => {
                let person = self.great_people.most_promising_great_person();
                if let Some(location) = self.place_near_capital(person, ruleset, map) {
                    self.notify(format!("A {person} has been born!"), Some(location));
                }
            }
            _ => {}
        }
    }

    /// Expends the great person standing on `position`
    pub fn use_great_person(
        &mut self,
        position: HexCoord,
        ruleset: &Ruleset,
        map: &mut TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> Result<bool, GameError> {
        let Some(tile) = map.get(position) else {
            return Ok(false);
        };
        let Some(unit) = tile.unit.as_ref().filter(|u| u.owner == self.civ_name) else {
            return Ok(false);
        };
        let Some(action) = great_person_action(&unit.name) else {
            return Ok(false);
        };
        let owning_city = tile.owning_city.clone().filter(|_| tile.owner.as_deref() == Some(self.civ_name.as_str()));

        match action {
            GreatPersonAction::FreeTechnology => self.tech.free_techs += 1,
            GreatPersonAction::HurryProduction(production) => {
                let Some(city) = owning_city else {
                    return Ok(false);
                };
                let index = self.city_index(&city)?;
                self.cities[index].add_production(production);
            }
            GreatPersonAction::GoldenAge => self.enter_golden_age(ruleset),
            GreatPersonAction::Gold(gold) => self.gold += gold,
        }
        if let Some(tile) = map.get_mut(position) {
            tile.unit = None;
        }
        self.update_stats(ruleset, map, foreign_wonders);
        Ok(true)
    }

    fn owns_unit_at(&self, map: &TileMap, position: HexCoord) -> bool {
        map.get(position)
            .and_then(|t| t.unit.as_ref())
            .is_some_and(|u| u.owner == self.civ_name)
    }

    /// Orders the unit at `position` towards `destination` and spends this
    /// turn's movement on the way. Returns where the unit stands afterwards.
    pub fn move_unit_to(&mut self, position: HexCoord, destination: HexCoord, ruleset: &Ruleset, map: &mut TileMap) -> HexCoord {
        if !self.owns_unit_at(map, position) || !map.contains(destination) {
            warn!(civ = %self.civ_name, %position, %destination, "invalid move order");
            return position;
        }
        if let Some(unit) = map.get_mut(position).and_then(|t| t.unit.as_mut()) {
            unit.action = Some(UnitAction::MoveTo(destination));
        }
        let movement = MovementContext { civ: &self.civ_name, improved_roads: self.tech.is_researched(techs::MACHINERY) };
        let reached = head_towards(map, ruleset, position, destination, movement);
        if reached == destination {
            if let Some(unit) = map.get_mut(reached).and_then(|t| t.unit.as_mut()) {
                unit.action = None;
            }
        }
        self.update_explored_tiles(ruleset, map);
        reached
    }

    /// Toggles automation for a unit that can build improvements
    pub fn set_unit_automated(&mut self, position: HexCoord, automated: bool, ruleset: &Ruleset, map: &mut TileMap) -> bool {
        if !self.owns_unit_at(map, position) {
            return false;
        }
        let Some(unit) = map.get_mut(position).and_then(|t| t.unit.as_mut()) else {
            return false;
        };
        if automated && !ruleset.unit(&unit.name).is_some_and(|u| u.can_build_improvements()) {
            warn!(civ = %self.civ_name, unit = %unit.name, "only workers can be automated");
            return false;
        }
        unit.action = automated.then_some(UnitAction::Automate);
        true
    }

    pub fn assign_specialist(&mut self, city: &str, stat: Stat, ruleset: &Ruleset, map: &TileMap, foreign_wonders: &BTreeSet<String>) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let assigned = self.cities[index].assign_specialist(stat, ruleset, map);
        if assigned {
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(assigned)
    }

    pub fn unassign_specialist(&mut self, city: &str, stat: Stat, ruleset: &Ruleset, map: &TileMap, foreign_wonders: &BTreeSet<String>) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let unassigned = self.cities[index].unassign_specialist(stat);
        if unassigned {
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(unassigned)
    }

    pub fn assign_tile(&mut self, city: &str, position: HexCoord, ruleset: &Ruleset, map: &mut TileMap, foreign_wonders: &BTreeSet<String>) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let assigned = self.cities[index].assign_tile(position, map);
        if assigned {
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(assigned)
    }

    pub fn unassign_tile(&mut self, city: &str, position: HexCoord, ruleset: &Ruleset, map: &mut TileMap, foreign_wonders: &BTreeSet<String>) -> Result<bool, GameError> {
        let index = self.city_index(city)?;
        let unassigned = self.cities[index].unassign_tile(position, map);
        if unassigned {
            self.update_stats(ruleset, map, foreign_wonders);
        }
        Ok(unassigned)
    }
}
