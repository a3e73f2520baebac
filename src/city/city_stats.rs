//! Per-turn yields of a city.
//!
//! Gathering (what applies to this city) is kept apart from the ordered
//! arithmetic in [`StatPipeline::run`] so the order can be tested on its own.

use map::tile_stats::tile_stats;
use map::{CivView, RoadStatus, TileMap};
use rules::constants::{policies, techs, uniques, MARBLE, SCHOLARLY_BUILDINGS, SETTLER, TEMPLE};
use rules::{Stat, Stats};

use crate::city::construction::{Construction, PerpetualConstruction};
use crate::city::CityInfo;
use crate::civilization::CivContext;

/// Cached result of the last stats computation
#[derive(Clone, Debug, PartialEq)]
pub struct CityStats {
    pub current: Stats,
    pub happiness: f32,
    dirty: bool,
}

impl Default for CityStats {
    fn default() -> Self {
        Self { current: Stats::default(), happiness: 0.0, dirty: true }
    }
}

impl CityStats {
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the cache for recomputation
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn compute(city: &CityInfo, civ: &CivContext<'_>, map: &TileMap) -> Self {
        let mut current = StatPipeline::gather(city, civ, map).run();
        if city.city_constructions.current_construction == SETTLER && current.food > 0.0 {
            current.production += current.food;
            current.food = 0.0;
        }
        Self { current, happiness: city_happiness(city, civ, map), dirty: false }
    }
}

/// Inputs of the yield computation, applied in a fixed order by [`run`](Self::run)
#[derive(Clone, Debug, PartialEq)]
pub struct StatPipeline {
    pub population: i32,
    /// Citizens neither working tiles nor employed as specialists
    pub free_population: i32,
    pub tile_stats: Stats,
    pub specialist_stats: Stats,
    pub trade_route_gold: f32,
    /// Building stats and flat policy bonuses
    pub flat_bonuses: Stats,
    /// Percentages, e.g. 25 for +25%
    pub percent_bonus: Stats,
    pub conversion: Option<PerpetualConstruction>,
    pub science_conversion_multiplier: f32,
    /// Civilization happiness is negative
    pub unhappy: bool,
    pub growth_multiplier: f32,
    /// Food added per specialist after upkeep
    pub specialist_food: f32,
    pub maintenance: f32,
}

impl Default for StatPipeline {
    fn default() -> Self {
        Self {
            population: 1,
            free_population: 0,
            tile_stats: Stats::default(),
            specialist_stats: Stats::default(),
            trade_route_gold: 0.0,
            flat_bonuses: Stats::default(),
            percent_bonus: Stats::default(),
            conversion: None,
            science_conversion_multiplier: 1.0,
            unhappy: false,
            growth_multiplier: 1.0,
            specialist_food: 0.0,
            maintenance: 0.0,
        }
    }
}

impl StatPipeline {
    /// Runs the steps in order. Production bonuses apply before production
    /// is converted, and maintenance comes off last.
    pub fn run(&self) -> Stats {
        let mut stats = Stats::default();
        stats.science += self.population as f32;
        stats.production += self.free_population as f32;
        stats += self.tile_stats;
        stats += self.specialist_stats;
        stats.gold += self.trade_route_gold;
        stats += self.flat_bonuses;

        let bonus = self.percent_bonus;
        stats.production *= 1.0 + bonus.production / 100.0;

        match self.conversion {
            Some(PerpetualConstruction::Gold) => stats.gold += stats.production / 4.0,
            Some(PerpetualConstruction::Science) => {
                stats.science += stats.production / 4.0 * self.science_conversion_multiplier
            }
            None => {}
        }

        stats.gold *= 1.0 + bonus.gold / 100.0;
        stats.science *= 1.0 + bonus.science / 100.0;
        stats.culture *= 1.0 + bonus.culture / 100.0;

        if self.unhappy {
            stats.food /= 4.0;
        } else {
            stats.food *= 1.0 + bonus.food / 100.0;
        }
        stats.food *= self.growth_multiplier;
        stats.food -= 2.0 * self.population as f32;
        stats.food += self.specialist_food;

        stats.gold -= self.maintenance;
        stats.happiness = 0.0;
        stats
    }

    /// Collects everything that applies to `city` this turn
    pub fn gather(city: &CityInfo, civ: &CivContext<'_>, map: &TileMap) -> Self {
        let ruleset = civ.ruleset;
        let population = city.population.population;
        let is_capital = civ.is_capital(&city.name);
        let adopted = |policy: &str| civ.is_adopted(policy);
        let constructions = &city.city_constructions;
        let current = Construction::lookup(&constructions.current_construction, ruleset);
        let building_wonder = current.is_some_and(|c| c.is_wonder());
        let building_anything = matches!(current, Some(Construction::Building(_)));

        let worked: Vec<_> = city.worked_tiles(map).collect();
        let mut tile_total = Stats::default();
        for tile in &worked {
            tile_total += tile_stats(tile, ruleset, civ, Some(constructions));
        }
        let worked_count = worked.iter().filter(|t| t.position != city.location).count();

        let mut specialist_stats = Stats::default();
        for (stat, count) in city.population.specialists.iter() {
            let per_specialist = match stat {
                Stat::Culture | Stat::Science => 3.0,
                _ => 2.0,
            };
            specialist_stats.add_stat(*stat, per_specialist * count as f32);
        }
        let specialists = city.population.number_of_specialists();
        if adopted(policies::COMMERCE_COMPLETE) {
            specialist_stats.gold += specialists as f32;
        }
        if adopted(policies::SECULARISM) {
            specialist_stats.science += 2.0 * specialists as f32;
        }

        let mut trade_route_gold = 0.0;
        if let Some(capital) = civ.capital.as_ref().filter(|_| !is_capital) {
            if civ.is_connected_to_capital(map, city.location, RoadStatus::Road) {
                trade_route_gold = capital.population as f32 * 0.15 + population as f32 * 1.1 - 1.0;
                if adopted(policies::TRADE_UNIONS) {
                    trade_route_gold += 2.0;
                }
                if civ.has_building_unique(uniques::TRADE_ROUTE_GOLD_INCREASE) {
                    trade_route_gold *= 1.25;
                }
            }
        }

        let buildings: Vec<_> = constructions.built_buildings.iter().filter_map(|b| ruleset.building(b)).collect();
        let mut flat_bonuses = Stats::default();
        let mut percent_bonus = Stats::default();
        let mut maintenance = 0.0;
        for building in &buildings {
            flat_bonuses += building.stats;
            if building.has_unique(uniques::SCIENCE_PER_2_POP) {
                flat_bonuses.science += (population / 2) as f32;
            }
            if let Some(bonus) = building.percent_stat_bonus {
                percent_bonus += bonus;
            }
            maintenance += building.maintenance as f32;
        }
        flat_bonuses.happiness = 0.0;

        if adopted(policies::TRADITION) && is_capital {
            flat_bonuses.culture += 3.0;
        }
        if adopted(policies::LANDED_ELITE) && is_capital {
            flat_bonuses.food += 2.0;
        }
        if adopted(policies::TRADITION_COMPLETE) {
            flat_bonuses.food += 2.0;
        }
        if adopted(policies::MONARCHY) && is_capital {
            flat_bonuses.gold += (population / 2) as f32;
        }
        if adopted(policies::LIBERTY) {
            flat_bonuses.culture += 1.0;
        }
        if adopted(policies::REPUBLIC) {
            flat_bonuses.production += 1.0;
        }
        if adopted(policies::UNIVERSAL_SUFFRAGE) {
            flat_bonuses.production += (population / 5) as f32;
        }
        if adopted(policies::FREE_SPEECH) {
            flat_bonuses.culture += (population / 2) as f32;
        }

        if civ.is_golden_age() {
            percent_bonus.production += 20.0;
        }
        if adopted(policies::COLLECTIVE_RULE) && is_capital && constructions.current_construction == SETTLER {
            percent_bonus.production += 50.0;
        }
        if adopted(policies::REPUBLIC) && building_anything {
            percent_bonus.production += 5.0;
        }
        if adopted(policies::REFORMATION) && buildings.iter().any(|b| b.is_wonder) {
            percent_bonus.culture += 33.0;
        }
        if adopted(policies::COMMERCE) && is_capital {
            percent_bonus.gold += 25.0;
        }
        if adopted(policies::SOVEREIGNTY) && civ.happiness >= 0 {
            percent_bonus.science += 15.0;
        }
        if adopted(policies::ARISTOCRACY) && building_wonder {
            percent_bonus.production += 15.0;
        }
        if adopted(policies::CONSTITUTION) && building_wonder {
            percent_bonus.production += 10.0;
        }
        if adopted(policies::THEOCRACY) && constructions.is_built(TEMPLE) {
            percent_bonus.gold += 10.0;
        }
        if civ.is_researched(techs::COMBUSTION)
            && (is_capital || civ.is_connected_to_capital(map, city.location, RoadStatus::Railroad))
        {
            percent_bonus.production += 25.0;
        }
        if building_wonder && civ.has_resource(MARBLE) {
            percent_bonus.production += 15.0;
        }
        if civ.is_researched(techs::COMPUTERS) {
            percent_bonus.production += 10.0;
            percent_bonus.science += 10.0;
        }

        let conversion = match current {
            Some(Construction::Perpetual(perpetual)) => Some(perpetual),
            _ => None,
        };
        let mut science_conversion_multiplier = 1.0;
        if civ.has_building_unique(uniques::SCIENCE_CONVERSION_INCREASE) {
            science_conversion_multiplier *= 1.33;
        }
        if adopted(policies::RATIONALISM) {
            science_conversion_multiplier *= 1.33;
        }

        let mut growth_multiplier = 1.0;
        if adopted(policies::LANDED_ELITE) && is_capital {
            growth_multiplier += 0.1;
        }
        if adopted(policies::TRADITION_COMPLETE) {
            growth_multiplier += 0.15;
        }

        let specialist_food = if adopted(policies::CIVIL_SOCIETY) { specialists as f32 } else { 0.0 };

        Self {
            population,
            free_population: city.population.free_population(worked_count),
            tile_stats: tile_total,
            specialist_stats,
            trade_route_gold,
            flat_bonuses,
            percent_bonus,
            conversion,
            science_conversion_multiplier,
            unhappy: civ.happiness < 0,
            growth_multiplier,
            specialist_food,
            maintenance,
        }
    }
}

/// Happiness contributed by a city: -3, less its citizens' unhappiness,
/// plus policy and building bonuses
pub fn city_happiness(city: &CityInfo, civ: &CivContext<'_>, map: &TileMap) -> f32 {
    let ruleset = civ.ruleset;
    let population = city.population.population;
    let constructions = &city.city_constructions;

    let mut unhappiness = population as f32;
    if civ.is_adopted(policies::DEMOCRACY) {
        unhappiness -= 0.5 * city.population.number_of_specialists() as f32;
    }
    if civ.has_building_unique(uniques::CITIZEN_UNHAPPINESS_DECREASED) {
        unhappiness *= 0.9;
    }
    if civ.is_adopted(policies::ARISTOCRACY) {
        unhappiness *= 0.95;
    }

    let mut happiness = -3.0 - unhappiness;
    if civ.is_adopted(policies::ARISTOCRACY) {
        happiness += (population / 10) as f32;
    }
    if civ.is_adopted(policies::MONARCHY) && civ.is_capital(&city.name) {
        happiness += (population / 2) as f32;
    }
    if civ.is_adopted(policies::MERITOCRACY) && civ.is_connected_to_capital(map, city.location, RoadStatus::Road) {
        happiness += 1.0;
    }
    if civ.is_adopted(policies::ORGANIZED_RELIGION) && constructions.is_built(TEMPLE) {
        happiness += 1.0;
    }
    if civ.is_adopted(policies::HUMANISM) {
        happiness += SCHOLARLY_BUILDINGS.iter().filter(|b| constructions.is_built(b)).count() as f32;
    }
    let from_buildings: f32 = constructions
        .built_buildings
        .iter()
        .filter_map(|b| ruleset.building(b))
        .map(|b| b.stats.happiness)
        .sum();
    happiness + from_buildings.trunc()
}

/// Great person points a city generates this turn
pub fn great_person_points(city: &CityInfo, civ: &CivContext<'_>) -> Stats {
    let mut points = Stats::default();
    for (stat, count) in city.population.specialists.iter() {
        points.add_stat(*stat, 3.0 * count as f32);
    }
    for building in city.city_constructions.built_buildings.iter().filter_map(|b| civ.ruleset.building(b)) {
        if let Some(building_points) = building.great_person_points {
            points += building_points;
        }
    }
    if civ.is_adopted(policies::ENTREPRENEURSHIP) {
        points.gold *= 1.25;
    }
    let mut multiplier = 1.0;
    if civ.has_building_unique(uniques::GREAT_PERSON_GENERATION_INCREASE) {
        multiplier *= 1.33;
    }
    if civ.is_adopted(policies::FREEDOM) {
        multiplier *= 1.25;
    }
    points.times(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestGame;

    #[test]
    fn test_production_bonus_applies_before_conversion() {
        let pipeline = StatPipeline {
            population: 0,
            tile_stats: Stats { production: 20.0, ..Stats::default() },
            percent_bonus: Stats { production: 25.0, ..Stats::default() },
            conversion: Some(PerpetualConstruction::Science),
            ..StatPipeline::default()
        };
        let stats = pipeline.run();
        assert_eq!(stats.production, 25.0);
        assert_eq!(stats.science, 6.25);
    }

    #[test]
    fn test_gold_conversion_gets_gold_bonus() {
        let pipeline = StatPipeline {
            population: 0,
            tile_stats: Stats { production: 8.0, ..Stats::default() },
            percent_bonus: Stats { gold: 50.0, ..Stats::default() },
            conversion: Some(PerpetualConstruction::Gold),
            maintenance: 1.0,
            ..StatPipeline::default()
        };
        // 8 / 4 = 2 gold, +50% = 3, minus maintenance
        assert_eq!(pipeline.run().gold, 2.0);
    }

    #[test]
    fn test_food_order() {
        let mut pipeline = StatPipeline {
            population: 2,
            tile_stats: Stats { food: 12.0, ..Stats::default() },
            percent_bonus: Stats { food: 50.0, ..Stats::default() },
            growth_multiplier: 1.25,
            specialist_food: 1.0,
            ..StatPipeline::default()
        };
        // 12 * 1.5 * 1.25 - 4 + 1
        assert_eq!(pipeline.run().food, 19.5);
        pipeline.unhappy = true;
        // bonus skipped: 12 / 4 * 1.25 - 4 + 1
        assert_eq!(pipeline.run().food, 0.75);
    }

    #[test]
    fn test_base_science_and_idle_citizens() {
        let pipeline = StatPipeline { population: 3, free_population: 2, ..StatPipeline::default() };
        let stats = pipeline.run();
        assert_eq!(stats.science, 3.0);
        assert_eq!(stats.production, 2.0);
        assert_eq!(stats.food, -6.0);
    }

    #[test]
    fn test_new_city_stats() {
        let game = TestGame::new();
        let city = game.city();
        let stats = CityStats::compute(city, &game.context(), &game.game.tile_map);
        // grassland centre 2/1/0 plus one worked grassland tile 2/0/0, palace +3 prod +3 science +3 gold
        let palace = game.ruleset().building("Palace").unwrap();
        assert_eq!(stats.current.food, 4.0 - 2.0);
        assert_eq!(stats.current.science, 1.0 + palace.stats.science);
        assert!(!stats.is_dirty());
        assert_eq!(stats.happiness, -4.0 + palace.stats.happiness.trunc());
    }

    #[test]
    fn test_settler_turns_food_into_production() {
        let mut game = TestGame::new();
        let before = CityStats::compute(game.city(), &game.context(), &game.game.tile_map);
        game.city_mut().city_constructions.current_construction = "Settler".into();
        let after = CityStats::compute(game.city(), &game.context(), &game.game.tile_map);
        assert_eq!(after.current.food, 0.0);
        assert!(after.current.production >= before.current.production + before.current.food);
    }

    #[test]
    fn test_great_person_points() {
        let mut game = TestGame::new();
        game.city_mut().population.specialists.add(Stat::Gold, 2);
        assert_eq!(great_person_points(game.city(), &game.context()).gold, 6.0);
        game.civ_mut().policies.adopted_policies.insert("Entrepreneurship".into());
        game.civ_mut().policies.adopted_policies.insert("Freedom".into());
        assert_eq!(great_person_points(game.city(), &game.context()).gold, 6.0 * 1.25 * 1.25);
    }
}
