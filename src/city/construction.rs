use map::{CivView, TileMap};
use rules::constants::{policies, uniques, COAST, CULTURE_BUILDINGS, DESERT, GOLD_CONSTRUCTION, MOUNTAIN, SCIENCE_CONSTRUCTION};
use rules::{BaseUnit, Building, Ruleset};

use crate::city::CityInfo;
use crate::civilization::CivContext;

/// Production options that never complete
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerpetualConstruction {
    /// Converts production into gold
    Gold,
    /// Converts production into science
    Science,
}

impl PerpetualConstruction {
    pub fn name(self) -> &'static str {
        match self {
            PerpetualConstruction::Gold => GOLD_CONSTRUCTION,
            PerpetualConstruction::Science => SCIENCE_CONSTRUCTION,
        }
    }
}

/// Anything that can occupy a city's production slot
#[derive(Clone, Copy, Debug)]
pub enum Construction<'r> {
    Building(&'r Building),
    Unit(&'r BaseUnit),
    Perpetual(PerpetualConstruction),
}

impl<'r> Construction<'r> {
    /// Resolves a construction name against the ruleset
    pub fn lookup(name: &str, ruleset: &'r Ruleset) -> Option<Self> {
        match name {
            GOLD_CONSTRUCTION => Some(Construction::Perpetual(PerpetualConstruction::Gold)),
            SCIENCE_CONSTRUCTION => Some(Construction::Perpetual(PerpetualConstruction::Science)),
            _ => ruleset
                .building(name)
                .map(Construction::Building)
                .or_else(|| ruleset.unit(name).map(Construction::Unit)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Construction::Building(building) => &building.name,
            Construction::Unit(unit) => &unit.name,
            Construction::Perpetual(perpetual) => perpetual.name(),
        }
    }

    pub fn is_wonder(&self) -> bool {
        matches!(self, Construction::Building(b) if b.is_wonder)
    }

    pub fn is_perpetual(&self) -> bool {
        matches!(self, Construction::Perpetual(_))
    }

    pub fn production_cost(&self, civ: &dyn CivView) -> i32 {
        match self {
            Construction::Building(building) => {
                let is_culture_building = CULTURE_BUILDINGS.contains(&building.name.as_str());
                if !building.is_wonder && is_culture_building && civ.is_adopted(policies::PIETY) {
                    (building.cost as f32 * 0.85) as i32
                } else {
                    building.cost
                }
            }
            Construction::Unit(unit) => unit.cost,
            Construction::Perpetual(_) => 0,
        }
    }

    /// Rush-buy price; `None` for things that cannot be bought
    pub fn gold_cost(&self, civ: &dyn CivView) -> Option<i32> {
        let hurry_cost_modifier = match self {
            Construction::Building(building) if !building.is_wonder => building.hurry_cost_modifier,
            Construction::Unit(unit) => unit.hurry_cost_modifier,
            _ => return None,
        };
        let mut cost = (30.0 * self.production_cost(civ) as f32).powf(0.75) * (1.0 + hurry_cost_modifier as f32 / 100.0);
        if civ.is_adopted(policies::MERCANTILISM) {
            cost *= 0.75;
        }
        Some((cost / 10.0) as i32 * 10)
    }

    /// Pure check of whether `city` may produce this right now
    pub fn is_buildable(&self, city: &CityInfo, civ: &CivContext<'_>, map: &TileMap) -> bool {
        match self {
            Construction::Building(building) => is_building_buildable(building, city, civ, map),
            Construction::Unit(unit) => {
                !unit.is_great_person()
                    && unit.required_tech.as_deref().map_or(true, |t| civ.is_researched(t))
                    && !unit.obsolete_tech.as_deref().is_some_and(|t| civ.is_researched(t))
                    && unit.required_resource.as_deref().map_or(true, |r| civ.has_resource(r))
            }
            Construction::Perpetual(_) => true,
        }
    }
}

fn is_building_buildable(building: &Building, city: &CityInfo, civ: &CivContext<'_>, map: &TileMap) -> bool {
    let name = building.name.as_str();
    let constructions = &city.city_constructions;
    if constructions.is_built(name) || building.has_unique(uniques::INDICATES_CAPITAL) {
        return false;
    }
    if building.required_tech.as_deref().is_some_and(|t| !civ.is_researched(t)) {
        return false;
    }
    if building.is_wonder {
        if civ.foreign_wonders.contains(name)
            || civ.is_built_anywhere(name)
            || civ.is_being_constructed_elsewhere(name, &city.name)
        {
            return false;
        }
    }
    if let Some(required) = &building.required_building_in_all_cities {
        if civ.any_city_lacks(required) {
            return false;
        }
    }
    if building.required_building.as_deref().is_some_and(|b| !constructions.is_built(b)) {
        return false;
    }
    if building.cannot_be_built_with.as_deref().is_some_and(|b| constructions.is_built(b)) {
        return false;
    }
    if building.required_resource.as_deref().is_some_and(|r| !civ.has_resource(r)) {
        return false;
    }

    let ruleset = civ.ruleset;
    let next_to = |terrain: &str| {
        map.tiles_in_distance(city.location, 1)
            .into_iter()
            .any(|t| t.base_terrain == terrain)
    };
    if building.has_unique(uniques::MUST_BE_NEXT_TO_DESERT) && !next_to(DESERT) {
        return false;
    }
    if building.has_unique(uniques::MUST_BE_NEXT_TO_MOUNTAIN) && !next_to(MOUNTAIN) {
        return false;
    }
    if building.has_unique(uniques::COASTAL_ONLY) && !next_to(COAST) {
        return false;
    }
    if let Some(resources) = &building.required_nearby_improved_resources {
        let has_improved = city.tiles.iter().filter_map(|p| map.get(*p)).any(|tile| {
            tile.resource.as_ref().is_some_and(|r| resources.contains(r)) && tile.has_improved_resource(ruleset, civ)
        });
        if !has_improved {
            return false;
        }
    }
    true
}
