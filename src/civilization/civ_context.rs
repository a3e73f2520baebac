use std::collections::{BTreeMap, BTreeSet};

use map::{CivView, HexCoord, RoadStatus, TileMap};
use rules::constants::techs;
use rules::{ResourceType, Ruleset};

use crate::city::CityInfo;

/// What a city sees of the capital
#[derive(Clone, Debug, PartialEq)]
pub struct CapitalInfo {
    pub name: String,
    pub location: HexCoord,
    pub population: i32,
}

/// Snapshot of civilization-wide state handed to city computations.
///
/// Owns copies of the sets it needs so a city can be mutated while the
/// snapshot is alive. Rebuild it after anything it captures changes.
#[derive(Clone, Debug)]
pub struct CivContext<'r> {
    pub ruleset: &'r Ruleset,
    pub civ_name: String,
    pub techs_researched: BTreeSet<String>,
    pub adopted_policies: BTreeSet<String>,
    pub golden_age: bool,
    /// Civilization happiness as of the last stats update
    pub happiness: i32,
    pub capital: Option<CapitalInfo>,
    pub city_count: usize,
    /// Uniques of every building built anywhere in the civilization
    pub building_uniques: BTreeSet<String>,
    /// Resources available to the civilization
    pub resources: BTreeSet<String>,
    /// Wonders completed by other civilizations
    pub foreign_wonders: BTreeSet<String>,
    city_buildings: BTreeMap<String, BTreeSet<String>>,
    city_constructions: BTreeMap<String, String>,
}

impl<'r> CivContext<'r> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ruleset: &'r Ruleset,
        civ_name: &str,
        techs_researched: &BTreeSet<String>,
        adopted_policies: &BTreeSet<String>,
        golden_age: bool,
        happiness: i32,
        cities: &[CityInfo],
        map: &TileMap,
        foreign_wonders: &BTreeSet<String>,
    ) -> Self {
        let capital = cities.iter().find(|c| c.is_capital()).map(|c| CapitalInfo {
            name: c.name.clone(),
            location: c.location,
            population: c.population.population,
        });
        let mut context = Self {
            ruleset,
            civ_name: civ_name.to_string(),
            techs_researched: techs_researched.clone(),
            adopted_policies: adopted_policies.clone(),
            golden_age,
            happiness,
            capital,
            city_count: cities.len(),
            building_uniques: BTreeSet::new(),
            resources: BTreeSet::new(),
            foreign_wonders: foreign_wonders.clone(),
            city_buildings: BTreeMap::new(),
            city_constructions: BTreeMap::new(),
        };

        for city in cities {
            let built = &city.city_constructions.built_buildings;
            for building in built.iter().filter_map(|b| ruleset.building(b)) {
                context.building_uniques.extend(building.uniques.iter().cloned());
            }
            context.city_buildings.insert(city.name.clone(), built.clone());
            context
                .city_constructions
                .insert(city.name.clone(), city.city_constructions.current_construction.clone());
        }
        context.resources = civ_resources(ruleset, civ_name, map, &context);
        context
    }

    pub fn has_building_unique(&self, unique: &str) -> bool {
        self.building_uniques.contains(unique)
    }

    pub fn has_resource(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    pub fn luxury_count(&self) -> usize {
        self.resources
            .iter()
            .filter(|r| self.ruleset.resource(r).is_some_and(|r| r.resource_type == ResourceType::Luxury))
            .count()
    }

    /// Whether any city of this civilization has `building`
    pub fn is_built_anywhere(&self, building: &str) -> bool {
        self.city_buildings.values().any(|b| b.contains(building))
    }

    pub fn any_city_lacks(&self, building: &str) -> bool {
        self.city_buildings.values().any(|b| !b.contains(building))
    }

    /// Whether a city other than `city` is currently producing `construction`
    pub fn is_being_constructed_elsewhere(&self, construction: &str, city: &str) -> bool {
        self.city_constructions
            .iter()
            .any(|(name, current)| name != city && current == construction)
    }

    pub fn is_capital(&self, city: &str) -> bool {
        self.capital.as_ref().is_some_and(|c| c.name == city)
    }

    /// Whether `location` reaches the capital over roads of at least `min`
    pub fn is_connected_to_capital(&self, map: &TileMap, location: HexCoord, min: RoadStatus) -> bool {
        self.capital
            .as_ref()
            .is_some_and(|c| c.location == location || map.is_connected_by(location, c.location, min))
    }

    pub fn improved_roads(&self) -> bool {
        self.is_researched(techs::MACHINERY)
    }
}

impl CivView for CivContext<'_> {
    fn is_researched(&self, tech: &str) -> bool {
        self.techs_researched.contains(tech)
    }

    fn is_adopted(&self, policy: &str) -> bool {
        self.adopted_policies.contains(policy)
    }

    fn is_golden_age(&self) -> bool {
        self.golden_age
    }
}

/// Resources on owned tiles that are improved (or under a city centre)
fn civ_resources(ruleset: &Ruleset, civ_name: &str, map: &TileMap, civ: &dyn CivView) -> BTreeSet<String> {
    map.tiles()
        .filter(|t| t.owner.as_deref() == Some(civ_name))
        .filter(|t| t.has_improved_resource(ruleset, civ))
        .filter_map(|t| t.resource.clone())
        .collect()
}
