use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::building::Building;
use crate::constants::{self, PALACE, SETTLER, WORKER};
use crate::error::RulesetError;
use crate::policy::{Policy, PolicyBranch};
use crate::tech::{TechColumn, Technology};
use crate::terrain::Terrain;
use crate::tile_improvement::TileImprovement;
use crate::tile_resource::TileResource;
use crate::unit::BaseUnit;

const TERRAINS_FILE: &str = "Terrains.json";
const RESOURCES_FILE: &str = "TileResources.json";
const IMPROVEMENTS_FILE: &str = "TileImprovements.json";
const BUILDINGS_FILE: &str = "Buildings.json";
const UNITS_FILE: &str = "Units.json";
const TECHS_FILE: &str = "Techs.json";
const POLICIES_FILE: &str = "Policies.json";

/// The complete set of rule tables, keyed by name.
///
/// Ordered maps keep every iteration (and therefore every seeded run) stable.
#[derive(Clone, Debug, Default)]
pub struct Ruleset {
    pub terrains: BTreeMap<String, Terrain>,
    pub tile_resources: BTreeMap<String, TileResource>,
    pub tile_improvements: BTreeMap<String, TileImprovement>,
    pub buildings: BTreeMap<String, Building>,
    pub units: BTreeMap<String, BaseUnit>,
    pub technologies: BTreeMap<String, Technology>,
    pub policies: BTreeMap<String, Policy>,
    /// Branch names in file order
    pub policy_branches: Vec<String>,
}

/// Raw JSON text of the seven rule files
pub struct RulesetSources<'a> {
    pub terrains: &'a str,
    pub tile_resources: &'a str,
    pub tile_improvements: &'a str,
    pub buildings: &'a str,
    pub units: &'a str,
    pub techs: &'a str,
    pub policies: &'a str,
}

impl Ruleset {
    /// The ruleset bundled with the game
    pub fn vanilla() -> Result<Self, RulesetError> {
        Self::from_sources(RulesetSources {
            terrains: include_str!("../jsons/Terrains.json"),
            tile_resources: include_str!("../jsons/TileResources.json"),
            tile_improvements: include_str!("../jsons/TileImprovements.json"),
            buildings: include_str!("../jsons/Buildings.json"),
            units: include_str!("../jsons/Units.json"),
            techs: include_str!("../jsons/Techs.json"),
            policies: include_str!("../jsons/Policies.json"),
        })
    }

    /// Loads the seven rule files from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, RulesetError> {
        let read = |file: &str| {
            let path = dir.join(file);
            fs::read_to_string(&path).map_err(|source| RulesetError::Io { path, source })
        };
        let terrains = read(TERRAINS_FILE)?;
        let tile_resources = read(RESOURCES_FILE)?;
        let tile_improvements = read(IMPROVEMENTS_FILE)?;
        let buildings = read(BUILDINGS_FILE)?;
        let units = read(UNITS_FILE)?;
        let techs = read(TECHS_FILE)?;
        let policies = read(POLICIES_FILE)?;
        info!(dir = %dir.display(), "loading ruleset");
        Self::from_sources(RulesetSources {
            terrains: &terrains,
            tile_resources: &tile_resources,
            tile_improvements: &tile_improvements,
            buildings: &buildings,
            units: &units,
            techs: &techs,
            policies: &policies,
        })
    }

    /// Parses and validates a ruleset; dangling references are rejected
    pub fn from_sources(sources: RulesetSources<'_>) -> Result<Self, RulesetError> {
        let mut ruleset = Ruleset {
            terrains: keyed("terrain", parse(TERRAINS_FILE, sources.terrains)?, |t: &Terrain| &t.name)?,
            tile_resources: keyed("resource", parse(RESOURCES_FILE, sources.tile_resources)?, |r: &TileResource| &r.name)?,
            tile_improvements: keyed(
                "improvement",
                parse(IMPROVEMENTS_FILE, sources.tile_improvements)?,
                |i: &TileImprovement| &i.name,
            )?,
            buildings: keyed("building", parse(BUILDINGS_FILE, sources.buildings)?, |b: &Building| &b.name)?,
            units: keyed("unit", parse(UNITS_FILE, sources.units)?, |u: &BaseUnit| &u.name)?,
            ..Default::default()
        };

        let columns: Vec<TechColumn> = parse(TECHS_FILE, sources.techs)?;
        let techs = columns.into_iter().flat_map(TechColumn::into_technologies).collect();
        ruleset.technologies = keyed("technology", techs, |t: &Technology| &t.name)?;

        let branches: Vec<PolicyBranch> = parse(POLICIES_FILE, sources.policies)?;
        ruleset.policy_branches = branches.iter().map(|b| b.name.clone()).collect();
        let policies = branches.into_iter().flat_map(PolicyBranch::into_policies).collect();
        ruleset.policies = keyed("policy", policies, |p: &Policy| &p.name)?;

        let unresolved = ruleset.unresolved_references();
        if !unresolved.is_empty() {
            return Err(RulesetError::UnresolvedReferences(unresolved));
        }
        debug!(
            buildings = ruleset.buildings.len(),
            techs = ruleset.technologies.len(),
            policies = ruleset.policies.len(),
            "ruleset loaded"
        );
        Ok(ruleset)
    }

    /// Every cross reference that does not resolve, as readable messages
    pub fn unresolved_references(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut check = |owner: &str, field: &str, name: &Option<String>, exists: &dyn Fn(&str) -> bool| {
            if let Some(name) = name {
                if !exists(name) {
                    errors.push(format!("{owner}: {field} '{name}' does not exist"));
                }
            }
        };
        let tech = |n: &str| self.technologies.contains_key(n);
        let building = |n: &str| self.buildings.contains_key(n);
        let resource = |n: &str| self.tile_resources.contains_key(n);
        let terrain = |n: &str| self.terrains.contains_key(n);
        let improvement = |n: &str| self.tile_improvements.contains_key(n);
        let policy = |n: &str| self.policies.contains_key(n);
        let unit = |n: &str| self.units.contains_key(n);

        for t in self.terrains.values() {
            for base in &t.occurs_on {
                check(&t.name, "occursOn", &Some(base.clone()), &terrain);
            }
        }
        for r in self.tile_resources.values() {
            for t in &r.terrains_can_be_found_on {
                check(&r.name, "terrainsCanBeFoundOn", &Some(t.clone()), &terrain);
            }
            check(&r.name, "improvement", &r.improvement, &improvement);
            check(&r.name, "building", &r.building, &building);
            check(&r.name, "revealedBy", &r.revealed_by, &tech);
        }
        for i in self.tile_improvements.values() {
            for t in &i.terrains_can_be_built_on {
                check(&i.name, "terrainsCanBeBuiltOn", &Some(t.clone()), &terrain);
            }
            check(&i.name, "techRequired", &i.tech_required, &tech);
            check(&i.name, "improvingTech", &i.improving_tech, &tech);
            if let Some(feature) = i.removed_feature() {
                check(&i.name, "removed feature", &Some(feature.to_string()), &terrain);
            }
        }
        for b in self.buildings.values() {
            check(&b.name, "requiredTech", &b.required_tech, &tech);
            check(&b.name, "requiredBuilding", &b.required_building, &building);
            check(&b.name, "requiredBuildingInAllCities", &b.required_building_in_all_cities, &building);
            check(&b.name, "cannotBeBuiltWith", &b.cannot_be_built_with, &building);
            check(&b.name, "providesFreeBuilding", &b.provides_free_building, &building);
            check(&b.name, "requiredResource", &b.required_resource, &resource);
            for r in b.required_nearby_improved_resources.iter().flatten() {
                check(&b.name, "requiredNearbyImprovedResources", &Some(r.clone()), &resource);
            }
        }
        for u in self.units.values() {
            check(&u.name, "requiredTech", &u.required_tech, &tech);
            check(&u.name, "obsoleteTech", &u.obsolete_tech, &tech);
            check(&u.name, "requiredResource", &u.required_resource, &resource);
        }
        for t in self.technologies.values() {
            for p in &t.prerequisites {
                check(&t.name, "prerequisite", &Some(p.clone()), &tech);
            }
        }
        for p in self.policies.values() {
            for r in p.requires.iter().flatten() {
                check(&p.name, "requires", &Some(r.clone()), &policy);
            }
        }
        let required_units = [
            WORKER,
            SETTLER,
            constants::GREAT_SCIENTIST,
            constants::GREAT_ENGINEER,
            constants::GREAT_ARTIST,
            constants::GREAT_MERCHANT,
        ];
        for name in required_units {
            check("ruleset", "unit", &Some(name.to_string()), &unit);
        }
        check("ruleset", "building", &Some(PALACE.to_string()), &building);
        errors
    }

    pub fn building(&self, name: &str) -> Option<&Building> {
        self.buildings.get(name)
    }

    pub fn unit(&self, name: &str) -> Option<&BaseUnit> {
        self.units.get(name)
    }

    pub fn terrain(&self, name: &str) -> Option<&Terrain> {
        self.terrains.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&TileResource> {
        self.tile_resources.get(name)
    }

    pub fn improvement(&self, name: &str) -> Option<&TileImprovement> {
        self.tile_improvements.get(name)
    }

    pub fn technology(&self, name: &str) -> Option<&Technology> {
        self.technologies.get(name)
    }

    pub fn policy(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    /// Every policy belonging to a branch, including its opener and finisher
    pub fn branch_policies<'a>(&'a self, branch: &'a str) -> impl Iterator<Item = &'a Policy> + 'a {
        self.policies.values().filter(move |p| p.branch == branch)
    }
}

fn parse<T: DeserializeOwned>(file: &str, text: &str) -> Result<T, RulesetError> {
    serde_json::from_str(text).map_err(|source| RulesetError::Json { file: file.to_string(), source })
}

fn keyed<T>(
    kind: &'static str,
    items: Vec<T>,
    name_of: impl Fn(&T) -> &String,
) -> Result<BTreeMap<String, T>, RulesetError> {
    let mut map = BTreeMap::new();
    for item in items {
        let name = name_of(&item).clone();
        if map.insert(name.clone(), item).is_some() {
            return Err(RulesetError::Duplicate { kind, name });
        }
    }
    Ok(map)
}
