use serde::{Deserialize, Serialize};

use crate::stats::Stats;

/// Represents a building (or wonder) definition
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Building {
    pub name: String,
    /// Flat yields provided once built
    #[serde(flatten)]
    pub stats: Stats,
    pub cost: i32,
    /// Gold paid each turn
    pub maintenance: i32,
    pub percent_stat_bonus: Option<Stats>,
    /// Number of specialist slots per stat
    pub specialist_slots: Option<Stats>,
    pub great_person_points: Option<Stats>,
    /// Extra cost percentage when purchasing
    pub hurry_cost_modifier: i32,
    pub is_wonder: bool,
    pub required_tech: Option<String>,
    pub required_building: Option<String>,
    /// National wonders: every city of the civilization needs this building first
    pub required_building_in_all_cities: Option<String>,
    pub required_resource: Option<String>,
    /// The city must work an improved tile carrying one of these resources
    pub required_nearby_improved_resources: Option<Vec<String>>,
    pub cannot_be_built_with: Option<String>,
    pub provides_free_building: Option<String>,
    pub free_techs: i32,
    /// Yields added to tiles holding a resource that names this building
    pub resource_bonus_stats: Option<Stats>,
    pub uniques: Vec<String>,
}

impl Building {
    pub fn has_unique(&self, unique: &str) -> bool {
        self.uniques.iter().any(|u| u == unique)
    }

    /// Wonders that are limited per civilization rather than per world
    pub fn is_national_wonder(&self) -> bool {
        self.required_building_in_all_cities.is_some()
    }
}
