use serde::{Deserialize, Serialize};

use crate::stats::Stats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainType {
    Land,
    Water,
    TerrainFeature,
}

/// A base terrain or terrain feature definition
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terrain {
    pub name: String,
    #[serde(rename = "type")]
    pub terrain_type: TerrainType,
    #[serde(flatten)]
    pub stats: Stats,
    /// Movement points needed to enter a tile of this terrain
    #[serde(default = "default_movement_cost")]
    pub movement_cost: i32,
    /// Features only: replace the base terrain's yields instead of adding to them
    #[serde(default)]
    pub override_stats: bool,
    #[serde(default)]
    pub unbuildable: bool,
    #[serde(default)]
    pub impassable: bool,
    /// Elevation used by line-of-sight checks
    #[serde(default)]
    pub height: i32,
    /// Features only: base terrains this feature can appear on
    #[serde(default)]
    pub occurs_on: Vec<String>,
}

fn default_movement_cost() -> i32 {
    1
}

impl Terrain {
    pub fn is_feature(&self) -> bool {
        self.terrain_type == TerrainType::TerrainFeature
    }
}
