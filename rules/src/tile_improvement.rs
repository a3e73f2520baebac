use serde::{Deserialize, Serialize};

use crate::constants::REMOVE_PREFIX;
use crate::stats::Stats;

/// Represents an improvement workers can build on a tile
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileImprovement {
    pub name: String,
    #[serde(flatten)]
    pub stats: Stats,
    #[serde(default)]
    pub terrains_can_be_built_on: Vec<String>,
    pub tech_required: Option<String>,
    /// Technology that adds `improving_tech_stats` to this improvement
    pub improving_tech: Option<String>,
    pub improving_tech_stats: Option<Stats>,
    #[serde(default)]
    pub turns_to_build: i32,
}

impl TileImprovement {
    /// Name of the feature a "Remove X" improvement clears, if it is one
    pub fn removed_feature(&self) -> Option<&str> {
        self.name.strip_prefix(REMOVE_PREFIX)
    }
}
