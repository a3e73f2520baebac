use serde::{Deserialize, Serialize};

use crate::stats::Stats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Bonus,
    Strategic,
    Luxury,
}

/// Represents a resource that can appear on a tile
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileResource {
    pub name: String,
    pub resource_type: ResourceType,
    #[serde(flatten)]
    pub stats: Stats,
    /// Terrains (base or feature) the resource can be placed on
    #[serde(default)]
    pub terrains_can_be_found_on: Vec<String>,
    /// The improvement that exploits this resource
    pub improvement: Option<String>,
    /// Extra yield when the matching improvement is built
    pub improvement_stats: Option<Stats>,
    /// Building whose `resourceBonusStats` apply to this resource's tiles
    pub building: Option<String>,
    /// Technology needed before the resource is visible
    pub revealed_by: Option<String>,
}
