use serde::{Deserialize, Serialize};

use rules::constants::{RAILROAD, ROAD};
use rules::{Ruleset, Terrain, TerrainType, TileImprovement, TileResource};

use crate::hex_math::HexCoord;
use crate::map_unit::MapUnit;
use crate::tile_stats::CivView;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadStatus {
    #[default]
    None,
    Road,
    Railroad,
}

/// A single cell of the map
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileInfo {
    pub position: HexCoord,
    pub base_terrain: String,
    pub terrain_feature: Option<String>,
    pub resource: Option<String>,
    pub improvement: Option<String>,
    pub improvement_in_progress: Option<String>,
    pub turns_to_improvement: i32,
    /// Name of the owning civilization
    pub owner: Option<String>,
    /// Name of the city whose population works this tile
    pub working_city: Option<String>,
    pub road_status: RoadStatus,
    pub unit: Option<MapUnit>,
    /// Name of the city that owns this tile; rebuilt from the cities after loading
    #[serde(skip)]
    pub owning_city: Option<String>,
    #[serde(skip)]
    pub city_center: bool,
}

impl TileInfo {
    /// Creates a bare tile
    pub fn new(position: HexCoord, base_terrain: &str) -> Self {
        Self {
            position,
            base_terrain: base_terrain.to_string(),
            terrain_feature: None,
            resource: None,
            improvement: None,
            improvement_in_progress: None,
            turns_to_improvement: 0,
            owner: None,
            working_city: None,
            road_status: RoadStatus::None,
            unit: None,
            owning_city: None,
            city_center: false,
        }
    }

    pub fn base_terrain<'a>(&self, ruleset: &'a Ruleset) -> Option<&'a Terrain> {
        ruleset.terrain(&self.base_terrain)
    }

    pub fn feature<'a>(&self, ruleset: &'a Ruleset) -> Option<&'a Terrain> {
        self.terrain_feature.as_deref().and_then(|f| ruleset.terrain(f))
    }

    /// The feature if there is one, the base terrain otherwise
    pub fn last_terrain<'a>(&self, ruleset: &'a Ruleset) -> Option<&'a Terrain> {
        self.feature(ruleset).or_else(|| self.base_terrain(ruleset))
    }

    pub fn tile_resource<'a>(&self, ruleset: &'a Ruleset) -> Option<&'a TileResource> {
        self.resource.as_deref().and_then(|r| ruleset.resource(r))
    }

    pub fn tile_improvement<'a>(&self, ruleset: &'a Ruleset) -> Option<&'a TileImprovement> {
        self.improvement.as_deref().and_then(|i| ruleset.improvement(i))
    }

    pub fn is_land(&self, ruleset: &Ruleset) -> bool {
        self.base_terrain(ruleset)
            .is_some_and(|t| t.terrain_type == TerrainType::Land)
    }

    /// Whether a land unit may ever stand here
    pub fn is_passable(&self, ruleset: &Ruleset) -> bool {
        self.is_land(ruleset)
            && !self.base_terrain(ruleset).is_some_and(|t| t.impassable)
            && !self.feature(ruleset).is_some_and(|t| t.impassable)
    }

    /// Elevation for line of sight: base height plus feature height
    pub fn height(&self, ruleset: &Ruleset) -> i32 {
        self.base_terrain(ruleset).map_or(0, |t| t.height) + self.feature(ruleset).map_or(0, |t| t.height)
    }

    pub fn is_city_center(&self) -> bool {
        self.city_center
    }

    pub fn is_worked(&self) -> bool {
        self.working_city.is_some()
    }

    pub fn is_occupied(&self) -> bool {
        self.unit.is_some()
    }

    /// Occupied by a unit of a civilization other than `civ`
    pub fn has_foreign_unit(&self, civ: &str) -> bool {
        self.unit.as_ref().is_some_and(|u| u.owner != civ)
    }

    pub fn has_road(&self) -> bool {
        self.road_status != RoadStatus::None
    }

    /// The resource, if the observing civilization knows the tech that reveals it
    pub fn visible_resource<'a>(&self, ruleset: &'a Ruleset, civ: &dyn CivView) -> Option<&'a TileResource> {
        self.tile_resource(ruleset)
            .filter(|r| r.revealed_by.as_deref().map_or(true, |tech| civ.is_researched(tech)))
    }

    /// A resource whose own improvement is built here (city centres count as improved)
    pub fn has_improved_resource(&self, ruleset: &Ruleset, civ: &dyn CivView) -> bool {
        self.visible_resource(ruleset, civ).is_some_and(|r| {
            self.city_center || (r.improvement.is_some() && r.improvement == self.improvement)
        })
    }

    pub fn can_build_improvement(&self, improvement: &TileImprovement, ruleset: &Ruleset, civ: &dyn CivView) -> bool {
        if self.is_city_center() || !self.is_land(ruleset) {
            return false;
        }
        if self.improvement.as_deref() == Some(improvement.name.as_str()) {
            return false;
        }
        if let Some(tech) = &improvement.tech_required {
            if !civ.is_researched(tech) {
                return false;
            }
        }
        if let Some(feature) = improvement.removed_feature() {
            return self.terrain_feature.as_deref() == Some(feature);
        }
        match improvement.name.as_str() {
            ROAD => return self.road_status == RoadStatus::None,
            RAILROAD => return self.road_status != RoadStatus::Railroad,
            _ => {}
        }
        if self.last_terrain(ruleset).is_some_and(|t| t.unbuildable) {
            return false;
        }
        if self
            .visible_resource(ruleset, civ)
            .is_some_and(|r| r.improvement.as_deref() == Some(improvement.name.as_str()))
        {
            return true;
        }
        let top = self.terrain_feature.as_deref().unwrap_or(&self.base_terrain);
        improvement.terrains_can_be_built_on.iter().any(|t| t == top)
    }

    pub fn start_working_on_improvement(&mut self, improvement: &TileImprovement) {
        self.improvement_in_progress = Some(improvement.name.clone());
        self.turns_to_improvement = improvement.turns_to_build.max(1);
    }

    /// Applies the finished improvement in progress: a feature removal, a
    /// road upgrade, or a named improvement
    pub fn complete_improvement(&mut self, ruleset: &Ruleset) {
        let Some(name) = self.improvement_in_progress.take() else {
            return;
        };
        self.turns_to_improvement = 0;
        let removed = ruleset.improvement(&name).and_then(|i| i.removed_feature());
        if let Some(feature) = removed {
            if self.terrain_feature.as_deref() == Some(feature) {
                self.terrain_feature = None;
            }
            return;
        }
        match name.as_str() {
            ROAD => self.road_status = RoadStatus::Road,
            RAILROAD => self.road_status = RoadStatus::Railroad,
            _ => self.improvement = Some(name),
        }
    }
}
