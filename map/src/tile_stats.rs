//! Per-tile yields as seen by a civilization.

use rules::constants::{policies, TRADING_POST};
use rules::{Ruleset, Stats};

use crate::tile_info::TileInfo;

/// What tile computations need to know about the observing civilization
pub trait CivView {
    fn is_researched(&self, tech: &str) -> bool;
    fn is_adopted(&self, policy: &str) -> bool;
    fn is_golden_age(&self) -> bool;
}

/// What tile computations need to know about the city working the tile
pub trait CityView {
    fn has_building(&self, building: &str) -> bool;
}

/// Yield of a tile: terrain, feature, visible resource, improvement, then
/// the city-centre floor and civilization-wide adjustments
pub fn tile_stats(tile: &TileInfo, ruleset: &Ruleset, civ: &dyn CivView, city: Option<&dyn CityView>) -> Stats {
    let mut stats = tile.base_terrain(ruleset).map(|t| t.stats).unwrap_or_default();
    if let Some(feature) = tile.feature(ruleset) {
        if feature.override_stats {
            stats = feature.stats;
        } else {
            stats += feature.stats;
        }
    }

    let resource = tile.visible_resource(ruleset, civ);
    if let Some(resource) = resource {
        stats += resource.stats;
        let bonus = resource
            .building
            .as_deref()
            .filter(|b| city.is_some_and(|c| c.has_building(b)))
            .and_then(|b| ruleset.building(b))
            .and_then(|b| b.resource_bonus_stats);
        if let Some(bonus) = bonus {
            stats += bonus;
        }
    }

    if let Some(improvement) = tile.tile_improvement(ruleset) {
        let resource_specific = resource
            .filter(|r| r.improvement.as_deref() == Some(improvement.name.as_str()))
            .and_then(|r| r.improvement_stats);
        stats += resource_specific.unwrap_or(improvement.stats);
        if let (Some(tech), Some(extra)) = (&improvement.improving_tech, improvement.improving_tech_stats) {
            if civ.is_researched(tech) {
                stats += extra;
            }
        }
        if improvement.name == TRADING_POST && civ.is_adopted(policies::FREE_THOUGHT) {
            stats.science += 1.0;
        }
    }

    if tile.is_city_center() {
        stats.food = stats.food.max(2.0);
        stats.production = stats.production.max(1.0);
    }
    if civ.is_golden_age() && stats.gold > 0.0 {
        stats.gold += 1.0;
    }
    stats.production = stats.production.max(0.0);
    stats
}
