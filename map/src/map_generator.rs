use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use rules::constants::{COAST, DESERT, FOREST, GRASSLAND, HILL, JUNGLE, MARSH, MOUNTAIN, PLAINS, TUNDRA};
use rules::Ruleset;

use crate::hex_math::HexCoord;
use crate::tile_info::TileInfo;
use crate::tile_map::TileMap;

const OCEAN: &str = "Ocean";

/// Base terrains for inland tiles with their relative weights
const LAND_WEIGHTS: [(&str, u32); 6] = [
    (GRASSLAND, 6),
    (PLAINS, 6),
    (DESERT, 2),
    (TUNDRA, 1),
    (HILL, 3),
    (MOUNTAIN, 1),
];

/// Inputs of the map generator
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapParameters {
    /// Hex radius of the map around (0,0)
    pub radius: i32,
    pub seed: u64,
    /// Chance for an eligible land tile to carry a resource
    pub resource_frequency: f64,
    /// Chance for an eligible land tile to carry a feature
    pub feature_frequency: f64,
}

impl Default for MapParameters {
    fn default() -> Self {
        Self { radius: 10, seed: 0, resource_frequency: 0.15, feature_frequency: 0.3 }
    }
}

/// Seeded terrain, feature and resource placement; same seed, same map
pub struct MapGenerator<'a> {
    ruleset: &'a Ruleset,
    rng: StdRng,
}

impl<'a> MapGenerator<'a> {
    pub fn new(ruleset: &'a Ruleset, seed: u64) -> Self {
        Self { ruleset, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn generate(&mut self, params: &MapParameters) -> TileMap {
        let center = HexCoord::new(0, 0);
        let radius = params.radius.max(0);
        let mut tiles = Vec::new();
        for position in center.disk(radius) {
            let from_edge = radius - position.distance(center);
            let base = if radius >= 4 && from_edge == 0 {
                OCEAN
            } else if radius >= 4 && from_edge == 1 {
                COAST
            } else if position.distance(center) <= 1 {
                // a guaranteed buildable start in the middle
                GRASSLAND
            } else {
                self.pick_land()
            };
            let mut tile = TileInfo::new(position, base);
            self.place_feature(&mut tile, params.feature_frequency);
            self.place_resource(&mut tile, params.resource_frequency);
            tiles.push(tile);
        }
        info!(radius, seed = params.seed, tiles = tiles.len(), "map generated");
        TileMap::new(tiles)
    }

    fn pick_land(&mut self) -> &'static str {
        let total: u32 = LAND_WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = self.rng.random_range(0..total);
        for (terrain, weight) in LAND_WEIGHTS {
            if roll < weight {
                return terrain;
            }
            roll -= weight;
        }
        GRASSLAND
    }

    fn place_feature(&mut self, tile: &mut TileInfo, frequency: f64) {
        if tile.position.distance(HexCoord::new(0, 0)) == 0 {
            return;
        }
        let candidates: Vec<&str> = self
            .ruleset
            .terrains
            .values()
            .filter(|t| t.is_feature() && t.occurs_on.contains(&tile.base_terrain))
            .map(|t| t.name.as_str())
            .collect();
        if candidates.is_empty() || !self.rng.random_bool(frequency.clamp(0.0, 1.0)) {
            return;
        }
        // forests dominate, marsh and jungle stay rarer
        let weighted: Vec<&str> = candidates
            .iter()
            .flat_map(|&c| {
                let weight = match c {
                    FOREST => 3,
                    JUNGLE => 2,
                    MARSH => 1,
                    _ => 2,
                };
                std::iter::repeat(c).take(weight)
            })
            .collect();
        let choice = weighted[self.rng.random_range(0..weighted.len())];
        tile.terrain_feature = Some(choice.to_string());
    }

    fn place_resource(&mut self, tile: &mut TileInfo, frequency: f64) {
        let top = tile.terrain_feature.clone().unwrap_or_else(|| tile.base_terrain.clone());
        let candidates: Vec<&str> = self
            .ruleset
            .tile_resources
            .values()
            .filter(|r| r.terrains_can_be_found_on.contains(&top))
            .map(|r| r.name.as_str())
            .collect();
        if candidates.is_empty() || !self.rng.random_bool(frequency.clamp(0.0, 1.0)) {
            return;
        }
        let choice = candidates[self.rng.random_range(0..candidates.len())];
        tile.resource = Some(choice.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_map() {
        let ruleset = Ruleset::vanilla().unwrap();
        let params = MapParameters { radius: 6, seed: 42, ..Default::default() };
        let a = MapGenerator::new(&ruleset, params.seed).generate(&params);
        let b = MapGenerator::new(&ruleset, params.seed).generate(&params);
        let describe = |m: &TileMap| {
            m.tiles()
                .map(|t| (t.position, t.base_terrain.clone(), t.terrain_feature.clone(), t.resource.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(describe(&a), describe(&b));
        assert_eq!(a.len(), 127);
    }

    #[test]
    fn test_generated_tiles_are_consistent() {
        let ruleset = Ruleset::vanilla().unwrap();
        let params = MapParameters { radius: 8, seed: 7, resource_frequency: 0.5, ..Default::default() };
        let map = MapGenerator::new(&ruleset, params.seed).generate(&params);
        for tile in map.tiles() {
            if let Some(feature) = tile.feature(&ruleset) {
                assert!(feature.occurs_on.contains(&tile.base_terrain));
            }
            if let Some(resource) = tile.tile_resource(&ruleset) {
                let top = tile.terrain_feature.as_ref().unwrap_or(&tile.base_terrain);
                assert!(resource.terrains_can_be_found_on.contains(top));
            }
        }
        let center = map.get(HexCoord::new(0, 0)).unwrap();
        assert!(center.is_passable(&ruleset));
        assert_eq!(map.get(HexCoord::new(8, 0)).unwrap().base_terrain, OCEAN);
        assert!(map.tiles().filter(|t| t.resource.is_some()).count() > 10);
    }
}
