use std::collections::BTreeSet;

use rules::constants::HILL;
use rules::Ruleset;

use crate::hex_math::HexCoord;
use crate::tile_map::TileMap;

/// Tiles visible from `origin`.
///
/// Adjacent tiles are always visible. Further out, ring by ring, a tile is
/// visible when a visible neighbour one ring closer is flat or no taller than
/// it. Standing on a hill adds one to the sight range.
pub fn viewable_tiles(map: &TileMap, ruleset: &Ruleset, origin: HexCoord, sight_range: i32) -> BTreeSet<HexCoord> {
    let Some(origin_tile) = map.get(origin) else {
        return BTreeSet::new();
    };
    let range = if origin_tile.base_terrain == HILL { sight_range + 1 } else { sight_range };

    let mut visible: BTreeSet<HexCoord> = map.tiles_in_distance(origin, 1).iter().map(|t| t.position).collect();
    for ring in 2..=range {
        let newly_visible: Vec<HexCoord> = map
            .tiles_at_distance(origin, ring)
            .into_iter()
            .filter(|tile| {
                let height = tile.height(ruleset);
                map.neighbors(tile.position).any(|n| {
                    n.position.distance(origin) == ring - 1
                        && visible.contains(&n.position)
                        && {
                            let blocker = n.height(ruleset);
                            blocker == 0 || blocker <= height
                        }
                })
            })
            .map(|t| t.position)
            .collect();
        visible.extend(newly_visible);
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_info::TileInfo;

    fn grassland(radius: i32) -> TileMap {
        TileMap::new(
            HexCoord::new(0, 0)
                .disk(radius)
                .into_iter()
                .map(|c| TileInfo::new(c, "Grassland"))
                .collect(),
        )
    }

    #[test]
    fn test_flat_map_sees_full_range() {
        let ruleset = Ruleset::vanilla().unwrap();
        let map = grassland(4);
        let visible = viewable_tiles(&map, &ruleset, HexCoord::new(0, 0), 2);
        assert_eq!(visible.len(), 19);
    }

    #[test]
    fn test_forest_ring_blocks_flat_tiles_behind_it() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut map = grassland(3);
        for c in HexCoord::new(0, 0).ring(1) {
            map.get_mut(c).unwrap().terrain_feature = Some("Forest".into());
        }
        let visible = viewable_tiles(&map, &ruleset, HexCoord::new(0, 0), 2);
        assert_eq!(visible.len(), 7);

        // a hill behind the forest is tall enough to be seen
        map.get_mut(HexCoord::new(2, 0)).unwrap().base_terrain = "Hill".into();
        let visible = viewable_tiles(&map, &ruleset, HexCoord::new(0, 0), 2);
        assert!(visible.contains(&HexCoord::new(2, 0)));
        assert_eq!(visible.len(), 8);
    }

    #[test]
    fn test_hill_extends_sight() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut map = grassland(4);
        map.get_mut(HexCoord::new(0, 0)).unwrap().base_terrain = "Hill".into();
        let visible = viewable_tiles(&map, &ruleset, HexCoord::new(0, 0), 2);
        assert_eq!(visible.len(), 37);
    }
}
