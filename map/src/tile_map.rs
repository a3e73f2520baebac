use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Bfs, NodeFiltered};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rules::Ruleset;

use crate::hex_math::HexCoord;
use crate::map_unit::MapUnit;
use crate::tile_info::{RoadStatus, TileInfo};

/// How far `place_unit_near_tile` looks for a free tile
const PLACEMENT_RADIUS: i32 = 3;

/// Owns every tile of the map.
///
/// Tiles live in a `Vec` whose indices double as the node indices of the
/// adjacency graph, which is rebuilt by `set_transients` after loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileMap {
    tiles: Vec<TileInfo>,
    #[serde(skip)]
    graph: UnGraph<HexCoord, ()>,
    #[serde(skip)]
    index: HashMap<HexCoord, NodeIndex>,
}

impl TileMap {
    /// Creates a map from tiles; duplicate positions keep the first tile
    pub fn new(tiles: Vec<TileInfo>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let tiles = tiles.into_iter().filter(|t| seen.insert(t.position)).collect();
        let mut map = Self { tiles, graph: UnGraph::default(), index: HashMap::new() };
        map.set_transients();
        map
    }

    /// Rebuilds the adjacency graph and the units' positions
    pub fn set_transients(&mut self) {
        let mut graph = UnGraph::with_capacity(self.tiles.len(), self.tiles.len() * 3);
        let mut index = HashMap::with_capacity(self.tiles.len());
        for tile in &mut self.tiles {
            index.insert(tile.position, graph.add_node(tile.position));
            if let Some(unit) = &mut tile.unit {
                unit.position = tile.position;
            }
        }
        for tile in &self.tiles {
            let from = index[&tile.position];
            for neighbor in tile.position.neighbors() {
                if let Some(&to) = index.get(&neighbor) {
                    if from < to {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }
        debug!(tiles = self.tiles.len(), edges = graph.edge_count(), "tile graph built");
        self.graph = graph;
        self.index = index;
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, position: HexCoord) -> bool {
        self.index.contains_key(&position)
    }

    pub fn get(&self, position: HexCoord) -> Option<&TileInfo> {
        self.index.get(&position).map(|i| &self.tiles[i.index()])
    }

    pub fn get_mut(&mut self, position: HexCoord) -> Option<&mut TileInfo> {
        match self.index.get(&position) {
            Some(i) => Some(&mut self.tiles[i.index()]),
            None => None,
        }
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TileInfo> {
        self.tiles.iter()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut TileInfo> {
        self.tiles.iter_mut()
    }

    /// Adjacent tiles present on the map
    pub fn neighbors(&self, position: HexCoord) -> impl Iterator<Item = &TileInfo> + '_ {
        self.index
            .get(&position)
            .into_iter()
            .flat_map(move |&i| self.graph.neighbors(i))
            .map(move |n| &self.tiles[n.index()])
    }

    /// Tiles within `distance` of `origin`, nearest rings first
    pub fn tiles_in_distance(&self, origin: HexCoord, distance: i32) -> Vec<&TileInfo> {
        origin.disk(distance).into_iter().filter_map(|c| self.get(c)).collect()
    }

    pub fn tiles_at_distance(&self, origin: HexCoord, distance: i32) -> Vec<&TileInfo> {
        origin.ring(distance).into_iter().filter_map(|c| self.get(c)).collect()
    }

    /// Puts a unit on the nearest free passable tile; returns where it landed
    pub fn place_unit_near_tile(&mut self, position: HexCoord, mut unit: MapUnit, ruleset: &Ruleset) -> Option<HexCoord> {
        let target = self.free_tiles_near(position, ruleset).into_iter().next()?;
        unit.position = target;
        if let Some(tile) = self.get_mut(target) {
            tile.unit = Some(unit);
        }
        Some(target)
    }

    /// Empty passable tiles a new unit could be placed on, nearest first
    pub fn free_tiles_near(&self, position: HexCoord, ruleset: &Ruleset) -> Vec<HexCoord> {
        self.tiles_in_distance(position, PLACEMENT_RADIUS)
            .into_iter()
            .filter(|t| t.unit.is_none() && t.is_passable(ruleset))
            .map(|t| t.position)
            .collect()
    }

    /// Moves the occupant of `from` to `to`. The destination must be empty.
    pub fn move_unit(&mut self, from: HexCoord, to: HexCoord) -> bool {
        let destination_free = self.get(to).is_some_and(|t| !t.is_occupied());
        if from == to || !destination_free {
            return false;
        }
        let Some(mut unit) = self.get_mut(from).and_then(|t| t.unit.take()) else {
            return false;
        };
        unit.position = to;
        if let Some(tile) = self.get_mut(to) {
            tile.unit = Some(unit);
        }
        true
    }

    /// Whether two tiles are joined by an unbroken chain of at least `min` roads
    pub fn is_connected_by(&self, from: HexCoord, to: HexCoord, min: RoadStatus) -> bool {
        let (Some(&start), Some(&goal)) = (self.index.get(&from), self.index.get(&to)) else {
            return false;
        };
        let filtered = NodeFiltered::from_fn(&self.graph, |n: NodeIndex| self.tiles[n.index()].road_status >= min);
        if self.tiles[start.index()].road_status < min {
            return false;
        }
        let mut bfs = Bfs::new(&filtered, start);
        while let Some(node) = bfs.next(&filtered) {
            if node == goal {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grassland(radius: i32) -> TileMap {
        let tiles = HexCoord::new(0, 0)
            .disk(radius)
            .into_iter()
            .map(|c| TileInfo::new(c, "Grassland"))
            .collect();
        TileMap::new(tiles)
    }

    #[test]
    fn test_edge_tiles_have_fewer_neighbors() {
        let map = grassland(2);
        assert_eq!(map.len(), 19);
        assert_eq!(map.neighbors(HexCoord::new(0, 0)).count(), 6);
        assert_eq!(map.neighbors(HexCoord::new(2, 0)).count(), 3);
        assert_eq!(map.tiles_at_distance(HexCoord::new(2, 0), 1).len(), 3);
    }

    #[test]
    fn test_place_and_move_unit() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut map = grassland(2);
        let origin = HexCoord::new(0, 0);
        assert_eq!(map.free_tiles_near(origin, &ruleset).len(), 19);
        assert_eq!(map.place_unit_near_tile(origin, MapUnit::new("Worker", "Rome", 2), &ruleset), Some(origin));
        assert_eq!(map.free_tiles_near(origin, &ruleset).len(), 18);
        let second = map.place_unit_near_tile(origin, MapUnit::new("Settler", "Rome", 2), &ruleset).unwrap();
        assert_eq!(second.distance(origin), 1);

        assert!(!map.move_unit(origin, second));
        let target = HexCoord::new(-2, 1);
        assert!(map.move_unit(origin, target));
        assert!(map.get(origin).unwrap().unit.is_none());
        assert_eq!(map.get(target).unwrap().unit.as_ref().unwrap().position, target);
    }

    #[test]
    fn test_road_connectivity() {
        let mut map = grassland(3);
        let path = [HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(2, 0)];
        for c in path {
            map.get_mut(c).unwrap().road_status = RoadStatus::Road;
        }
        assert!(map.is_connected_by(path[0], path[2], RoadStatus::Road));
        assert!(!map.is_connected_by(path[0], path[2], RoadStatus::Railroad));
        map.get_mut(path[1]).unwrap().road_status = RoadStatus::None;
        assert!(!map.is_connected_by(path[0], path[2], RoadStatus::Road));
    }

    #[test]
    fn test_serde_rebuilds_graph() {
        let mut map = grassland(1);
        map.get_mut(HexCoord::new(1, 0)).unwrap().unit = Some(MapUnit::new("Worker", "Rome", 2));
        let json = serde_json::to_string(&map).unwrap();
        let mut restored: TileMap = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.neighbors(HexCoord::new(0, 0)).count(), 0);
        restored.set_transients();
        assert_eq!(restored.neighbors(HexCoord::new(0, 0)).count(), 6);
        let unit = restored.get(HexCoord::new(1, 0)).unwrap().unit.as_ref().unwrap();
        assert_eq!(unit.position, HexCoord::new(1, 0));
    }
}
