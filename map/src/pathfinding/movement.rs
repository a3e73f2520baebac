use std::collections::{BTreeMap, BinaryHeap, HashMap};

use rules::Ruleset;
use tracing::trace;

use super::node_priority::NodePriority;
use crate::hex_math::HexCoord;
use crate::tile_info::RoadStatus;
use crate::tile_map::TileMap;

/// Who is moving, and what they know that changes movement costs
#[derive(Clone, Copy, Debug)]
pub struct MovementContext<'a> {
    /// Name of the moving unit's civilization
    pub civ: &'a str,
    /// Roads cost a third instead of a half
    pub improved_roads: bool,
}

/// Cost of stepping between two adjacent tiles.
///
/// Roads on both ends override terrain (railroads more so); otherwise the
/// destination's feature cost, or base terrain cost without a feature, applies.
pub fn movement_cost_between(map: &TileMap, ruleset: &Ruleset, from: HexCoord, to: HexCoord, improved_roads: bool) -> f32 {
    let (Some(from_tile), Some(to_tile)) = (map.get(from), map.get(to)) else {
        return f32::INFINITY;
    };
    if from_tile.road_status == RoadStatus::Railroad && to_tile.road_status == RoadStatus::Railroad {
        return 0.1;
    }
    if from_tile.has_road() && to_tile.has_road() {
        return if improved_roads { 1.0 / 3.0 } else { 0.5 };
    }
    to_tile.last_terrain(ruleset).map_or(1, |t| t.movement_cost) as f32
}

/// Minimum movement spent to reach every tile reachable from `origin` this turn.
///
/// A step that costs more than the remaining movement is still allowed and
/// ends the turn, so costs are capped at `budget`. Tiles holding a foreign
/// unit are recorded but never expanded through.
pub fn reachable_tiles_within_turn(
    map: &TileMap,
    ruleset: &Ruleset,
    origin: HexCoord,
    budget: f32,
    ctx: MovementContext<'_>,
) -> BTreeMap<HexCoord, f32> {
    let mut distances: HashMap<HexCoord, f32> = HashMap::new();
    if !map.contains(origin) {
        return BTreeMap::new();
    }
    distances.insert(origin, 0.0);
    let mut queue = BinaryHeap::new();
    queue.push(NodePriority { node: origin, cost: 0.0 });

    while let Some(NodePriority { node, cost }) = queue.pop() {
        if distances.get(&node).is_some_and(|&best| cost > best) || cost >= budget {
            continue;
        }
        if node != origin && map.get(node).is_some_and(|t| t.has_foreign_unit(ctx.civ)) {
            continue;
        }
        for neighbor in map.neighbors(node) {
            if !neighbor.is_passable(ruleset) {
                continue;
            }
            let step = movement_cost_between(map, ruleset, node, neighbor.position, ctx.improved_roads);
            let total = (cost + step).min(budget);
            if distances.get(&neighbor.position).map_or(true, |&old| total < old) {
                distances.insert(neighbor.position, total);
                queue.push(NodePriority { node: neighbor.position, cost: total });
            }
        }
    }
    distances.into_iter().collect()
}

/// Turn-by-turn waypoints from `origin` to `destination`.
///
/// The first leg uses `current_movement`, every later leg `max_movement`.
/// Each returned tile is where the unit stands at the end of a turn; the
/// origin is excluded and the destination is last. Intermediate stops must be
/// unoccupied. Returns `None` when the destination cannot be reached.
pub fn shortest_path(
    map: &TileMap,
    ruleset: &Ruleset,
    origin: HexCoord,
    destination: HexCoord,
    current_movement: f32,
    max_movement: f32,
    ctx: MovementContext<'_>,
) -> Option<Vec<HexCoord>> {
    if !map.get(destination)?.is_passable(ruleset) {
        return None;
    }
    if origin == destination {
        return Some(vec![destination]);
    }

    let mut parents: HashMap<HexCoord, Option<HexCoord>> = HashMap::from([(origin, None)]);
    let mut tiles_to_check = vec![origin];

    for leg in 0..=map.len() {
        let budget = if leg == 0 { current_movement } else { max_movement };
        let mut new_tiles = Vec::new();
        let mut best_leg_start: Option<(HexCoord, f32)> = None;

        for &start in &tiles_to_check {
            for (tile, cost) in reachable_tiles_within_turn(map, ruleset, start, budget, ctx) {
                if tile == destination {
                    if best_leg_start.map_or(true, |(_, best)| cost < best) {
                        best_leg_start = Some((start, cost));
                    }
                } else if !parents.contains_key(&tile) && map.get(tile).is_some_and(|t| !t.is_occupied()) {
                    parents.insert(tile, Some(start));
                    new_tiles.push(tile);
                }
            }
        }

        if let Some((mut current, _)) = best_leg_start {
            let mut path = vec![destination];
            while current != origin {
                path.push(current);
                current = parents.get(&current).copied().flatten()?;
            }
            path.reverse();
            trace!(%origin, %destination, turns = path.len(), "path found");
            return Some(path);
        }
        if new_tiles.is_empty() {
            if leg == 0 {
                // no movement left this turn; try again from the origin next turn
                continue;
            }
            return None;
        }
        tiles_to_check = new_tiles;
    }
    None
}
