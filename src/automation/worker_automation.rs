use tracing::debug;

use map::pathfinding::{shortest_path, MovementContext};
use map::tile_stats::tile_stats;
use map::{HexCoord, TileInfo, TileMap};
use rules::constants::{
    DESERT, FARM, FOREST, GRASSLAND, HILL, JUNGLE, LUMBER_MILL, MARSH, MINE, PLAINS, REMOVE_PREFIX, TRADING_POST, TUNDRA,
};
use rules::TileImprovement;

use super::rank_tile;
use crate::civilization::CivContext;
use crate::units::head_towards;

/// How far from its position a worker looks for work
const WORK_SEARCH_RADIUS: i32 = 4;

/// Improvement a worker would build on `tile`: the resource's own
/// improvement when buildable, otherwise one picked by terrain
pub fn choose_improvement<'r>(tile: &TileInfo, civ: &CivContext<'r>) -> Option<&'r TileImprovement> {
    let ruleset = civ.ruleset;
    let from_resource = tile.visible_resource(ruleset, civ).and_then(|r| r.improvement.clone());
    let from_terrain = match tile.terrain_feature.as_deref() {
        Some(FOREST) => Some(LUMBER_MILL.to_string()),
        Some(JUNGLE) => Some(TRADING_POST.to_string()),
        Some(MARSH) => Some(format!("{REMOVE_PREFIX}{MARSH}")),
        Some(_) => None,
        None => match tile.base_terrain.as_str() {
            HILL => Some(MINE.to_string()),
            GRASSLAND | PLAINS | DESERT => Some(FARM.to_string()),
            TUNDRA => Some(TRADING_POST.to_string()),
            _ => None,
        },
    };
    [from_resource, from_terrain]
        .into_iter()
        .flatten()
        .filter_map(|name| ruleset.improvement(&name))
        .find(|improvement| tile.can_build_improvement(improvement, ruleset, civ))
}

/// Best owned tile near `position` that still needs an improvement and can
/// be reached; the worker's own tile wins ties
fn find_tile_to_work(position: HexCoord, civ: &CivContext<'_>, map: &TileMap, movement: MovementContext<'_>) -> Option<HexCoord> {
    let ruleset = civ.ruleset;
    let unit = map.get(position)?.unit.as_ref()?;
    let mut candidates: Vec<(HexCoord, f32)> = map
        .tiles_in_distance(position, WORK_SEARCH_RADIUS)
        .into_iter()
        .filter(|t| t.owner.as_deref() == Some(civ.civ_name.as_str()))
        .filter(|t| !t.is_city_center() && t.improvement_in_progress.is_none())
        .filter(|t| t.position == position || !t.is_occupied())
        .filter(|t| choose_improvement(t, civ).is_some())
        .map(|t| (t.position, rank_tile(t, &tile_stats(t, ruleset, civ, None))))
        .collect();
    // stable sort keeps the worker's own tile (distance 0) ahead of equal ranks
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.into_iter().map(|(p, _)| p).find(|&target| {
        target == position
            || shortest_path(map, ruleset, position, target, unit.current_movement, unit.max_movement, movement).is_some()
    })
}

/// Runs one turn of an automated worker. Returns where it ends up.
pub fn automate_worker(position: HexCoord, civ: &CivContext<'_>, map: &mut TileMap) -> HexCoord {
    let busy = map.get(position).is_some_and(|t| t.improvement_in_progress.is_some());
    if busy {
        return position;
    }
    let movement = MovementContext { civ: &civ.civ_name, improved_roads: civ.improved_roads() };
    let Some(target) = find_tile_to_work(position, civ, map, movement) else {
        return position;
    };
    let current = if target == position { position } else { head_towards(map, civ.ruleset, position, target, movement) };
    if current == target {
        if let Some(tile) = map.get_mut(target) {
            if let Some(improvement) = choose_improvement(tile, civ) {
                debug!(%target, improvement = %improvement.name, "worker started improvement");
                tile.start_working_on_improvement(improvement);
            }
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestGame;
    use map::{MapUnit, UnitAction};

    #[test]
    fn test_choose_improvement_by_terrain() {
        let game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let mut ctx = game.context_in(&ruleset);
        ctx.techs_researched.extend(["Mining", "Bronze Working", "Construction", "Masonry"].map(String::from));

        let mut tile = TileInfo::new(HexCoord::new(1, 0), "Grassland");
        assert_eq!(choose_improvement(&tile, &ctx).map(|i| i.name.as_str()), Some("Farm"));
        tile.base_terrain = "Hill".into();
        assert_eq!(choose_improvement(&tile, &ctx).map(|i| i.name.as_str()), Some("Mine"));
        tile.base_terrain = "Grassland".into();
        tile.terrain_feature = Some("Marsh".into());
        assert_eq!(choose_improvement(&tile, &ctx).map(|i| i.name.as_str()), Some("Remove Marsh"));
        tile.terrain_feature = None;
        tile.resource = Some("Marble".into());
        assert_eq!(choose_improvement(&tile, &ctx).map(|i| i.name.as_str()), Some("Quarry"));
    }

    #[test]
    fn test_automated_worker_starts_improving() {
        let mut game = TestGame::new();
        let ruleset = game.ruleset.clone();
        let position = HexCoord::new(0, 1);
        let mut worker = MapUnit::new("Worker", "Rome", 2);
        worker.action = Some(UnitAction::Automate);
        game.game.tile_map.get_mut(position).unwrap().unit = Some(worker);

        let ctx = game.context_in(&ruleset);
        let end = automate_worker(position, &ctx, &mut game.game.tile_map);
        let tile = game.game.tile_map.get(end).unwrap();
        assert_eq!(tile.owner.as_deref(), Some("Rome"));
        assert_eq!(tile.improvement_in_progress.as_deref(), Some("Farm"));
        assert!(tile.unit.is_some());

        // a busy worker stays put
        assert_eq!(automate_worker(end, &ctx, &mut game.game.tile_map), end);
    }
}
