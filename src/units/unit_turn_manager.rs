use tracing::{debug, trace};

use map::pathfinding::{reachable_tiles_within_turn, shortest_path, MovementContext};
use map::{HexCoord, TileMap, UnitAction};
use rules::Ruleset;

use crate::automation::automate_worker;
use crate::civilization::CivContext;

/// Moves the unit at `from` one turn's leg towards `destination`.
/// Returns where the unit ends up.
pub fn head_towards(map: &mut TileMap, ruleset: &Ruleset, from: HexCoord, destination: HexCoord, ctx: MovementContext<'_>) -> HexCoord {
    let Some(unit) = map.get(from).and_then(|t| t.unit.as_ref()) else {
        return from;
    };
    if !unit.has_movement() {
        return from;
    }
    let (current_movement, max_movement) = (unit.current_movement, unit.max_movement);
    let Some(path) = shortest_path(map, ruleset, from, destination, current_movement, max_movement, ctx) else {
        debug!(%from, %destination, "no path");
        return from;
    };
    let Some(&stop) = path.first() else {
        return from;
    };
    let reachable = reachable_tiles_within_turn(map, ruleset, from, current_movement, ctx);
    let Some(&cost) = reachable.get(&stop) else {
        return from;
    };
    if !map.move_unit(from, stop) {
        return from;
    }
    if let Some(unit) = map.get_mut(stop).and_then(|t| t.unit.as_mut()) {
        unit.use_movement(cost);
    }
    trace!(%from, to = %stop, cost, "unit moved");
    stop
}

/// Ticks the improvement under a unit that can build improvements
fn work_on_improvement(position: HexCoord, ruleset: &Ruleset, map: &mut TileMap) {
    let Some(tile) = map.get_mut(position) else {
        return;
    };
    let can_build = tile
        .unit
        .as_ref()
        .and_then(|u| ruleset.unit(&u.name))
        .is_some_and(|u| u.can_build_improvements());
    if !can_build || tile.improvement_in_progress.is_none() {
        return;
    }
    tile.turns_to_improvement -= 1;
    if tile.turns_to_improvement <= 0 {
        debug!(%position, improvement = ?tile.improvement_in_progress, "improvement completed");
        tile.complete_improvement(ruleset);
    }
}

/// End of turn for every unit of the civilization: improvement work, the
/// standing order on whatever movement is left, then the movement reset
pub fn end_turn_units(civ: &CivContext<'_>, map: &mut TileMap) {
    let ruleset = civ.ruleset;
    let movement = MovementContext { civ: &civ.civ_name, improved_roads: civ.improved_roads() };
    let positions: Vec<HexCoord> = map
        .tiles()
        .filter(|t| t.unit.as_ref().is_some_and(|u| u.owner == civ.civ_name))
        .map(|t| t.position)
        .collect();

    for position in positions {
        work_on_improvement(position, ruleset, map);
        let Some(action) = map.get(position).and_then(|t| t.unit.as_ref()).map(|u| u.action.clone()) else {
            continue;
        };
        let current = match action {
            Some(UnitAction::MoveTo(destination)) => {
                let reached = head_towards(map, ruleset, position, destination, movement);
                if reached == destination {
                    if let Some(unit) = map.get_mut(reached).and_then(|t| t.unit.as_mut()) {
                        unit.action = None;
                    }
                }
                reached
            }
            Some(UnitAction::Automate) => automate_worker(position, civ, map),
            None => position,
        };
        if let Some(unit) = map.get_mut(current).and_then(|t| t.unit.as_mut()) {
            unit.reset_movement();
        }
    }
}
