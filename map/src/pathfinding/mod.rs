//! Movement costs, single-turn reachability and multi-turn paths.

mod movement;
mod node_priority;

pub use movement::{movement_cost_between, reachable_tiles_within_turn, shortest_path, MovementContext};
