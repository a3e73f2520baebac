//! Hex grid, tiles, units and the movement/visibility engine.

pub mod hex_math;
pub mod map_generator;
pub mod map_unit;
pub mod pathfinding;
pub mod tile_info;
pub mod tile_map;
pub mod tile_stats;
pub mod visibility;

pub use hex_math::HexCoord;
pub use map_generator::{MapGenerator, MapParameters};
pub use map_unit::{MapUnit, UnitAction};
pub use tile_info::{RoadStatus, TileInfo};
pub use tile_map::TileMap;
pub use tile_stats::{CityView, CivView};
