//! Immutable, name-keyed rule tables consumed by the simulation.

pub mod building;
pub mod constants;
pub mod error;
pub mod policy;
pub mod ruleset;
pub mod stats;
pub mod tech;
pub mod terrain;
pub mod tile_improvement;
pub mod tile_resource;
pub mod unit;

pub use building::Building;
pub use error::RulesetError;
pub use policy::{Policy, PolicyBranch, PolicyType};
pub use ruleset::Ruleset;
pub use stats::{Stat, Stats};
pub use tech::{TechColumn, Technology};
pub use terrain::{Terrain, TerrainType};
pub use tile_improvement::TileImprovement;
pub use tile_resource::{ResourceType, TileResource};
pub use unit::BaseUnit;
