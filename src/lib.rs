//! Turn engine of a hex-map 4X strategy game: cities, civilizations,
//! research, policies and units, driven one turn at a time.

pub mod automation;
pub mod city;
pub mod civilization;
pub mod error;
pub mod files;
pub mod game_info;
pub mod game_parameters;
pub mod game_starter;
pub mod units;

#[cfg(test)]
pub(crate) mod testing;

pub use error::GameError;
pub use game_info::GameInfo;
pub use game_parameters::GameParameters;
pub use game_starter::GameStarter;
