//! City simulation: population, production, borders and yields.

pub mod city_constructions;
pub mod city_expansion_manager;
pub mod city_info;
pub mod city_stats;
pub mod construction;
pub mod population_manager;

pub use city_constructions::CityConstructions;
pub use city_expansion_manager::CityExpansionManager;
pub use city_info::{CityInfo, CityTurnEffects};
pub use city_stats::{CityStats, StatPipeline};
pub use construction::{Construction, PerpetualConstruction};
pub use population_manager::{food_to_next_population, PopulationChange, PopulationManager};
