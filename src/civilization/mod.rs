//! Empire-level state and the per-turn orchestrator.

pub mod civ_context;
pub mod civilization_info;
pub mod golden_age_manager;
pub mod great_person_manager;
pub mod notification;
pub mod policy_manager;
pub mod tech_manager;

pub use civ_context::{CapitalInfo, CivContext};
pub use civilization_info::CivilizationInfo;
pub use golden_age_manager::GoldenAgeManager;
pub use great_person_manager::GreatPersonManager;
pub use notification::Notification;
pub use policy_manager::PolicyManager;
pub use tech_manager::TechManager;
