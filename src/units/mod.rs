//! Unit orders and end-of-turn processing.

pub mod great_person;
pub mod unit_turn_manager;

pub use great_person::{great_person_action, GreatPersonAction};
pub use unit_turn_manager::{end_turn_units, head_towards};
