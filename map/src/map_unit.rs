use serde::{Deserialize, Serialize};

use crate::hex_math::HexCoord;

/// Standing order a unit carries out at the start of each of its turns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitAction {
    MoveTo(HexCoord),
    Automate,
}

/// A unit standing on a tile. The tile's occupant slot owns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapUnit {
    /// Name of the unit type in the ruleset
    pub name: String,
    /// Name of the owning civilization
    pub owner: String,
    pub max_movement: f32,
    pub current_movement: f32,
    pub action: Option<UnitAction>,
    /// Where the unit stands; rebuilt from the owning tile after loading
    #[serde(skip)]
    pub position: HexCoord,
}

impl MapUnit {
    /// Creates a unit with full movement
    pub fn new(name: &str, owner: &str, movement: i32) -> Self {
        Self {
            name: name.to_string(),
            owner: owner.to_string(),
            max_movement: movement as f32,
            current_movement: movement as f32,
            action: None,
            position: HexCoord::default(),
        }
    }

    pub fn reset_movement(&mut self) {
        self.current_movement = self.max_movement;
    }

    pub fn has_movement(&self) -> bool {
        self.current_movement > 0.0
    }

    /// Spends movement, never dropping below zero
    pub fn use_movement(&mut self, amount: f32) {
        self.current_movement = (self.current_movement - amount).max(0.0);
    }

    pub fn is_automated(&self) -> bool {
        self.action == Some(UnitAction::Automate)
    }

    pub fn destination(&self) -> Option<HexCoord> {
        match self.action {
            Some(UnitAction::MoveTo(destination)) => Some(destination),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_stays_in_bounds() {
        let mut unit = MapUnit::new("Worker", "Rome", 2);
        unit.use_movement(0.5);
        assert_eq!(unit.current_movement, 1.5);
        unit.use_movement(5.0);
        assert_eq!(unit.current_movement, 0.0);
        assert!(!unit.has_movement());
        unit.reset_movement();
        assert_eq!(unit.current_movement, unit.max_movement);
    }

    #[test]
    fn test_position_is_not_serialized() {
        let mut unit = MapUnit::new("Settler", "Rome", 2);
        unit.position = HexCoord::new(3, 4);
        unit.action = Some(UnitAction::MoveTo(HexCoord::new(1, 1)));
        let json = serde_json::to_string(&unit).unwrap();
        let restored: MapUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.position, HexCoord::default());
        assert_eq!(restored.destination(), Some(HexCoord::new(1, 1)));
    }
}
