use serde::{Deserialize, Serialize};

/// Border growth state of a city
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityExpansionManager {
    pub culture_stored: i32,
    /// Tiles claimed beyond the initial ring
    pub tiles_claimed: i32,
}

impl CityExpansionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Culture needed for the next tile, with each reduction worth 25%
    pub fn culture_to_next_tile(&self, reductions: u32) -> i32 {
        let mut cost = 6.0 * (self.tiles_claimed as f32 + 1.4813).powf(1.3);
        for _ in 0..reductions {
            cost *= 0.75;
        }
        cost.round() as i32
    }

    /// Banks culture; returns the threshold if it was reached
    pub fn add_culture(&mut self, culture: i32, reductions: u32) -> Option<i32> {
        self.culture_stored += culture;
        let cost = self.culture_to_next_tile(reductions);
        (self.culture_stored >= cost).then_some(cost)
    }

    /// Pays for a claimed tile
    pub fn claim(&mut self, cost: i32) {
        self.culture_stored -= cost;
        self.tiles_claimed += 1;
    }
}
