use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use map::CityView;
use rules::constants::WORKER;

/// Buildings a city has, and the production it has put into each construction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityConstructions {
    pub built_buildings: BTreeSet<String>,
    /// Production accumulated per construction name
    pub in_progress_constructions: BTreeMap<String, i32>,
    pub current_construction: String,
}

impl Default for CityConstructions {
    fn default() -> Self {
        Self {
            built_buildings: BTreeSet::new(),
            in_progress_constructions: BTreeMap::new(),
            current_construction: WORKER.to_string(),
        }
    }
}

impl CityConstructions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_built(&self, building: &str) -> bool {
        self.built_buildings.contains(building)
    }

    pub fn work_done(&self, construction: &str) -> i32 {
        self.in_progress_constructions.get(construction).copied().unwrap_or(0)
    }

    /// Adds production to the current construction's ledger entry
    pub fn add_production(&mut self, production: i32) {
        *self
            .in_progress_constructions
            .entry(self.current_construction.clone())
            .or_insert(0) += production;
    }
}

impl CityView for CityConstructions {
    fn has_building(&self, building: &str) -> bool {
        self.is_built(building)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_is_per_construction() {
        let mut constructions = CityConstructions::new();
        constructions.add_production(5);
        constructions.current_construction = "Monument".into();
        constructions.add_production(3);
        constructions.add_production(3);
        assert_eq!(constructions.work_done(WORKER), 5);
        assert_eq!(constructions.work_done("Monument"), 6);
        assert_eq!(constructions.work_done("Granary"), 0);
    }
}
