use serde::{Deserialize, Serialize};

use crate::constants::uniques;

/// Definition of a unit type
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseUnit {
    pub name: String,
    pub movement: i32,
    #[serde(default)]
    pub cost: i32,
    #[serde(default)]
    pub hurry_cost_modifier: i32,
    pub required_tech: Option<String>,
    pub obsolete_tech: Option<String>,
    pub required_resource: Option<String>,
    #[serde(default)]
    pub uniques: Vec<String>,
}

impl BaseUnit {
    pub fn has_unique(&self, unique: &str) -> bool {
        self.uniques.iter().any(|u| u == unique)
    }

    pub fn is_great_person(&self) -> bool {
        self.has_unique(uniques::GREAT_PERSON)
    }

    pub fn can_build_improvements(&self) -> bool {
        self.has_unique(uniques::CAN_BUILD_IMPROVEMENTS)
    }

    pub fn founds_city(&self) -> bool {
        self.has_unique(uniques::FOUNDS_CITY)
    }
}
