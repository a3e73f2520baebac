use serde::{Deserialize, Serialize};

/// Represents a technology in the tech tree
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technology {
    pub name: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub row: i32,
    /// Filled from the owning column at load time
    #[serde(skip)]
    pub column: i32,
    #[serde(skip)]
    pub era: String,
    #[serde(skip)]
    pub cost: i32,
}
