use std::path::PathBuf;

use thiserror::Error;

use rules::RulesetError;

/// Configuration faults: names that do not exist in the ruleset, or broken
/// setup files. Gameplay precondition failures are not errors.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown construction: {0}")]
    UnknownConstruction(String),
    #[error("unknown technology: {0}")]
    UnknownTechnology(String),
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),
    #[error("unknown unit type: {0}")]
    UnknownUnit(String),
    #[error("unknown city: {0}")]
    UnknownCity(String),
    #[error("unknown civilization: {0}")]
    UnknownCivilization(String),
    #[error("unknown terrain: {0}")]
    UnknownTerrain(String),
    #[error("unknown improvement: {0}")]
    UnknownImprovement(String),
    #[error(transparent)]
    Ruleset(#[from] RulesetError),
    #[error("failed to read {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid game parameters: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
