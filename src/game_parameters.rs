use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use map::MapParameters;

use crate::error::GameError;

/// Setup options for a new game, read from JSON with every field optional
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameParameters {
    pub civilization_name: String,
    pub map_radius: i32,
    pub seed: u64,
    /// Directory holding the ruleset JSON tables; the built-in set otherwise
    pub ruleset: Option<PathBuf>,
    pub resource_frequency: f64,
    pub feature_frequency: f64,
    pub starting_gold: i32,
}

impl Default for GameParameters {
    fn default() -> Self {
        let map = MapParameters::default();
        Self {
            civilization_name: "Rome".to_string(),
            map_radius: map.radius,
            seed: map.seed,
            ruleset: None,
            resource_frequency: map.resource_frequency,
            feature_frequency: map.feature_frequency,
            starting_gold: 0,
        }
    }
}

impl GameParameters {
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path).map_err(|source| GameError::ConfigIo { path: path.to_path_buf(), source })?;
        let params: GameParameters = serde_json::from_str(&text)?;
        debug!(path = %path.display(), ?params, "game parameters loaded");
        Ok(params)
    }

    pub fn map_parameters(&self) -> MapParameters {
        MapParameters {
            radius: self.map_radius,
            seed: self.seed,
            resource_frequency: self.resource_frequency.clamp(0.0, 1.0),
            feature_frequency: self.feature_frequency.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_take_defaults() {
        let params: GameParameters = serde_json::from_str(r#"{"mapRadius": 4, "startingGold": 50}"#).unwrap();
        assert_eq!(params.map_radius, 4);
        assert_eq!(params.starting_gold, 50);
        assert_eq!(params.civilization_name, "Rome");
        assert!(params.ruleset.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"civilizationName": "Babylon", "seed": 7, "resourceFrequency": 3.0}}"#).unwrap();
        let params = GameParameters::load(file.path()).unwrap();
        assert_eq!(params.civilization_name, "Babylon");
        assert_eq!(params.map_parameters().seed, 7);
        assert_eq!(params.map_parameters().resource_frequency, 1.0);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            GameParameters::load(Path::new("/nonexistent/params.json")),
            Err(GameError::ConfigIo { .. })
        ));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(GameParameters::load(file.path()), Err(GameError::ConfigJson(_))));
    }
}
