//! Save files: plain JSON or gzip+base64, sniffed on load.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use rules::Ruleset;
use util::{Gzip, UtilError};

use crate::error::GameError;
use crate::game_info::GameInfo;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupted compressed save: {0}")]
    Gzip(#[from] UtilError),
    #[error("save does not match the ruleset: {0}")]
    Game(#[from] GameError),
}

pub fn game_to_string(game: &GameInfo, zipped: bool) -> Result<String, SaveError> {
    let json = serde_json::to_string(game)?;
    if zipped {
        Ok(Gzip::zip(&json)?)
    } else {
        Ok(json)
    }
}

/// Parses a save in either format and runs the post-load fix-up
pub fn game_from_string(data: &str, ruleset: Arc<Ruleset>) -> Result<GameInfo, SaveError> {
    let trimmed = data.trim_start();
    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        debug!("save is compressed");
        Gzip::unzip(trimmed)?
    };
    let mut game: GameInfo = serde_json::from_str(&json)?;
    game.set_transients(ruleset)?;
    Ok(game)
}

pub fn save_game(game: &GameInfo, path: &Path, zipped: bool) -> Result<(), SaveError> {
    let data = game_to_string(game, zipped)?;
    fs::write(path, data)?;
    info!(path = %path.display(), turn = game.turns, zipped, "game saved");
    Ok(())
}

pub fn load_game(path: &Path, ruleset: Arc<Ruleset>) -> Result<GameInfo, SaveError> {
    let data = fs::read_to_string(path)?;
    let game = game_from_string(&data, ruleset)?;
    info!(path = %path.display(), turn = game.turns, "game loaded");
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestGame;
    use map::HexCoord;

    fn played_game() -> TestGame {
        let mut game = TestGame::new();
        game.game.queue_technology("Pottery").unwrap();
        game.game.set_construction("Rome", "Monument").unwrap();
        for _ in 0..3 {
            game.game.next_turn().unwrap();
        }
        game
    }

    fn assert_same_state(before: &GameInfo, after: &GameInfo) {
        for (a, b) in before.tile_map.tiles().zip(after.tile_map.tiles()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.owner, b.owner);
            assert_eq!(a.owning_city, b.owning_city);
            assert_eq!(a.working_city, b.working_city);
            assert_eq!(a.city_center, b.city_center);
        }
        let (a, b) = (before.current_civ().unwrap(), after.current_civ().unwrap());
        assert_eq!(a.tech.techs_researched, b.tech.techs_researched);
        assert_eq!(a.tech.techs_to_research, b.tech.techs_to_research);
        assert_eq!(a.policies.adopted_policies, b.policies.adopted_policies);
        assert_eq!(a.cities[0].city_constructions.current_construction, b.cities[0].city_constructions.current_construction);
        assert_eq!(a.cities[0].city_constructions.in_progress_constructions, b.cities[0].city_constructions.in_progress_constructions);
        assert_eq!(a.cities[0].city_stats.current, b.cities[0].city_stats.current);
        assert_eq!(after.turns, 3);
    }

    #[test]
    fn test_round_trip_through_file() {
        let game = played_game();
        let dir = tempfile::tempdir().unwrap();
        for zipped in [false, true] {
            let path = dir.path().join(format!("save-{zipped}.json"));
            save_game(&game.game, &path, zipped).unwrap();
            let loaded = load_game(&path, game.ruleset.clone()).unwrap();
            assert_same_state(&game.game, &loaded);
            assert_eq!(loaded.civ("Rome").unwrap().cities[0].civ_name, "Rome");
        }
    }

    #[test]
    fn test_corrupted_saves_are_errors() {
        let ruleset = TestGame::new().ruleset;
        assert!(matches!(game_from_string("{\"turns\": ", ruleset.clone()), Err(SaveError::Json(_))));
        assert!(matches!(game_from_string("H4sI!!", ruleset), Err(SaveError::Gzip(_))));
    }

    #[test]
    fn test_unknown_names_fail_fast() {
        let mut game = TestGame::new();
        game.game.civilizations[0].cities[0].city_constructions.current_construction = "Death Star".to_string();
        let text = game_to_string(&game.game, false).unwrap();
        let result = game_from_string(&text, game.ruleset.clone());
        assert!(matches!(result, Err(SaveError::Game(GameError::UnknownConstruction(name))) if name == "Death Star"));

        let mut game = TestGame::new();
        if let Some(tile) = game.game.tile_map.get_mut(HexCoord::new(2, 0)) {
            tile.improvement = Some("Moat".to_string());
        }
        let text = game_to_string(&game.game, true).unwrap();
        let result = game_from_string(&text, game.ruleset.clone());
        assert!(matches!(result, Err(SaveError::Game(GameError::UnknownImprovement(_)))));
    }
}
