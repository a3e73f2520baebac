//! Tile ranking and worker automation.

pub mod worker_automation;

pub use worker_automation::{automate_worker, choose_improvement};

use map::TileInfo;
use rules::Stats;

/// Desirability of a tile for working or claiming. Food beyond 2 counts half.
pub fn rank_tile(tile: &TileInfo, stats: &Stats) -> f32 {
    let mut rank = if stats.food <= 2.0 { stats.food } else { 2.0 + (stats.food - 2.0) / 2.0 };
    rank += stats.gold / 2.0 + stats.production + stats.science + stats.culture;
    if tile.improvement.is_none() {
        rank += 0.5;
    }
    if tile.resource.is_some() {
        rank += 1.0;
    }
    rank
}
