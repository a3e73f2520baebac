use serde::{Deserialize, Serialize};

use rules::constants::{GREAT_ARTIST, GREAT_ENGINEER, GREAT_MERCHANT, GREAT_SCIENTIST};
use rules::{Stat, Stats};

const INITIAL_THRESHOLD: i32 = 100;

/// Stat checked first wins when several cross the threshold in one turn
const GREAT_PERSON_STATS: [(Stat, &str); 4] = [
    (Stat::Science, GREAT_SCIENTIST),
    (Stat::Production, GREAT_ENGINEER),
    (Stat::Culture, GREAT_ARTIST),
    (Stat::Gold, GREAT_MERCHANT),
];

/// Accumulates great person points; one threshold is shared by all four kinds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreatPersonManager {
    pub points_for_next_great_person: i32,
    pub great_person_points: Stats,
}

impl Default for GreatPersonManager {
    fn default() -> Self {
        Self { points_for_next_great_person: INITIAL_THRESHOLD, great_person_points: Stats::default() }
    }
}

impl GreatPersonManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_great_person_points(&mut self, points: Stats) {
        self.great_person_points += points;
    }

    /// The great person whose points exceed the threshold, without spending anything
    pub fn next_great_person(&self) -> Option<&'static str> {
        self.ready().map(|(_, name)| name)
    }

    fn ready(&self) -> Option<(Stat, &'static str)> {
        let threshold = self.points_for_next_great_person as f32;
        GREAT_PERSON_STATS.into_iter().find(|(stat, _)| self.great_person_points.get(*stat) > threshold)
    }

    /// Spends points on at most one great person, doubling the threshold
    pub fn get_new_great_person(&mut self) -> Option<&'static str> {
        let (stat, name) = self.ready()?;
        self.great_person_points.add_stat(stat, -(self.points_for_next_great_person as f32));
        self.points_for_next_great_person *= 2;
        Some(name)
    }

    /// The kind with the most accumulated points, without spending anything
    pub fn most_promising_great_person(&self) -> &'static str {
        let mut best = GREAT_PERSON_STATS[0];
        for candidate in GREAT_PERSON_STATS {
            if self.great_person_points.get(candidate.0) > self.great_person_points.get(best.0) {
                best = candidate;
            }
        }
        best.1
    }
}
