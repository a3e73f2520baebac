use std::fmt;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// The six yield kinds tracked by the simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Production,
    Food,
    Gold,
    Science,
    Culture,
    Happiness,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Production,
        Stat::Food,
        Stat::Gold,
        Stat::Science,
        Stat::Culture,
        Stat::Happiness,
    ];

    /// Stats a specialist slot can produce
    pub const SPECIALIST: [Stat; 4] = [Stat::Production, Stat::Gold, Stat::Science, Stat::Culture];
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stat::Production => "Production",
            Stat::Food => "Food",
            Stat::Gold => "Gold",
            Stat::Science => "Science",
            Stat::Culture => "Culture",
            Stat::Happiness => "Happiness",
        };
        f.write_str(name)
    }
}

/// A bundle of yields. Used both for absolute amounts and for percentage bonuses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub production: f32,
    pub food: f32,
    pub gold: f32,
    pub science: f32,
    pub culture: f32,
    pub happiness: f32,
}

impl Stats {
    /// Creates an empty Stats
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Production => self.production,
            Stat::Food => self.food,
            Stat::Gold => self.gold,
            Stat::Science => self.science,
            Stat::Culture => self.culture,
            Stat::Happiness => self.happiness,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::Production => &mut self.production,
            Stat::Food => &mut self.food,
            Stat::Gold => &mut self.gold,
            Stat::Science => &mut self.science,
            Stat::Culture => &mut self.culture,
            Stat::Happiness => &mut self.happiness,
        }
    }

    /// Adds an amount to a single stat
    pub fn add_stat(&mut self, stat: Stat, amount: f32) {
        *self.get_mut(stat) += amount;
    }

    /// Returns a copy with every stat multiplied by `factor`
    pub fn times(&self, factor: f32) -> Stats {
        let mut result = *self;
        for stat in Stat::ALL {
            *result.get_mut(stat) *= factor;
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) == 0.0)
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(mut self, other: Stats) -> Stats {
        self += other;
        self
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Stats) {
        for stat in Stat::ALL {
            self.add_stat(stat, other.get(stat));
        }
    }
}

impl Mul<f32> for Stats {
    type Output = Stats;

    fn mul(self, factor: f32) -> Stats {
        self.times(factor)
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Stat::ALL
            .iter()
            .filter(|s| self.get(**s) != 0.0)
            .map(|s| format!("{:+} {}", self.get(*s), s))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_times() {
        let a = Stats { food: 2.0, production: 1.0, ..Stats::default() };
        let b = Stats { food: 1.0, gold: 3.0, ..Stats::default() };
        let sum = a + b;
        assert_eq!(sum.food, 3.0);
        assert_eq!(sum.gold, 3.0);
        assert_eq!(sum.times(2.0).production, 2.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let stats: Stats = serde_json::from_str(r#"{"culture": 2}"#).unwrap();
        assert_eq!(stats.culture, 2.0);
        assert!(Stats::default().is_empty());
        assert_eq!(stats.to_string(), "+2 Culture");
    }
}
