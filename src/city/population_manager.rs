use serde::{Deserialize, Serialize};
use tracing::debug;

use rules::Stat;
use util::Counter;

/// Food needed for a city of `population` to grow once more
pub fn food_to_next_population(population: i32) -> i32 {
    let grown = (population - 1).max(0);
    15 + 6 * grown + (grown as f32).powf(1.8).floor() as i32
}

/// What happened to the population this turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopulationChange {
    Unchanged,
    Grew,
    Starved,
    /// Out of food, but a single citizen is never lost
    Starving,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationManager {
    pub population: i32,
    pub food_stored: i32,
    /// Citizens assigned to specialist slots, per stat
    pub specialists: Counter<Stat>,
}

impl Default for PopulationManager {
    fn default() -> Self {
        Self { population: 1, food_stored: 0, specialists: Counter::new() }
    }
}

impl PopulationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn food_to_next_population(&self) -> i32 {
        food_to_next_population(self.population)
    }

    pub fn number_of_specialists(&self) -> i32 {
        self.specialists.sum_values()
    }

    /// Citizens neither working a tile nor employed as specialists, never negative
    pub fn free_population(&self, worked_tiles: usize) -> i32 {
        (self.population - worked_tiles as i32 - self.number_of_specialists()).max(0)
    }

    /// How far tile and specialist assignments exceed the population
    pub fn over_assignment(&self, worked_tiles: usize) -> i32 {
        (worked_tiles as i32 + self.number_of_specialists() - self.population).max(0)
    }

    /// Applies this turn's food surplus or deficit. Starvation and growth
    /// never both happen in the same turn.
    pub fn next_turn(&mut self, food: i32) -> PopulationChange {
        self.food_stored += food;
        if self.food_stored < 0 {
            self.food_stored = 0;
            if self.population > 1 {
                self.population -= 1;
                return PopulationChange::Starved;
            }
            return PopulationChange::Starving;
        }
        let needed = self.food_to_next_population();
        if self.food_stored >= needed {
            self.food_stored -= needed;
            self.population += 1;
            debug!(population = self.population, "population grew");
            return PopulationChange::Grew;
        }
        PopulationChange::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_threshold() {
        assert_eq!(food_to_next_population(1), 15);
        assert_eq!(food_to_next_population(2), 22);
        assert_eq!(food_to_next_population(5), 51);
    }

    #[test]
    fn test_starvation_excludes_growth() {
        let mut population = PopulationManager { population: 3, food_stored: 5, ..Default::default() };
        assert_eq!(population.next_turn(-10), PopulationChange::Starved);
        assert_eq!(population.population, 2);
        assert_eq!(population.food_stored, 0);
    }

    #[test]
    fn test_single_citizen_never_starves_to_death() {
        let mut population = PopulationManager::new();
        assert_eq!(population.next_turn(-4), PopulationChange::Starving);
        assert_eq!(population.population, 1);
        assert_eq!(population.food_stored, 0);
    }

    #[test]
    fn test_growth_keeps_surplus() {
        let mut population = PopulationManager { food_stored: 10, ..Default::default() };
        assert_eq!(population.next_turn(8), PopulationChange::Grew);
        assert_eq!(population.population, 2);
        assert_eq!(population.food_stored, 3);
    }

    #[test]
    fn test_free_population_is_clamped() {
        let mut population = PopulationManager { population: 2, ..Default::default() };
        population.specialists.add(Stat::Science, 1);
        assert_eq!(population.free_population(0), 1);
        assert_eq!(population.free_population(3), 0);
        assert_eq!(population.over_assignment(3), 2);
    }
}
