use serde::{Deserialize, Serialize};

/// Default length of a golden age in turns
const GOLDEN_AGE_LENGTH: f32 = 10.0;

/// Manages golden ages for a civilization
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoldenAgeManager {
    /// Happiness banked towards the next golden age
    pub stored_happiness: i32,
    /// Number of golden ages experienced so far
    pub number_of_golden_ages: i32,
    pub turns_left_for_current_golden_age: i32,
}

impl GoldenAgeManager {
    /// Creates a new GoldenAgeManager
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_golden_age(&self) -> bool {
        self.turns_left_for_current_golden_age > 0
    }

    /// Happiness needed to trigger the next golden age
    pub fn happiness_required_for_next_golden_age(&self, city_count: usize) -> i32 {
        let cost = (500.0 + self.number_of_golden_ages as f32 * 250.0) * (1.0 + city_count as f32 / 100.0);
        cost as i32
    }

    /// Starts (or extends) a golden age; `length_multiplier` folds in the
    /// length bonuses the civilization owns
    pub fn enter_golden_age(&mut self, length_multiplier: f32) {
        self.turns_left_for_current_golden_age += (GOLDEN_AGE_LENGTH * length_multiplier) as i32;
    }

    /// Banks happiness or counts down the current golden age.
    /// Returns true when a new golden age started this turn.
    pub fn end_turn(&mut self, happiness: i32, city_count: usize, length_multiplier: f32) -> bool {
        if self.is_golden_age() {
            self.turns_left_for_current_golden_age -= 1;
            return false;
        }
        if happiness > 0 {
            self.stored_happiness += happiness;
        }
        let required = self.happiness_required_for_next_golden_age(city_count);
        if self.stored_happiness > required {
            self.stored_happiness -= required;
            self.enter_golden_age(length_multiplier);
            self.number_of_golden_ages += 1;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_grows_with_golden_ages_and_cities() {
        let mut manager = GoldenAgeManager::new();
        assert_eq!(manager.happiness_required_for_next_golden_age(0), 500);
        assert_eq!(manager.happiness_required_for_next_golden_age(10), 550);
        manager.number_of_golden_ages = 2;
        assert_eq!(manager.happiness_required_for_next_golden_age(0), 1000);
    }

    #[test]
    fn test_banking_and_countdown() {
        let mut manager = GoldenAgeManager::new();
        manager.stored_happiness = 495;
        assert!(!manager.end_turn(-20, 1, 1.0));
        assert_eq!(manager.stored_happiness, 495);
        assert!(manager.end_turn(20, 1, 1.5));
        assert_eq!(manager.stored_happiness, 10);
        assert_eq!(manager.turns_left_for_current_golden_age, 15);
        assert_eq!(manager.number_of_golden_ages, 1);

        // happiness is not banked during a golden age
        assert!(!manager.end_turn(100, 1, 1.0));
        assert_eq!(manager.stored_happiness, 10);
        assert_eq!(manager.turns_left_for_current_golden_age, 14);
    }
}
