use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use rules::Ruleset;

use crate::error::GameError;

/// Research state of a civilization
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TechManager {
    pub free_techs: i32,
    pub techs_researched: BTreeSet<String>,
    /// Science accumulated per technology
    pub techs_in_progress: BTreeMap<String, i32>,
    /// Research queue; the head is being researched
    pub techs_to_research: Vec<String>,
    /// Science left over from the last completed technology
    pub overflow_science: i32,
}

impl TechManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_researched(&self, tech: &str) -> bool {
        self.techs_researched.contains(tech)
    }

    pub fn current_technology(&self) -> Option<&str> {
        self.techs_to_research.first().map(String::as_str)
    }

    pub fn research_of_tech(&self, tech: &str) -> i32 {
        self.techs_in_progress.get(tech).copied().unwrap_or(0)
    }

    pub fn remaining_science_to_tech(&self, tech: &str, ruleset: &Ruleset) -> i32 {
        ruleset.technology(tech).map_or(0, |t| t.cost) - self.research_of_tech(tech)
    }

    /// Not yet researched, with every prerequisite known
    pub fn can_be_researched(&self, tech: &str, ruleset: &Ruleset) -> bool {
        let Some(technology) = ruleset.technology(tech) else {
            return false;
        };
        !self.is_researched(tech) && technology.prerequisites.iter().all(|p| self.is_researched(p))
    }

    /// Replaces the queue with the missing prerequisites of `tech`, oldest
    /// column first, followed by `tech` itself
    pub fn queue_technology(&mut self, tech: &str, ruleset: &Ruleset) -> Result<bool, GameError> {
        if ruleset.technology(tech).is_none() {
            return Err(GameError::UnknownTechnology(tech.to_string()));
        }
        if self.is_researched(tech) {
            return Ok(false);
        }

        let mut missing = BTreeSet::new();
        let mut stack = vec![tech.to_string()];
        while let Some(name) = stack.pop() {
            let technology = ruleset
                .technology(&name)
                .ok_or_else(|| GameError::UnknownTechnology(name.clone()))?;
            for prerequisite in &technology.prerequisites {
                if !self.is_researched(prerequisite) && missing.insert(prerequisite.clone()) {
                    stack.push(prerequisite.clone());
                }
            }
        }

        let mut queue: Vec<_> = missing.into_iter().filter_map(|name| ruleset.technology(&name)).collect();
        queue.sort_by(|a, b| (a.column, a.row, &a.name).cmp(&(b.column, b.row, &b.name)));
        self.techs_to_research = queue.into_iter().map(|t| t.name.clone()).collect();
        self.techs_to_research.push(tech.to_string());
        debug!(target_tech = tech, queue = ?self.techs_to_research, "research queued");
        Ok(true)
    }

    /// Adds this turn's science to the head of the queue. Returns the
    /// technology completed this turn, if any.
    pub fn next_turn(&mut self, science: i32, ruleset: &Ruleset) -> Option<String> {
        let current = self.current_technology()?.to_string();
        let cost = ruleset.technology(&current).map_or(0, |t| t.cost);
        let progress = self.techs_in_progress.entry(current.clone()).or_insert(0);
        *progress += science + std::mem::take(&mut self.overflow_science);
        if *progress < cost {
            debug!(tech = %current, progress = *progress, cost, "research progressed");
            return None;
        }

        let overflow = *progress - cost;
        self.overflow_science = overflow.min((science * 5).max(cost));
        self.techs_in_progress.remove(&current);
        self.techs_to_research.retain(|t| t != &current);
        self.techs_researched.insert(current.clone());
        Some(current)
    }

    /// Spends a free tech on `tech`
    pub fn get_free_technology(&mut self, tech: &str, ruleset: &Ruleset) -> Result<bool, GameError> {
        if ruleset.technology(tech).is_none() {
            return Err(GameError::UnknownTechnology(tech.to_string()));
        }
        if self.free_techs <= 0 || !self.can_be_researched(tech, ruleset) {
            return Ok(false);
        }
        self.free_techs -= 1;
        self.techs_in_progress.remove(tech);
        self.techs_to_research.retain(|t| t != tech);
        self.techs_researched.insert(tech.to_string());
        Ok(true)
    }

    /// The researchable technology a free tech would go to by default:
    /// the head of the queue, or else the cheapest available one
    pub fn default_free_technology(&self, ruleset: &Ruleset) -> Option<String> {
        if let Some(current) = self.current_technology() {
            if self.can_be_researched(current, ruleset) {
                return Some(current.to_string());
            }
        }
        ruleset
            .technologies
            .values()
            .filter(|t| self.can_be_researched(&t.name, ruleset))
            .min_by_key(|t| (t.cost, t.name.clone()))
            .map(|t| t.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_expands_prerequisites_in_column_order() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut tech = TechManager::new();
        tech.techs_researched.insert("Agriculture".into());
        assert!(tech.queue_technology("Currency", &ruleset).unwrap());
        assert_eq!(tech.techs_to_research, vec!["Mining", "Bronze Working", "Currency"]);

        assert!(tech.queue_technology("Philosophy", &ruleset).unwrap());
        assert_eq!(tech.techs_to_research.last().map(String::as_str), Some("Philosophy"));
        let columns: Vec<i32> = tech
            .techs_to_research
            .iter()
            .map(|t| ruleset.technology(t).unwrap().column)
            .collect();
        assert!(columns.windows(2).all(|w| w[0] <= w[1]));
        for name in &tech.techs_to_research {
            for prerequisite in &ruleset.technology(name).unwrap().prerequisites {
                let researched = tech.is_researched(prerequisite);
                let earlier = tech.techs_to_research.iter().position(|t| t == prerequisite)
                    < tech.techs_to_research.iter().position(|t| t == name);
                assert!(researched || earlier, "{prerequisite} must come before {name}");
            }
        }
    }

    #[test]
    fn test_unknown_and_researched_targets() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut tech = TechManager::new();
        assert!(matches!(tech.queue_technology("Warp Drive", &ruleset), Err(GameError::UnknownTechnology(_))));
        tech.techs_researched.insert("Agriculture".into());
        assert!(!tech.queue_technology("Agriculture", &ruleset).unwrap());
    }

    #[test]
    fn test_overflow_is_capped() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut tech = TechManager::new();
        tech.techs_researched.insert("Agriculture".into());
        tech.queue_technology("Pottery", &ruleset).unwrap();
        let cost = ruleset.technology("Pottery").unwrap().cost;

        assert_eq!(tech.next_turn(cost - 1, &ruleset), None);
        assert_eq!(tech.next_turn(cost * 10, &ruleset), Some("Pottery".to_string()));
        assert!(tech.is_researched("Pottery"));
        assert!(tech.techs_to_research.is_empty());
        // leftover is cost * 10 - 1, capped at five times this turn's science
        assert_eq!(tech.overflow_science, cost * 10 - 1);

        let mut tech = TechManager::new();
        tech.techs_researched.insert("Agriculture".into());
        tech.queue_technology("Pottery", &ruleset).unwrap();
        tech.techs_in_progress.insert("Pottery".into(), cost * 20);
        assert!(tech.next_turn(1, &ruleset).is_some());
        assert_eq!(tech.overflow_science, cost);
    }

    #[test]
    fn test_free_technology() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut tech = TechManager::new();
        tech.techs_researched.insert("Agriculture".into());
        assert!(!tech.get_free_technology("Pottery", &ruleset).unwrap());
        tech.free_techs = 1;
        assert!(!tech.get_free_technology("Currency", &ruleset).unwrap());
        assert!(tech.get_free_technology("Pottery", &ruleset).unwrap());
        assert_eq!(tech.free_techs, 0);
        assert!(tech.is_researched("Pottery"));
    }
}
