use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rules::constants::policies;
use rules::{PolicyType, Ruleset};

use crate::error::GameError;

/// Social policy state of a civilization
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyManager {
    pub free_policies: i32,
    pub stored_culture: i32,
    pub adopted_policies: BTreeSet<String>,
    /// Raised once when the civilization becomes able to adopt a policy
    pub should_open_policy_picker: bool,
}

impl PolicyManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_adopted(&self, policy: &str) -> bool {
        self.adopted_policies.contains(policy)
    }

    /// Adopted policies excluding branch finishers
    pub fn number_of_adopted_policies(&self, ruleset: &Ruleset) -> usize {
        self.adopted_policies
            .iter()
            .filter(|p| ruleset.policy(p).is_some_and(|p| p.policy_type != PolicyType::BranchComplete))
            .count()
    }

    pub fn culture_needed_for_next_policy(&self, ruleset: &Ruleset, city_count: usize, cost_reduction: bool) -> i32 {
        let adopted = self.number_of_adopted_policies(ruleset) as f32;
        let base = 25.0 + (6.0 * adopted).powf(1.7);
        let mut city_modifier = 0.3 * (city_count.max(1) - 1) as f32;
        if self.is_adopted(policies::REPRESENTATION) {
            city_modifier *= 2.0 / 3.0;
        }
        let mut cost = (base * (1.0 + city_modifier)).round() as i32;
        if self.is_adopted(policies::PIETY_COMPLETE) {
            cost = (cost as f32 * 0.9) as i32;
        }
        if cost_reduction {
            cost = (cost as f32 * 0.9) as i32;
        }
        cost - cost % 5
    }

    pub fn can_adopt_policy(&self, culture_needed: i32) -> bool {
        self.free_policies > 0 || self.stored_culture >= culture_needed
    }

    /// Not yet adopted, not a finisher, and every requirement adopted
    pub fn is_adoptable(&self, policy: &str, ruleset: &Ruleset) -> bool {
        let Some(policy) = ruleset.policy(policy) else {
            return false;
        };
        !self.is_adopted(&policy.name)
            && policy.policy_type != PolicyType::BranchComplete
            && policy.requires.iter().flatten().all(|r| self.is_adopted(r))
    }

    /// Banks culture and raises the picker flag on the turn the threshold is crossed
    pub fn add_culture(&mut self, culture: i32, culture_needed: i32) {
        let could_adopt = self.can_adopt_policy(culture_needed);
        self.stored_culture += culture;
        if !could_adopt && self.can_adopt_policy(culture_needed) {
            self.should_open_policy_picker = true;
        }
    }

    /// Adopts `policy`, paying with a free policy first and culture otherwise.
    /// Returns every newly adopted policy, including a branch finisher that
    /// the adoption completed; empty if the adoption was not possible.
    pub fn adopt(&mut self, policy: &str, ruleset: &Ruleset, culture_needed: i32) -> Result<Vec<String>, GameError> {
        let definition = ruleset
            .policy(policy)
            .ok_or_else(|| GameError::UnknownPolicy(policy.to_string()))?;
        if !self.is_adoptable(policy, ruleset) {
            return Ok(Vec::new());
        }
        if self.free_policies > 0 {
            self.free_policies -= 1;
        } else if self.stored_culture >= culture_needed {
            self.stored_culture -= culture_needed;
        } else {
            return Ok(Vec::new());
        }

        self.adopted_policies.insert(policy.to_string());
        self.should_open_policy_picker = false;
        let mut adopted = vec![policy.to_string()];

        let branch = definition.branch.as_str();
        let mut finisher = None;
        let mut complete = true;
        for member in ruleset.branch_policies(branch) {
            match member.policy_type {
                PolicyType::BranchComplete => finisher = Some(member.name.clone()),
                _ => complete &= self.is_adopted(&member.name),
            }
        }
        if let (true, Some(finisher)) = (complete, finisher) {
            if self.adopted_policies.insert(finisher.clone()) {
                adopted.push(finisher);
            }
        }
        debug!(?adopted, stored_culture = self.stored_culture, "policies adopted");
        Ok(adopted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_cost() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut manager = PolicyManager::new();
        assert_eq!(manager.culture_needed_for_next_policy(&ruleset, 1, false), 25);
        // 25 * 1.6 = 40
        assert_eq!(manager.culture_needed_for_next_policy(&ruleset, 3, false), 40);
        // 25 * 0.9 = 22.5 -> 22 -> 20
        assert_eq!(manager.culture_needed_for_next_policy(&ruleset, 1, true), 20);

        manager.adopted_policies.insert("Tradition".into());
        // 25 + 6^1.7 = 46.04 -> 46 -> 45
        assert_eq!(manager.culture_needed_for_next_policy(&ruleset, 1, false), 45);
    }

    #[test]
    fn test_picker_is_edge_triggered() {
        let mut manager = PolicyManager::new();
        manager.add_culture(20, 25);
        assert!(!manager.should_open_policy_picker);
        manager.add_culture(10, 25);
        assert!(manager.should_open_policy_picker);
        manager.should_open_policy_picker = false;
        manager.add_culture(10, 25);
        assert!(!manager.should_open_policy_picker);
    }

    #[test]
    fn test_adoption_requires_branch_and_culture() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut manager = PolicyManager::new();
        manager.stored_culture = 100;
        assert!(manager.adopt("Aristocracy", &ruleset, 25).unwrap().is_empty());
        assert_eq!(manager.adopt("Tradition", &ruleset, 25).unwrap(), vec!["Tradition"]);
        assert_eq!(manager.stored_culture, 75);
        assert!(manager.adopt("Tradition", &ruleset, 25).unwrap().is_empty());
        assert!(manager.adopt("Aristocracy", &ruleset, 500).unwrap().is_empty());
        assert!(matches!(manager.adopt("Anarchy", &ruleset, 0), Err(GameError::UnknownPolicy(_))));
    }

    #[test]
    fn test_completing_a_branch_grants_the_finisher() {
        let ruleset = Ruleset::vanilla().unwrap();
        let mut manager = PolicyManager::new();
        let members: Vec<String> =
            ["Aristocracy", "Legalism", "Landed Elite", "Monarchy"].iter().map(|p| p.to_string()).collect();
        manager.free_policies = 1 + members.len() as i32;
        manager.adopt("Tradition", &ruleset, 0).unwrap();
        let (last, rest) = members.split_last().unwrap();
        for member in rest {
            assert_eq!(manager.adopt(member, &ruleset, 1000).unwrap(), vec![member.clone()]);
        }
        let adopted = manager.adopt(last, &ruleset, 1000).unwrap();
        assert_eq!(adopted, vec![last.clone(), "Tradition Complete".to_string()]);
        assert_eq!(manager.free_policies, 0);
        assert!(!manager.is_adoptable("Tradition Complete", &ruleset));
    }
}
