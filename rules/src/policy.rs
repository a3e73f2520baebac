use serde::{Deserialize, Serialize};

/// Where a policy sits inside its branch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyType {
    /// The policy that opens the branch
    Branch,
    Member,
    /// Granted automatically once every member is adopted
    BranchComplete,
}

/// A single social policy
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub name: String,
    /// Policies that must be adopted first; members default to their branch
    pub requires: Option<Vec<String>>,
    #[serde(default)]
    pub effect: String,
    #[serde(skip)]
    pub branch: String,
    #[serde(skip, default = "default_policy_type")]
    pub policy_type: PolicyType,
}

fn default_policy_type() -> PolicyType {
    PolicyType::Member
}

/// A branch of policies as written in the rules file
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyBranch {
    pub name: String,
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl PolicyBranch {
    pub fn complete_name(&self) -> String {
        format!("{} Complete", self.name)
    }

    /// Expands the branch into its opener, members and finisher
    pub fn into_policies(self) -> Vec<Policy> {
        let finisher = self.complete_name();
        let mut result = vec![Policy {
            name: self.name.clone(),
            requires: None,
            effect: self.effect.clone(),
            branch: self.name.clone(),
            policy_type: PolicyType::Branch,
        }];
        let mut has_finisher = false;
        for mut policy in self.policies {
            policy.branch = self.name.clone();
            if policy.name == finisher {
                policy.policy_type = PolicyType::BranchComplete;
                has_finisher = true;
            } else {
                policy.policy_type = PolicyType::Member;
                if policy.requires.is_none() {
                    policy.requires = Some(vec![self.name.clone()]);
                }
            }
            result.push(policy);
        }
        if !has_finisher {
            result.push(Policy {
                name: finisher,
                requires: None,
                effect: String::new(),
                branch: self.name.clone(),
                policy_type: PolicyType::BranchComplete,
            });
        }
        result
    }
}
