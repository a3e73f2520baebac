use serde::{Deserialize, Serialize};

use super::Technology;

/// A column of the tech tree; every tech in it shares the column's cost
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechColumn {
    pub column_number: i32,
    pub era: String,
    pub tech_cost: i32,
    #[serde(default)]
    pub techs: Vec<Technology>,
}

impl TechColumn {
    /// Consumes the column, stamping its number, era and cost onto each tech
    pub fn into_technologies(self) -> Vec<Technology> {
        let TechColumn { column_number, era, tech_cost, techs } = self;
        techs
            .into_iter()
            .map(|mut tech| {
                tech.column = column_number;
                tech.era = era.clone();
                tech.cost = tech_cost;
                tech
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_cost_is_applied_to_techs() {
        let column: TechColumn = serde_json::from_str(
            r#"{"columnNumber": 2, "era": "Ancient", "techCost": 55,
                "techs": [{"name": "Writing", "prerequisites": ["Pottery"]}]}"#,
        )
        .unwrap();
        let techs = column.into_technologies();
        assert_eq!(techs[0].cost, 55);
        assert_eq!(techs[0].column, 2);
        assert_eq!(techs[0].era, "Ancient");
    }
}
