//! Declarative hierarchy templates.

use serde::{Deserialize, Serialize};

use super::{HierarchyError, HierarchyModel, NodeKind};

fn default_goal_name() -> String {
    "Goal".to_string()
}

/// Shape of a two-level criteria tree plus an alternative set.
///
/// Expansion is pure: the same template always produces the same nodes,
/// names, ids and sibling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyTemplate {
    #[serde(default = "default_goal_name")]
    pub goal_name: String,
    pub main_criteria: usize,
    #[serde(default)]
    pub sub_criteria_per_main: usize,
    pub alternatives: usize,
}

impl HierarchyTemplate {
    pub fn new(main_criteria: usize, sub_criteria_per_main: usize, alternatives: usize) -> Self {
        Self {
            goal_name: default_goal_name(),
            main_criteria,
            sub_criteria_per_main,
            alternatives,
        }
    }

    pub fn with_goal_name(mut self, name: impl Into<String>) -> Self {
        self.goal_name = name.into();
        self
    }

    /// Builds a fresh hierarchy: goal, main criteria, their sub-criteria
    /// (grouped by main criterion), then alternatives.
    pub fn expand(&self) -> Result<HierarchyModel, HierarchyError> {
        let mut hierarchy = HierarchyModel::new(&self.goal_name)?;
        let goal = hierarchy.goal_id();

        let mut mains = Vec::with_capacity(self.main_criteria);
        for i in 1..=self.main_criteria {
            mains.push(hierarchy.add_node(goal, NodeKind::Criterion, &format!("Criterion {}", i))?);
        }
        for (i, main) in mains.iter().enumerate() {
            for j in 1..=self.sub_criteria_per_main {
                hierarchy.add_node(
                    *main,
                    NodeKind::Criterion,
                    &format!("Criterion {}.{}", i + 1, j),
                )?;
            }
        }
        for k in 1..=self.alternatives {
            hierarchy.add_node(goal, NodeKind::Alternative, &format!("Alternative {}", k))?;
        }
        Ok(hierarchy)
    }
}
