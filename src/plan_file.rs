use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::meal_plan::{FullMealPlan, MealConstraints};

/// On-disk form of a plan: the plan fields at the top level plus the
/// constraints it was generated under, so later swaps keep honouring them.
/// Files without a `constraints` key load with no constraints set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlan {
    #[serde(default)]
    pub constraints: MealConstraints,
    #[serde(flatten)]
    pub plan: FullMealPlan,
}

impl SavedPlan {
    pub fn new(plan: FullMealPlan, constraints: MealConstraints) -> Self {
        Self { constraints, plan }
    }

    /// Constraints for a follow-up request: explicit flags win, otherwise the saved ones.
    pub fn constraints_or(&self, overrides: MealConstraints) -> MealConstraints {
        if overrides.active().next().is_none() {
            self.constraints
        } else {
            overrides
        }
    }
}

pub async fn load_plan(path: &Path) -> Result<SavedPlan> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read plan file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Plan file '{}' is not a valid meal plan", path.display()))
}

pub async fn save_plan(path: &Path, saved: &SavedPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(saved).context("Failed to serialize meal plan")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write plan file '{}'", path.display()))
}
