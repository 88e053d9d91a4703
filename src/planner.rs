//! Plan service: turns prompts into backend calls and backend JSON into typed plans.
//!
//! A swap is a two-phase operation. The replacement dish is generated first,
//! then the whole shopping list is recomputed from the updated four-part plan.
//! The second call is only issued once the first has returned. If the
//! recompute fails, the new dish stays in the plan next to the previous list
//! (see [`SwapOutcome`]).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::api_connection::connection::{ApiConnectionError, TextGenerator};
use crate::api_connection::endpoints::{GenerationRequest, JsonSchemaDefinition};
use crate::meal_plan::{Course, FullMealPlan, MealConstraints, MealPart, ShoppingCategory};
use crate::prompt::{self, PLAN_SYSTEM_INSTRUCTION, SWAP_SYSTEM_INSTRUCTION};
use crate::schema;
use crate::validation::{self, SchemaViolation};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("backend call failed: {0}")]
    Backend(#[from] ApiConnectionError),
    #[error("backend returned an empty response")]
    EmptyResponse,
    #[error("backend response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Only transport-level failures are worth retrying; a response of the wrong shape is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Backend(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<SchemaViolation> for GenerationError {
    fn from(violation: SchemaViolation) -> Self {
        GenerationError::MalformedResponse(violation.to_string())
    }
}

/// A meal part as the backend returns it: no role tag.
#[derive(Debug, Deserialize)]
struct DishDraft {
    name: String,
    description: String,
    ingredients: Vec<String>,
    instructions: Vec<String>,
}

impl DishDraft {
    fn into_part(self, course: Course) -> Result<MealPart, GenerationError> {
        if self.name.trim().is_empty() {
            return Err(GenerationError::MalformedResponse(format!(
                "{} has an empty name",
                course.key()
            )));
        }
        Ok(MealPart {
            id: course,
            name: self.name,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDraft {
    country: String,
    appetizer: DishDraft,
    side_dish: DishDraft,
    main_course: DishDraft,
    drink: DishDraft,
    shopping_list: Vec<ShoppingCategory>,
}

impl PlanDraft {
    fn into_plan(self) -> Result<FullMealPlan, GenerationError> {
        Ok(FullMealPlan {
            country: self.country,
            appetizer: self.appetizer.into_part(Course::Appetizer)?,
            side_dish: self.side_dish.into_part(Course::SideDish)?,
            main_course: self.main_course.into_part(Course::MainCourse)?,
            drink: self.drink.into_part(Course::Drink)?,
            shopping_list: self.shopping_list,
        })
    }
}

/// Result of a completed phase 1.
#[derive(Debug)]
pub struct SwapOutcome {
    /// The plan with the new dish in place. Its shopping list is fresh unless
    /// `shopping_list_error` is set, in which case it is the previous list.
    pub plan: FullMealPlan,
    pub shopping_list_error: Option<GenerationError>,
}

impl SwapOutcome {
    pub fn is_settled(&self) -> bool {
        self.shopping_list_error.is_none()
    }
}

pub struct MealPlanner<G> {
    backend: G,
    model: String,
}

impl<G: TextGenerator> MealPlanner<G> {
    pub fn new(backend: G, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_full_meal_plan(
        &self,
        country: &str,
        constraints: &MealConstraints,
    ) -> Result<FullMealPlan, GenerationError> {
        tracing::info!(country, "generating full meal plan");
        let draft: PlanDraft = self
            .request(
                prompt::plan_prompt(country, constraints),
                Some(PLAN_SYSTEM_INSTRUCTION),
                schema::full_plan_definition(),
            )
            .await?;
        let plan = draft.into_plan()?;
        tracing::info!(
            country = %plan.country,
            categories = plan.shopping_list.len(),
            "meal plan generated"
        );
        Ok(plan)
    }

    /// Generates a replacement for `course`. The role on the result is always `course`.
    pub async fn swap_meal_part(
        &self,
        country: &str,
        course: Course,
        current_name: &str,
        constraints: &MealConstraints,
        guidance: Option<&str>,
    ) -> Result<MealPart, GenerationError> {
        let guidance = prompt::effective_guidance(guidance);
        tracing::info!(country, %course, current_name, ?guidance, "swapping meal part");
        let draft: DishDraft = self
            .request(
                prompt::swap_prompt(country, course, current_name, constraints, guidance),
                Some(SWAP_SYSTEM_INSTRUCTION),
                schema::meal_part_definition(),
            )
            .await?;
        draft.into_part(course)
    }

    pub async fn update_shopping_list(
        &self,
        plan: &FullMealPlan,
    ) -> Result<Vec<ShoppingCategory>, GenerationError> {
        tracing::info!(country = %plan.country, "recomputing shopping list");
        self.request(
            prompt::shopping_list_prompt(plan),
            None,
            schema::shopping_list_definition(),
        )
        .await
    }

    /// Replaces one course and recomputes the shopping list from the updated plan.
    ///
    /// Returns `Err` only when phase 1 fails, in which case `plan` is still the
    /// current plan. A phase 2 failure is reported in [`SwapOutcome::shopping_list_error`].
    pub async fn swap_course(
        &self,
        plan: &FullMealPlan,
        course: Course,
        constraints: &MealConstraints,
        guidance: Option<&str>,
    ) -> Result<SwapOutcome, GenerationError> {
        let current = plan.part(course);
        let replacement = self
            .swap_meal_part(&plan.country, course, &current.name, constraints, guidance)
            .await?;
        tracing::info!(%course, from = %current.name, to = %replacement.name, "course replaced");

        let mut updated = plan.with_part(replacement);
        match self.update_shopping_list(&updated).await {
            Ok(list) => {
                updated.shopping_list = list;
                Ok(SwapOutcome {
                    plan: updated,
                    shopping_list_error: None,
                })
            }
            Err(err) => {
                tracing::warn!(
                    %course,
                    error = %err,
                    "shopping list recompute failed; keeping previous list"
                );
                Ok(SwapOutcome {
                    plan: updated,
                    shopping_list_error: Some(err),
                })
            }
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        prompt: String,
        system_instruction: Option<&str>,
        schema: JsonSchemaDefinition,
    ) -> Result<T, GenerationError> {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            system_instruction: system_instruction.map(str::to_string),
            schema,
        };
        let raw = self.backend.generate_json(&request).await?;
        tracing::debug!(schema = %request.schema.name, raw = %raw, "raw backend response");

        let content = validation::strip_code_fence(&raw);
        if content.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        let value: serde_json::Value = serde_json::from_str(content)?;
        validation::check(&value, &request.schema.schema)?;
        Ok(serde_json::from_value(value)?)
    }
}
