use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::api_connection::connection::TextGenerator;
use crate::meal_plan::{Course, DietaryFlag, FullMealPlan, MealConstraints};
use crate::planner::{GenerationError, MealPlanner};

pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate meal plan. Please try again.";
pub const SWAP_FAILED_MESSAGE: &str = "Failed to swap dish. Please try again.";
pub const STALE_LIST_MESSAGE: &str = "Dish swapped, but the shopping list could not be refreshed.";
pub const REFRESH_FAILED_MESSAGE: &str = "Failed to refresh the shopping list. Please try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("country must not be blank")]
    BlankCountry,
    #[error("no meal plan has been generated yet")]
    NoPlan,
    #[error("a meal plan is already being generated")]
    GenerationInProgress,
    #[error("{0} is already being swapped")]
    SwapInProgress(Course),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// What a front end renders: the held plan plus progress and error indicators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub plan: Option<FullMealPlan>,
    pub constraints: MealConstraints,
    pub loading: bool,
    pub swapping: Option<Course>,
    pub error: Option<String>,
}

impl ViewState {
    fn busy(&self) -> Result<(), SessionError> {
        if self.loading {
            return Err(SessionError::GenerationInProgress);
        }
        if let Some(course) = self.swapping {
            return Err(SessionError::SwapInProgress(course));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStatus {
    /// The shopping list matches the four current dishes.
    Settled,
    /// The dish was replaced but the list still reflects the previous dishes.
    StaleShoppingList,
}

enum Activity {
    Loading,
    Swapping,
}

/// Clears the in-progress indicator on every exit path, including early returns.
struct ActivityGuard<'a> {
    state: &'a Mutex<ViewState>,
    activity: Activity,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        match self.activity {
            Activity::Loading => state.loading = false,
            Activity::Swapping => state.swapping = None,
        }
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the current plan and enforces the interaction rules: one operation
/// at a time, plan replaced in a single assignment after each success.
///
/// The state lock is never held across a backend call, so `snapshot` can be
/// read while an operation is in flight.
pub struct PlannerSession<G> {
    planner: MealPlanner<G>,
    state: Mutex<ViewState>,
}

impl<G: TextGenerator> PlannerSession<G> {
    pub fn new(planner: MealPlanner<G>) -> Self {
        Self {
            planner,
            state: Mutex::new(ViewState::default()),
        }
    }

    /// Starts from an existing plan, e.g. one loaded from disk.
    pub fn with_plan(
        planner: MealPlanner<G>,
        plan: FullMealPlan,
        constraints: MealConstraints,
    ) -> Self {
        Self {
            planner,
            state: Mutex::new(ViewState {
                plan: Some(plan),
                constraints,
                ..ViewState::default()
            }),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        lock(&self.state).clone()
    }

    pub fn plan(&self) -> Option<FullMealPlan> {
        lock(&self.state).plan.clone()
    }

    pub fn set_constraints(&self, constraints: MealConstraints) {
        lock(&self.state).constraints = constraints;
    }

    pub fn toggle_constraint(&self, flag: DietaryFlag) {
        lock(&self.state).constraints.toggle(flag);
    }

    pub async fn generate(&self, country: &str) -> Result<(), SessionError> {
        if country.trim().is_empty() {
            return Err(SessionError::BlankCountry);
        }
        let constraints = {
            let mut state = lock(&self.state);
            state.busy()?;
            state.loading = true;
            state.error = None;
            state.constraints
        };
        let _guard = ActivityGuard {
            state: &self.state,
            activity: Activity::Loading,
        };

        match self.planner.generate_full_meal_plan(country, &constraints).await {
            Ok(plan) => {
                lock(&self.state).plan = Some(plan);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, country, "meal plan generation failed");
                lock(&self.state).error = Some(GENERATE_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    pub async fn swap(
        &self,
        course: Course,
        guidance: Option<&str>,
    ) -> Result<SwapStatus, SessionError> {
        let (plan, constraints) = {
            let mut state = lock(&self.state);
            state.busy()?;
            let plan = state.plan.clone().ok_or(SessionError::NoPlan)?;
            state.swapping = Some(course);
            state.error = None;
            (plan, state.constraints)
        };
        let _guard = ActivityGuard {
            state: &self.state,
            activity: Activity::Swapping,
        };

        match self.planner.swap_course(&plan, course, &constraints, guidance).await {
            Ok(outcome) => {
                let status = if outcome.is_settled() {
                    SwapStatus::Settled
                } else {
                    SwapStatus::StaleShoppingList
                };
                let mut state = lock(&self.state);
                state.plan = Some(outcome.plan);
                if status == SwapStatus::StaleShoppingList {
                    state.error = Some(STALE_LIST_MESSAGE.to_string());
                }
                Ok(status)
            }
            Err(err) => {
                tracing::error!(error = %err, %course, "dish swap failed");
                lock(&self.state).error = Some(SWAP_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    /// Recomputes the shopping list of the held plan, settling a stale one.
    pub async fn refresh_shopping_list(&self) -> Result<(), SessionError> {
        let plan = {
            let mut state = lock(&self.state);
            state.busy()?;
            let plan = state.plan.clone().ok_or(SessionError::NoPlan)?;
            state.loading = true;
            plan
        };
        let _guard = ActivityGuard {
            state: &self.state,
            activity: Activity::Loading,
        };

        match self.planner.update_shopping_list(&plan).await {
            Ok(list) => {
                let mut state = lock(&self.state);
                state.error = None;
                state.plan = Some(FullMealPlan {
                    shopping_list: list,
                    ..plan
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    country = %plan.country,
                    "shopping list refresh failed"
                );
                lock(&self.state).error = Some(REFRESH_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }
}
