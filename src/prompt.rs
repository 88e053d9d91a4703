use crate::meal_plan::{Course, FullMealPlan, MealConstraints};

pub const PLAN_SYSTEM_INSTRUCTION: &str = "You are a Michelin-star chef and world traveler. You specialize in authentic international cuisines and dietary adaptations.";

pub const SWAP_SYSTEM_INSTRUCTION: &str = "You are a culinary expert providing a single meal part replacement. Ensure authenticity to the specified country.";

/// `"Constraints: Gluten Free, No Coffee."`, or empty when no flag is set.
pub fn constraint_clause(constraints: &MealConstraints) -> String {
    let active: Vec<&str> = constraints.active().map(|flag| flag.label()).collect();
    if active.is_empty() {
        String::new()
    } else {
        format!("Constraints: {}.", active.join(", "))
    }
}

/// Guidance that is blank after trimming counts as absent.
pub fn effective_guidance(guidance: Option<&str>) -> Option<&str> {
    guidance.filter(|g| !g.trim().is_empty())
}

pub fn plan_prompt(country: &str, constraints: &MealConstraints) -> String {
    format!(
        "Plan a traditional 4-course meal from {country}.
The meal must include:
1. An Appetizer
2. A Side Dish
3. A Main Course
4. A Drink.
{constraints}
Provide a unified, categorized shopping list for all items. Ensure the recipes are authentic yet accessible.",
        constraints = constraint_clause(constraints),
    )
}

pub fn swap_prompt(
    country: &str,
    course: Course,
    current_name: &str,
    constraints: &MealConstraints,
    guidance: Option<&str>,
) -> String {
    let guidance_text = match effective_guidance(guidance) {
        Some(theme) => {
            format!("The user would like the new dish to be related to: \"{theme}\".")
        }
        None => "The replacement must be distinct from the previous one but still authentic \
                 to the culture."
            .to_string(),
    };
    format!(
        "Suggest a different {role} from {country} to replace \"{current_name}\".
{constraints}
{guidance_text}",
        role = course.label().to_lowercase(),
        constraints = constraint_clause(constraints),
    )
}

pub fn shopping_list_prompt(plan: &FullMealPlan) -> String {
    let mut dishes = String::new();
    for (index, part) in plan.parts().iter().enumerate() {
        dishes.push_str(&format!(
            "{}. {}: {}\n",
            index + 1,
            part.name,
            part.ingredients.join(", ")
        ));
    }
    format!(
        "Based on these 4 dishes from {country}:
{dishes}Create a unified, categorized shopping list (e.g., Produce, Meat/Protein, Pantry, Spices).
Deduplicate common items like salt, oil, or onions.",
        country = plan.country,
    )
}
