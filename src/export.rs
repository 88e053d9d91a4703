use std::fmt::{self, Write};

use crate::meal_plan::{Course, FullMealPlan};

/// Renders the plan as a shareable Markdown document: menu overview, checklist
/// shopping list, then one section per course with ingredients and numbered steps.
pub fn to_markdown(plan: &FullMealPlan) -> String {
    let mut md = String::with_capacity(2048);
    render(&mut md, plan).map(|()| md).unwrap_or_default()
}

fn render(md: &mut String, plan: &FullMealPlan) -> fmt::Result {
    writeln!(md, "# Culinary Journey: {}\n", plan.country)?;

    writeln!(md, "## Menu Overview")?;
    for course in Course::ALL {
        writeln!(md, "- **{}**: {}", course.label(), plan.part(course).name)?;
    }
    writeln!(md)?;

    writeln!(md, "## Shopping List")?;
    for category in &plan.shopping_list {
        writeln!(md, "### {}", category.category)?;
        for item in &category.items {
            writeln!(md, "- [ ] {item}")?;
        }
        writeln!(md)?;
    }

    for course in Course::ALL {
        let part = plan.part(course);
        writeln!(md, "## {}: {}", course.label(), part.name)?;
        writeln!(md, "{}\n", part.description)?;
        writeln!(md, "### Ingredients")?;
        for ingredient in &part.ingredients {
            writeln!(md, "- {ingredient}")?;
        }
        writeln!(md, "\n### Instructions")?;
        for (index, step) in part.instructions.iter().enumerate() {
            writeln!(md, "{}. {step}", index + 1)?;
        }
        writeln!(md, "\n---\n")?;
    }
    Ok(())
}
