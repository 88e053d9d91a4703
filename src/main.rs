use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use kitchen_planner::api_connection::Provider;
use kitchen_planner::cli::{parse_args, Command, OutputFormat};
use kitchen_planner::config::PlannerConfig;
use kitchen_planner::export::to_markdown;
use kitchen_planner::meal_plan::{Course, FullMealPlan, MealConstraints};
use kitchen_planner::plan_file::{load_plan, save_plan, SavedPlan};
use kitchen_planner::planner::MealPlanner;
use kitchen_planner::session::{PlannerSession, SwapStatus};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_plan(plan: &FullMealPlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Markdown => print!("{}", to_markdown(plan)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(plan).context("Failed to serialize meal plan")?
        ),
    }
    Ok(())
}

async fn run_swap(
    planner: MealPlanner<Provider>,
    plan_path: &Path,
    course: Course,
    guidance: Option<&str>,
    constraints: MealConstraints,
    save: Option<&Path>,
) -> Result<()> {
    let saved = load_plan(plan_path).await?;
    let constraints = saved.constraints_or(constraints);
    let previous = saved.plan.part(course).name.clone();
    let session = PlannerSession::with_plan(planner, saved.plan, constraints);

    let status = session
        .swap(course, guidance)
        .await
        .with_context(|| format!("Failed to swap {} '{}'", course.label(), previous))?;
    let plan = session.plan().context("Session lost its meal plan")?;

    if status == SwapStatus::StaleShoppingList {
        tracing::warn!(
            "shopping list still reflects '{}'; run `shopping-list` to refresh it",
            previous
        );
    }
    save_plan(save.unwrap_or(plan_path), &SavedPlan::new(plan.clone(), constraints)).await?;
    println!("{}: {} -> {}", course.label(), previous, plan.part(course).name);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = parse_args();
    let mut config = PlannerConfig::from_env();
    if let Some(model) = cli.model {
        config.model = model;
    }
    let planner = MealPlanner::new(Provider::openrouter(&config), config.model.clone());

    match cli.command {
        Command::Plan {
            country,
            constraints,
            save,
            format,
        } => {
            let constraints: MealConstraints = constraints.into();
            let session = PlannerSession::new(planner);
            session.set_constraints(constraints);
            session
                .generate(&country)
                .await
                .with_context(|| format!("Failed to generate meal plan for '{}'", country))?;
            let plan = session.plan().context("Session lost its meal plan")?;
            if let Some(path) = save {
                save_plan(&path, &SavedPlan::new(plan.clone(), constraints)).await?;
                tracing::info!(path = %path.display(), "meal plan saved");
            }
            print_plan(&plan, format)?;
        }
        Command::Swap {
            plan,
            course,
            guidance,
            constraints,
            save,
        } => {
            run_swap(
                planner,
                &plan,
                course.into(),
                guidance.as_deref(),
                constraints.into(),
                save.as_deref(),
            )
            .await?;
        }
        Command::ShoppingList { plan, save } => {
            let loaded = load_plan(&plan).await?;
            let constraints = loaded.constraints;
            let session = PlannerSession::with_plan(planner, loaded.plan, constraints);
            session
                .refresh_shopping_list()
                .await
                .context("Failed to refresh shopping list")?;
            let refreshed = session.plan().context("Session lost its meal plan")?;
            let target = save.as_deref().unwrap_or(plan.as_path());
            save_plan(target, &SavedPlan::new(refreshed.clone(), constraints)).await?;
            for category in &refreshed.shopping_list {
                println!("{}: {}", category.category, category.items.join(", "));
            }
        }
        Command::Export { plan, out } => {
            let loaded = load_plan(&plan).await?;
            let markdown = to_markdown(&loaded.plan);
            match out {
                Some(path) => fs::write(&path, markdown)
                    .await
                    .with_context(|| format!("Failed to write '{}'", path.display()))?,
                None => print!("{markdown}"),
            }
        }
    }

    Ok(())
}
