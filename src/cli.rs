use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::meal_plan::{Course, MealConstraints};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Plan a themed 4-course meal from any country",
    long_about = None
)]
pub struct Cli {
    /// Model identifier, overriding KITCHEN_PLANNER_MODEL
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a full meal plan with a shopping list
    Plan {
        /// Country whose cuisine the meal should come from
        #[arg(short, long)]
        country: String,
        #[command(flatten)]
        constraints: ConstraintArgs,
        /// Write the generated plan as JSON to this file
        #[arg(long)]
        save: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Replace one course of a saved plan and refresh its shopping list
    Swap {
        /// Plan file produced by `plan --save`
        #[arg(short, long)]
        plan: PathBuf,
        #[arg(long, value_enum)]
        course: CourseArg,
        /// Theme the replacement should lean towards
        #[arg(short, long)]
        guidance: Option<String>,
        #[command(flatten)]
        constraints: ConstraintArgs,
        /// Where to write the updated plan (defaults to the input file)
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Recompute the shopping list of a saved plan
    ShoppingList {
        #[arg(short, long)]
        plan: PathBuf,
        /// Where to write the updated plan (defaults to the input file)
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print a saved plan as Markdown
    Export {
        #[arg(short, long)]
        plan: PathBuf,
        /// Write the Markdown to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ConstraintArgs {
    #[arg(long)]
    pub gluten_free: bool,
    #[arg(long)]
    pub low_carb: bool,
    #[arg(long)]
    pub no_alcohol: bool,
    #[arg(long)]
    pub no_coffee: bool,
}

impl From<ConstraintArgs> for MealConstraints {
    fn from(args: ConstraintArgs) -> Self {
        MealConstraints {
            gluten_free: args.gluten_free,
            low_carb: args.low_carb,
            no_alcohol: args.no_alcohol,
            no_coffee: args.no_coffee,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseArg {
    Appetizer,
    SideDish,
    MainCourse,
    Drink,
}

impl From<CourseArg> for Course {
    fn from(arg: CourseArg) -> Self {
        match arg {
            CourseArg::Appetizer => Course::Appetizer,
            CourseArg::SideDish => Course::SideDish,
            CourseArg::MainCourse => Course::MainCourse,
            CourseArg::Drink => Course::Drink,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
