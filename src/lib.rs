pub mod api_connection;
pub mod cli;
pub mod config;
pub mod export;
pub mod meal_plan;
pub mod plan_file;
pub mod planner;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod validation;
