pub mod connection;
pub mod endpoints;

pub use connection::{ApiConnectionError, TextGenerator};
pub use endpoints::{GenerationRequest, JsonSchema, JsonSchemaDefinition, Provider};
