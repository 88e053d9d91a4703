use serde_json::Value;
use thiserror::Error;

use crate::api_connection::endpoints::JsonSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    pub path: String,
    pub message: String,
}

/// Strips a surrounding markdown code fence (```json ... ``` or ``` ... ```), if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6) {
        return trimmed;
    }
    let inner = &trimmed[3..trimmed.len() - 3];
    inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner)
        .trim()
}

/// Checks `value` against the type, `required` and `items` constraints of `schema`.
///
/// Unknown object keys are tolerated: the backend may echo extra fields (an `id`
/// on a meal part, for instance) that the typed records ignore.
pub fn check(value: &Value, schema: &JsonSchema) -> Result<(), SchemaViolation> {
    check_at("$", value, schema)
}

fn check_at(path: &str, value: &Value, schema: &JsonSchema) -> Result<(), SchemaViolation> {
    let matches = match schema.schema_type.as_str() {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    };
    if !matches {
        return Err(SchemaViolation {
            path: path.to_string(),
            message: format!("expected {}, found {}", schema.schema_type, kind_of(value)),
        });
    }

    if let Value::Object(map) = value {
        for field in schema.required.iter().flatten() {
            if !map.contains_key(field) {
                return Err(SchemaViolation {
                    path: path.to_string(),
                    message: format!("missing required field `{field}`"),
                });
            }
        }
        if let Some(properties) = &schema.properties {
            for (name, property_schema) in properties {
                if let Some(child) = map.get(name) {
                    check_at(&format!("{path}.{name}"), child, property_schema)?;
                }
            }
        }
    }

    if let (Value::Array(elements), Some(item_schema)) = (value, &schema.items) {
        for (index, element) in elements.iter().enumerate() {
            check_at(&format!("{path}[{index}]"), element, item_schema)?;
        }
    }

    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
