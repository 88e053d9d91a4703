//! Structured-output contracts sent with every backend call.
//!
//! The backend is asked to conform its JSON to these shapes, and
//! [`crate::validation`] checks the parsed response against the same
//! descriptors before any typed record is built.

use std::collections::BTreeMap;

use crate::api_connection::endpoints::{JsonSchema, JsonSchemaDefinition};
use crate::meal_plan::Course;

fn string_schema() -> JsonSchema {
    JsonSchema {
        schema_type: "string".to_string(),
        description: None,
        properties: None,
        items: None,
        required: None,
        additional_properties: None,
    }
}

fn array_of(items: JsonSchema) -> JsonSchema {
    JsonSchema {
        schema_type: "array".to_string(),
        description: None,
        properties: None,
        items: Some(Box::new(items)),
        required: None,
        additional_properties: None,
    }
}

/// Object schema where every listed property is required.
fn object_of(properties: Vec<(&str, JsonSchema)>) -> JsonSchema {
    let required = properties.iter().map(|(name, _)| name.to_string()).collect();
    let properties: BTreeMap<String, JsonSchema> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    JsonSchema {
        schema_type: "object".to_string(),
        description: None,
        properties: Some(properties),
        items: None,
        required: Some(required),
        additional_properties: Some(false),
    }
}

fn described(mut schema: JsonSchema, description: &str) -> JsonSchema {
    schema.description = Some(description.to_string());
    schema
}

pub fn meal_part_schema() -> JsonSchema {
    object_of(vec![
        ("name", string_schema()),
        ("description", string_schema()),
        (
            "ingredients",
            described(
                array_of(string_schema()),
                "Ingredients with quantities, one per entry.",
            ),
        ),
        (
            "instructions",
            described(array_of(string_schema()), "Ordered preparation steps."),
        ),
    ])
}

pub fn shopping_category_schema() -> JsonSchema {
    object_of(vec![
        ("category", string_schema()),
        ("items", array_of(string_schema())),
    ])
}

pub fn shopping_list_schema() -> JsonSchema {
    array_of(shopping_category_schema())
}

pub fn full_plan_schema() -> JsonSchema {
    let mut properties = vec![("country", string_schema())];
    for course in Course::ALL {
        properties.push((course.key(), meal_part_schema()));
    }
    properties.push(("shoppingList", shopping_list_schema()));
    object_of(properties)
}

pub fn meal_part_definition() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "meal_part".to_string(),
        strict: Some(true),
        schema: meal_part_schema(),
    }
}

pub fn full_plan_definition() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "full_meal_plan".to_string(),
        strict: Some(true),
        schema: full_plan_schema(),
    }
}

pub fn shopping_list_definition() -> JsonSchemaDefinition {
    JsonSchemaDefinition {
        name: "shopping_list".to_string(),
        strict: Some(true),
        schema: shopping_list_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_part_requires_all_four_fields() {
        let schema = meal_part_schema();
        assert_eq!(schema.schema_type, "object");
        let required = schema.required.unwrap();
        for field in ["name", "description", "ingredients", "instructions"] {
            assert!(required.iter().any(|r| r == field), "missing {field}");
        }
        let properties = schema.properties.unwrap();
        assert_eq!(properties["ingredients"].schema_type, "array");
        assert_eq!(
            properties["instructions"].items.as_ref().unwrap().schema_type,
            "string"
        );
    }

    #[test]
    fn full_plan_nests_one_meal_part_per_course() {
        let schema = full_plan_schema();
        let properties = schema.properties.as_ref().unwrap();
        for course in Course::ALL {
            assert_eq!(properties[course.key()], meal_part_schema());
        }
        assert_eq!(properties["shoppingList"], shopping_list_schema());
        assert_eq!(schema.required.as_ref().unwrap().len(), 6);
    }

    #[test]
    fn shopping_list_is_top_level_array_of_categories() {
        let schema = shopping_list_schema();
        assert_eq!(schema.schema_type, "array");
        let item = schema.items.unwrap();
        assert_eq!(item.required.unwrap(), vec!["category", "items"]);
    }

    #[test]
    fn definitions_serialize_in_json_schema_form() {
        let value = serde_json::to_value(full_plan_definition()).unwrap();
        assert_eq!(value["name"], "full_meal_plan");
        assert_eq!(value["schema"]["type"], "object");
        assert_eq!(value["schema"]["additionalProperties"], false);
        assert_eq!(
            value["schema"]["properties"]["drink"]["properties"]["ingredients"]["items"]["type"],
            "string"
        );
    }
}
