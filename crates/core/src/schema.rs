// Helper functions for creating tool input schemas

use serde_json::{json, Value};

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_integer(description: &str, min: Option<i64>, max: Option<i64>) -> Value {
    let mut schema = json!({
        "type": "integer",
        "description": description
    });
    if let Some(min) = min {
        schema["minimum"] = json!(min);
    }
    if let Some(max) = max {
        schema["maximum"] = json!(max);
    }
    schema
}

pub fn json_schema_boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

pub fn json_schema_enum(choices: &[&str], description: &str) -> Value {
    json!({
        "type": "string",
        "enum": choices,
        "description": description
    })
}

/// Free-form object, e.g. extra request headers
pub fn json_schema_map(description: &str) -> Value {
    json!({
        "type": "object",
        "additionalProperties": { "type": "string" },
        "description": description
    })
}
