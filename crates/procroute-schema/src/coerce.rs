//! Schema-guided coercion of string values.
//!
//! Query strings and path segments carry no type information, so a REST
//! caller sending `?a=4` means the number `4` whenever the schema says so.
//! Coercion only rewrites a string when the schema rules out strings at that
//! position and the text parses cleanly; anything else is left for the
//! validator to reject.

use serde_json::{Map, Number, Value};

/// Coerce string leaves of `value` toward the types declared by `schema`.
pub fn coerce_strings(value: &mut Value, schema: &Value) {
    let Some(schema) = schema.as_object() else {
        return;
    };

    match value {
        Value::String(text) => {
            if let Some(coerced) = coerce_scalar(text, schema) {
                *value = coerced;
            } else if allows(schema, "array") && !allows(schema, "string") {
                let mut items = Value::Array(vec![Value::String(std::mem::take(text))]);
                coerce_strings(&mut items, &Value::Object(schema.clone()));
                *value = items;
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for item in items.iter_mut() {
                    coerce_strings(item, item_schema);
                }
            }
        }
        Value::Object(fields) => coerce_object(fields, schema),
        _ => {}
    }
}

fn coerce_object(fields: &mut Map<String, Value>, schema: &Map<String, Value>) {
    let properties = schema.get("properties").and_then(Value::as_object);
    let additional = schema.get("additionalProperties");

    for (name, field) in fields.iter_mut() {
        match properties.and_then(|props| props.get(name)) {
            Some(field_schema) => coerce_strings(field, field_schema),
            None => {
                if let Some(field_schema) = additional.filter(|s| s.is_object()) {
                    coerce_strings(field, field_schema);
                }
            }
        }
    }
}

fn coerce_scalar(text: &str, schema: &Map<String, Value>) -> Option<Value> {
    if allows(schema, "string") {
        return None;
    }
    let trimmed = text.trim();

    if allows(schema, "integer") || allows(schema, "number") {
        if let Ok(int) = trimmed.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
        if allows(schema, "number") {
            if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return Some(Value::Number(number));
            }
        }
    }

    if allows(schema, "boolean") {
        match trimmed {
            "true" | "on" => return Some(Value::Bool(true)),
            "false" | "off" => return Some(Value::Bool(false)),
            _ => {}
        }
    }

    if allows(schema, "null") && trimmed.is_empty() {
        return Some(Value::Null);
    }

    None
}

fn allows(schema: &Map<String, Value>, kind: &str) -> bool {
    match schema.get("type") {
        Some(Value::String(declared)) => declared == kind,
        Some(Value::Array(declared)) => declared.iter().any(|d| d.as_str() == Some(kind)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn divide_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "a": { "type": "number" },
                "b": { "type": "number" },
                "exact": { "type": "boolean" },
                "label": { "type": "string" }
            }
        })
    }

    #[test]
    fn numbers_and_booleans_are_coerced() {
        let mut input = json!({"a": "10", "b": "2.5", "exact": "true", "label": "7"});
        coerce_strings(&mut input, &divide_schema());

        assert_eq!(input, json!({"a": 10, "b": 2.5, "exact": true, "label": "7"}));
    }

    #[test]
    fn unparseable_strings_are_left_alone() {
        let mut input = json!({"a": "ten", "exact": "maybe"});
        coerce_strings(&mut input, &divide_schema());

        assert_eq!(input, json!({"a": "ten", "exact": "maybe"}));
    }

    #[test]
    fn integer_schema_rejects_fractions() {
        let mut value = json!("1.5");
        coerce_strings(&mut value, &json!({"type": "integer"}));
        assert_eq!(value, json!("1.5"));

        let mut value = json!("-3");
        coerce_strings(&mut value, &json!({"type": "integer"}));
        assert_eq!(value, json!(-3));
    }

    #[test]
    fn single_value_becomes_array() {
        let mut input = json!({"ids": "4"});
        let schema = json!({
            "type": "object",
            "properties": {
                "ids": { "type": "array", "items": { "type": "integer" } }
            }
        });
        coerce_strings(&mut input, &schema);

        assert_eq!(input, json!({"ids": [4]}));
    }

    #[test]
    fn union_with_string_is_not_coerced() {
        let mut value = json!("42");
        coerce_strings(&mut value, &json!({"type": ["string", "number"]}));
        assert_eq!(value, json!("42"));
    }

    #[test]
    fn non_finite_numbers_stay_strings() {
        let mut value = json!("NaN");
        coerce_strings(&mut value, &json!({"type": "number"}));
        assert_eq!(value, json!("NaN"));
    }
}
