use serde_json::{Map, Value};

const OBJECT_KEYWORDS: [&str; 6] = [
    "properties",
    "patternProperties",
    "required",
    "dependentRequired",
    "dependentSchemas",
    "propertyNames",
];

const MAP_KEYWORDS: [&str; 5] = [
    "properties",
    "patternProperties",
    "dependentSchemas",
    "$defs",
    "definitions",
];

const SINGLE_KEYWORDS: [&str; 9] = [
    "propertyNames",
    "additionalProperties",
    "items",
    "contains",
    "additionalItems",
    "not",
    "if",
    "then",
    "else",
];

const ARRAY_KEYWORDS: [&str; 4] = ["prefixItems", "allOf", "anyOf", "oneOf"];

/// Close every object schema that does not say otherwise (`additionalProperties: false`).
pub(crate) fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if declares_object(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            recurse_children(map);
        }
        Value::Array(items) => items.iter_mut().for_each(apply_strict_mode),
        _ => {}
    }
}

fn recurse_children(map: &mut Map<String, Value>) {
    for key in MAP_KEYWORDS {
        if let Some(Value::Object(children)) = map.get_mut(key) {
            children.values_mut().for_each(apply_strict_mode);
        }
    }
    for key in SINGLE_KEYWORDS {
        if let Some(child) = map.get_mut(key) {
            apply_strict_mode(child);
        }
    }
    for key in ARRAY_KEYWORDS {
        if let Some(Value::Array(children)) = map.get_mut(key) {
            children.iter_mut().for_each(apply_strict_mode);
        }
    }
}

fn declares_object(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(kinds)) => kinds
            .iter()
            .any(|kind| matches!(kind, Value::String(kind) if kind == "object")),
        _ => OBJECT_KEYWORDS.iter().any(|keyword| map.contains_key(*keyword)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn closes_nested_objects() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "inner": { "type": "object", "properties": { "v": { "type": "integer" } } }
            }
        });
        apply_strict_mode(&mut schema);

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(
            schema["properties"]["inner"]["additionalProperties"],
            json!(false)
        );
    }

    #[test]
    fn keeps_explicit_additional_properties() {
        let mut schema = json!({
            "type": "object",
            "additionalProperties": { "type": "string" }
        });
        apply_strict_mode(&mut schema);

        assert_eq!(schema["additionalProperties"], json!({ "type": "string" }));
    }

    #[test]
    fn array_item_objects_are_closed() {
        let mut schema = json!({
            "type": "array",
            "items": { "required": ["id"] }
        });
        apply_strict_mode(&mut schema);

        assert_eq!(schema["items"]["additionalProperties"], json!(false));
        assert!(schema.get("additionalProperties").is_none());
    }
}
