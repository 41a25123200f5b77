use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use serde_json::Value;

use crate::coerce::coerce_strings;
use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError};
use crate::strict::apply_strict_mode;
use crate::validator::validate_value;

/// A compiled JSON Schema together with the document it was compiled from.
///
/// Cloning is cheap; the compiled validator is shared.
#[derive(Clone)]
pub struct Schema {
    document: Arc<Value>,
    validator: Arc<Validator>,
    max_issues: usize,
}

impl Schema {
    /// Compile a schema document with default config.
    pub fn compile(document: Value) -> Result<Self> {
        Self::compile_with_config(document, &SchemaConfig::default())
    }

    /// Compile a schema document with explicit config.
    ///
    /// In strict mode the stored document is the closed variant, so exported
    /// documentation matches what is enforced.
    pub fn compile_with_config(mut document: Value, config: &SchemaConfig) -> Result<Self> {
        if config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator = jsonschema::validator_for(&document)
            .map_err(|err| SchemaError::CompileFailed(err.to_string()))?;

        Ok(Self {
            document: Arc::new(document),
            validator: Arc::new(validator),
            max_issues: config.max_issues,
        })
    }

    /// Compile a schema from a JSON string.
    pub fn parse(schema_json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_json)?;
        Self::compile(document)
    }

    /// Validate a value, reporting up to the configured number of issues.
    pub fn validate(&self, value: &Value) -> Result<()> {
        validate_value(value, &self.validator, self.max_issues)
    }

    /// Coerce string leaves into the numbers and booleans this schema expects.
    pub fn coerce(&self, value: &mut Value) {
        coerce_strings(value, &self.document);
    }

    /// The schema document, as compiled.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Property names declared at the top level of an object schema, sorted.
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .document
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().cloned().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Whether a top-level property is listed under `required`.
    pub fn requires(&self, property: &str) -> bool {
        self.document
            .get("required")
            .and_then(Value::as_array)
            .map(|required| required.iter().any(|name| name.as_str() == Some(property)))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document)
            .field("max_issues", &self.max_issues)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const OBJECT_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "id": { "type": "integer" },
            "name": { "type": "string", "minLength": 1 }
        },
        "required": ["id", "name"]
    }"#;

    #[test]
    fn compile_and_validate() {
        let schema = Schema::parse(OBJECT_SCHEMA).unwrap();

        assert!(schema.validate(&json!({"id": 1, "name": "ok"})).is_ok());
        assert!(matches!(
            schema.validate(&json!({"id": "bad", "name": "ok"})),
            Err(SchemaError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn empty_string_violates_min_length() {
        let schema = Schema::parse(OBJECT_SCHEMA).unwrap();
        let err = schema.validate(&json!({"id": 1, "name": ""})).unwrap_err();

        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn issue_count_is_capped() {
        let config = SchemaConfig {
            max_issues: 1,
            ..SchemaConfig::default()
        };
        let schema = Schema::compile_with_config(
            serde_json::from_str(OBJECT_SCHEMA).unwrap(),
            &config,
        )
        .unwrap();

        let err = schema.validate(&json!({"id": "x", "name": 3})).unwrap_err();
        assert_eq!(err.issues().len(), 1);
    }

    #[test]
    fn strict_mode_rejects_additional_properties() {
        let permissive = Schema::parse(OBJECT_SCHEMA).unwrap();
        let strict = Schema::compile_with_config(
            serde_json::from_str(OBJECT_SCHEMA).unwrap(),
            &SchemaConfig {
                strict_mode: true,
                ..SchemaConfig::default()
            },
        )
        .unwrap();

        let payload = json!({"id": 1, "name": "ok", "extra": true});
        assert!(permissive.validate(&payload).is_ok());
        assert!(strict.validate(&payload).is_err());
        assert_eq!(strict.document()["additionalProperties"], json!(false));
    }

    #[test]
    fn invalid_schema_fails_compile() {
        assert!(matches!(
            Schema::parse(r#"{"type":"definitely-not-a-type"}"#),
            Err(SchemaError::CompileFailed(_))
        ));
    }

    #[test]
    fn invalid_json_schema_text_fails() {
        assert!(matches!(
            Schema::parse("not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn property_introspection() {
        let schema = Schema::parse(OBJECT_SCHEMA).unwrap();

        assert_eq!(schema.property_names(), vec!["id", "name"]);
        assert!(schema.requires("id"));
        assert!(!schema.requires("missing"));
    }
}
