use jsonschema::Validator;
use serde_json::Value;

use crate::error::{Result, SchemaError};

pub(crate) fn validate_value(value: &Value, validator: &Validator, max_issues: usize) -> Result<()> {
    let issues = collect_issues(value, validator, max_issues);
    if issues.is_empty() {
        return Ok(());
    }
    Err(SchemaError::ValidationFailed { issues })
}

/// Collect up to `limit` human-readable validation issues (at least one if invalid).
pub fn collect_issues(value: &Value, validator: &Validator, limit: usize) -> Vec<String> {
    validator
        .iter_errors(value)
        .take(limit.max(1))
        .map(|err| err.to_string())
        .collect()
}
