/// Errors that can occur while compiling schemas or validating payloads.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema document could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// The payload does not satisfy the schema.
    #[error("validation failed: {}", .issues.join("; "))]
    ValidationFailed { issues: Vec<String> },

    /// The schema or payload is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl SchemaError {
    /// Validation issues carried by this error, empty for non-validation errors.
    pub fn issues(&self) -> &[String] {
        match self {
            SchemaError::ValidationFailed { issues } => issues,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
