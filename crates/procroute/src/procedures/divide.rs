use procroute_router::{Method, Procedure, ProcedureConfig, ProcedureError};
use procroute_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

pub const NAME: &str = "divide";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivideInput {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivideOutput {
    pub result: f64,
}

pub fn procedure() -> Result<Procedure> {
    let input = Schema::compile(json!({
        "type": "object",
        "properties": {
            "a": { "type": "number" },
            "b": { "type": "number" }
        },
        "required": ["a", "b"]
    }))?;
    let output = Schema::compile(json!({
        "type": "object",
        "properties": { "result": { "type": "number" } },
        "required": ["result"]
    }))?;

    let mut config = ProcedureConfig::new(NAME, output);
    config.route = Some((Method::Post, "/divide".to_string()));
    config.input = Some(input);
    config.summary = Some("Divide a by b".to_string());
    config.description = Some("Fails with BAD_REQUEST when b is zero.".to_string());
    config.tags = vec!["math".to_string()];

    Ok(Procedure::from_fn(config, divide)?)
}

pub async fn divide(input: DivideInput) -> std::result::Result<DivideOutput, ProcedureError> {
    if input.b == 0.0 {
        return Err(ProcedureError::bad_request("Cannot divide by zero"));
    }
    Ok(DivideOutput {
        result: input.a / input.b,
    })
}

#[cfg(test)]
mod tests {
    use procroute_router::ErrorCode;

    use super::*;

    #[tokio::test]
    async fn quotient_for_nonzero_divisors() {
        let values = [-7.5, -1.0, 0.0, 0.25, 1.0, 3.0, 10.0, 1e9];
        for a in values {
            for b in values.iter().copied().filter(|b| *b != 0.0) {
                let out = divide(DivideInput { a, b }).await.unwrap();
                assert_eq!(out.result, a / b);
            }
        }
    }

    #[tokio::test]
    async fn zero_divisor_is_bad_request() {
        for a in [0.0, 1.0, -3.0] {
            let err = divide(DivideInput { a, b: 0.0 }).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::BadRequest);
            assert_eq!(err.message, "Cannot divide by zero");
        }
    }

    #[tokio::test]
    async fn negative_zero_divisor_is_rejected() {
        assert!(divide(DivideInput { a: 1.0, b: -0.0 }).await.is_err());
    }
}
