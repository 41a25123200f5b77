use procroute_router::{Procedure, ProcedureConfig, ProcedureError};
use procroute_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

pub const NAME: &str = "hello";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelloOutput {
    pub message: String,
}

/// RPC only; takes no input.
pub fn procedure() -> Result<Procedure> {
    let output = Schema::compile(json!({
        "type": "object",
        "properties": { "message": { "type": "string" } },
        "required": ["message"]
    }))?;

    let mut config = ProcedureConfig::new(NAME, output);
    config.summary = Some("Say hello".to_string());
    config.tags = vec!["demo".to_string()];

    Ok(Procedure::from_fn(config, hello)?)
}

pub async fn hello(_: ()) -> std::result::Result<HelloOutput, ProcedureError> {
    Ok(HelloOutput {
        message: "Hello from oRPC!".to_string(),
    })
}
