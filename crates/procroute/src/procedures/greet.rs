use procroute_router::{Method, Procedure, ProcedureConfig, ProcedureError};
use procroute_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

pub const NAME: &str = "greet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetInput {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetOutput {
    pub message: String,
}

pub fn procedure() -> Result<Procedure> {
    let input = Schema::compile(json!({
        "type": "object",
        "properties": { "name": { "type": "string", "minLength": 1 } },
        "required": ["name"]
    }))?;
    let output = Schema::compile(json!({
        "type": "object",
        "properties": { "message": { "type": "string" } },
        "required": ["message"]
    }))?;

    let mut config = ProcedureConfig::new(NAME, output);
    config.route = Some((Method::Post, "/greet".to_string()));
    config.input = Some(input);
    config.summary = Some("Greet someone by name".to_string());
    config.tags = vec!["demo".to_string()];

    Ok(Procedure::from_fn(config, greet)?)
}

pub async fn greet(input: GreetInput) -> std::result::Result<GreetOutput, ProcedureError> {
    Ok(GreetOutput {
        message: format!("Hello, {}!", input.name),
    })
}
