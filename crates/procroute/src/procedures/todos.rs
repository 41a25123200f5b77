use std::time::Duration;

use procroute_router::{Method, Procedure, ProcedureConfig, ProcedureError};
use procroute_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

pub const NAME: &str = "getTodos";

/// Simulated latency of the backing store.
pub const LOAD_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

pub fn procedure() -> Result<Procedure> {
    let output = Schema::compile(json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "number" },
                "text": { "type": "string" },
                "completed": { "type": "boolean" }
            },
            "required": ["id", "text", "completed"]
        }
    }))?;

    let mut config = ProcedureConfig::new(NAME, output);
    config.route = Some((Method::Get, "/todos".to_string()));
    config.summary = Some("List todos".to_string());
    config.tags = vec!["todos".to_string()];

    Ok(Procedure::from_fn(config, get_todos)?)
}

pub async fn get_todos(_: ()) -> std::result::Result<Vec<Todo>, ProcedureError> {
    tokio::time::sleep(LOAD_DELAY).await;
    Ok(vec![
        Todo {
            id: 1,
            text: "Learn oRPC".to_string(),
            completed: true,
        },
        Todo {
            id: 2,
            text: "Build something awesome".to_string(),
            completed: false,
        },
    ])
}
