use chrono::{SecondsFormat, Utc};
use procroute_router::{Method, Procedure, ProcedureConfig, ProcedureError};
use procroute_schema::Schema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;
use crate::settings::AppSettings;

pub const NAME: &str = "getCurrentTime";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOutput {
    /// RFC 3339 UTC instant with millisecond precision.
    pub timestamp: String,
    /// IANA name of the server's configured zone.
    pub timezone: String,
}

pub fn procedure(settings: &AppSettings) -> Result<Procedure> {
    let output = Schema::compile(json!({
        "type": "object",
        "properties": {
            "timestamp": { "type": "string" },
            "timezone": { "type": "string" }
        },
        "required": ["timestamp", "timezone"]
    }))?;

    let mut config = ProcedureConfig::new(NAME, output);
    config.route = Some((Method::Get, "/time".to_string()));
    config.summary = Some("Current server time".to_string());
    config.tags = vec!["demo".to_string()];

    let timezone = settings.timezone_name();
    Ok(Procedure::from_fn(config, move |_: ()| async move {
        Ok::<_, ProcedureError>(current_time(timezone))
    })?)
}

pub fn current_time(timezone: &str) -> TimeOutput {
    TimeOutput {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        timezone: timezone.to_string(),
    }
}
