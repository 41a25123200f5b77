use serde::{Deserialize, Serialize};

/// Name of the HTTP bearer security scheme.
pub const BEARER_AUTH: &str = "bearerAuth";

/// One entry of the document's `servers` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerEntry {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: Some(description.into()),
        }
    }
}

/// Document-level settings for [`generate`](crate::generate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub servers: Vec<ServerEntry>,
    /// Declare the `bearerAuth` scheme and require it document-wide.
    pub bearer_auth: bool,
}

impl Default for DocumentOptions {
    /// "My App API" 1.0.0 with bearer auth and one server entry, `/api`.
    ///
    /// The server entry points at the REST mount, since only routed
    /// procedures appear under `paths`. Services that publish their RPC
    /// endpoint instead (`/api/rpc`, "RPC endpoint") should override
    /// `servers`.
    fn default() -> Self {
        Self {
            title: "My App API".to_string(),
            version: "1.0.0".to_string(),
            description: Some(
                "API documentation for My App - type-safe RPC endpoints".to_string(),
            ),
            servers: vec![ServerEntry::new("/api", "REST endpoint")],
            bearer_auth: true,
        }
    }
}
