//! OpenAPI 3.1 export for a procedure [`Registry`](procroute_router::Registry).
//!
//! Only procedures with a declared REST route appear in the document;
//! RPC-only procedures are reachable through the envelope transport and are
//! left out. Output is a plain [`serde_json::Value`] and is stable for a
//! given registry and options.

pub mod document;
pub mod options;

pub use document::{error_schema, generate, OPENAPI_VERSION};
pub use options::{DocumentOptions, ServerEntry, BEARER_AUTH};
