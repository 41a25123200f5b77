//! Compiled JSON Schema contracts for procedure inputs and outputs.
//!
//! Every procedure declares its input and output as JSON Schema 2020-12
//! documents. This crate compiles them once at registration time, validates
//! payloads against them at dispatch time, and keeps the source document
//! around so the OpenAPI exporter can publish exactly what is enforced.
//!
//! String coercion for REST inputs lives here too: query and path values
//! always arrive as strings, and [`Schema::coerce`] turns them into the
//! numbers and booleans the schema asks for before validation runs.

pub mod coerce;
pub mod config;
pub mod error;
pub mod schema;
mod strict;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError};
pub use schema::Schema;
