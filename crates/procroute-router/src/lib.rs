//! Procedure registry and request dispatch.
//!
//! A [`Procedure`] is a named handler with declared input and output
//! schemas and an optional REST route. Procedures are collected into a
//! [`Registry`] once at startup; the [`Dispatcher`] then resolves calls by
//! name (RPC style) or by method and path (REST style), validates input,
//! runs the handler, checks the output against its own contract, and turns
//! the outcome into a [`ResultEnvelope`] plus a transport status code.

pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod method;
pub mod procedure;
pub mod registry;
pub mod route;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use envelope::{CallEnvelope, Dispatched, RawInput, ResultEnvelope, RouteCall};
pub use error::{ErrorCode, ProcedureError, RegistryError, Result, INTERNAL_MESSAGE};
pub use handler::{FnHandler, Handler};
pub use method::{Method, UnsupportedMethod};
pub use procedure::{Procedure, ProcedureConfig, Route};
pub use registry::{Registry, RouteMatch};
pub use route::{normalize_path, RouteTemplate};
