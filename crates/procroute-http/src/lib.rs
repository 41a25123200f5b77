//! HTTP bindings for a procedure [`Dispatcher`](procroute_router::Dispatcher).
//!
//! One axum [`Router`](axum::Router) serves both transports over the same
//! registry:
//!
//! - `POST {rpc}` with `{"procedure": name, "input": …}`, or `POST {rpc}/a/b`
//!   naming procedure `a.b` by path. Responds with a result envelope.
//! - Declared REST routes under the REST prefix. Responds with the bare value
//!   or the error object.
//! - `GET {openapi}` (generated document) and `GET {docs}` (Scalar viewer).

pub mod config;
pub mod docs;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use routes::router;
pub use server::{serve, shutdown_signal};
pub use state::AppState;
