//! Typed procedures served over RPC and REST, with a generated OpenAPI
//! document and a hosted API reference.
//!
//! # Crate Structure
//!
//! - [`procedures`]: the demo procedures and the registration function
//! - [`api`]: typed client with one method per procedure
//! - [`app`]: wiring of registry, dispatcher and HTTP router
//! - [`schema`], [`router`], [`openapi`], [`http`], [`client`]: re-exports
//!   of the underlying crates

pub mod api;
pub mod app;
pub mod error;
pub mod procedures;
pub mod settings;

pub use error::{Result, SetupError};
pub use settings::AppSettings;

/// Re-export schema types.
pub mod schema {
    pub use procroute_schema::*;
}

/// Re-export registry and dispatcher types.
pub mod router {
    pub use procroute_router::*;
}

/// Re-export OpenAPI generation.
pub mod openapi {
    pub use procroute_openapi::*;
}

/// Re-export HTTP bindings.
pub mod http {
    pub use procroute_http::*;
}

/// Re-export client types.
pub mod client {
    pub use procroute_client::*;
}
