use std::net::SocketAddr;

use procroute_router::Method;

/// Errors raised while running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// A declared REST route lands on a path the router reserves.
    #[error("route {method} {path} of '{procedure}' is shadowed by {mount}")]
    ShadowedRoute {
        procedure: String,
        method: Method,
        path: String,
        mount: String,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HttpError>;
