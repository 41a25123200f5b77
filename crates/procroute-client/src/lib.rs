//! Transport-agnostic typed caller for procroute procedures.
//!
//! A [`Client`] serializes typed input, hands it to a [`Transport`], and
//! decodes the typed output. [`HttpTransport`] talks to the RPC endpoint of a
//! running server; [`LocalTransport`] calls a dispatcher in-process. Read
//! calls can go through a [`QueryCache`] that keeps successful results and
//! collapses concurrent identical requests.

pub mod cache;
pub mod client;
pub mod error;
pub mod transport;

pub use cache::QueryCache;
pub use client::Client;
pub use error::{ClientError, Result};
pub use transport::{HttpTransport, HttpTransportConfig, LocalTransport, Transport};
