use std::time::Duration;

use procroute_router::{ErrorCode, ProcedureError};

/// Errors returned by [`Client`](crate::Client) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The procedure ran (or was rejected) and returned a structured error.
    #[error("{0}")]
    Remote(ProcedureError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to encode input: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode output: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unexpected response (HTTP {status}): {body}")]
    InvalidResponse { status: u16, body: String },
}

impl ClientError {
    /// The server-side error, if the call reached a procedure.
    pub fn remote(&self) -> Option<&ProcedureError> {
        match self {
            ClientError::Remote(err) => Some(err),
            _ => None,
        }
    }

    /// The server's error code, inferred from the HTTP status when the
    /// response carried no envelope.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Remote(err) => Some(err.code),
            ClientError::InvalidResponse { status, .. } if *status >= 400 => {
                Some(ErrorCode::from_http_status(*status))
            }
            _ => None,
        }
    }
}

impl From<ProcedureError> for ClientError {
    fn from(err: ProcedureError) -> Self {
        ClientError::Remote(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
