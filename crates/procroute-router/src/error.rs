use std::fmt;

use serde::{Deserialize, Serialize};

use crate::method::Method;

/// Errors raised while building or querying a [`Registry`](crate::Registry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A procedure with this name is already registered.
    #[error("procedure '{0}' is already registered")]
    DuplicateName(String),

    /// Another procedure already declares this method and path.
    #[error("route {method} {path} is already registered by '{existing}'")]
    DuplicateRoute {
        method: Method,
        path: String,
        existing: String,
    },

    /// The procedure name is not a dotted identifier.
    #[error("invalid procedure name '{0}'")]
    InvalidName(String),

    /// The route path cannot be parsed.
    #[error("invalid route path '{path}': {reason}")]
    InvalidRoute { path: String, reason: String },

    /// No procedure is registered under this name.
    #[error("procedure '{0}' not found")]
    NotFound(String),

    /// No declared route matches this method and path.
    #[error("no route matches {method} {path}")]
    RouteNotFound { method: Method, path: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Stable, client-visible error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Timeout,
    Conflict,
    Internal,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::Timeout,
        Self::Conflict,
        Self::Internal,
    ];

    /// Map to HTTP status code.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Timeout => 408,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    /// Wire name of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Timeout => "TIMEOUT",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
        }
    }

    /// Best-effort reverse of [`ErrorCode::http_status`]; unknown statuses map to `Internal`.
    pub const fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            408 => Self::Timeout,
            409 => Self::Conflict,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message sent to clients in place of internal error details.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// A classified failure returned by a handler or produced during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ProcedureError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl ProcedureError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            issues: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Attach validation issues.
    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }

    /// HTTP status for this error.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// The client-facing form: internal errors lose their message and issues.
    pub fn redacted(self) -> Self {
        if self.code == ErrorCode::Internal {
            Self::internal(INTERNAL_MESSAGE)
        } else {
            self
        }
    }
}

impl From<RegistryError> for ProcedureError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(_) | RegistryError::RouteNotFound { .. } => {
                Self::not_found(err.to_string())
            }
            other => Self::internal(other.to_string()),
        }
    }
}
