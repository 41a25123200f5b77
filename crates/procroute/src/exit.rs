use std::fmt;
use std::io;

use procroute::client::ClientError;
use procroute::router::ErrorCode;
use procroute::SetupError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::AddrInUse
        | io::ErrorKind::AddrNotAvailable
        | io::ErrorKind::PermissionDenied
        | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn setup_error(err: SetupError) -> CliError {
    match err {
        SetupError::InvalidTimezone(_) => CliError::new(USAGE, err.to_string()),
        other => CliError::new(INTERNAL, other.to_string()),
    }
}

pub fn error_code_exit(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::BadRequest => DATA_INVALID,
        ErrorCode::Timeout => TIMEOUT,
        ErrorCode::Internal => INTERNAL,
        ErrorCode::Unauthorized
        | ErrorCode::Forbidden
        | ErrorCode::NotFound
        | ErrorCode::Conflict => FAILURE,
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    let code = match &err {
        ClientError::Remote(remote) => error_code_exit(remote.code),
        ClientError::Timeout(_) => TIMEOUT,
        ClientError::Encode(_) => USAGE,
        ClientError::Decode(_) => INTERNAL,
        ClientError::Transport(_) | ClientError::InvalidResponse { .. } => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}
