use procroute_http::HttpError;
use procroute_router::RegistryError;
use procroute_schema::SchemaError;

/// Errors raised while assembling the service.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid procedure schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("procedure registration failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("http setup failed: {0}")]
    Http(#[from] HttpError),

    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, SetupError>;
