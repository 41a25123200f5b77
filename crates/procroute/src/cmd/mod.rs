use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod call;
pub mod openapi;
pub mod routes;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the RPC transport, REST routes, OpenAPI document and docs.
    Serve(ServeArgs),
    /// Call a procedure in-process, or against a running server with --url.
    Call(CallArgs),
    /// List registered procedures and their REST routes.
    Routes(RoutesArgs),
    /// Print the OpenAPI document.
    Openapi(OpenapiArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args),
        Command::Call(args) => call::run(args, format),
        Command::Routes(args) => routes::run(args, format),
        Command::Openapi(args) => openapi::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "PROCROUTE_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port to bind (0 picks a free port).
    #[arg(long, env = "PROCROUTE_PORT", default_value = "3000")]
    pub port: u16,
    /// IANA timezone reported by getCurrentTime. Falls back to TZ, then UTC.
    #[arg(long, env = "PROCROUTE_TIMEZONE")]
    pub timezone: Option<String>,
    /// Per-call handler timeout (e.g. 30s, 500ms).
    #[arg(long, default_value = "30s")]
    pub handler_timeout: String,
    /// Bearer token pre-filled in the docs viewer.
    #[arg(long, env = "PROCROUTE_DOCS_TOKEN", default_value = "default-token")]
    pub docs_token: String,
    /// Disable the permissive CORS layer.
    #[arg(long)]
    pub no_cors: bool,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Procedure name (e.g. greet, divide).
    pub procedure: String,
    /// JSON input.
    #[arg(long, short = 'i')]
    pub input: Option<String>,
    /// Server origin. Without it the call runs in-process.
    #[arg(long, env = "PROCROUTE_URL")]
    pub url: Option<String>,
    /// Bearer token for remote calls.
    #[arg(long, env = "PROCROUTE_TOKEN")]
    pub token: Option<String>,
    /// Request timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
    /// Timezone for in-process calls.
    #[arg(long, env = "PROCROUTE_TIMEZONE")]
    pub timezone: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct RoutesArgs {}

#[derive(Args, Debug)]
pub struct OpenapiArgs {
    /// Single-line JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `5s`, `500ms` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
