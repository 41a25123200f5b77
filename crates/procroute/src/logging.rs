//! stderr logging for the CLI and the server.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    /// One JSON object per event, with the enclosing request span.
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// Connection-level chatter from the HTTP stack.
const TRANSPORT_TARGETS: [&str; 3] = ["hyper", "hyper_util", "reqwest"];

/// Filter directives for `level`. The HTTP stack stays at `warn` unless
/// tracing everything.
fn directives(level: LogLevel) -> String {
    let mut directives = level.as_directive().to_string();
    if level < LogLevel::Trace {
        for target in TRANSPORT_TARGETS {
            directives.push_str(&format!(",{target}=warn"));
        }
    }
    directives
}

/// Install the global subscriber. A non-empty `RUST_LOG` replaces the
/// directives derived from `level`.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(directives(level)),
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false);

    let _ = match format {
        LogFormat::Text => builder.with_target(false).try_init(),
        LogFormat::Json => builder
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
    };
}
