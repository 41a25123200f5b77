use procroute::client::{Client, HttpTransport, HttpTransportConfig, LocalTransport, Transport};
use procroute::router::DispatcherConfig;
use procroute::{app, AppSettings};
use serde_json::Value;

use crate::cmd::{parse_duration, CallArgs};
use crate::exit::{client_error, io_error, setup_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_value, OutputFormat};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let input = parse_input(args.input.as_deref())?;
    let timeout = parse_duration(&args.timeout)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start runtime", err))?;

    let output = match &args.url {
        Some(url) => {
            let transport = HttpTransport::new(HttpTransportConfig {
                base_url: url.clone(),
                timeout,
                token: args.token.clone(),
                ..HttpTransportConfig::default()
            })
            .map_err(|err| client_error("client setup failed", err))?;
            runtime.block_on(call(Client::new(transport), &args.procedure, input))?
        }
        None => {
            let settings = AppSettings::resolve(args.timezone.as_deref()).map_err(setup_error)?;
            let dispatcher = app::dispatcher(
                &settings,
                DispatcherConfig {
                    handler_timeout: Some(timeout),
                },
            )
            .map_err(setup_error)?;
            let client = Client::new(LocalTransport::new(dispatcher));
            runtime.block_on(call(client, &args.procedure, input))?
        }
    };

    print_value(&output, format);
    Ok(SUCCESS)
}

async fn call<T: Transport>(client: Client<T>, procedure: &str, input: Value) -> CliResult<Value> {
    client
        .call_value(procedure, input)
        .await
        .map_err(|err| client_error(&format!("{procedure} failed"), err))
}

fn parse_input(input: Option<&str>) -> CliResult<Value> {
    match input {
        None => Ok(Value::Null),
        Some(text) => serde_json::from_str(text)
            .map_err(|err| CliError::new(USAGE, format!("--input is not valid JSON: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn input_defaults_to_null() {
        assert_eq!(parse_input(None).unwrap(), Value::Null);
        assert_eq!(parse_input(Some(r#"{"a":1}"#)).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn malformed_input_is_usage_error() {
        assert_eq!(parse_input(Some("{oops")).unwrap_err().code, USAGE);
    }
}
