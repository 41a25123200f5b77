use procroute::http::HttpConfig;
use procroute::openapi::DocumentOptions;
use procroute::router::DispatcherConfig;
use procroute::{app, AppSettings};
use tokio_util::sync::CancellationToken;

use crate::cmd::{parse_duration, ServeArgs};
use crate::exit::{io_error, setup_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let settings = AppSettings::resolve(args.timezone.as_deref()).map_err(setup_error)?;
    let dispatch = DispatcherConfig {
        handler_timeout: Some(parse_duration(&args.handler_timeout)?),
    };
    let dispatcher = app::dispatcher(&settings, dispatch).map_err(setup_error)?;
    let http = HttpConfig {
        docs_token: args.docs_token,
        cors: !args.no_cors,
        ..HttpConfig::default()
    };
    let router = app::router(dispatcher, http, &DocumentOptions::default()).map_err(setup_error)?;
    let addr = format!("{}:{}", args.host, args.port);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("failed to start runtime", err))?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|err| io_error(&format!("bind {addr} failed"), err))?;

        tracing::info!(
            addr = %addr,
            timezone = settings.timezone_name(),
            "starting procroute server"
        );

        let shutdown = CancellationToken::new();
        tokio::spawn(procroute::http::shutdown_signal(shutdown.clone()));

        procroute::http::serve(listener, router, shutdown)
            .await
            .map_err(|err| CliError::new(INTERNAL, err.to_string()))
    })?;

    Ok(SUCCESS)
}
