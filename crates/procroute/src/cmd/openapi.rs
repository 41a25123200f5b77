use procroute::openapi::DocumentOptions;
use procroute::router::DispatcherConfig;
use procroute::{app, AppSettings};

use crate::cmd::OpenapiArgs;
use crate::exit::{setup_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: OpenapiArgs) -> CliResult<i32> {
    // The document does not depend on the reported timezone.
    let dispatcher = app::dispatcher(&AppSettings::default(), DispatcherConfig::default())
        .map_err(setup_error)?;
    let document = procroute::openapi::generate(dispatcher.registry(), &DocumentOptions::default());

    let rendered = if args.compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    }
    .map_err(|err| CliError::new(INTERNAL, format!("failed to render document: {err}")))?;

    println!("{rendered}");
    Ok(SUCCESS)
}
