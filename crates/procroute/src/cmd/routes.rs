use procroute::router::DispatcherConfig;
use procroute::{app, AppSettings};

use crate::cmd::RoutesArgs;
use crate::exit::{setup_error, CliResult, SUCCESS};
use crate::output::{print_routes, OutputFormat, RouteRow};

pub fn run(_args: RoutesArgs, format: OutputFormat) -> CliResult<i32> {
    let dispatcher = app::dispatcher(&AppSettings::default(), DispatcherConfig::default())
        .map_err(setup_error)?;

    let rows: Vec<RouteRow> = dispatcher
        .registry()
        .list()
        .into_iter()
        .map(|(name, procedure)| RouteRow {
            procedure: name.to_string(),
            method: procedure.route().map(|route| route.method.to_string()),
            path: procedure.route().map(|route| route.path().to_string()),
            input: procedure.input().is_some(),
            summary: procedure.summary().map(str::to_string),
        })
        .collect();

    print_routes(&rows, format);
    Ok(SUCCESS)
}
