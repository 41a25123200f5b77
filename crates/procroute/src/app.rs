//! Service assembly: one registry, shared by the dispatcher, the HTTP
//! router and the OpenAPI document.

use std::sync::Arc;

use axum::Router;
use procroute_http::{AppState, HttpConfig};
use procroute_openapi::DocumentOptions;
use procroute_router::{Dispatcher, DispatcherConfig};

use crate::error::Result;
use crate::procedures;
use crate::settings::AppSettings;

pub fn dispatcher(settings: &AppSettings, config: DispatcherConfig) -> Result<Dispatcher> {
    let registry = procedures::registry(settings)?;
    tracing::debug!(procedures = registry.len(), "registry built");
    Ok(Dispatcher::with_config(Arc::new(registry), config))
}

pub fn router(dispatcher: Dispatcher, http: HttpConfig, document: &DocumentOptions) -> Result<Router> {
    let state = AppState::new(dispatcher, http, document)?;
    Ok(procroute_http::router(state))
}

/// Router with default HTTP, dispatch and document settings.
pub fn default_router(settings: &AppSettings) -> Result<Router> {
    let dispatcher = dispatcher(settings, DispatcherConfig::default())?;
    router(dispatcher, HttpConfig::default(), &DocumentOptions::default())
}
