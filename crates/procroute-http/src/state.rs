use std::sync::Arc;

use procroute_openapi::DocumentOptions;
use procroute_router::{normalize_path, Dispatcher, Registry};
use serde_json::Value;

use crate::config::HttpConfig;
use crate::error::{HttpError, Result};

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub config: Arc<HttpConfig>,
    /// Generated once; the registry never changes after startup.
    pub openapi: Arc<Value>,
    pub docs_html: Arc<str>,
}

impl AppState {
    /// Fails with [`HttpError::ShadowedRoute`] when a declared REST route
    /// falls on the RPC, OpenAPI or docs mount points.
    pub fn new(dispatcher: Dispatcher, config: HttpConfig, document: &DocumentOptions) -> Result<Self> {
        check_mounts(dispatcher.registry(), &config)?;

        let openapi = procroute_openapi::generate(dispatcher.registry(), document);
        let docs_html = crate::docs::scalar_page(&config.openapi_path, &config.docs_token);
        Ok(Self {
            dispatcher,
            config: Arc::new(config),
            openapi: Arc::new(openapi),
            docs_html: docs_html.into(),
        })
    }
}

fn check_mounts(registry: &Registry, config: &HttpConfig) -> Result<()> {
    let rpc = normalize_path(&config.rpc_path);
    let rpc_children = format!("{}/", rpc.trim_end_matches('/'));
    let exact = [normalize_path(&config.openapi_path), normalize_path(&config.docs_path)];

    for (name, procedure) in registry.list() {
        let Some(route) = procedure.route() else {
            continue;
        };
        let full = normalize_path(&format!("{}{}", config.rest_prefix, route.path()));

        let mount = if full == rpc || full.starts_with(&rpc_children) {
            Some(rpc.as_str())
        } else {
            exact.iter().find(|mount| **mount == full).map(String::as_str)
        };

        if let Some(mount) = mount {
            return Err(HttpError::ShadowedRoute {
                procedure: name.to_string(),
                method: route.method,
                path: full,
                mount: mount.to_string(),
            });
        }
    }
    Ok(())
}
