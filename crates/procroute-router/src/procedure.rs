use std::fmt;
use std::future::Future;
use std::sync::Arc;

use procroute_schema::Schema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProcedureError, RegistryError, Result};
use crate::handler::{FnHandler, Handler};
use crate::method::Method;
use crate::route::RouteTemplate;

/// REST binding of a procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub template: RouteTemplate,
}

impl Route {
    pub fn new(method: Method, path: &str) -> Result<Self> {
        Ok(Self {
            method,
            template: RouteTemplate::parse(path)?,
        })
    }

    pub fn path(&self) -> &str {
        self.template.path()
    }
}

/// Everything declared about a procedure apart from its handler.
#[derive(Debug, Clone)]
pub struct ProcedureConfig {
    pub name: String,
    /// `(method, path)`; `None` keeps the procedure RPC-only.
    pub route: Option<(Method, String)>,
    /// `None` means the procedure takes no input.
    pub input: Option<Schema>,
    pub output: Schema,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Security scheme names required by this procedure.
    pub security: Vec<String>,
}

impl ProcedureConfig {
    /// Minimal config: a name and an output schema.
    pub fn new(name: impl Into<String>, output: Schema) -> Self {
        Self {
            name: name.into(),
            route: None,
            input: None,
            output,
            summary: None,
            description: None,
            tags: Vec::new(),
            security: Vec::new(),
        }
    }
}

/// A registered unit of server logic. Immutable once built.
#[derive(Clone)]
pub struct Procedure {
    name: String,
    route: Option<Route>,
    input: Option<Schema>,
    output: Schema,
    summary: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    security: Vec<String>,
    handler: Arc<dyn Handler>,
}

impl Procedure {
    /// Build a procedure from its config and an object-safe handler.
    pub fn new(config: ProcedureConfig, handler: Arc<dyn Handler>) -> Result<Self> {
        validate_name(&config.name)?;
        let route = match config.route {
            Some((method, path)) => Some(Route::new(method, &path)?),
            None => None,
        };

        Ok(Self {
            name: config.name,
            route,
            input: config.input,
            output: config.output,
            summary: config.summary,
            description: config.description,
            tags: config.tags,
            security: config.security,
            handler,
        })
    }

    /// Build a procedure from a typed async function.
    pub fn from_fn<I, O, F, Fut>(config: ProcedureConfig, f: F) -> Result<Self>
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<O, ProcedureError>> + Send + 'static,
    {
        Self::new(config, Arc::new(FnHandler::new(f)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn input(&self) -> Option<&Schema> {
        self.input.as_ref()
    }

    pub fn output(&self) -> &Schema {
        &self.output
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn security(&self) -> &[String] {
        &self.security
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// Same procedure under a namespaced name.
    pub(crate) fn renamed(mut self, prefix: &str) -> Result<Self> {
        self.name = format!("{prefix}.{}", self.name);
        validate_name(&self.name)?;
        Ok(self)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("name", &self.name)
            .field("route", &self.route)
            .field("has_input", &self.input.is_some())
            .field("tags", &self.tags)
            .finish()
    }
}

/// Names are dot-separated identifiers: `getTodos`, `math.divide`.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidName(name.to_string()))
    }
}
