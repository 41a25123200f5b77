use std::collections::HashMap;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::error::{RegistryError, Result};
use crate::method::Method;
use crate::procedure::Procedure;
use crate::route::{normalize_path, RouteTemplate};

/// A resolved REST call: the procedure and the captured path parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub procedure: Arc<Procedure>,
    pub params: Vec<(String, String)>,
}

/// Name-keyed collection of procedures plus the REST route table.
///
/// Built mutably during startup, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct Registry {
    procedures: HashMap<String, Arc<Procedure>>,
    static_routes: HashMap<(Method, String), String>,
    templated_routes: Vec<(Method, RouteTemplate, String)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure under its own name.
    pub fn register(&mut self, procedure: Procedure) -> Result<()> {
        if self.procedures.contains_key(procedure.name()) {
            return Err(RegistryError::DuplicateName(procedure.name().to_string()));
        }

        if let Some(route) = procedure.route() {
            self.check_route_free(route.method, &route.template)?;
            let name = procedure.name().to_string();
            if route.template.is_static() {
                self.static_routes
                    .insert((route.method, route.path().to_string()), name);
            } else {
                self.templated_routes
                    .push((route.method, route.template.clone(), name));
                // Most literal templates first, then by path for a stable order.
                self.templated_routes.sort_by(|a, b| {
                    b.1.static_weight()
                        .cmp(&a.1.static_weight())
                        .then_with(|| a.1.path().cmp(b.1.path()))
                        .then_with(|| a.0.cmp(&b.0))
                });
            }
        }

        tracing::debug!(procedure = procedure.name(), "registered procedure");
        self.procedures
            .insert(procedure.name().to_string(), Arc::new(procedure));
        Ok(())
    }

    /// Merge `other` under a dotted namespace, e.g. `math` + `divide` -> `math.divide`.
    pub fn nest(&mut self, prefix: &str, other: Registry) -> Result<()> {
        let mut nested: Vec<Arc<Procedure>> = other.procedures.into_values().collect();
        nested.sort_by(|a, b| a.name().cmp(b.name()));

        for procedure in nested {
            let procedure = Arc::try_unwrap(procedure).unwrap_or_else(|shared| (*shared).clone());
            self.register(procedure.renamed(prefix)?)?;
        }
        Ok(())
    }

    /// Look up a procedure by name.
    pub fn lookup(&self, name: &str) -> Result<Arc<Procedure>> {
        self.procedures
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// All procedures ordered by name.
    pub fn list(&self) -> Vec<(&str, &Arc<Procedure>)> {
        let mut entries: Vec<(&str, &Arc<Procedure>)> = self
            .procedures
            .iter()
            .map(|(name, procedure)| (name.as_str(), procedure))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Resolve a REST request to a procedure.
    ///
    /// Exact method beats `ANY`, and static routes beat templated ones.
    pub fn resolve_route(&self, method: Method, path: &str) -> Result<RouteMatch> {
        let normalized = normalize_path(path);
        let decoded = percent_decode_str(&normalized).decode_utf8_lossy().into_owned();

        for candidate in [method, Method::Any] {
            if let Some(name) = self.static_routes.get(&(candidate, decoded.clone())) {
                return Ok(RouteMatch {
                    procedure: self.lookup(name)?,
                    params: Vec::new(),
                });
            }
        }

        let mut fallback = None;
        for (declared, template, name) in &self.templated_routes {
            if !declared.accepts(method) {
                continue;
            }
            if let Some(params) = template.matches(&normalized) {
                if *declared == method {
                    return Ok(RouteMatch {
                        procedure: self.lookup(name)?,
                        params,
                    });
                }
                fallback.get_or_insert((name, params));
            }
        }

        match fallback {
            Some((name, params)) => Ok(RouteMatch {
                procedure: self.lookup(name)?,
                params,
            }),
            None => Err(RegistryError::RouteNotFound {
                method,
                path: normalized,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }

    fn check_route_free(&self, method: Method, template: &RouteTemplate) -> Result<()> {
        let existing = if template.is_static() {
            self.static_routes
                .get(&(method, template.path().to_string()))
                .cloned()
        } else {
            self.templated_routes
                .iter()
                .find(|(m, t, _)| *m == method && t.path() == template.path())
                .map(|(_, _, name)| name.clone())
        };

        match existing {
            Some(existing) => Err(RegistryError::DuplicateRoute {
                method,
                path: template.path().to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }
}
