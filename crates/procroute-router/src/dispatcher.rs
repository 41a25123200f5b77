use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde_json::{Map, Value};

use crate::envelope::{CallEnvelope, Dispatched, RawInput, RouteCall};
use crate::error::{ErrorCode, ProcedureError, INTERNAL_MESSAGE};
use crate::procedure::Procedure;
use crate::registry::Registry;

/// Controls dispatch behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Upper bound on handler run time; `None` waits forever.
    pub handler_timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            handler_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Executes calls against a read-only [`Registry`].
///
/// Holds no mutable state; clones share the registry and can dispatch
/// concurrently. Handlers run on the caller's task, so dropping the returned
/// future cancels the handler.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, DispatcherConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatch a call addressed by procedure name.
    pub async fn dispatch(&self, call: CallEnvelope) -> Dispatched {
        match self.registry.lookup(&call.procedure) {
            Ok(procedure) => self.execute(&procedure, call.input).await,
            Err(err) => {
                tracing::debug!(procedure = %call.procedure, "unknown procedure");
                Dispatched::failure(err.into())
            }
        }
    }

    /// Dispatch a REST call addressed by method and path.
    pub async fn dispatch_route(&self, call: RouteCall) -> Dispatched {
        let matched = match self.registry.resolve_route(call.method, &call.path) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::debug!(method = %call.method, path = %call.path, "no matching route");
                return Dispatched::failure(err.into());
            }
        };

        let params = collect_params(call.query, matched.params);
        let input = RawInput::Params {
            params,
            body: call.body,
        };
        self.execute(&matched.procedure, input).await
    }

    async fn execute(&self, procedure: &Procedure, input: RawInput) -> Dispatched {
        tracing::debug!(procedure = procedure.name(), "dispatching");
        match self.run(procedure, input).await {
            Ok(value) => Dispatched::success(value),
            Err(err) => {
                if err.code == ErrorCode::Internal {
                    tracing::error!(procedure = procedure.name(), error = %err, "procedure failed");
                } else {
                    tracing::debug!(procedure = procedure.name(), error = %err, "procedure rejected call");
                }
                Dispatched::failure(err.redacted())
            }
        }
    }

    async fn run(&self, procedure: &Procedure, input: RawInput) -> Result<Value, ProcedureError> {
        let input = prepare_input(procedure, input)?;

        let call = AssertUnwindSafe(procedure.handler().call(input)).catch_unwind();
        let outcome = match self.config.handler_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ProcedureError::new(
                    ErrorCode::Timeout,
                    format!("Procedure did not complete within {}ms", limit.as_millis()),
                )
            })?,
            None => call.await,
        };

        let output = match outcome {
            Ok(result) => result?,
            Err(_) => return Err(ProcedureError::internal("handler panicked")),
        };

        if let Err(err) = procedure.output().validate(&output) {
            tracing::error!(
                procedure = procedure.name(),
                issues = ?err.issues(),
                "handler output violates its declared schema"
            );
            return Err(ProcedureError::internal(INTERNAL_MESSAGE));
        }

        Ok(output)
    }
}

/// Validate (and for parameters, coerce) input against the procedure's schema.
fn prepare_input(procedure: &Procedure, input: RawInput) -> Result<Value, ProcedureError> {
    let Some(schema) = procedure.input() else {
        return Ok(Value::Null);
    };

    let value = match input {
        RawInput::Structured(value) => value,
        RawInput::Params { params, body } => {
            let mut params = Value::Object(params);
            schema.coerce(&mut params);
            merge_body(params, body)?
        }
    };

    schema.validate(&value).map_err(|err| {
        ProcedureError::bad_request("Input validation failed").with_issues(err.issues().to_vec())
    })?;
    Ok(value)
}

/// Query pairs first (repeated keys collect into arrays), then path params,
/// which win on conflicts.
fn collect_params(query: Vec<(String, String)>, path: Vec<(String, String)>) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in query {
        match params.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                params.insert(key, Value::String(value));
            }
        }
    }
    for (key, value) in path {
        params.insert(key, Value::String(value));
    }
    params
}

/// Merge coerced parameters with a JSON body. Path and query values override
/// body fields of the same name.
fn merge_body(params: Value, body: Option<Value>) -> Result<Value, ProcedureError> {
    let Value::Object(params) = params else {
        return Ok(params);
    };

    match body {
        None | Some(Value::Null) => {
            if params.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::Object(params))
            }
        }
        Some(Value::Object(mut fields)) => {
            fields.extend(params);
            Ok(Value::Object(fields))
        }
        Some(other) if params.is_empty() => Ok(other),
        Some(_) => Err(ProcedureError::bad_request(
            "Request body must be a JSON object when path or query parameters are present",
        )),
    }
}

#[cfg(test)]
mod tests {
    use procroute_schema::Schema;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::handler::Handler;
    use crate::method::Method;
    use crate::procedure::ProcedureConfig;

    #[derive(Deserialize)]
    struct DivideInput {
        a: f64,
        b: f64,
    }

    fn divide() -> Procedure {
        let mut config = ProcedureConfig::new(
            "divide",
            Schema::compile(json!({
                "type": "object",
                "properties": { "result": { "type": "number" } },
                "required": ["result"]
            }))
            .unwrap(),
        );
        config.route = Some((Method::Post, "/divide".to_string()));
        config.input = Some(
            Schema::compile(json!({
                "type": "object",
                "properties": { "a": { "type": "number" }, "b": { "type": "number" } },
                "required": ["a", "b"]
            }))
            .unwrap(),
        );
        Procedure::from_fn(config, |input: DivideInput| async move {
            if input.b == 0.0 {
                return Err(ProcedureError::bad_request("Cannot divide by zero"));
            }
            Ok(json!({ "result": input.a / input.b }))
        })
        .unwrap()
    }

    fn with_handler(name: &str, handler: Arc<dyn Handler>) -> Procedure {
        let config = ProcedureConfig::new(name, Schema::compile(json!({"type": "string"})).unwrap());
        Procedure::new(config, handler).unwrap()
    }

    struct Panicking;

    #[async_trait::async_trait]
    impl Handler for Panicking {
        async fn call(&self, _input: Value) -> Result<Value, ProcedureError> {
            panic!("boom");
        }
    }

    struct WrongShape;

    #[async_trait::async_trait]
    impl Handler for WrongShape {
        async fn call(&self, _input: Value) -> Result<Value, ProcedureError> {
            Ok(json!(42))
        }
    }

    struct Slow;

    #[async_trait::async_trait]
    impl Handler for Slow {
        async fn call(&self, _input: Value) -> Result<Value, ProcedureError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(json!("late"))
        }
    }

    struct Leaky;

    #[async_trait::async_trait]
    impl Handler for Leaky {
        async fn call(&self, _input: Value) -> Result<Value, ProcedureError> {
            Err(ProcedureError::internal("connection string postgres://secret"))
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = Registry::new();
        registry.register(divide()).unwrap();
        registry.register(with_handler("panics", Arc::new(Panicking))).unwrap();
        registry.register(with_handler("wrongShape", Arc::new(WrongShape))).unwrap();
        registry.register(with_handler("slow", Arc::new(Slow))).unwrap();
        registry.register(with_handler("leaky", Arc::new(Leaky))).unwrap();
        Dispatcher::with_config(
            Arc::new(registry),
            DispatcherConfig {
                handler_timeout: Some(Duration::from_millis(50)),
            },
        )
    }

    #[tokio::test]
    async fn rpc_call_succeeds() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("divide", json!({"a": 9, "b": 2})))
            .await;

        assert_eq!(out.status, 200);
        assert_eq!(out.envelope.value, Some(json!({"result": 4.5})));
    }

    #[tokio::test]
    async fn domain_error_maps_to_bad_request() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("divide", json!({"a": 1, "b": 0})))
            .await;

        assert_eq!(out.status, 400);
        let err = out.envelope.error.unwrap();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.message, "Cannot divide by zero");
    }

    #[tokio::test]
    async fn rpc_input_is_not_coerced() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("divide", json!({"a": "4", "b": "2"})))
            .await;

        assert_eq!(out.status, 400);
        assert!(!out.envelope.error.unwrap().issues.is_empty());
    }

    #[tokio::test]
    async fn unknown_procedure_is_not_found() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("missing", Value::Null))
            .await;

        assert_eq!(out.status, 404);
        assert_eq!(out.envelope.error.unwrap().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn rest_query_params_are_coerced() {
        let call = RouteCall::new(Method::Post, "/divide")
            .with_query(vec![("a".into(), "8".into()), ("b".into(), "4".into())]);
        let out = dispatcher().dispatch_route(call).await;

        assert_eq!(out.status, 200);
        assert_eq!(out.rest_body(), json!({"result": 2.0}));
    }

    #[tokio::test]
    async fn rest_body_stays_strict() {
        let call = RouteCall::new(Method::Post, "/divide").with_body(json!({"a": "8", "b": 4}));
        let out = dispatcher().dispatch_route(call).await;

        assert_eq!(out.status, 400);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let out = dispatcher()
            .dispatch_route(RouteCall::new(Method::Get, "/divide"))
            .await;

        assert_eq!(out.status, 404);
    }

    #[tokio::test]
    async fn panics_become_opaque_internal_errors() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("panics", Value::Null))
            .await;

        assert_eq!(out.status, 500);
        assert_eq!(out.envelope.error.unwrap().message, INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn output_contract_violation_is_internal() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("wrongShape", Value::Null))
            .await;

        assert_eq!(out.status, 500);
        let err = out.envelope.error.unwrap();
        assert_eq!(err.code, ErrorCode::Internal);
        assert!(err.issues.is_empty());
    }

    #[tokio::test]
    async fn internal_messages_are_withheld() {
        let out = dispatcher()
            .dispatch(CallEnvelope::rpc("leaky", Value::Null))
            .await;

        assert_eq!(out.envelope.error.unwrap().message, INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn slow_handlers_time_out() {
        let out = dispatcher().dispatch(CallEnvelope::rpc("slow", Value::Null)).await;

        assert_eq!(out.status, 408);
        assert_eq!(out.envelope.error.unwrap().code, ErrorCode::Timeout);
    }

    #[test]
    fn repeated_query_keys_collect_into_arrays() {
        let params = collect_params(
            vec![
                ("tag".into(), "a".into()),
                ("tag".into(), "b".into()),
                ("tag".into(), "c".into()),
                ("id".into(), "1".into()),
            ],
            vec![("id".into(), "2".into())],
        );

        assert_eq!(params["tag"], json!(["a", "b", "c"]));
        assert_eq!(params["id"], json!("2"));
    }

    #[test]
    fn params_override_body_fields() {
        let merged = merge_body(json!({"id": 3}), Some(json!({"id": 1, "text": "x"}))).unwrap();
        assert_eq!(merged, json!({"id": 3, "text": "x"}));

        assert_eq!(merge_body(json!({}), None).unwrap(), Value::Null);
        assert!(merge_body(json!({"id": 3}), Some(json!([1]))).is_err());
        assert_eq!(merge_body(json!({}), Some(json!([1]))).unwrap(), json!([1]));
    }
}
