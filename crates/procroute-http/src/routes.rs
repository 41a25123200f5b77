use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Method as HttpMethod, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use procroute_router::{CallEnvelope, Dispatched, Method, ProcedureError, RouteCall};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with tracing and (optionally) CORS layers.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();
    let rpc_by_path_route = format!("{}/{{*procedure}}", config.rpc_path.trim_end_matches('/'));

    let app = Router::new()
        .route(&config.rpc_path, any(rpc_envelope))
        .route(&rpc_by_path_route, any(rpc_by_path))
        .route(&config.openapi_path, get(openapi))
        .route(&config.docs_path, get(docs))
        .fallback(rest)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

#[derive(Debug, Deserialize)]
struct RpcRequest {
    procedure: String,
    #[serde(default)]
    input: Value,
}

#[derive(Debug, Deserialize)]
struct RpcPathRequest {
    #[serde(default)]
    input: Value,
}

async fn rpc_envelope(State(state): State<AppState>, body: Bytes) -> Response {
    if is_blank(&body) {
        return envelope_response(Dispatched::failure(ProcedureError::bad_request(
            "RPC request body must name a procedure",
        )));
    }

    let request: RpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "malformed rpc request");
            return envelope_response(Dispatched::failure(ProcedureError::bad_request(format!(
                "Malformed RPC request: {err}"
            ))));
        }
    };

    let call = CallEnvelope::rpc(request.procedure, request.input);
    envelope_response(state.dispatcher.dispatch(call).await)
}

async fn rpc_by_path(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    body: Bytes,
) -> Response {
    let name = procedure.trim_matches('/').replace('/', ".");
    let input = if is_blank(&body) {
        Value::Null
    } else {
        match serde_json::from_slice::<RpcPathRequest>(&body) {
            Ok(request) => request.input,
            Err(err) => {
                tracing::debug!(procedure = %name, error = %err, "malformed rpc request");
                return envelope_response(Dispatched::failure(ProcedureError::bad_request(
                    format!("Malformed RPC request: {err}"),
                )));
            }
        }
    };

    envelope_response(state.dispatcher.dispatch(CallEnvelope::rpc(name, input)).await)
}

async fn openapi(State(state): State<AppState>) -> Json<Value> {
    Json(state.openapi.as_ref().clone())
}

async fn docs(State(state): State<AppState>) -> Html<String> {
    Html(state.docs_html.to_string())
}

/// Everything not matched above: declared REST routes under the prefix.
async fn rest(
    State(state): State<AppState>,
    method: HttpMethod,
    uri: Uri,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Bytes,
) -> Response {
    let not_found = || {
        rest_response(Dispatched::failure(ProcedureError::not_found(format!(
            "No route for {method} {}",
            uri.path()
        ))))
    };

    let Some(path) = state.config.rest_path(uri.path()) else {
        return not_found();
    };
    let method = match method.as_str().parse::<Method>() {
        Ok(Method::Any) | Err(_) => return not_found(),
        Ok(method) => method,
    };

    let query = match query {
        Ok(Query(pairs)) => pairs,
        Err(err) => {
            return rest_response(Dispatched::failure(ProcedureError::bad_request(format!(
                "Malformed query string: {err}"
            ))))
        }
    };

    let mut call = RouteCall::new(method, path).with_query(query);
    if !is_blank(&body) {
        match serde_json::from_slice(&body) {
            Ok(value) => call = call.with_body(value),
            Err(err) => {
                return rest_response(Dispatched::failure(ProcedureError::bad_request(format!(
                    "Request body is not valid JSON: {err}"
                ))))
            }
        }
    }

    rest_response(state.dispatcher.dispatch_route(call).await)
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn status(dispatched: &Dispatched) -> StatusCode {
    StatusCode::from_u16(dispatched.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn envelope_response(dispatched: Dispatched) -> Response {
    (status(&dispatched), Json(dispatched.envelope)).into_response()
}

fn rest_response(dispatched: Dispatched) -> Response {
    (status(&dispatched), Json(dispatched.rest_body())).into_response()
}
