use procroute_router::{ErrorCode, Method, Procedure, Registry};
use procroute_schema::Schema;
use serde_json::{json, Map, Value};

use crate::options::{DocumentOptions, BEARER_AUTH};

pub const OPENAPI_VERSION: &str = "3.1.1";

const JSON_MEDIA_TYPE: &str = "application/json";
const ERROR_REF: &str = "#/components/schemas/Error";

/// Build the OpenAPI document for every routed procedure in `registry`.
pub fn generate(registry: &Registry, options: &DocumentOptions) -> Value {
    let mut paths = Map::new();
    for (_, procedure) in registry.list() {
        let Some(route) = procedure.route() else {
            continue;
        };
        let entry = paths
            .entry(route.path().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(item) = entry {
            item.insert(
                operation_key(route.method).to_string(),
                operation(procedure, route.template.params()),
            );
        }
    }

    let mut info = Map::new();
    info.insert("title".into(), json!(options.title));
    info.insert("version".into(), json!(options.version));
    if let Some(description) = &options.description {
        info.insert("description".into(), json!(description));
    }

    let mut components = Map::new();
    components.insert("schemas".into(), json!({ "Error": error_schema() }));

    let mut document = Map::new();
    document.insert("openapi".into(), json!(OPENAPI_VERSION));
    document.insert("info".into(), Value::Object(info));
    if !options.servers.is_empty() {
        document.insert("servers".into(), json!(options.servers));
    }
    if options.bearer_auth {
        components.insert(
            "securitySchemes".into(),
            json!({ BEARER_AUTH: { "type": "http", "scheme": "bearer" } }),
        );
        document.insert("security".into(), json!([{ BEARER_AUTH: [] }]));
    }
    document.insert("paths".into(), Value::Object(paths));
    document.insert("components".into(), Value::Object(components));
    Value::Object(document)
}

/// Schema of the error object returned by failed REST calls.
pub fn error_schema() -> Value {
    let codes: Vec<&str> = ErrorCode::ALL.iter().map(|code| code.as_str()).collect();
    json!({
        "type": "object",
        "properties": {
            "code": { "type": "string", "enum": codes },
            "message": { "type": "string" },
            "issues": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["code", "message"]
    })
}

// OpenAPI has no wildcard method; ANY routes are documented as POST.
fn operation_key(method: Method) -> &'static str {
    match method {
        Method::Get => "get",
        Method::Put => "put",
        Method::Patch => "patch",
        Method::Delete => "delete",
        Method::Post | Method::Any => "post",
    }
}

fn operation(procedure: &Procedure, path_params: Vec<&str>) -> Value {
    let mut op = Map::new();
    op.insert("operationId".into(), json!(procedure.name()));
    if let Some(summary) = procedure.summary() {
        op.insert("summary".into(), json!(summary));
    }
    if let Some(description) = procedure.description() {
        op.insert("description".into(), json!(description));
    }
    if !procedure.tags().is_empty() {
        op.insert("tags".into(), json!(procedure.tags()));
    }

    let method = procedure.route().map(|route| route.method).unwrap_or(Method::Post);
    let input = procedure.input();

    let mut parameters = Vec::new();
    for name in &path_params {
        parameters.push(json!({
            "name": name,
            "in": "path",
            "required": true,
            "schema": input.and_then(|s| property_schema(s, name)).unwrap_or_else(|| json!({"type": "string"})),
        }));
    }

    if let Some(schema) = input {
        if method.reads_query() {
            for name in schema.property_names() {
                if path_params.contains(&name.as_str()) {
                    continue;
                }
                parameters.push(json!({
                    "name": name,
                    "in": "query",
                    "required": schema.requires(&name),
                    "schema": property_schema(schema, &name).unwrap_or_else(|| json!({})),
                }));
            }
        } else {
            op.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": { JSON_MEDIA_TYPE: { "schema": schema.document() } }
                }),
            );
        }
    }
    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    let mut responses = Map::new();
    responses.insert(
        "200".into(),
        json!({
            "description": "OK",
            "content": { JSON_MEDIA_TYPE: { "schema": procedure.output().document() } }
        }),
    );
    if input.is_some() {
        responses.insert("400".into(), error_response("Invalid input"));
    }
    responses.insert("default".into(), error_response("Error"));
    op.insert("responses".into(), Value::Object(responses));

    if !procedure.security().is_empty() {
        let requirements: Vec<Value> = procedure
            .security()
            .iter()
            .map(|scheme| json!({ scheme.as_str(): [] }))
            .collect();
        op.insert("security".into(), Value::Array(requirements));
    }

    Value::Object(op)
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { JSON_MEDIA_TYPE: { "schema": { "$ref": ERROR_REF } } }
    })
}

fn property_schema(schema: &Schema, name: &str) -> Option<Value> {
    schema
        .document()
        .get("properties")
        .and_then(|props| props.get(name))
        .cloned()
}
