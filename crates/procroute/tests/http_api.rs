use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use procroute::{app, AppSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> Router {
    app::default_router(&AppSettings::default()).expect("router should build")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = router().oneshot(request).await.expect("request should complete");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

#[tokio::test]
async fn rest_greet() {
    let (status, body) = send(post("/api/greet", json!({"name": "Ada"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Hello, Ada!"}));
}

#[tokio::test]
async fn rest_greet_rejects_empty_name() {
    let (status, body) = send(post("/api/greet", json!({"name": ""}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn rest_divide() {
    let (status, body) = send(post("/api/divide", json!({"a": 10, "b": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 2.5}));

    let (status, body) = send(post("/api/divide", json!({"a": 10, "b": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Cannot divide by zero");
}

#[tokio::test]
async fn rest_divide_coerces_query_strings() {
    let (status, body) = send(
        Request::builder()
            .method("POST")
            .uri("/api/divide?a=9&b=3")
            .body(Body::empty())
            .expect("request should build"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 3.0}));
}

#[tokio::test]
async fn rest_todos() {
    let (status, body) = send(get("/api/todos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "text": "Learn oRPC", "completed": true},
            {"id": 2, "text": "Build something awesome", "completed": false}
        ])
    );
}

#[tokio::test]
async fn rest_time() {
    let (status, body) = send(get("/api/time")).await;

    assert_eq!(status, StatusCode::OK);
    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(body["timezone"], "UTC");
}

#[tokio::test]
async fn hello_is_rpc_only() {
    let (status, _) = send(get("/api/hello")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(post("/api/rpc", json!({"procedure": "hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true, "value": {"message": "Hello from oRPC!"}}));
}

#[tokio::test]
async fn rpc_by_path_with_body() {
    let (status, body) = send(post("/api/rpc/greet", json!({"input": {"name": "Lin"}}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"]["message"], "Hello, Lin!");
}

#[tokio::test]
async fn rpc_unknown_procedure_is_not_found() {
    let (status, body) = send(post("/api/rpc", json!({"procedure": "missing"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn openapi_covers_routed_procedures() {
    let (status, body) = send(get("/api/openapi")).await;
    assert_eq!(status, StatusCode::OK);

    let mut paths: Vec<&String> = body["paths"].as_object().expect("paths object").keys().collect();
    paths.sort();
    assert_eq!(paths, ["/divide", "/greet", "/time", "/todos"]);
    assert_eq!(body["paths"]["/divide"]["post"]["operationId"], "divide");
    assert_eq!(body["paths"]["/todos"]["get"]["operationId"], "getTodos");
    assert_eq!(body["servers"][0]["url"], "/api");
}

#[tokio::test]
async fn openapi_is_deterministic() {
    let (_, first) = send(get("/api/openapi")).await;
    let (_, second) = send(get("/api/openapi")).await;

    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn docs_page_embeds_viewer() {
    let response = router().oneshot(get("/api/docs")).await.expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("@scalar/api-reference"));
    assert!(html.contains("/api/openapi"));
    assert!(html.contains("default-token"));
}
