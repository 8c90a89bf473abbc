use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";

// Helper to create test app
fn create_test_app() -> axum::Router {
    use json_sender::api;
    use std::sync::Arc;

    let state = Arc::new(api::handlers::AppStateInner::new(
        "test-instance",
        Some(ADMIN_KEY.to_string()),
    ));

    api::routes::create_router(state)
}

struct TestResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(json!({}))
    }
}

async fn send(app: &axum::Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        content_type,
        body,
    }
}

// Helper to send request without a body
async fn send_empty_request(app: &axum::Router, method: &str, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// Helper to send raw bytes as a JSON request body
async fn send_raw_body_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: impl Into<Body>,
) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

async fn register(app: &axum::Router, email: &str, username: &str) -> TestResponse {
    let body = serde_json::to_vec(&json!({"email": email, "username": username})).unwrap();
    send_raw_body_request(app, "POST", "/accounts", body).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();
    let response = send_empty_request(&app, "GET", "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "json-sender");
    assert_eq!(body["instance_id"], "test-instance");
}

#[tokio::test]
async fn test_register_account() {
    let app = create_test_app();
    let response = register(&app, "miguel@gmail.com", "miguel").await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert_eq!(
        response.body,
        b"{\"email\":\"miguel@gmail.com\",\"username\":\"miguel\",\"activated\":false}\n"
    );
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app();
    register(&app, "miguel@gmail.com", "miguel").await;
    let response = register(&app, "Miguel@Gmail.com", "other").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body,
        b"{\"error\":{\"status\":409,\"error\":\"ALREADY_EXISTS\",\"description\":\"Email already exists\"}}\n"
    );
}

#[tokio::test]
async fn test_register_single_field_error() {
    let app = create_test_app();
    let response = register(&app, "", "miguel").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body,
        b"{\"error\":{\"status\":422,\"error\":\"INVALID_ARGUMENT\",\"description\":\"One or more fields raised validation errors.\",\"fields\":{\"email\":\"The email is required.\"}}}\n"
    );
}

#[tokio::test]
async fn test_register_multiple_field_errors() {
    let app = create_test_app();
    let response = send_raw_body_request(&app, "POST", "/accounts", "{}").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json();
    assert_eq!(body["error"]["status"], 422);
    assert_eq!(body["error"]["error"], "INVALID_ARGUMENT");
    assert_eq!(
        body["error"]["description"],
        "One or more fields raised validation errors."
    );
    assert_eq!(body["error"]["fields"]["email"], "The email is required.");
    assert_eq!(body["error"]["fields"]["username"], "The user name is blank.");
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = create_test_app();
    let response = send_raw_body_request(&app, "POST", "/accounts", "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"]["status"], 400);
    assert_eq!(body["error"]["error"], "INVALID_ARGUMENT");
    assert!(body["error"]["description"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert!(body["error"].get("fields").is_none());
}

#[tokio::test]
async fn test_get_account() {
    let app = create_test_app();
    register(&app, "a@b.com", "ab").await;

    let response = send_empty_request(&app, "GET", "/accounts/a@b.com").await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body, json!({"email": "a@b.com", "username": "ab", "activated": false}));
}

#[tokio::test]
async fn test_get_missing_account() {
    let app = create_test_app();
    let response = send_empty_request(&app, "GET", "/accounts/nobody@b.com").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let body = response.json();
    assert_eq!(body["error"]["error"], "NOT_FOUND");
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn test_delete_requires_api_key() {
    let app = create_test_app();
    register(&app, "a@b.com", "ab").await;

    let response = send_empty_request(&app, "DELETE", "/accounts/a@b.com").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        b"{\"error\":{\"status\":401,\"error\":\"NOT_AUTHORIZED\",\"description\":\"Missing or invalid API key\"}}\n"
    );

    // Account is still there
    let response = send_empty_request(&app, "GET", "/accounts/a@b.com").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account() {
    let app = create_test_app();
    register(&app, "a@b.com", "ab").await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/accounts/a@b.com")
        .header("x-api-key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert!(response.body.is_empty());

    let response = send_empty_request(&app, "GET", "/accounts/a@b.com").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();
    let response = send_empty_request(&app, "GET", "/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    let body = response.json();
    assert_eq!(body["error"]["error"], "NOT_FOUND");
    assert_eq!(body["error"]["description"], "No route for GET /nope");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = create_test_app();
    register(&app, "metrics@b.com", "m").await;
    register(&app, "metrics@b.com", "m").await;

    let response = send_empty_request(&app, "GET", "/metrics").await;
    assert_eq!(response.status, StatusCode::OK);
    let text = String::from_utf8(response.body).unwrap();
    assert!(text.contains("json_error_responses_total"));
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_metrics_are_labelled_by_route_template() {
    let app = create_test_app();
    send_empty_request(&app, "GET", "/accounts/x@y.com").await;
    send_empty_request(&app, "GET", "/nope").await;

    let response = send_empty_request(&app, "GET", "/metrics").await;
    let text = String::from_utf8(response.body).unwrap();

    assert!(text.contains(
        r#"http_requests_total{method="GET",path="/accounts/:email",status="404"}"#
    ));
    assert!(text.contains(r#"path="<unmatched>""#));
    assert!(!text.contains("x@y.com"));
}
