use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Response header echoing the id assigned to the request
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Query parameters whose values never reach the logs
const SENSITIVE_PARAMS: &[&str] = &["api_key", "token", "password", "secret"];

/// Middleware to log all HTTP requests and responses with structured data
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = sanitize_query(request.uri().query().unwrap_or(""));
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = %query,
        user_agent = %user_agent,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Mask the values of sensitive query parameters
fn sanitize_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SENSITIVE_PARAMS.contains(&key) => format!("{}=***", key),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
