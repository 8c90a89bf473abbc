use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Sender Metrics
    pub static ref JSON_ERROR_RESPONSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "json_error_responses_total",
        "Total error envelopes sent",
        &["error", "status"]
    )
    .unwrap();

    pub static ref JSON_SEND_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "json_send_failures_total",
        "Total responses that failed to encode or write",
        &["stage"]  // stage: encode_envelope, encode_payload, write
    )
    .unwrap();

    // Business Metrics
    pub static ref ACCOUNTS_TOTAL: IntGauge = register_int_gauge!(
        "accounts_total",
        "Number of registered accounts"
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&JSON_ERROR_RESPONSES_TOTAL);
    lazy_static::initialize(&JSON_SEND_FAILURES_TOTAL);
    lazy_static::initialize(&ACCOUNTS_TOTAL);
}
