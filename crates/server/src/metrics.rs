use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static LOGIN_SUCCESS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "air_cargo_login_success_total",
        "Successful logins"
    )
    .expect("register login_success_total")
});

pub static LOGIN_FAILURE_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "air_cargo_login_failure_total",
        "Rejected logins (bad credentials or disabled account)"
    )
    .expect("register login_failure_total")
});

/// Requests rejected by the gate, labelled `unauthenticated` or `forbidden`.
pub static AUTHZ_DENIED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "air_cargo_authz_denied_total",
        "Requests rejected by the authorization gate",
        &["reason"]
    )
    .expect("register authz_denied_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

/// Touch every metric so `/metrics` lists them before first use.
pub fn init() {
    Lazy::force(&LOGIN_SUCCESS_TOTAL);
    Lazy::force(&LOGIN_FAILURE_TOTAL);
    Lazy::force(&AUTHZ_DENIED_TOTAL);
}
