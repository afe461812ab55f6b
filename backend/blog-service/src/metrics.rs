//! Prometheus metrics for blog-service.
//!
//! Write and authentication counters plus the `/metrics` handler.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Successful writes segmented by entity (post, comment, category, ...) and action.
    pub static ref BLOG_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_writes_total",
        "Successful content writes segmented by entity and action",
        &["entity", "action"]
    )
    .expect("failed to register blog_writes_total");

    /// Registration and login outcomes.
    pub static ref BLOG_AUTH_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_auth_events_total",
        "Authentication events segmented by outcome",
        &["event"]
    )
    .expect("failed to register blog_auth_events_total");
}

pub fn record_write(entity: &str, action: &str) {
    BLOG_WRITES_TOTAL.with_label_values(&[entity, action]).inc();
}

pub fn record_auth_event(event: &str) {
    BLOG_AUTH_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
