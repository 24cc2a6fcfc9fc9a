/// Prometheus metrics for board-service
///
/// Exposes the default registry at /metrics in text exposition format.
/// Board-specific counters live in the `board` submodule; the db-pool
/// library registers its own gauges into the same default registry.
use actix_web::{HttpResponse, Responder};
use prometheus::{Encoder, TextEncoder};

pub mod board;

/// Handler for GET /metrics
pub async fn serve_metrics() -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    match String::from_utf8(buffer) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4; charset=utf-8")
            .body(body),
        Err(e) => {
            tracing::error!("Metrics buffer was not valid UTF-8: {}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
