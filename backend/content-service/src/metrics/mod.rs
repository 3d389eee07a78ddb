/// Prometheus metrics for the mutation and notification pipeline
use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};

static MEDIA_UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "content_service_media_uploads_total",
            "Media payload uploads by outcome",
        ),
        &["outcome"],
    )
    .expect("failed to create content_service_media_uploads_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register content_service_media_uploads_total");
    counter
});

static MEDIA_DISCARDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "content_service_media_discards_total",
            "Stale media deletions by outcome",
        ),
        &["outcome"],
    )
    .expect("failed to create content_service_media_discards_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register content_service_media_discards_total");
    counter
});

static NOTIFICATIONS_DISPATCHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "content_service_notifications_dispatched_total",
            "Notifications dispatched by kind and persistence outcome",
        ),
        &["kind", "outcome"],
    )
    .expect("failed to create content_service_notifications_dispatched_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register content_service_notifications_dispatched_total");
    counter
});

static LIVE_PUSHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "content_service_live_pushes_total",
            "Real-time pushes to connected channels by outcome",
        ),
        &["outcome"],
    )
    .expect("failed to create content_service_live_pushes_total");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("failed to register content_service_live_pushes_total");
    counter
});

/// `outcome`: success | failure | timeout
pub fn record_media_upload(outcome: &str) {
    MEDIA_UPLOADS_TOTAL.with_label_values(&[outcome]).inc();
}

/// `outcome`: deleted | unconfirmed | failure | timeout
pub fn record_media_discard(outcome: &str) {
    MEDIA_DISCARDS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_notification(kind: &str, outcome: &str) {
    NOTIFICATIONS_DISPATCHED_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

/// `outcome`: delivered | closed | timeout
pub fn record_live_push(outcome: &str) {
    LIVE_PUSHES_TOTAL.with_label_values(&[outcome]).inc();
}

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
