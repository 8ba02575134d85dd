//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "gigwork_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "gigwork_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "gigwork_http_requests_in_flight";

    // WebSocket metrics
    pub const WS_CONNECTIONS_TOTAL: &str = "gigwork_ws_connections_total";
    pub const WS_CONNECTIONS_ACTIVE: &str = "gigwork_ws_connections_active";
    pub const WS_MESSAGES_SENT: &str = "gigwork_ws_messages_sent_total";

    // Hire metrics
    pub const HIRES_TOTAL: &str = "gigwork_hires_total";
    pub const HIRE_CONFLICTS_TOTAL: &str = "gigwork_hire_conflicts_total";
    pub const NOTIFICATIONS_SENT_TOTAL: &str = "gigwork_notifications_sent_total";
    pub const NOTIFICATIONS_DROPPED_TOTAL: &str = "gigwork_notifications_dropped_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "gigwork_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a WebSocket connection opening.
pub fn record_ws_connected() {
    counter!(names::WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(names::WS_CONNECTIONS_ACTIVE).increment(1.0);
}

/// Record a WebSocket connection closing.
pub fn record_ws_disconnected() {
    gauge!(names::WS_CONNECTIONS_ACTIVE).decrement(1.0);
}

/// Record a WebSocket message pushed to a client.
pub fn record_ws_message_sent(message_type: &str) {
    let labels = [("type", message_type.to_string())];
    counter!(names::WS_MESSAGES_SENT, &labels).increment(1);
}

/// Record a completed hire.
pub fn record_hire() {
    counter!(names::HIRES_TOTAL).increment(1);
}

/// Record a hire rejected because the gig was already assigned.
pub fn record_hire_conflict() {
    counter!(names::HIRE_CONFLICTS_TOTAL).increment(1);
}

/// Record a delivered hire notification.
pub fn record_notification_sent() {
    counter!(names::NOTIFICATIONS_SENT_TOTAL).increment(1);
}

/// Record a dropped hire notification.
pub fn record_notification_dropped() {
    counter!(names::NOTIFICATIONS_DROPPED_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    // Normalize bid IDs first so UUID-shaped bids keep their route label
    let path = regex_lite::Regex::new(r"/bids/[a-zA-Z0-9_-]+")
        .unwrap()
        .replace_all(path, "/bids/:bid_id");
    // Replace remaining UUIDs and numeric IDs with placeholders
    let path = regex_lite::Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .unwrap()
        .replace_all(&path, ":id");
    let path = regex_lite::Regex::new(r"/[0-9]+(/|$)")
        .unwrap()
        .replace_all(&path, "/:id$1");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/bids/bid-7f3a/hire"),
            "/api/bids/:bid_id/hire"
        );
        assert_eq!(
            sanitize_path("/api/bids/550e8400-e29b-41d4-a716-446655440000/hire"),
            "/api/bids/:bid_id/hire"
        );
    }
}
