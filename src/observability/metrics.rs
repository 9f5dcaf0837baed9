use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

fn status_label(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Prometheus metrics for the storefront API
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // HTTP metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_flight: GaugeVec,

    // Business metrics
    pub catalog_operations_total: CounterVec,
    pub cart_operations_total: CounterVec,
    pub favorite_operations_total: CounterVec,
    pub intake_operations_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics instance with its own registry
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total number of HTTP requests processed",
            ),
            &["method", "endpoint", "status_code"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "endpoint"],
        )?;

        let http_requests_in_flight = GaugeVec::new(
            Opts::new(
                "http_requests_in_flight",
                "Number of HTTP requests currently being processed",
            ),
            &["method", "endpoint"],
        )?;

        let catalog_operations_total = CounterVec::new(
            Opts::new(
                "catalog_operations_total",
                "Total number of catalog operations",
            ),
            &["kind", "operation", "status"],
        )?;

        let cart_operations_total = CounterVec::new(
            Opts::new("cart_operations_total", "Total number of cart operations"),
            &["operation", "status"],
        )?;

        let favorite_operations_total = CounterVec::new(
            Opts::new(
                "favorite_operations_total",
                "Total number of favorites operations",
            ),
            &["operation", "status"],
        )?;

        let intake_operations_total = CounterVec::new(
            Opts::new(
                "intake_operations_total",
                "Total number of contact and review operations",
            ),
            &["kind", "operation", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(catalog_operations_total.clone()))?;
        registry.register(Box::new(cart_operations_total.clone()))?;
        registry.register(Box::new(favorite_operations_total.clone()))?;
        registry.register(Box::new(intake_operations_total.clone()))?;

        info!("Prometheus metrics initialized");

        Ok(Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            catalog_operations_total,
            cart_operations_total,
            favorite_operations_total,
            intake_operations_total,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        let status_str = status_code.to_string();

        self.http_requests_total
            .with_label_values(&[method, endpoint, &status_str])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_seconds);
    }

    /// `kind` is the collection, e.g. "product"
    pub fn record_catalog_operation(&self, kind: &str, operation: &str, success: bool) {
        self.catalog_operations_total
            .with_label_values(&[kind, operation, status_label(success)])
            .inc();
    }

    pub fn record_cart_operation(&self, operation: &str, success: bool) {
        self.cart_operations_total
            .with_label_values(&[operation, status_label(success)])
            .inc();
    }

    pub fn record_favorite_operation(&self, operation: &str, success: bool) {
        self.favorite_operations_total
            .with_label_values(&[operation, status_label(success)])
            .inc();
    }

    /// `kind` is "contact" or "review"
    pub fn record_intake_operation(&self, kind: &str, operation: &str, success: bool) {
        self.intake_operations_total
            .with_label_values(&[kind, operation, status_label(success)])
            .inc();
    }

    pub fn increment_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .inc();
    }

    pub fn decrement_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .dec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        assert!(Metrics::new().is_ok());
    }

    #[test]
    fn test_http_request_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_http_request("GET", "/api/products", 200, 0.123);
        metrics.record_http_request("POST", "/api/cart/:user_id/items", 201, 0.456);

        let metrics_text = metrics.encode().unwrap();
        assert!(metrics_text.contains("http_requests_total"));
        assert!(metrics_text.contains("http_request_duration_seconds"));
        assert!(metrics_text.contains("status_code=\"201\""));
    }

    #[test]
    fn test_business_metrics_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_catalog_operation("book", "list", true);
        metrics.record_cart_operation("add_item", false);
        metrics.record_favorite_operation("add", true);
        metrics.record_intake_operation("review", "submit", true);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("catalog_operations_total{kind=\"book\",operation=\"list\",status=\"success\"} 1"));
        assert!(encoded.contains("cart_operations_total{operation=\"add_item\",status=\"error\"} 1"));
        assert!(encoded.contains("favorite_operations_total"));
        assert!(encoded.contains("intake_operations_total"));
    }

    #[test]
    fn test_in_flight_requests() {
        let metrics = Metrics::new().unwrap();

        metrics.increment_in_flight("GET", "/api/books");
        metrics.increment_in_flight("GET", "/api/books");
        metrics.decrement_in_flight("GET", "/api/books");

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("http_requests_in_flight{endpoint=\"/api/books\",method=\"GET\"} 1"));
    }

    #[test]
    fn test_separate_registries() {
        // Each instance owns its registry, so tests and routers never collide
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();
        first.record_cart_operation("clear", true);

        assert!(!second.encode().unwrap().contains("operation=\"clear\""));
    }
}
