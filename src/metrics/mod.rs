//! Prometheus metrics for the incident tracker.
//!
//! Every metric is registered the first time the registry is touched, so
//! [`init_metrics`] is safe to call more than once (tests build many routers
//! in one process).
//!
//! # Example
//! ```no_run
//! use incident_tracker::metrics::{self, HTTP_REQUESTS_TOTAL};
//!
//! metrics::init_metrics();
//! HTTP_REQUESTS_TOTAL
//!     .with_label_values(&["GET", "/health", "200"])
//!     .inc();
//! ```

mod middleware;

pub use middleware::track_metrics;

use lazy_static::lazy_static;
use prometheus::{CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "incident_tracker";

lazy_static! {
    // ============================================================================
    // HTTP Metrics
    // ============================================================================

    /// Total number of HTTP requests received
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests")
            .namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration in seconds
    ///
    /// Labels: method, path
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds"
        )
        .namespace(NAMESPACE)
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Number of HTTP requests currently being served
    pub static ref HTTP_REQUESTS_IN_FLIGHT: Gauge = Gauge::with_opts(
        Opts::new("http_requests_in_flight", "Number of HTTP requests currently being served")
            .namespace(NAMESPACE)
    ).expect("Failed to create HTTP_REQUESTS_IN_FLIGHT metric");

    // ============================================================================
    // Incident Metrics
    // ============================================================================

    /// Incident operations by outcome
    ///
    /// Labels: operation (list, create, get, update), outcome (ok, invalid, not_found, error)
    pub static ref INCIDENT_OPERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("incident_operations_total", "Total number of incident operations")
            .namespace(NAMESPACE),
        &["operation", "outcome"]
    ).expect("Failed to create INCIDENT_OPERATIONS_TOTAL metric");

    // ============================================================================
    // System Metrics
    // ============================================================================

    /// Application build info
    ///
    /// Labels: version
    pub static ref BUILD_INFO: GaugeVec = GaugeVec::new(
        Opts::new("build_info", "Application build information")
            .namespace(NAMESPACE),
        &["version"]
    ).expect("Failed to create BUILD_INFO metric");

    /// Registry holding every metric above
    pub static ref PROMETHEUS_REGISTRY: Registry = build_registry();
}

fn build_registry() -> Registry {
    let registry = Registry::new();

    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        Box::new(INCIDENT_OPERATIONS_TOTAL.clone()),
        Box::new(BUILD_INFO.clone()),
    ];

    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }

    registry
}

/// Initialize the Prometheus metrics registry and record build info
pub fn init_metrics() {
    lazy_static::initialize(&PROMETHEUS_REGISTRY);

    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1.0);

    tracing::debug!("Prometheus metrics initialized");
}

/// Count one incident operation
pub fn record_operation(operation: &str, outcome: &str) {
    INCIDENT_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
