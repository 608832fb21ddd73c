//! Prometheus metrics for the webhook gateway.
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter, so the
//! `record_*` functions are safe to call from tests.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for broker latency (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl MetricsConfig {
    /// Create a metrics configuration for the given address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // 10ms to 60s, the longest allowed broker timeout
            latency_buckets: vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0, 60.0],
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record the outcome of one inbound alert.
///
/// # Arguments
///
/// * `outcome` - e.g. "forwarded", "invalid", "unauthorized", "broker_error"
pub fn record_alert(outcome: &'static str) {
    counter!("alerts_received_total", "outcome" => outcome).increment(1);
}

/// Record one broker HTTP call.
///
/// # Arguments
///
/// * `kind` - Call kind (e.g. "place_order", "get_position")
/// * `status` - HTTP status code, or the transport failure kind
/// * `latency_seconds` - Time until the response (or failure)
pub fn record_broker_request(kind: &'static str, status: &str, latency_seconds: f64) {
    counter!(
        "broker_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("broker_request_seconds", "kind" => kind).record(latency_seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9100".parse().unwrap();
        let config = MetricsConfig::with_addr(addr);
        assert_eq!(config.listen_addr.port(), 9100);
        assert!(config.latency_buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_record_alert() {
        // Without an installed recorder this must not panic
        record_alert("forwarded");
    }

    #[test]
    fn test_record_broker_request() {
        record_broker_request("place_order", "201", 0.120);
        record_broker_request("get_position", "timeout", 15.0);
    }
}
