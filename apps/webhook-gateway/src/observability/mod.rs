//! Observability module for metrics.
//!
//! Prometheus counters and histograms for alert handling and broker calls.

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_alert, record_broker_request,
};
