//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `GET /` and `GET /webhook`.
pub const LIVENESS_TEXT: &str = "webhook gateway is running";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Broker environment (practice or live).
    pub environment: String,
}
