// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Webhook Gateway - Alert to Broker Bridge
//!
//! Receives trade alerts from a charting/alerting service and turns them
//! into OANDA v20 market orders and position closes.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure translation and mapping logic
//!   - `alert`: Alert parsing, validation, instrument normalization
//!   - `order_mapping`: Action table, signed units, risk sizing, flip protection
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `BrokerPort`
//!   - `use_cases`: `ExecuteAlert` (lookups, mapping, ordered dispatch)
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `broker`: OANDA REST adapter
//!   - `http`: Axum webhook endpoint and response relay
//!
//! # Request flow
//!
//! ```text
//! POST /webhook → secret check → AlertTranslator → account lookups
//!     → OrderMapper → BrokerPort → relay → response
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Hexagonal Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Error codes and the unified gateway error.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber and OpenTelemetry setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::ports::{BrokerError, BrokerPort, BrokerReply};
pub use application::use_cases::{ExecuteAlertUseCase, ExecutionReport};
pub use config::{ConfigError, GatewayConfig};
pub use domain::alert::{AlertAction, AlertTranslator, OrderIntent, SizingMode};
pub use domain::order_mapping::{BrokerRequest, MapperPolicy, OrderMapper};
pub use domain::shared::{Instrument, Units, ValidationError};
pub use error::{ErrorCode, GatewayError};
pub use infrastructure::broker::{OandaBrokerAdapter, OandaConfig, OandaEnvironment};
pub use infrastructure::http::{AppState, create_router};
