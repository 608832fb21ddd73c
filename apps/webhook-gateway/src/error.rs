//! Error codes and the unified gateway error.
//!
//! Every failure an alert can hit is folded into [`GatewayError`], whose
//! [`ErrorCode`] carries the stable wire code and the HTTP status.
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_FORMAT` .. `INVALID_RISK_FRACTION` | 400 | Alert failed validation |
//! | `ZERO_SIZED_ORDER` | 400 | Risk sizing produced nothing to trade |
//! | `OVERSIZED_ORDER` | 400 | Risk sizing exceeded the signed units range |
//! | `UNAUTHORIZED` | 401 | Webhook secret missing or wrong |
//! | `MAPPING_FAILED` | 500 | Internal mapping inconsistency |
//! | `BROKER_REJECTED` | broker's | Account lookup refused by the broker |
//! | `BROKER_TIMEOUT` / `BROKER_UNREACHABLE` / `BROKER_TRANSPORT` | 502 | No broker response |
//! | `BROKER_INVALID_RESPONSE` | 502 | Unreadable lookup response |

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{BrokerError, TransportKind};
use crate::domain::order_mapping::MappingError;
use crate::domain::shared::ValidationError;

/// Error codes for the webhook gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (400)
    /// Body is not a JSON object.
    InvalidFormat,
    /// A required field is absent.
    MissingField,
    /// Action outside the supported vocabulary.
    UnknownAction,
    /// Instrument could not be normalized.
    InvalidInstrument,
    /// Units are not a usable number.
    InvalidUnits,
    /// Risk fraction outside (0, 1].
    InvalidRiskFraction,
    /// Risk sizing yielded no units.
    ZeroSizedOrder,
    /// Risk sizing yielded more units than an order can carry.
    OversizedOrder,

    // Authentication (401)
    /// Webhook secret mismatch.
    Unauthorized,

    // Internal errors (500)
    /// Mapper reached an inconsistent state.
    MappingFailed,

    // Broker errors
    /// Broker refused an account lookup.
    BrokerRejected,
    /// Broker call timed out.
    BrokerTimeout,
    /// Broker host unreachable.
    BrokerUnreachable,
    /// Other transport failure.
    BrokerTransport,
    /// Broker lookup response could not be parsed.
    BrokerInvalidResponse,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidFormat
            | Self::MissingField
            | Self::UnknownAction
            | Self::InvalidInstrument
            | Self::InvalidUnits
            | Self::InvalidRiskFraction
            | Self::ZeroSizedOrder
            | Self::OversizedOrder => StatusCode::BAD_REQUEST,

            Self::Unauthorized => StatusCode::UNAUTHORIZED,

            Self::MappingFailed => StatusCode::INTERNAL_SERVER_ERROR,

            Self::BrokerRejected
            | Self::BrokerTimeout
            | Self::BrokerUnreachable
            | Self::BrokerTransport
            | Self::BrokerInvalidResponse => StatusCode::BAD_GATEWAY,
        }
    }

    /// Stable wire code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::MissingField => "MISSING_FIELD",
            Self::UnknownAction => "UNKNOWN_ACTION",
            Self::InvalidInstrument => "INVALID_INSTRUMENT",
            Self::InvalidUnits => "INVALID_UNITS",
            Self::InvalidRiskFraction => "INVALID_RISK_FRACTION",
            Self::ZeroSizedOrder => "ZERO_SIZED_ORDER",
            Self::OversizedOrder => "OVERSIZED_ORDER",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::MappingFailed => "MAPPING_FAILED",
            Self::BrokerRejected => "BROKER_REJECTED",
            Self::BrokerTimeout => "BROKER_TIMEOUT",
            Self::BrokerUnreachable => "BROKER_UNREACHABLE",
            Self::BrokerTransport => "BROKER_TRANSPORT",
            Self::BrokerInvalidResponse => "BROKER_INVALID_RESPONSE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

impl From<&ValidationError> for ErrorCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::InvalidFormat(_) => Self::InvalidFormat,
            ValidationError::MissingField(_) => Self::MissingField,
            ValidationError::UnknownAction(_) => Self::UnknownAction,
            ValidationError::InvalidInstrument(_) => Self::InvalidInstrument,
            ValidationError::InvalidUnits(_) => Self::InvalidUnits,
            ValidationError::InvalidRiskFraction(_) => Self::InvalidRiskFraction,
        }
    }
}

/// Any failure while handling one alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Alert rejected before any broker call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Intent could not be mapped to broker requests.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// Broker call failed.
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// Webhook secret missing or wrong.
    #[error("webhook secret missing or invalid")]
    Unauthorized,
}

impl GatewayError {
    /// Error code for this failure.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(err) => err.into(),
            Self::Mapping(MappingError::ZeroSizedOrder) => ErrorCode::ZeroSizedOrder,
            Self::Mapping(MappingError::OversizedOrder) => ErrorCode::OversizedOrder,
            Self::Mapping(_) => ErrorCode::MappingFailed,
            Self::Broker(BrokerError::Transport { kind, .. }) => match kind {
                TransportKind::Timeout => ErrorCode::BrokerTimeout,
                TransportKind::Connect => ErrorCode::BrokerUnreachable,
                TransportKind::Other => ErrorCode::BrokerTransport,
            },
            Self::Broker(BrokerError::Rejected { .. }) => ErrorCode::BrokerRejected,
            Self::Broker(BrokerError::InvalidResponse(_)) => ErrorCode::BrokerInvalidResponse,
            Self::Unauthorized => ErrorCode::Unauthorized,
        }
    }

    /// Short outcome label for metrics.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid",
            Self::Mapping(err) if err.is_input_fault() => "invalid",
            Self::Mapping(_) => "internal_error",
            Self::Broker(_) => "broker_error",
            Self::Unauthorized => "unauthorized",
        }
    }

    /// JSON error body for this failure.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            error: self.code().reason().to_string(),
            message: self.to_string(),
        }
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}
