//! Validation errors raised while turning an alert into an order intent.

use thiserror::Error;

/// Reasons an inbound alert is rejected before any broker call.
///
/// Always a client fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is neither a JSON object nor JSON text wrapping one.
    #[error("invalid alert format: {0}")]
    InvalidFormat(String),

    /// A required field is absent or blank.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// Action is not part of the supported vocabulary.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// Instrument cannot be segmented into a `BASE_QUOTE` pair.
    #[error("invalid instrument '{0}'")]
    InvalidInstrument(String),

    /// Units are non-numeric or not positive where a size is required.
    #[error("invalid units: {0}")]
    InvalidUnits(String),

    /// Risk fraction is non-numeric or outside `(0, 1]`.
    #[error("invalid risk fraction: {0}")]
    InvalidRiskFraction(String),
}
