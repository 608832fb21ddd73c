//! Order mapping errors.

use thiserror::Error;

/// Reasons an intent cannot be turned into broker requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Risk-based sizing produced no tradable size.
    #[error("computed order size is zero")]
    ZeroSizedOrder,

    /// Risk-based sizing produced more units than an order can carry.
    #[error("computed order size exceeds the largest orderable size")]
    OversizedOrder,

    /// Account data needed for the mapping was not looked up.
    #[error("account data not available: {0}")]
    MissingAccountData(&'static str),

    /// Action/sizing combination outside the mapping table.
    #[error("unsupported action: {0}")]
    UnknownAction(String),
}

impl MappingError {
    /// Returns true when the error stems from the alert's inputs rather
    /// than from an internal inconsistency.
    #[must_use]
    pub const fn is_input_fault(&self) -> bool {
        matches!(self, Self::ZeroSizedOrder | Self::OversizedOrder)
    }
}
