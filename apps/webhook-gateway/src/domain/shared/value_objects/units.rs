//! Units value object for order sizes.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::ValidationError;

/// A positive order size in whole units, at most `i64::MAX`.
///
/// The sign of an order is derived separately from the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Units(u64);

impl Units {
    /// Create units from a positive magnitude.
    ///
    /// Returns `None` for zero or for sizes that cannot carry a sign.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value == 0 || value > Self::MAX.0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Largest size that still fits a signed order.
    pub const MAX: Self = Self(i64::MAX as u64);

    /// Smallest orderable size.
    pub const ONE: Self = Self(1);

    /// Get the magnitude.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Magnitude with the given direction applied.
    #[must_use]
    pub fn signed(&self, negative: bool) -> i64 {
        let magnitude = i64::try_from(self.0).unwrap_or(i64::MAX);
        if negative { -magnitude } else { magnitude }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coerce a loosely typed JSON size into a whole number, rounding half-up.
///
/// Accepts integers, floats and numeric strings (`"100"`, `"12.5"`).
/// The result may be zero or negative; callers decide what that means.
///
/// # Errors
///
/// Returns `ValidationError::InvalidUnits` for non-numeric values.
pub fn coerce_whole_units(value: &Value) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidUnits(format!("'{value}' is not a number"));

    let decimal = match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_u64().map(Decimal::from))
            .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain))
            .ok_or_else(invalid)?,
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    decimal
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ValidationError::InvalidUnits(format!("'{value}' is out of range")))
}
