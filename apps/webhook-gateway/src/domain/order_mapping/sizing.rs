//! Percentage-of-equity position sizing.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::errors::MappingError;
use crate::domain::shared::Units;

/// Units for a risk fraction of equity at the given price.
///
/// `floor(equity * fraction / mid_price)`, never below one unit.
///
/// # Errors
///
/// Returns `MappingError::ZeroSizedOrder` if the raw size is not positive
/// (non-positive equity, fraction or price), and
/// `MappingError::OversizedOrder` if it does not fit a signed order.
pub fn risk_units(
    equity: Decimal,
    fraction: Decimal,
    mid_price: Decimal,
) -> Result<Units, MappingError> {
    if mid_price <= Decimal::ZERO {
        return Err(MappingError::ZeroSizedOrder);
    }

    let raw = equity
        .checked_mul(fraction)
        .and_then(|notional| notional.checked_div(mid_price))
        .ok_or(MappingError::OversizedOrder)?;

    if raw <= Decimal::ZERO {
        return Err(MappingError::ZeroSizedOrder);
    }

    let whole = raw
        .floor()
        .to_i64()
        .and_then(|n| u64::try_from(n).ok())
        .ok_or(MappingError::OversizedOrder)?;
    if whole == 0 {
        return Ok(Units::ONE);
    }
    Units::new(whole).ok_or(MappingError::OversizedOrder)
}
