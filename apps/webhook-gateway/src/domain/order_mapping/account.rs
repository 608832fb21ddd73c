//! Account data consulted while mapping an intent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Instrument;

/// Open units on each side of an instrument's position.
///
/// Short units are reported as a negative number by the broker; only
/// whether each side is non-zero matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Long units (zero when flat).
    pub long_units: Decimal,
    /// Short units (zero when flat).
    pub short_units: Decimal,
}

impl PositionSnapshot {
    /// No open units.
    pub const FLAT: Self = Self {
        long_units: Decimal::ZERO,
        short_units: Decimal::ZERO,
    };

    /// Returns true if a long position is open.
    #[must_use]
    pub fn has_long(&self) -> bool {
        !self.long_units.is_zero()
    }

    /// Returns true if a short position is open.
    #[must_use]
    pub fn has_short(&self) -> bool {
        !self.short_units.is_zero()
    }
}

/// Read-only account view handed to the mapper.
///
/// `None` means the value was not looked up.
pub trait AccountContext {
    /// Current position for an instrument.
    fn current_position(&self, instrument: &Instrument) -> Option<PositionSnapshot>;

    /// Account equity (net asset value).
    fn equity(&self) -> Option<Decimal>;

    /// Mid price for an instrument.
    fn mid_price(&self, instrument: &Instrument) -> Option<Decimal>;
}

/// Account values gathered for a single alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountSnapshot {
    /// Position of the alert's instrument.
    pub position: Option<PositionSnapshot>,
    /// Account equity.
    pub equity: Option<Decimal>,
    /// Mid price of the alert's instrument.
    pub mid_price: Option<Decimal>,
}

impl AccountSnapshot {
    /// Snapshot with nothing looked up.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            position: None,
            equity: None,
            mid_price: None,
        }
    }
}

impl AccountContext for AccountSnapshot {
    fn current_position(&self, _instrument: &Instrument) -> Option<PositionSnapshot> {
        self.position
    }

    fn equity(&self) -> Option<Decimal> {
        self.equity
    }

    fn mid_price(&self, _instrument: &Instrument) -> Option<Decimal> {
        self.mid_price
    }
}

/// Which lookups an intent needs before it can be mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccountRequirements {
    /// Position of the instrument (flip protection).
    pub position: bool,
    /// Account equity (risk sizing).
    pub equity: bool,
    /// Mid price (risk sizing).
    pub mid_price: bool,
}

impl AccountRequirements {
    /// Returns true if no lookup is needed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.position && !self.equity && !self.mid_price
    }
}
