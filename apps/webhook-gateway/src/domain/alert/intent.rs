//! Canonical order intent derived from an alert.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::action::AlertAction;
use crate::domain::shared::{Instrument, Units};

/// How the order size is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum SizingMode {
    /// Size given by the alert.
    Explicit(Units),
    /// Size derived from account equity, mid price and this fraction.
    RiskPercent(Decimal),
    /// No size: close the whole side(s).
    CloseAll,
}

/// A fully validated request to trade.
///
/// Only produced by [`super::AlertTranslator`]; never partially valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    action: AlertAction,
    instrument: Instrument,
    sizing: SizingMode,
}

impl OrderIntent {
    pub(crate) const fn new(action: AlertAction, instrument: Instrument, sizing: SizingMode) -> Self {
        Self {
            action,
            instrument,
            sizing,
        }
    }

    /// Requested action.
    #[must_use]
    pub const fn action(&self) -> AlertAction {
        self.action
    }

    /// Normalized instrument.
    #[must_use]
    pub const fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Sizing mode.
    #[must_use]
    pub const fn sizing(&self) -> SizingMode {
        self.sizing
    }
}
