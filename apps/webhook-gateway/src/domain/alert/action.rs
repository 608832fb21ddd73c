//! Alert action vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::ValidationError;

/// Action requested by an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    /// Open or add to a long position.
    Buy,
    /// Open or add to a short position.
    Sell,
    /// Reduce or close the long side.
    CloseBuy,
    /// Reduce or close the short side.
    CloseSell,
    /// Close both sides.
    CloseAll,
}

impl AlertAction {
    /// All supported actions.
    pub const ALL: [Self; 5] = [
        Self::Buy,
        Self::Sell,
        Self::CloseBuy,
        Self::CloseSell,
        Self::CloseAll,
    ];

    /// Wire name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::CloseBuy => "close_buy",
            Self::CloseSell => "close_sell",
            Self::CloseAll => "close_all",
        }
    }

    /// Returns true for the `close_*` family.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, Self::CloseBuy | Self::CloseSell | Self::CloseAll)
    }

    /// Returns true for actions that open exposure and need a size.
    #[must_use]
    pub const fn is_entry(&self) -> bool {
        matches!(self, Self::Buy | Self::Sell)
    }
}

impl FromStr for AlertAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == folded)
            .ok_or_else(|| ValidationError::UnknownAction(s.trim().to_string()))
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
