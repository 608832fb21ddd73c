//! Broker requests produced by the order mapper.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::shared::Instrument;

/// How a market order interacts with an existing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionFill {
    /// Broker's default netting behavior.
    Default,
    /// May only decrease an existing position, never open or flip one.
    ReduceOnly,
}

impl PositionFill {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::ReduceOnly => "REDUCE_ONLY",
        }
    }
}

impl fmt::Display for PositionFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time in force for market orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Fill-or-kill (all or nothing, immediate execution required).
    #[default]
    Fok,
    /// Immediate-or-cancel (fill immediately, cancel remainder).
    Ioc,
}

impl TimeInForce {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fok => "FOK",
            Self::Ioc => "IOC",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FOK" => Ok(Self::Fok),
            "IOC" => Ok(Self::Ioc),
            other => Err(format!("unsupported time in force '{other}'")),
        }
    }
}

/// A market order with its direction folded into the units sign.
///
/// Positive units buy, negative units sell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOrder {
    /// Instrument to trade.
    pub instrument: Instrument,
    /// Signed size.
    pub signed_units: i64,
    /// Position fill policy.
    pub position_fill: PositionFill,
    /// Time in force.
    pub time_in_force: TimeInForce,
}

/// Which side(s) of a position a close targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    /// Long units only.
    Long,
    /// Short units only.
    Short,
    /// Both sides.
    Both,
}

impl PositionSide {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
            Self::Both => "both",
        }
    }
}

/// Request to close all units of one or both sides of a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePositionRequest {
    /// Instrument whose position is closed.
    pub instrument: Instrument,
    /// Close the long side.
    pub close_long: bool,
    /// Close the short side.
    pub close_short: bool,
}

impl ClosePositionRequest {
    /// Close the given side(s).
    #[must_use]
    pub const fn new(instrument: Instrument, side: PositionSide) -> Self {
        Self {
            instrument,
            close_long: matches!(side, PositionSide::Long | PositionSide::Both),
            close_short: matches!(side, PositionSide::Short | PositionSide::Both),
        }
    }

    /// The side(s) this request targets.
    #[must_use]
    pub const fn side(&self) -> PositionSide {
        match (self.close_long, self.close_short) {
            (true, false) => PositionSide::Long,
            (false, true) => PositionSide::Short,
            _ => PositionSide::Both,
        }
    }
}

/// One broker call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BrokerRequest {
    /// Place a market order.
    PlaceOrder(SignedOrder),
    /// Close position side(s).
    ClosePosition(ClosePositionRequest),
}

impl BrokerRequest {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PlaceOrder(_) => "place_order",
            Self::ClosePosition(_) => "close_position",
        }
    }

    /// Instrument the call targets.
    #[must_use]
    pub const fn instrument(&self) -> &Instrument {
        match self {
            Self::PlaceOrder(order) => &order.instrument,
            Self::ClosePosition(close) => &close.instrument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur_usd() -> Instrument {
        Instrument::parse("EUR_USD").unwrap()
    }

    #[test]
    fn position_fill_serde() {
        assert_eq!(
            serde_json::to_string(&PositionFill::ReduceOnly).unwrap(),
            "\"REDUCE_ONLY\""
        );
        assert_eq!(PositionFill::Default.to_string(), "DEFAULT");
    }

    #[test]
    fn time_in_force_parse() {
        assert_eq!("fok".parse::<TimeInForce>().unwrap(), TimeInForce::Fok);
        assert_eq!(" IOC ".parse::<TimeInForce>().unwrap(), TimeInForce::Ioc);
        assert!("GTC".parse::<TimeInForce>().is_err());
        assert_eq!(TimeInForce::default(), TimeInForce::Fok);
    }

    #[test]
    fn close_request_sides() {
        let long = ClosePositionRequest::new(eur_usd(), PositionSide::Long);
        assert!(long.close_long && !long.close_short);
        assert_eq!(long.side(), PositionSide::Long);

        let short = ClosePositionRequest::new(eur_usd(), PositionSide::Short);
        assert!(!short.close_long && short.close_short);
        assert_eq!(short.side(), PositionSide::Short);

        let both = ClosePositionRequest::new(eur_usd(), PositionSide::Both);
        assert!(both.close_long && both.close_short);
        assert_eq!(both.side(), PositionSide::Both);
    }

    #[test]
    fn broker_request_kind() {
        let close = BrokerRequest::ClosePosition(ClosePositionRequest::new(
            eur_usd(),
            PositionSide::Both,
        ));
        assert_eq!(close.kind(), "close_position");
        assert_eq!(close.instrument().as_str(), "EUR_USD");
    }
}
