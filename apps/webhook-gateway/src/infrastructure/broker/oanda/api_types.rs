//! OANDA v20 API request/response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_mapping::{ClosePositionRequest, SignedOrder};

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /v3/accounts/{id}/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequestBody {
    /// The order.
    pub order: MarketOrderRequest,
}

/// Market order specification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrderRequest {
    /// Instrument (`EUR_USD`).
    pub instrument: String,
    /// Signed units as a decimal string; negative sells.
    pub units: String,
    /// Always `MARKET`.
    #[serde(rename = "type")]
    pub order_type: &'static str,
    /// `FOK` or `IOC`.
    pub time_in_force: &'static str,
    /// `DEFAULT` or `REDUCE_ONLY`.
    pub position_fill: &'static str,
}

impl From<&SignedOrder> for OrderRequestBody {
    fn from(order: &SignedOrder) -> Self {
        Self {
            order: MarketOrderRequest {
                instrument: order.instrument.as_str().to_string(),
                units: order.signed_units.to_string(),
                order_type: "MARKET",
                time_in_force: order.time_in_force.as_str(),
                position_fill: order.position_fill.as_str(),
            },
        }
    }
}

/// Body of `PUT /v3/accounts/{id}/positions/{instrument}/close`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionBody {
    /// `ALL` to close the long side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_units: Option<&'static str>,
    /// `ALL` to close the short side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_units: Option<&'static str>,
}

impl From<&ClosePositionRequest> for ClosePositionBody {
    fn from(request: &ClosePositionRequest) -> Self {
        Self {
            long_units: request.close_long.then_some("ALL"),
            short_units: request.close_short.then_some("ALL"),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response of `GET /v3/accounts/{id}/positions/{instrument}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    /// The position.
    pub position: PositionBody,
}

/// Both sides of a position.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionBody {
    /// Long side.
    #[serde(default)]
    pub long: PositionSideBody,
    /// Short side.
    #[serde(default)]
    pub short: PositionSideBody,
}

/// One side of a position; units arrive as a decimal string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionSideBody {
    /// Open units (negative on the short side).
    #[serde(default)]
    pub units: Decimal,
}

/// Response of `GET /v3/accounts/{id}/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummaryResponse {
    /// Account summary.
    pub account: AccountSummary,
}

/// Fields of the account summary used for sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSummary {
    /// Net asset value.
    #[serde(rename = "NAV", default)]
    pub nav: Option<Decimal>,
    /// Cash balance.
    #[serde(default)]
    pub balance: Option<Decimal>,
}

impl AccountSummary {
    /// Equity: NAV, falling back to balance.
    #[must_use]
    pub fn equity(&self) -> Option<Decimal> {
        self.nav.or(self.balance)
    }
}

/// Response of `GET /v3/accounts/{id}/pricing`.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingResponse {
    /// One entry per requested instrument.
    #[serde(default)]
    pub prices: Vec<Price>,
}

/// Current price of an instrument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Instrument name.
    #[serde(default)]
    pub instrument: Option<String>,
    /// Closeout bid.
    #[serde(default)]
    pub closeout_bid: Option<Decimal>,
    /// Closeout ask.
    #[serde(default)]
    pub closeout_ask: Option<Decimal>,
    /// Bid ladder, best first.
    #[serde(default)]
    pub bids: Vec<PriceBucket>,
    /// Ask ladder, best first.
    #[serde(default)]
    pub asks: Vec<PriceBucket>,
}

impl Price {
    /// Mid of closeout bid/ask, or of the best bid/ask.
    #[must_use]
    pub fn mid(&self) -> Option<Decimal> {
        let bid = self.closeout_bid.or_else(|| self.bids.first().map(|b| b.price))?;
        let ask = self.closeout_ask.or_else(|| self.asks.first().map(|a| a.price))?;
        Some((bid + ask) / Decimal::TWO)
    }
}

/// A price level.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceBucket {
    /// Price.
    pub price: Decimal,
}

/// Error body returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OandaErrorResponse {
    /// Error message.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Error code.
    #[serde(default)]
    pub error_code: Option<String>,
}
