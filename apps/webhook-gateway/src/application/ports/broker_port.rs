//! Broker Port (Driven Port)
//!
//! Interface for placing orders and closing positions at an FX broker,
//! plus the account lookups needed for sizing and flip protection.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order_mapping::{
    BrokerRequest, ClosePositionRequest, PositionSnapshot, SignedOrder,
};
use crate::domain::shared::Instrument;

/// A completed HTTP exchange with the broker, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerReply {
    /// HTTP status returned by the broker.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl BrokerReply {
    /// Create a reply.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Why a broker call never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// The call exceeded its deadline.
    Timeout,
    /// The broker host could not be reached.
    Connect,
    /// Any other transport failure.
    Other,
}

impl TransportKind {
    /// Lowercase label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Other => "other",
        }
    }
}

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// No response was received.
    #[error("broker transport failure ({}): {message}", kind.as_str())]
    Transport {
        /// Failure kind.
        kind: TransportKind,
        /// Error details.
        message: String,
    },

    /// An account lookup answered with a non-2xx status.
    #[error("broker rejected lookup with status {status}")]
    Rejected {
        /// Broker status.
        status: u16,
        /// Broker body, relayed as-is.
        body: String,
    },

    /// A lookup answered 2xx but the body could not be read.
    #[error("invalid broker response: {0}")]
    InvalidResponse(String),
}

impl BrokerError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(kind: TransportKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }
}

/// Port for broker interactions.
///
/// Order and close calls return the broker's reply for any status; only
/// transport failures are errors. Lookups treat non-2xx as
/// [`BrokerError::Rejected`].
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Place a market order.
    async fn place_order(&self, order: &SignedOrder) -> Result<BrokerReply, BrokerError>;

    /// Close one or both sides of a position.
    async fn close_position(
        &self,
        request: &ClosePositionRequest,
    ) -> Result<BrokerReply, BrokerError>;

    /// Current position for an instrument (flat if none is open).
    async fn get_position(&self, instrument: &Instrument)
    -> Result<PositionSnapshot, BrokerError>;

    /// Account equity.
    async fn get_equity(&self) -> Result<Decimal, BrokerError>;

    /// Current mid price for an instrument.
    async fn get_mid_price(&self, instrument: &Instrument) -> Result<Decimal, BrokerError>;

    /// Issue a mapped broker request.
    async fn send(&self, request: &BrokerRequest) -> Result<BrokerReply, BrokerError> {
        match request {
            BrokerRequest::PlaceOrder(order) => self.place_order(order).await,
            BrokerRequest::ClosePosition(close) => self.close_position(close).await,
        }
    }
}
