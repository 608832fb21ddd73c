//! Order Mapping Bounded Context
//!
//! Turns an [`OrderIntent`](crate::domain::alert::OrderIntent) plus a view of
//! the account into the ordered list of broker requests to issue.

mod account;
mod errors;
mod mapper;
mod requests;
mod sizing;

pub use account::{AccountContext, AccountRequirements, AccountSnapshot, PositionSnapshot};
pub use errors::MappingError;
pub use mapper::{MapperPolicy, OrderMapper};
pub use requests::{
    BrokerRequest, ClosePositionRequest, PositionFill, PositionSide, SignedOrder, TimeInForce,
};
pub use sizing::risk_units;
