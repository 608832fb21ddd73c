//! OANDA v20 Broker Adapter
//!
//! Implementation of `BrokerPort` for the OANDA v20 REST API:
//! - Market orders with signed units and a position-fill policy
//! - Position closes by side
//! - Position, account summary and pricing lookups
//! - Practice and live hosts, single attempt per call, bounded timeout

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::OandaBrokerAdapter;
pub use config::{OandaConfig, OandaEnvironment};
pub use error::OandaError;
