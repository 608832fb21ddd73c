//! Broker Adapters
//!
//! Implementations of `BrokerPort` for various brokers.

pub mod oanda;

pub use oanda::{OandaBrokerAdapter, OandaConfig, OandaEnvironment, OandaError};
