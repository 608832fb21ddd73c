//! Application Ports (Driven)
//!
//! Ports define interfaces for interacting with external systems.

mod broker_port;

pub use broker_port::{BrokerError, BrokerPort, BrokerReply, TransportKind};
