//! Infrastructure Layer
//!
//! Adapters connecting the application to the outside world:
//!
//! - [`broker`]: Outbound broker REST adapters
//! - [`http`]: Inbound webhook endpoint

pub mod broker;
pub mod http;
