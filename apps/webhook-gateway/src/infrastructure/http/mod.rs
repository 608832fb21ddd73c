//! HTTP/REST API adapter.
//!
//! Inbound adapter receiving alert webhooks and relaying broker responses.

mod controller;
mod relay;
mod response;

pub use controller::{AppState, WEBHOOK_SECRET_HEADER, create_router};
pub use relay::{POSITION_FLATTENED_HEADER, RelayedResponse, relay};
pub use response::{HealthResponse, LIVENESS_TEXT};
