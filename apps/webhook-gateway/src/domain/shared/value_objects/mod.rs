//! Shared Value Objects
//!
//! Immutable domain types used across the alert and mapping contexts.
//! Value objects are compared by value, not identity.

mod instrument;
mod units;

pub use instrument::Instrument;
pub use units::{Units, coerce_whole_units};
