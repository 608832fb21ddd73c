//! Alert Bounded Context
//!
//! Turns loosely structured webhook alerts into validated [`OrderIntent`]s.
//! Nothing in this module performs I/O.

mod action;
mod intent;
mod raw;
mod translator;

pub use action::AlertAction;
pub use intent::{OrderIntent, SizingMode};
pub use raw::RawAlert;
pub use translator::AlertTranslator;
pub(crate) use translator::parse_risk_fraction;
