//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with the broker
//! - **Use Cases**: Alert execution (lookups, mapping, ordered dispatch)

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
