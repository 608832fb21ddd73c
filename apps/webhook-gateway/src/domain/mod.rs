//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless translation and mapping logic
//!
//! # Bounded Contexts
//!
//! - [`alert`]: Alert parsing, validation and normalization into order intents
//! - [`order_mapping`]: Order intents to signed broker requests (sizing, flatten)

pub mod alert;
pub mod order_mapping;
pub mod shared;
