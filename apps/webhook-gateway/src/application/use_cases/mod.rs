//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod execute_alert;

pub use execute_alert::{ExecuteAlertUseCase, ExecutionReport};
