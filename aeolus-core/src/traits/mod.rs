//! Collaborator traits
//!
//! These traits define the interface between the reconciliation logic and
//! the data-model store and actuator implementations.

pub mod actuator;
pub mod store;

pub use actuator::{ActuatorError, DutyActuator};
pub use store::{AttributeStore, StoreError};
