//! Driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in aeolus-core:
//!
//! - Actuators: PWM fan outputs over `embedded-hal` `SetDutyCycle`
//! - Attribute stores: RAM-backed Fan Control attributes

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod actuator;
pub mod store;
