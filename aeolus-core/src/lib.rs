//! Board-agnostic core logic for the Aeolus fan firmware
//!
//! This crate contains the application logic that does not depend on
//! specific hardware or data-model implementations:
//!
//! - Fan Control cluster types (modes, mode sequences, attribute identities)
//! - Percent-to-duty mapping and the mode band table
//! - Mode/percent reconciliation state machine
//! - Collaborator traits (attribute store, duty actuator)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod fan;
pub mod traits;
