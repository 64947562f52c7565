//! Configuration types
//!
//! Board-agnostic description of the fan endpoints a device exposes and how
//! the reconciler behaves. With the `toml` feature, configuration can be
//! parsed from a TOML document.

pub mod types;

#[cfg(feature = "toml")]
pub mod toml;

pub use crate::fan::reconciler::{ReconcilerConfig, ZeroPercentPolicy};
pub use types::*;

#[cfg(feature = "toml")]
pub use self::toml::from_toml_str;
