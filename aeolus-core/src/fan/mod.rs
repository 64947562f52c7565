//! Fan Control cluster logic
//!
//! - [`mode`]: discrete modes and mode sequences
//! - [`attribute`]: endpoint and attribute identities
//! - [`duty`]: percent-to-duty mapping and the band table
//! - [`reconciler`]: mode/percent reconciliation
//! - [`shared`]: lock-guarded reconciler for concurrent hosts

pub mod attribute;
pub mod duty;
pub mod mode;
pub mod reconciler;
pub mod shared;

#[cfg(test)]
pub(crate) mod mock;

pub use attribute::{AttributeChange, AttributeKind, EndpointId};
pub use duty::{band_of, duty_of, matches, Band, BANDS, DUTY_FULL, DUTY_MAX};
pub use mode::{FanMode, FanModeSequence};
pub use reconciler::{
    Correction, ModePercentReconciler, Outcome, Plan, ReconcileError, ReconcilerConfig,
    ZeroPercentPolicy,
};
pub use shared::SharedReconciler;
