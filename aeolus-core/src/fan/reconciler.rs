//! Mode/percent reconciliation
//!
//! Keeps `FanMode` and `PercentSetting` of each endpoint consistent and
//! drives the actuator to the duty of the agreed percent.
//!
//! Every event is handled in two steps:
//!
//! 1. [`plan`] is a pure function of the incoming change and the current
//!    value of the paired attribute. It decides the corrective write (if
//!    any) and the percent to drive.
//! 2. The reconciler executes the plan in order: corrective store write,
//!    then actuator command. The first failure stops the sequence; nothing
//!    already written is rolled back.
//!
//! ```text
//!  FanMode = m          read PercentSetting p
//!  ─────────────►  m ~ p ? ── yes ──► no-op
//!                       └─── no ───► write p' = max(band(m)), drive p'
//!
//!  PercentSetting = p   read FanMode m
//!  ─────────────►  m ~ p ? ── yes ──► drive p
//!                       └─── no ───► write m' = ladder(p), drive p
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::attribute::{AttributeChange, AttributeKind, EndpointId};
use super::duty::{clamp_percent, duty_of, matches, matches_raw, mode_for_percent, snap_percent};
use super::mode::FanMode;
use crate::traits::{ActuatorError, AttributeStore, DutyActuator, StoreError};

/// What a `PercentSetting` of 0 does to an out-of-band mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroPercentPolicy {
    /// Leave the mode untouched; only the threshold ladder (1-100) selects
    /// modes. The pair may rest at e.g. (High, 0).
    #[default]
    KeepMode,
    /// Treat 0 as a request for Off
    ForceOff,
}

/// Reconciler behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconcilerConfig {
    /// Handling of a percent change to 0
    pub zero_percent: ZeroPercentPolicy,
    /// Mirror the driven percent into `PercentCurrent` after each actuator
    /// command
    pub report_percent_current: bool,
}

/// Errors reported for a reconciliation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReconcileError {
    /// Notification carried an unrecognized mode value
    InvalidInput,
    /// The store could not be read, or does not know the endpoint
    StoreReadFailed(StoreError),
    /// A write to the attribute store failed
    StoreWriteFailed(StoreError),
    /// The duty command to the actuator failed
    ActuatorWriteFailed(ActuatorError),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::InvalidInput => f.write_str("unrecognized fan mode"),
            ReconcileError::StoreReadFailed(e) => write!(f, "attribute read failed: {}", e),
            ReconcileError::StoreWriteFailed(e) => write!(f, "attribute write failed: {}", e),
            ReconcileError::ActuatorWriteFailed(e) => write!(f, "actuator write failed: {}", e),
        }
    }
}

/// Corrective write to the paired attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Correction {
    pub attribute: AttributeKind,
    pub value: u8,
}

impl Correction {
    /// Set `PercentSetting` to `percent`
    pub const fn percent(percent: u8) -> Self {
        Self {
            attribute: AttributeKind::PercentSetting,
            value: percent,
        }
    }

    /// Set `FanMode` to `mode`
    pub const fn mode(mode: FanMode) -> Self {
        Self {
            attribute: AttributeKind::FanMode,
            value: mode.as_raw(),
        }
    }
}

/// Side effects decided for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Plan {
    /// Write to the paired attribute
    pub correction: Option<Correction>,
    /// Agreed percent to drive the actuator to
    pub drive: Option<u8>,
}

impl Plan {
    /// Nothing to do
    pub const NOOP: Plan = Plan {
        correction: None,
        drive: None,
    };

    /// Duty the actuator will be commanded with
    pub fn duty(&self) -> Option<u16> {
        self.drive.map(duty_of)
    }
}

/// Side effects performed for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outcome {
    /// Corrective write applied to the paired attribute
    pub correction: Option<Correction>,
    /// Duty commanded to the actuator
    pub duty: Option<u16>,
}

impl Outcome {
    /// Check if the event caused no side effects
    pub fn is_noop(&self) -> bool {
        self.correction.is_none() && self.duty.is_none()
    }
}

/// Decide the side effects of `change`
///
/// `paired` is the current raw value of the other attribute of the
/// endpoint.
pub fn plan(change: AttributeChange, paired: u8, config: &ReconcilerConfig) -> Result<Plan, ReconcileError> {
    match change.attribute {
        AttributeKind::FanMode => {
            let mode = FanMode::from_raw(change.value).ok_or(ReconcileError::InvalidInput)?;
            if matches(mode, paired) {
                return Ok(Plan::NOOP);
            }

            let target = snap_percent(mode);
            Ok(Plan {
                correction: Some(Correction::percent(target)),
                drive: Some(target),
            })
        }
        AttributeKind::PercentSetting => {
            let percent = clamp_percent(change.value);
            let correction = if matches_raw(paired, percent) {
                None
            } else {
                let target = match (mode_for_percent(percent), config.zero_percent) {
                    (Some(mode), _) => Some(mode),
                    (None, ZeroPercentPolicy::ForceOff) => Some(FanMode::Off),
                    (None, ZeroPercentPolicy::KeepMode) => None,
                };
                target.map(Correction::mode)
            };

            Ok(Plan {
                correction,
                drive: Some(percent),
            })
        }
    }
}

/// Reconciles `FanMode` and `PercentSetting` for every fan endpoint
///
/// The reconciler holds no attribute state of its own; the store is the
/// single source of truth and is read on every event.
pub struct ModePercentReconciler<S, A> {
    store: S,
    actuator: A,
    config: ReconcilerConfig,
}

impl<S: AttributeStore, A: DutyActuator> ModePercentReconciler<S, A> {
    /// Create a reconciler with the default configuration
    pub fn new(store: S, actuator: A) -> Self {
        Self::with_config(store, actuator, ReconcilerConfig::default())
    }

    /// Create a reconciler with an explicit configuration
    pub fn with_config(store: S, actuator: A, config: ReconcilerConfig) -> Self {
        Self {
            store,
            actuator,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Release the collaborators
    pub fn into_parts(self) -> (S, A) {
        (self.store, self.actuator)
    }

    /// React to an attribute of `change.endpoint` changing to `change.value`
    ///
    /// Called before the new value is committed. Reads the paired
    /// attribute, writes a correction if the two are out of band, and
    /// commands the actuator.
    pub fn on_attribute_changed(&mut self, change: AttributeChange) -> Result<Outcome, ReconcileError> {
        let endpoint = change.endpoint;
        debug!(
            "Endpoint {}: {:?} changing to {}",
            endpoint.get(),
            change.attribute,
            change.value
        );

        // Reject before touching the store
        if change.attribute == AttributeKind::FanMode && FanMode::from_raw(change.value).is_none() {
            warn!("Endpoint {}: unrecognized fan mode {}", endpoint.get(), change.value);
            return Err(ReconcileError::InvalidInput);
        }

        let paired = self
            .store
            .read(endpoint, change.attribute.paired())
            .map_err(|e| {
                warn!("Endpoint {}: failed to read {:?}: {:?}", endpoint.get(), change.attribute.paired(), e);
                ReconcileError::StoreReadFailed(e)
            })?;

        let plan = plan(change, paired, &self.config)?;
        self.execute(endpoint, plan)
    }

    /// Run the full update path for a client write
    ///
    /// Validates the write against the store's constraints, reconciles,
    /// then commits the incoming value itself. A rejected write or failed
    /// reconciliation leaves the incoming value uncommitted.
    pub fn handle_update(&mut self, change: AttributeChange) -> Result<Outcome, ReconcileError> {
        if let Err(e) = self.store.validate_write(change.endpoint, change.attribute, change.value) {
            warn!(
                "Endpoint {}: rejected {:?} = {}: {:?}",
                change.endpoint.get(),
                change.attribute,
                change.value,
                e
            );
            return Err(match e {
                StoreError::InvalidValue | StoreError::ConstraintError => ReconcileError::InvalidInput,
                other => ReconcileError::StoreReadFailed(other),
            });
        }

        let outcome = self.on_attribute_changed(change)?;

        let value = match change.attribute {
            AttributeKind::FanMode => change.value,
            AttributeKind::PercentSetting => clamp_percent(change.value),
        };
        self.store
            .write(change.endpoint, change.attribute, value)
            .map_err(|e| {
                error!("Endpoint {}: failed to commit {:?}: {:?}", change.endpoint.get(), change.attribute, e);
                ReconcileError::StoreWriteFailed(e)
            })?;

        Ok(outcome)
    }

    fn execute(&mut self, endpoint: EndpointId, plan: Plan) -> Result<Outcome, ReconcileError> {
        if let Some(correction) = plan.correction {
            self.store
                .write(endpoint, correction.attribute, correction.value)
                .map_err(|e| {
                    error!("Endpoint {}: corrective write of {:?} failed: {:?}", endpoint.get(), correction.attribute, e);
                    ReconcileError::StoreWriteFailed(e)
                })?;
            info!(
                "Endpoint {}: corrected {:?} to {}",
                endpoint.get(),
                correction.attribute,
                correction.value
            );
        }

        let mut duty = None;
        if let Some(percent) = plan.drive {
            let d = duty_of(percent);
            self.actuator.set_duty(endpoint, d).map_err(|e| {
                error!("Endpoint {}: failed to set duty {}: {:?}", endpoint.get(), d, e);
                ReconcileError::ActuatorWriteFailed(e)
            })?;
            debug!("Endpoint {}: fan at {}% (duty {})", endpoint.get(), percent, d);
            duty = Some(d);

            // Best effort, the duty has already been applied
            if self.config.report_percent_current {
                if let Err(e) = self.store.write_percent_current(endpoint, percent) {
                    warn!("Endpoint {}: failed to report PercentCurrent: {:?}", endpoint.get(), e);
                }
            }
        }

        Ok(Outcome {
            correction: plan.correction,
            duty,
        })
    }
}
