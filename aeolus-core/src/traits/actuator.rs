//! Duty actuator trait

use core::fmt;

use crate::fan::EndpointId;

/// Errors that can occur commanding the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// No output channel is bound to the endpoint
    UnknownEndpoint,
    /// Duty value above the 13-bit full scale
    DutyOutOfRange,
    /// The PWM channel rejected the duty cycle
    Channel,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorError::UnknownEndpoint => f.write_str("no channel bound to endpoint"),
            ActuatorError::DutyOutOfRange => f.write_str("duty out of range"),
            ActuatorError::Channel => f.write_str("PWM channel error"),
        }
    }
}

/// Sink for fan duty commands
///
/// Duty values are in the core's fixed 13-bit resolution
/// (`0..=DUTY_FULL`); implementations rescale to their hardware.
pub trait DutyActuator {
    /// Command a new duty value for the fan on `endpoint`
    fn set_duty(&mut self, endpoint: EndpointId, duty: u16) -> Result<(), ActuatorError>;

    /// Last duty successfully commanded on `endpoint`
    fn duty(&self, endpoint: EndpointId) -> Option<u16>;
}

impl<T: DutyActuator + ?Sized> DutyActuator for &mut T {
    fn set_duty(&mut self, endpoint: EndpointId, duty: u16) -> Result<(), ActuatorError> {
        (**self).set_duty(endpoint, duty)
    }

    fn duty(&self, endpoint: EndpointId) -> Option<u16> {
        (**self).duty(endpoint)
    }
}
