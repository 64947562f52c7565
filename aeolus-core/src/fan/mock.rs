//! Recording collaborators for reconciler tests

use crate::fan::{AttributeKind, EndpointId, FanMode};
use crate::traits::{ActuatorError, AttributeStore, DutyActuator, StoreError};

pub const EP: EndpointId = EndpointId(1);

/// Single-endpoint store that records writes
#[derive(Debug, Default)]
pub struct MockStore {
    pub mode: u8,
    pub percent: u8,
    pub percent_current: Option<u8>,
    pub writes: Vec<(AttributeKind, u8)>,
    pub fail_writes: bool,
    pub fail_reads: bool,
    /// Fail client-side validation
    pub reject_writes: bool,
    /// Behave like a store without a `PercentCurrent` attribute
    pub no_percent_current: bool,
}

impl MockStore {
    pub fn with_state(mode: FanMode, percent: u8) -> Self {
        Self {
            mode: mode.as_raw(),
            percent,
            ..Default::default()
        }
    }
}

impl AttributeStore for MockStore {
    fn read(&mut self, endpoint: EndpointId, kind: AttributeKind) -> Result<u8, StoreError> {
        if self.fail_reads || endpoint != EP {
            return Err(StoreError::UnknownEndpoint);
        }
        Ok(match kind {
            AttributeKind::FanMode => self.mode,
            AttributeKind::PercentSetting => self.percent,
        })
    }

    fn write(&mut self, _endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend);
        }
        self.writes.push((kind, value));
        match kind {
            AttributeKind::FanMode => self.mode = value,
            AttributeKind::PercentSetting => self.percent = value,
        }
        Ok(())
    }

    fn validate_write(&self, endpoint: EndpointId, _kind: AttributeKind, _value: u8) -> Result<(), StoreError> {
        if endpoint != EP {
            return Err(StoreError::UnknownEndpoint);
        }
        if self.reject_writes {
            return Err(StoreError::ConstraintError);
        }
        Ok(())
    }

    fn write_percent_current(&mut self, _endpoint: EndpointId, percent: u8) -> Result<(), StoreError> {
        if self.no_percent_current {
            return Err(StoreError::UnsupportedAttribute);
        }
        self.percent_current = Some(percent);
        Ok(())
    }
}

/// Actuator that records duty commands
#[derive(Debug, Default)]
pub struct MockActuator {
    pub commands: Vec<u16>,
    pub fail: bool,
}

impl DutyActuator for MockActuator {
    fn set_duty(&mut self, _endpoint: EndpointId, duty: u16) -> Result<(), ActuatorError> {
        if self.fail {
            return Err(ActuatorError::Channel);
        }
        self.commands.push(duty);
        Ok(())
    }

    fn duty(&self, _endpoint: EndpointId) -> Option<u16> {
        self.commands.last().copied()
    }
}
