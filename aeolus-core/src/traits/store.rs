//! Attribute store trait

use core::fmt;

use crate::fan::{AttributeKind, EndpointId};

/// Errors that can occur reading or writing attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No fan is registered on the endpoint
    UnknownEndpoint,
    /// The store does not hold this attribute
    UnsupportedAttribute,
    /// Value outside the attribute's domain
    InvalidValue,
    /// Value not allowed by the endpoint's mode sequence
    ConstraintError,
    /// Backing storage rejected the operation
    Backend,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UnknownEndpoint => f.write_str("unknown endpoint"),
            StoreError::UnsupportedAttribute => f.write_str("unsupported attribute"),
            StoreError::InvalidValue => f.write_str("invalid attribute value"),
            StoreError::ConstraintError => f.write_str("value not allowed by mode sequence"),
            StoreError::Backend => f.write_str("attribute storage failure"),
        }
    }
}

/// Authoritative key/value store for Fan Control attributes
///
/// Values are raw attribute values: `FanModeEnum` for
/// [`AttributeKind::FanMode`], 0-100 for [`AttributeKind::PercentSetting`].
/// Implementations must not require callers to cache values; the reconciler
/// reads the paired attribute fresh on every event.
pub trait AttributeStore {
    /// Read the current value of an attribute
    fn read(&mut self, endpoint: EndpointId, kind: AttributeKind) -> Result<u8, StoreError>;

    /// Write a new value for an attribute
    fn write(&mut self, endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError>;

    /// Check a client write before it enters the update path
    ///
    /// Stores that enforce constraints (value domains, mode sequences)
    /// reject the write here; the default accepts everything.
    fn validate_write(&self, _endpoint: EndpointId, _kind: AttributeKind, _value: u8) -> Result<(), StoreError> {
        Ok(())
    }

    /// Report the percent the fan is actually running at
    ///
    /// Stores without a `PercentCurrent` attribute keep the default.
    fn write_percent_current(&mut self, _endpoint: EndpointId, _percent: u8) -> Result<(), StoreError> {
        Err(StoreError::UnsupportedAttribute)
    }
}

impl<T: AttributeStore + ?Sized> AttributeStore for &mut T {
    fn read(&mut self, endpoint: EndpointId, kind: AttributeKind) -> Result<u8, StoreError> {
        (**self).read(endpoint, kind)
    }

    fn write(&mut self, endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError> {
        (**self).write(endpoint, kind, value)
    }

    fn validate_write(&self, endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError> {
        (**self).validate_write(endpoint, kind, value)
    }

    fn write_percent_current(&mut self, endpoint: EndpointId, percent: u8) -> Result<(), StoreError> {
        (**self).write_percent_current(endpoint, percent)
    }
}
