//! RAM-backed attribute store
//!
//! Holds the Fan Control attributes of a fixed number of endpoints. Every
//! endpoint starts at Off / 0%.

use heapless::Vec;

use aeolus_core::config::{ConfigError, FanDeviceConfig};
use aeolus_core::fan::duty::PERCENT_MAX;
use aeolus_core::fan::{AttributeKind, EndpointId, FanMode, FanModeSequence};
use aeolus_core::traits::{AttributeStore, StoreError};

/// Fan Control attributes of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FanAttributes {
    /// Raw `FanModeEnum`
    pub fan_mode: u8,
    pub fan_mode_sequence: FanModeSequence,
    pub percent_setting: u8,
    pub percent_current: u8,
}

impl FanAttributes {
    /// Attributes of a newly created endpoint
    pub const fn new(fan_mode_sequence: FanModeSequence) -> Self {
        Self {
            fan_mode: FanMode::Off.as_raw(),
            fan_mode_sequence,
            percent_setting: 0,
            percent_current: 0,
        }
    }

    /// Decoded fan mode, `None` if the stored value is not understood
    pub fn mode(&self) -> Option<FanMode> {
        FanMode::from_raw(self.fan_mode)
    }
}

/// Attribute store for up to `N` fan endpoints
#[derive(Debug, Clone, Default)]
pub struct MemoryAttributeStore<const N: usize> {
    endpoints: Vec<(EndpointId, FanAttributes), N>,
}

impl<const N: usize> MemoryAttributeStore<N> {
    pub fn new() -> Self {
        Self { endpoints: Vec::new() }
    }

    /// Create a store with every configured endpoint registered
    pub fn from_config(config: &FanDeviceConfig) -> Result<Self, ConfigError> {
        let mut store = Self::new();
        for ep in &config.endpoints {
            store.add_endpoint(ep.endpoint, ep.mode_sequence)?;
        }
        Ok(store)
    }

    /// Register a fan endpoint, initialized to Off / 0%
    pub fn add_endpoint(&mut self, endpoint: EndpointId, sequence: FanModeSequence) -> Result<(), ConfigError> {
        if self.attributes(endpoint).is_some() {
            return Err(ConfigError::DuplicateEndpoint(endpoint));
        }

        self.endpoints
            .push((endpoint, FanAttributes::new(sequence)))
            .map_err(|_| ConfigError::TooManyEndpoints)?;
        debug!("Registered fan endpoint {}", endpoint.get());
        Ok(())
    }

    /// Get all attributes of an endpoint
    pub fn attributes(&self, endpoint: EndpointId) -> Option<&FanAttributes> {
        self.endpoints
            .iter()
            .find(|(ep, _)| *ep == endpoint)
            .map(|(_, attrs)| attrs)
    }

    fn attributes_mut(&mut self, endpoint: EndpointId) -> Result<&mut FanAttributes, StoreError> {
        self.endpoints
            .iter_mut()
            .find(|(ep, _)| *ep == endpoint)
            .map(|(_, attrs)| attrs)
            .ok_or(StoreError::UnknownEndpoint)
    }

    /// Registered endpoints
    pub fn endpoints(&self) -> impl Iterator<Item = EndpointId> + '_ {
        self.endpoints.iter().map(|(ep, _)| *ep)
    }
}

impl<const N: usize> AttributeStore for MemoryAttributeStore<N> {
    fn read(&mut self, endpoint: EndpointId, kind: AttributeKind) -> Result<u8, StoreError> {
        let attrs = self.attributes(endpoint).ok_or(StoreError::UnknownEndpoint)?;

        Ok(match kind {
            AttributeKind::FanMode => attrs.fan_mode,
            AttributeKind::PercentSetting => attrs.percent_setting,
        })
    }

    fn write(&mut self, endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError> {
        let attrs = self.attributes_mut(endpoint)?;

        match kind {
            AttributeKind::FanMode => {
                if FanMode::from_raw(value).is_none() {
                    return Err(StoreError::InvalidValue);
                }
                attrs.fan_mode = value;
            }
            AttributeKind::PercentSetting => {
                if value > PERCENT_MAX {
                    return Err(StoreError::InvalidValue);
                }
                attrs.percent_setting = value;
            }
        }

        Ok(())
    }

    fn validate_write(&self, endpoint: EndpointId, kind: AttributeKind, value: u8) -> Result<(), StoreError> {
        let attrs = self.attributes(endpoint).ok_or(StoreError::UnknownEndpoint)?;

        match kind {
            AttributeKind::FanMode => {
                let mode = FanMode::from_raw(value).ok_or(StoreError::InvalidValue)?;
                if !attrs.fan_mode_sequence.supports(mode) {
                    return Err(StoreError::ConstraintError);
                }
            }
            AttributeKind::PercentSetting => {
                if value > PERCENT_MAX {
                    return Err(StoreError::InvalidValue);
                }
            }
        }

        Ok(())
    }

    fn write_percent_current(&mut self, endpoint: EndpointId, percent: u8) -> Result<(), StoreError> {
        if percent > PERCENT_MAX {
            return Err(StoreError::InvalidValue);
        }

        self.attributes_mut(endpoint)?.percent_current = percent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAN1: EndpointId = EndpointId(1);
    const FAN2: EndpointId = EndpointId(2);

    fn store() -> MemoryAttributeStore<2> {
        MemoryAttributeStore::from_config(&FanDeviceConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoints_start_off() {
        let mut store = store();

        for ep in [FAN1, FAN2] {
            assert_eq!(store.read(ep, AttributeKind::FanMode), Ok(0));
            assert_eq!(store.read(ep, AttributeKind::PercentSetting), Ok(0));
            let attrs = store.attributes(ep).unwrap();
            assert_eq!(attrs.mode(), Some(FanMode::Off));
            assert_eq!(attrs.percent_current, 0);
            assert_eq!(attrs.fan_mode_sequence, FanModeSequence::OffLowMedHighAuto);
        }
        assert_eq!(store.endpoints().count(), 2);
    }

    #[test]
    fn test_write_is_per_endpoint() {
        let mut store = store();

        store.write(FAN2, AttributeKind::PercentSetting, 70).unwrap();
        store.write(FAN2, AttributeKind::FanMode, FanMode::High.as_raw()).unwrap();

        assert_eq!(store.read(FAN1, AttributeKind::PercentSetting), Ok(0));
        assert_eq!(store.read(FAN2, AttributeKind::PercentSetting), Ok(70));
        assert_eq!(store.attributes(FAN2).unwrap().mode(), Some(FanMode::High));
    }

    #[test]
    fn test_unknown_endpoint() {
        let mut store = store();
        let ep = EndpointId(7);

        assert_eq!(store.read(ep, AttributeKind::FanMode), Err(StoreError::UnknownEndpoint));
        assert_eq!(
            store.write(ep, AttributeKind::FanMode, 0),
            Err(StoreError::UnknownEndpoint)
        );
        assert_eq!(
            store.validate_write(ep, AttributeKind::PercentSetting, 10),
            Err(StoreError::UnknownEndpoint)
        );
    }

    #[test]
    fn test_write_domain_checked() {
        let mut store = store();

        assert_eq!(
            store.write(FAN1, AttributeKind::PercentSetting, 101),
            Err(StoreError::InvalidValue)
        );
        assert_eq!(
            store.write(FAN1, AttributeKind::FanMode, 5),
            Err(StoreError::InvalidValue)
        );
        assert_eq!(
            store.write_percent_current(FAN1, 101),
            Err(StoreError::InvalidValue)
        );
    }

    #[test]
    fn test_validate_write_honours_sequence() {
        let mut store: MemoryAttributeStore<1> = MemoryAttributeStore::new();
        store.add_endpoint(FAN1, FanModeSequence::OffLowHigh).unwrap();

        assert_eq!(
            store.validate_write(FAN1, AttributeKind::FanMode, FanMode::Low.as_raw()),
            Ok(())
        );
        assert_eq!(
            store.validate_write(FAN1, AttributeKind::FanMode, FanMode::Medium.as_raw()),
            Err(StoreError::ConstraintError)
        );
        // Auto is never accepted by this store
        assert_eq!(
            store.validate_write(FAN1, AttributeKind::FanMode, 5),
            Err(StoreError::InvalidValue)
        );
        assert_eq!(
            store.validate_write(FAN1, AttributeKind::PercentSetting, 100),
            Ok(())
        );
        assert_eq!(
            store.validate_write(FAN1, AttributeKind::PercentSetting, 200),
            Err(StoreError::InvalidValue)
        );
    }

    #[test]
    fn test_registration_errors() {
        let mut store: MemoryAttributeStore<1> = MemoryAttributeStore::new();
        store.add_endpoint(FAN1, FanModeSequence::default()).unwrap();

        assert_eq!(
            store.add_endpoint(FAN1, FanModeSequence::default()),
            Err(ConfigError::DuplicateEndpoint(FAN1))
        );
        assert_eq!(
            store.add_endpoint(FAN2, FanModeSequence::default()),
            Err(ConfigError::TooManyEndpoints)
        );
    }

    #[test]
    fn test_percent_current() {
        let mut store = store();
        store.write_percent_current(FAN1, 66).unwrap();
        assert_eq!(store.attributes(FAN1).unwrap().percent_current, 66);
        assert_eq!(store.attributes(FAN2).unwrap().percent_current, 0);
    }
}
