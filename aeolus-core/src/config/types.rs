//! Configuration type definitions

use core::fmt;

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fan::{EndpointId, FanModeSequence, ReconcilerConfig};

/// Maximum fan endpoints per device
pub const MAX_FAN_ENDPOINTS: usize = 4;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No fan endpoints configured
    NoEndpoints,
    /// More endpoints than [`MAX_FAN_ENDPOINTS`]
    TooManyEndpoints,
    /// Endpoint id used twice
    DuplicateEndpoint(EndpointId),
    /// PWM channel bound to two endpoints
    DuplicateChannel(u8),
    /// Endpoint 0 is reserved for the root node
    ReservedEndpoint,
    /// Configuration document could not be parsed
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoEndpoints => f.write_str("no fan endpoints configured"),
            ConfigError::TooManyEndpoints => write!(f, "more than {} fan endpoints", MAX_FAN_ENDPOINTS),
            ConfigError::DuplicateEndpoint(ep) => write!(f, "endpoint {} configured twice", ep.get()),
            ConfigError::DuplicateChannel(ch) => write!(f, "PWM channel {} bound twice", ch),
            ConfigError::ReservedEndpoint => f.write_str("endpoint 0 is reserved"),
            ConfigError::Parse => f.write_str("invalid configuration document"),
        }
    }
}

/// One fan endpoint and its PWM output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FanEndpointConfig {
    /// Data-model endpoint id
    pub endpoint: EndpointId,
    /// PWM output channel index
    pub channel: u8,
    /// Output is active-low (full duty = pin low)
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
    /// Modes clients may select
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode_sequence: FanModeSequence,
}

impl FanEndpointConfig {
    /// Create an endpoint config with a non-inverted output and the default
    /// mode sequence
    pub const fn new(endpoint: u16, channel: u8) -> Self {
        Self {
            endpoint: EndpointId(endpoint),
            channel,
            inverted: false,
            mode_sequence: FanModeSequence::OffLowMedHighAuto,
        }
    }
}

/// Complete fan device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FanDeviceConfig {
    /// Fan endpoints
    pub endpoints: Vec<FanEndpointConfig, MAX_FAN_ENDPOINTS>,
    /// Reconciler behavior
    #[cfg_attr(feature = "serde", serde(default))]
    pub reconcile: ReconcilerConfig,
}

impl Default for FanDeviceConfig {
    /// Two fans on endpoints 1 and 2, PWM channels 0 and 1
    fn default() -> Self {
        let mut endpoints = Vec::new();
        let _ = endpoints.push(FanEndpointConfig::new(1, 0));
        let _ = endpoints.push(FanEndpointConfig::new(2, 1));

        Self {
            endpoints,
            reconcile: ReconcilerConfig::default(),
        }
    }
}

impl FanDeviceConfig {
    /// Create a configuration with no endpoints
    pub fn new() -> Self {
        Self {
            endpoints: Vec::new(),
            reconcile: ReconcilerConfig::default(),
        }
    }

    /// Add a fan endpoint
    pub fn add_endpoint(&mut self, endpoint: FanEndpointConfig) -> Result<(), ConfigError> {
        self.endpoints
            .push(endpoint)
            .map_err(|_| ConfigError::TooManyEndpoints)
    }

    /// Look up the configuration of an endpoint
    pub fn endpoint(&self, id: EndpointId) -> Option<&FanEndpointConfig> {
        self.endpoints.iter().find(|e| e.endpoint == id)
    }

    /// Check the configuration for conflicts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        for (i, ep) in self.endpoints.iter().enumerate() {
            if ep.endpoint.get() == 0 {
                return Err(ConfigError::ReservedEndpoint);
            }

            for other in &self.endpoints[i + 1..] {
                if other.endpoint == ep.endpoint {
                    return Err(ConfigError::DuplicateEndpoint(ep.endpoint));
                }
                if other.channel == ep.channel {
                    return Err(ConfigError::DuplicateChannel(ep.channel));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fan::ZeroPercentPolicy;

    #[test]
    fn test_default_config_is_valid() {
        let config = FanDeviceConfig::default();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.reconcile.zero_percent, ZeroPercentPolicy::KeepMode);
        assert!(!config.reconcile.report_percent_current);
    }

    #[test]
    fn test_empty_config_rejected() {
        assert_eq!(FanDeviceConfig::new().validate(), Err(ConfigError::NoEndpoints));
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut config = FanDeviceConfig::new();
        config.add_endpoint(FanEndpointConfig::new(1, 0)).unwrap();
        config.add_endpoint(FanEndpointConfig::new(1, 1)).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateEndpoint(EndpointId(1)))
        );

        let mut config = FanDeviceConfig::new();
        config.add_endpoint(FanEndpointConfig::new(1, 3)).unwrap();
        config.add_endpoint(FanEndpointConfig::new(2, 3)).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::DuplicateChannel(3)));
    }

    #[test]
    fn test_root_endpoint_reserved() {
        let mut config = FanDeviceConfig::new();
        config.add_endpoint(FanEndpointConfig::new(0, 0)).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ReservedEndpoint));
    }

    #[test]
    fn test_capacity() {
        let mut config = FanDeviceConfig::new();
        for i in 0..MAX_FAN_ENDPOINTS {
            config
                .add_endpoint(FanEndpointConfig::new(i as u16 + 1, i as u8))
                .unwrap();
        }
        assert_eq!(
            config.add_endpoint(FanEndpointConfig::new(99, 99)),
            Err(ConfigError::TooManyEndpoints)
        );
        assert!(config.endpoint(EndpointId(4)).is_some());
        assert!(config.endpoint(EndpointId(99)).is_none());
    }
}
