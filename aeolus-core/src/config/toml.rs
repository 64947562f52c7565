//! TOML configuration parsing
//!
//! ```toml
//! [reconcile]
//! zero_percent = "keep_mode"      # or "force_off"
//! report_percent_current = false
//!
//! [[endpoints]]
//! endpoint = 1
//! channel = 0
//! inverted = false                # optional
//! mode_sequence = "off_low_med_high_auto"  # optional
//! ```

use super::types::{ConfigError, FanDeviceConfig};

/// Parse and validate a fan device configuration
pub fn from_toml_str(input: &str) -> Result<FanDeviceConfig, ConfigError> {
    let config: FanDeviceConfig = ::toml::from_str(input).map_err(|e| {
        #[cfg(feature = "defmt")]
        let e = defmt::Display2Format(&e);
        warn!("Failed to parse fan configuration: {}", e);
        ConfigError::Parse
    })?;

    config.validate()?;
    info!("Loaded configuration with {} fan endpoints", config.endpoints.len());
    Ok(config)
}
