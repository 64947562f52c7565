//! PWM fan output
//!
//! The core computes duty in a fixed 13-bit resolution (0-8191). Each
//! channel is driven through `embedded_hal::pwm::SetDutyCycle` and the duty
//! is rescaled to the channel's own `max_duty_cycle()`. A channel with a
//! 13-bit timer receives the core's value unchanged.
//!
//! ```ignore
//! let mut bank: PwmFanBank<_, 2> = PwmFanBank::from_config(&config, |ch| pwm_channels[ch as usize].take())?;
//! bank.all_off()?;
//! let reconciler = ModePercentReconciler::new(store, bank);
//! ```

use embedded_hal::pwm::SetDutyCycle;
use heapless::Vec;

use aeolus_core::config::{ConfigError, FanDeviceConfig};
use aeolus_core::fan::{EndpointId, DUTY_FULL};
use aeolus_core::traits::{ActuatorError, DutyActuator};

/// Rescale a 13-bit duty to a channel with full scale `max`
pub fn scale_duty(duty: u16, max: u16) -> u16 {
    if max == DUTY_FULL {
        return duty;
    }

    (duty as u32 * max as u32 / DUTY_FULL as u32) as u16
}

/// Fan driven by a single PWM channel
pub struct PwmFan<P> {
    pwm: P,
    /// If true, full speed = channel duty 0
    inverted: bool,
    /// Last duty commanded (13-bit), `None` until the first command
    duty: Option<u16>,
}

impl<P: SetDutyCycle> PwmFan<P> {
    /// Wrap a PWM channel
    ///
    /// The channel is not touched until the first duty command; call
    /// [`PwmFan::off`] to force a known state.
    pub fn new(pwm: P, inverted: bool) -> Self {
        Self {
            pwm,
            inverted,
            duty: None,
        }
    }

    /// Command a 13-bit duty value
    pub fn set_duty(&mut self, duty: u16) -> Result<(), ActuatorError> {
        if duty > DUTY_FULL {
            return Err(ActuatorError::DutyOutOfRange);
        }

        let max = self.pwm.max_duty_cycle();
        let scaled = scale_duty(duty, max);
        let raw = if self.inverted { max - scaled } else { scaled };

        self.pwm.set_duty_cycle(raw).map_err(|_| {
            warn!("PWM channel rejected duty {}", raw);
            ActuatorError::Channel
        })?;

        self.duty = Some(duty);
        Ok(())
    }

    /// Stop the fan
    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set_duty(0)
    }

    /// Last duty commanded (13-bit)
    pub fn duty(&self) -> Option<u16> {
        self.duty
    }

    /// Get the PWM channel
    pub fn channel(&self) -> &P {
        &self.pwm
    }

    /// Check if the output is active-low
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Release the PWM channel
    pub fn into_inner(self) -> P {
        self.pwm
    }
}

/// Fans of a device, routed by endpoint
pub struct PwmFanBank<P, const N: usize> {
    fans: Vec<(EndpointId, PwmFan<P>), N>,
}

impl<P: SetDutyCycle, const N: usize> Default for PwmFanBank<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SetDutyCycle, const N: usize> PwmFanBank<P, N> {
    pub fn new() -> Self {
        Self { fans: Vec::new() }
    }

    /// Build a bank from configuration
    ///
    /// `channel` is called once per configured endpoint with its PWM
    /// channel index.
    pub fn from_config(config: &FanDeviceConfig, mut channel: impl FnMut(u8) -> P) -> Result<Self, ConfigError> {
        let mut bank = Self::new();
        for ep in &config.endpoints {
            bank.bind(ep.endpoint, PwmFan::new(channel(ep.channel), ep.inverted))?;
        }
        Ok(bank)
    }

    /// Route `endpoint` to `fan`
    pub fn bind(&mut self, endpoint: EndpointId, fan: PwmFan<P>) -> Result<(), ConfigError> {
        if self.fan(endpoint).is_some() {
            return Err(ConfigError::DuplicateEndpoint(endpoint));
        }

        self.fans
            .push((endpoint, fan))
            .map_err(|_| ConfigError::TooManyEndpoints)
    }

    /// Get the fan bound to `endpoint`
    pub fn fan(&self, endpoint: EndpointId) -> Option<&PwmFan<P>> {
        self.fans.iter().find(|(ep, _)| *ep == endpoint).map(|(_, fan)| fan)
    }

    fn fan_mut(&mut self, endpoint: EndpointId) -> Option<&mut PwmFan<P>> {
        self.fans
            .iter_mut()
            .find(|(ep, _)| *ep == endpoint)
            .map(|(_, fan)| fan)
    }

    /// Stop every fan
    pub fn all_off(&mut self) -> Result<(), ActuatorError> {
        for (_, fan) in self.fans.iter_mut() {
            fan.off()?;
        }
        Ok(())
    }

    /// Number of bound fans
    pub fn len(&self) -> usize {
        self.fans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fans.is_empty()
    }
}

impl<P: SetDutyCycle, const N: usize> DutyActuator for PwmFanBank<P, N> {
    fn set_duty(&mut self, endpoint: EndpointId, duty: u16) -> Result<(), ActuatorError> {
        let fan = self.fan_mut(endpoint).ok_or_else(|| {
            warn!("No PWM channel bound to endpoint {}", endpoint.get());
            ActuatorError::UnknownEndpoint
        })?;

        fan.set_duty(duty)?;
        trace!("Endpoint {}: duty {}", endpoint.get(), duty);
        Ok(())
    }

    fn duty(&self, endpoint: EndpointId) -> Option<u16> {
        self.fan(endpoint).and_then(PwmFan::duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeolus_core::config::FanEndpointConfig;
    use aeolus_core::fan::duty_of;
    use embedded_hal::pwm::{ErrorKind, ErrorType};
    use proptest::prelude::*;

    #[derive(Debug)]
    struct MockPwmError;

    impl embedded_hal::pwm::Error for MockPwmError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Mock PWM channel for testing
    struct MockPwm {
        max: u16,
        raw: u16,
        fail: bool,
    }

    impl MockPwm {
        fn new(max: u16) -> Self {
            Self {
                max,
                raw: 0xFFFF,
                fail: false,
            }
        }
    }

    impl ErrorType for MockPwm {
        type Error = MockPwmError;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockPwmError);
            }
            self.raw = duty;
            Ok(())
        }
    }

    #[test]
    fn test_13_bit_channel_unscaled() {
        let mut fan = PwmFan::new(MockPwm::new(DUTY_FULL), false);

        fan.set_duty(duty_of(50)).unwrap();
        assert_eq!(fan.pwm.raw, 4095);

        fan.set_duty(duty_of(100)).unwrap();
        assert_eq!(fan.pwm.raw, 8191);
        assert_eq!(fan.duty(), Some(8191));
    }

    #[test]
    fn test_scaled_channel() {
        // RP2040-style 16-bit top
        let mut fan = PwmFan::new(MockPwm::new(u16::MAX), false);
        fan.set_duty(DUTY_FULL).unwrap();
        assert_eq!(fan.pwm.raw, u16::MAX);

        // 8-bit channel
        let mut fan = PwmFan::new(MockPwm::new(255), false);
        fan.set_duty(duty_of(50)).unwrap();
        assert_eq!(fan.pwm.raw, 127);
    }

    #[test]
    fn test_inverted_output() {
        let mut fan = PwmFan::new(MockPwm::new(DUTY_FULL), true);

        fan.off().unwrap();
        assert_eq!(fan.pwm.raw, DUTY_FULL);

        fan.set_duty(DUTY_FULL).unwrap();
        assert_eq!(fan.pwm.raw, 0);
        assert_eq!(fan.duty(), Some(DUTY_FULL));
    }

    #[test]
    fn test_duty_unknown_until_commanded() {
        let config = FanDeviceConfig::default();
        let mut bank: PwmFanBank<MockPwm, 2> =
            PwmFanBank::from_config(&config, |_| MockPwm::new(DUTY_FULL)).unwrap();

        assert_eq!(bank.duty(EndpointId(1)), None);

        bank.set_duty(EndpointId(1), 0).unwrap();
        assert_eq!(bank.duty(EndpointId(1)), Some(0));
        assert_eq!(bank.duty(EndpointId(2)), None);
    }

    #[test]
    fn test_out_of_range_duty() {
        let mut fan = PwmFan::new(MockPwm::new(DUTY_FULL), false);
        assert_eq!(fan.set_duty(DUTY_FULL + 1), Err(ActuatorError::DutyOutOfRange));
        // Channel untouched
        assert_eq!(fan.pwm.raw, 0xFFFF);
    }

    #[test]
    fn test_channel_error_keeps_last_duty() {
        let mut fan = PwmFan::new(MockPwm::new(DUTY_FULL), false);
        fan.set_duty(1000).unwrap();

        fan.pwm.fail = true;
        assert_eq!(fan.set_duty(2000), Err(ActuatorError::Channel));
        assert_eq!(fan.duty(), Some(1000));
    }

    #[test]
    fn test_bank_routes_by_endpoint() {
        let config = FanDeviceConfig::default();
        let mut bank: PwmFanBank<MockPwm, 2> =
            PwmFanBank::from_config(&config, |_| MockPwm::new(DUTY_FULL)).unwrap();
        bank.all_off().unwrap();

        bank.set_duty(EndpointId(2), 4095).unwrap();

        assert_eq!(bank.duty(EndpointId(1)), Some(0));
        assert_eq!(bank.duty(EndpointId(2)), Some(4095));
        assert_eq!(bank.fan(EndpointId(2)).unwrap().pwm.raw, 4095);
        assert_eq!(
            bank.set_duty(EndpointId(3), 10),
            Err(ActuatorError::UnknownEndpoint)
        );
        assert_eq!(bank.duty(EndpointId(3)), None);
    }

    #[test]
    fn test_bank_binding_errors() {
        let mut bank: PwmFanBank<MockPwm, 1> = PwmFanBank::new();
        bank.bind(EndpointId(1), PwmFan::new(MockPwm::new(DUTY_FULL), false))
            .unwrap();

        assert_eq!(
            bank.bind(EndpointId(1), PwmFan::new(MockPwm::new(DUTY_FULL), false)),
            Err(ConfigError::DuplicateEndpoint(EndpointId(1)))
        );
        assert_eq!(
            bank.bind(EndpointId(2), PwmFan::new(MockPwm::new(DUTY_FULL), false)),
            Err(ConfigError::TooManyEndpoints)
        );
    }

    #[test]
    fn test_bank_from_config_passes_channel_and_inversion() {
        let mut config = FanDeviceConfig::new();
        let mut inverted = FanEndpointConfig::new(5, 3);
        inverted.inverted = true;
        config.add_endpoint(inverted).unwrap();

        let mut seen = std::vec::Vec::new();
        let bank: PwmFanBank<MockPwm, 4> = PwmFanBank::from_config(&config, |ch| {
            seen.push(ch);
            MockPwm::new(DUTY_FULL)
        })
        .unwrap();

        assert_eq!(seen, [3]);
        assert!(bank.fan(EndpointId(5)).unwrap().is_inverted());
    }

    proptest! {
        #[test]
        fn prop_scale_monotonic(duty in 0u16..DUTY_FULL, max in 1u16..=u16::MAX) {
            prop_assert!(scale_duty(duty, max) <= scale_duty(duty + 1, max));
            prop_assert!(scale_duty(duty + 1, max) <= max);
        }
    }
}
