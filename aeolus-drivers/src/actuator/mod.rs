//! Fan actuator implementations
//!
//! - [`PwmFan`]: one PWM channel, 13-bit duty rescaled to the channel
//! - [`PwmFanBank`]: endpoint-to-channel routing for multi-fan devices

pub mod pwm;

pub use pwm::{scale_duty, PwmFan, PwmFanBank};
