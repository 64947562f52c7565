//! Percent-to-duty mapping and the mode band table
//!
//! All conversions use integer arithmetic so duty values are reproducible
//! bit-for-bit on every target.
//!
//! | Mode   | Min % | Max % |
//! |--------|-------|-------|
//! | Low    | 1     | 33    |
//! | Medium | 34    | 66    |
//! | High   | 67    | 100   |
//!
//! Off is not a band; it is the single point 0.

use super::mode::FanMode;

/// PWM duty resolution in bits
pub const DUTY_RESOLUTION_BITS: u32 = 13;

/// Full-scale duty count (2^13)
pub const DUTY_MAX: u32 = 1 << DUTY_RESOLUTION_BITS;

/// Highest duty value ever commanded
pub const DUTY_FULL: u16 = (DUTY_MAX - 1) as u16;

/// Highest valid percent value
pub const PERCENT_MAX: u8 = 100;

/// Inclusive percent range belonging to one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Band {
    pub mode: FanMode,
    pub min: u8,
    pub max: u8,
}

impl Band {
    const fn new(mode: FanMode, min: u8, max: u8) -> Self {
        Self { mode, min, max }
    }

    /// Check if `percent` lies inside this band
    pub fn contains(&self, percent: u8) -> bool {
        (self.min..=self.max).contains(&percent)
    }
}

/// Low band
pub const LOW_BAND: Band = Band::new(FanMode::Low, 1, 33);
/// Medium band
pub const MEDIUM_BAND: Band = Band::new(FanMode::Medium, 34, 66);
/// High band
pub const HIGH_BAND: Band = Band::new(FanMode::High, 67, 100);

/// Band table, ordered by percent
pub const BANDS: [Band; 3] = [LOW_BAND, MEDIUM_BAND, HIGH_BAND];

/// Clamp a raw percent value to 0-100
#[inline]
pub fn clamp_percent(percent: u8) -> u8 {
    percent.min(PERCENT_MAX)
}

/// Convert a percent (clamped to 0-100) to a 13-bit duty value
///
/// `duty = floor(percent * (DUTY_MAX - 1) / 100)`, with 0% always off.
pub fn duty_of(percent: u8) -> u16 {
    let percent = clamp_percent(percent) as u32;
    if percent == 0 {
        return 0;
    }

    (percent * (DUTY_MAX - 1) / 100) as u16
}

/// Get the band of a mode, `None` for Off
pub fn band(mode: FanMode) -> Option<Band> {
    BANDS.iter().copied().find(|b| b.mode == mode)
}

/// Classify a percent (clamped to 0-100) into a mode
///
/// 0 yields `Off` as a hint only; Off is a state, not a band.
pub fn band_of(percent: u8) -> FanMode {
    let percent = clamp_percent(percent);

    BANDS
        .iter()
        .find(|b| b.contains(percent))
        .map(|b| b.mode)
        .unwrap_or(FanMode::Off)
}

/// Check if `percent` is consistent with `mode`
///
/// Off matches only 0.
pub fn matches(mode: FanMode, percent: u8) -> bool {
    let percent = clamp_percent(percent);

    match band(mode) {
        Some(b) => b.contains(percent),
        None => percent == 0,
    }
}

/// Check a raw `FanModeEnum` value against a percent
///
/// Unrecognized modes never match.
pub fn matches_raw(raw_mode: u8, percent: u8) -> bool {
    FanMode::from_raw(raw_mode).is_some_and(|mode| matches(mode, percent))
}

/// Percent a mode change snaps to when the current percent is out of band
///
/// Always the band maximum; Off snaps to 0.
pub fn snap_percent(mode: FanMode) -> u8 {
    band(mode).map_or(0, |b| b.max)
}

/// Mode a percent change selects when the current mode is out of band
///
/// Ordered threshold check on the band minimums. 0 has no rule and yields
/// `None`.
pub fn mode_for_percent(percent: u8) -> Option<FanMode> {
    let percent = clamp_percent(percent);

    if percent >= HIGH_BAND.min {
        Some(FanMode::High)
    } else if percent >= MEDIUM_BAND.min {
        Some(FanMode::Medium)
    } else if percent >= LOW_BAND.min {
        Some(FanMode::Low)
    } else {
        None
    }
}
