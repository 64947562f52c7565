//! Fan modes and mode sequences
//!
//! Raw values follow the Fan Control cluster's `FanModeEnum` and
//! `FanModeSequenceEnum`, so attribute values can be passed through the
//! data model unchanged.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Discrete fan operating mode
///
/// Only the four banded modes are understood by the reconciler. The cluster
/// also defines On (4), Auto (5) and Smart (6); those raw values decode to
/// `None` and are rejected as invalid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FanMode {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl FanMode {
    /// All modes the core understands, in band order
    pub const ALL: [FanMode; 4] = [FanMode::Off, FanMode::Low, FanMode::Medium, FanMode::High];

    /// Decode a raw `FanModeEnum` attribute value
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(FanMode::Off),
            1 => Some(FanMode::Low),
            2 => Some(FanMode::Medium),
            3 => Some(FanMode::High),
            _ => None,
        }
    }

    /// Raw `FanModeEnum` attribute value
    pub const fn as_raw(self) -> u8 {
        match self {
            FanMode::Off => 0,
            FanMode::Low => 1,
            FanMode::Medium => 2,
            FanMode::High => 3,
        }
    }

    /// Check if this mode turns the fan off
    pub fn is_off(&self) -> bool {
        matches!(self, FanMode::Off)
    }
}

/// Modes a client is allowed to write on an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FanModeSequence {
    OffLowMedHigh,
    OffLowHigh,
    #[default]
    OffLowMedHighAuto,
    OffLowHighAuto,
    OffHighAuto,
    OffHigh,
}

impl FanModeSequence {
    /// Decode a raw `FanModeSequenceEnum` attribute value
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(FanModeSequence::OffLowMedHigh),
            1 => Some(FanModeSequence::OffLowHigh),
            2 => Some(FanModeSequence::OffLowMedHighAuto),
            3 => Some(FanModeSequence::OffLowHighAuto),
            4 => Some(FanModeSequence::OffHighAuto),
            5 => Some(FanModeSequence::OffHigh),
            _ => None,
        }
    }

    /// Raw `FanModeSequenceEnum` attribute value
    pub const fn as_raw(self) -> u8 {
        match self {
            FanModeSequence::OffLowMedHigh => 0,
            FanModeSequence::OffLowHigh => 1,
            FanModeSequence::OffLowMedHighAuto => 2,
            FanModeSequence::OffLowHighAuto => 3,
            FanModeSequence::OffHighAuto => 4,
            FanModeSequence::OffHigh => 5,
        }
    }

    /// Check if a client may select `mode` under this sequence
    ///
    /// Off and High are part of every sequence.
    pub fn supports(&self, mode: FanMode) -> bool {
        use FanModeSequence::*;

        match mode {
            FanMode::Off | FanMode::High => true,
            FanMode::Low => matches!(self, OffLowMedHigh | OffLowHigh | OffLowMedHighAuto | OffLowHighAuto),
            FanMode::Medium => matches!(self, OffLowMedHigh | OffLowMedHighAuto),
        }
    }
}
