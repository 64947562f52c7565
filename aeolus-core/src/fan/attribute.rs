//! Fan Control cluster attribute identities
//!
//! The core only reconciles two attributes per endpoint: `FanMode` and
//! `PercentSetting`. Everything else on the cluster is handled by the
//! attribute store.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fan Control cluster id
pub const FAN_CONTROL_CLUSTER_ID: u32 = 0x0202;

/// `FanMode` attribute id
pub const FAN_MODE_ATTRIBUTE_ID: u32 = 0x0000;
/// `FanModeSequence` attribute id
pub const FAN_MODE_SEQUENCE_ATTRIBUTE_ID: u32 = 0x0001;
/// `PercentSetting` attribute id
pub const PERCENT_SETTING_ATTRIBUTE_ID: u32 = 0x0002;
/// `PercentCurrent` attribute id
pub const PERCENT_CURRENT_ATTRIBUTE_ID: u32 = 0x0003;

/// Data-model endpoint hosting one fan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EndpointId(pub u16);

impl EndpointId {
    /// Raw endpoint number
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl From<u16> for EndpointId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// The two reconciled attributes of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttributeKind {
    /// Discrete mode (raw `FanModeEnum`)
    FanMode,
    /// Requested speed, 0-100
    PercentSetting,
}

impl AttributeKind {
    /// Map a cluster/attribute path to a reconciled attribute
    ///
    /// Returns `None` for any attribute the core is not interested in.
    pub fn from_path(cluster_id: u32, attribute_id: u32) -> Option<Self> {
        if cluster_id != FAN_CONTROL_CLUSTER_ID {
            return None;
        }

        match attribute_id {
            FAN_MODE_ATTRIBUTE_ID => Some(AttributeKind::FanMode),
            PERCENT_SETTING_ATTRIBUTE_ID => Some(AttributeKind::PercentSetting),
            _ => None,
        }
    }

    /// Attribute id within the Fan Control cluster
    pub const fn attribute_id(self) -> u32 {
        match self {
            AttributeKind::FanMode => FAN_MODE_ATTRIBUTE_ID,
            AttributeKind::PercentSetting => PERCENT_SETTING_ATTRIBUTE_ID,
        }
    }

    /// The attribute that must be kept consistent with this one
    pub const fn paired(self) -> Self {
        match self {
            AttributeKind::FanMode => AttributeKind::PercentSetting,
            AttributeKind::PercentSetting => AttributeKind::FanMode,
        }
    }
}

/// Notification that an attribute of an endpoint is changing to `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AttributeChange {
    pub endpoint: EndpointId,
    pub attribute: AttributeKind,
    /// Raw attribute value as delivered by the data model
    pub value: u8,
}

impl AttributeChange {
    /// A `FanMode` change
    pub const fn mode(endpoint: EndpointId, raw_mode: u8) -> Self {
        Self {
            endpoint,
            attribute: AttributeKind::FanMode,
            value: raw_mode,
        }
    }

    /// A `PercentSetting` change
    pub const fn percent(endpoint: EndpointId, percent: u8) -> Self {
        Self {
            endpoint,
            attribute: AttributeKind::PercentSetting,
            value: percent,
        }
    }

    /// Build a change from a raw data-model path
    ///
    /// Returns `None` when the path is not one of the reconciled attributes.
    pub fn from_path(endpoint: EndpointId, cluster_id: u32, attribute_id: u32, value: u8) -> Option<Self> {
        AttributeKind::from_path(cluster_id, attribute_id).map(|attribute| Self {
            endpoint,
            attribute,
            value,
        })
    }
}
