// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory-facing event types.

use super::DeviceIdentity;

/// Events the bridge emits toward the accessory-presentation layer.
///
/// Lifecycle events track the exposed device set; signal events mirror the
/// three controls each exposed device surfaces (motion detected, motion
/// enabled, status LED).
///
/// # Examples
///
/// ```
/// use protectr_lib::event::{AccessoryEvent, DeviceIdentity};
///
/// let identity = DeviceIdentity::derive("nvr.local", "cam1");
/// let added = AccessoryEvent::device_added(identity);
/// assert!(added.is_lifecycle());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AccessoryEvent {
    /// A device was exposed for a newly discovered camera.
    DeviceAdded {
        /// Identity of the exposed device.
        identity: DeviceIdentity,
    },

    /// An exposed device was removed because its camera went stale.
    DeviceRemoved {
        /// Identity of the removed device.
        identity: DeviceIdentity,
    },

    /// The exposed motion-detected signal changed.
    MotionChanged {
        /// Identity of the device.
        identity: DeviceIdentity,
        /// New value of the exposed signal.
        detected: bool,
    },

    /// The local motion-enable filter was toggled.
    MotionEnabledChanged {
        /// Identity of the device.
        identity: DeviceIdentity,
        /// New filter value.
        enabled: bool,
    },

    /// The exposed status LED signal changed.
    ///
    /// Emitted both for optimistic local writes (including the delayed
    /// revert on failure) and for confirmed remote-origin pushes.
    LedChanged {
        /// Identity of the device.
        identity: DeviceIdentity,
        /// New value of the exposed signal.
        enabled: bool,
    },
}

impl AccessoryEvent {
    /// Returns the device identity associated with this event.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        match self {
            Self::DeviceAdded { identity }
            | Self::DeviceRemoved { identity }
            | Self::MotionChanged { identity, .. }
            | Self::MotionEnabledChanged { identity, .. }
            | Self::LedChanged { identity, .. } => *identity,
        }
    }

    /// Returns `true` if this is a lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is a motion signal or filter event.
    #[must_use]
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Self::MotionChanged { .. } | Self::MotionEnabledChanged { .. }
        )
    }

    /// Returns `true` if this is an LED signal event.
    #[must_use]
    pub fn is_led(&self) -> bool {
        matches!(self, Self::LedChanged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(identity: DeviceIdentity) -> Self {
        Self::DeviceAdded { identity }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(identity: DeviceIdentity) -> Self {
        Self::DeviceRemoved { identity }
    }

    /// Creates a motion signal event.
    #[must_use]
    pub fn motion_changed(identity: DeviceIdentity, detected: bool) -> Self {
        Self::MotionChanged { identity, detected }
    }

    /// Creates a motion filter event.
    #[must_use]
    pub fn motion_enabled_changed(identity: DeviceIdentity, enabled: bool) -> Self {
        Self::MotionEnabledChanged { identity, enabled }
    }

    /// Creates an LED signal event.
    #[must_use]
    pub fn led_changed(identity: DeviceIdentity, enabled: bool) -> Self {
        Self::LedChanged { identity, enabled }
    }
}
