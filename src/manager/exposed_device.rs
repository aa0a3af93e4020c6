// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-visible device exposed for one camera.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::camera::CameraRecord;
use crate::event::DeviceIdentity;
use crate::state::DeviceState;

/// Descriptive camera attributes mirrored onto the exposed device.
///
/// Refreshed in place on every reconciliation pass; a camera may be renamed
/// or re-addressed without changing its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraAttributes {
    /// Controller-assigned camera id.
    pub camera_id: String,
    /// Display name.
    pub name: String,
    /// Model/type string.
    pub kind: String,
    /// Hardware MAC address.
    pub mac: String,
    /// Address the camera is reachable at.
    pub host: String,
}

impl CameraAttributes {
    fn from_record(record: &CameraRecord) -> Self {
        Self {
            camera_id: record.id.clone(),
            name: record.name.clone(),
            kind: record.kind.clone(),
            mac: record.mac.clone(),
            host: record.host.clone(),
        }
    }
}

/// A smart-home device exposed for one camera.
///
/// Created when a camera identity is first seen and long-lived across
/// reconciliation passes. Cloning yields another handle to the same device.
///
/// Each exposed device surfaces three independently addressable controls:
///
/// - a read-only motion-detected signal,
/// - a read/write motion-enabled local filter (persisted override, defaults
///   to true at creation and never reset by reconciliation),
/// - a read/write status LED control with optimistic semantics.
#[derive(Clone)]
pub struct ExposedDevice {
    identity: DeviceIdentity,
    attributes: Arc<RwLock<CameraAttributes>>,
    state: DeviceState,
}

impl ExposedDevice {
    /// Creates the exposed device for a newly discovered camera.
    pub(crate) fn new(identity: DeviceIdentity, record: &CameraRecord, state: DeviceState) -> Self {
        Self {
            identity,
            attributes: Arc::new(RwLock::new(CameraAttributes::from_record(record))),
            state,
        }
    }

    /// Returns the stable device identity.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Returns the controller-assigned camera id.
    #[must_use]
    pub fn camera_id(&self) -> String {
        self.attributes.read().camera_id.clone()
    }

    /// Returns the current display name.
    #[must_use]
    pub fn name(&self) -> String {
        self.attributes.read().name.clone()
    }

    /// Returns a snapshot of the descriptive attributes.
    #[must_use]
    pub fn attributes(&self) -> CameraAttributes {
        self.attributes.read().clone()
    }

    /// Refreshes descriptive attributes from a newer camera snapshot.
    ///
    /// Only name/type/mac/host change; the motion filter and any in-flight
    /// LED state are deliberately left alone. Returns `true` if anything
    /// actually changed.
    pub(crate) fn refresh_attributes(&self, record: &CameraRecord) -> bool {
        let fresh = CameraAttributes::from_record(record);
        let mut attributes = self.attributes.write();
        if *attributes == fresh {
            return false;
        }
        *attributes = fresh;
        true
    }

    /// Returns the underlying state machine.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    // =========================================================================
    // Exposed controls
    // =========================================================================

    /// Read-only motion-detected signal.
    #[must_use]
    pub fn motion_detected(&self) -> bool {
        self.state.motion_detected()
    }

    /// Current value of the motion-enabled local filter.
    #[must_use]
    pub fn motion_enabled(&self) -> bool {
        self.state.motion_enabled()
    }

    /// Writes the motion-enabled local filter.
    pub fn set_motion_enabled(&self, enabled: bool) {
        self.state.set_motion_enabled(enabled);
    }

    /// Exposed status LED signal.
    #[must_use]
    pub fn led_enabled(&self) -> bool {
        self.state.led_enabled()
    }

    /// Requests a new status LED value (optimistic write).
    pub fn request_led(&self, enabled: bool) {
        self.state.request_led(enabled);
    }
}

impl std::fmt::Debug for ExposedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExposedDevice")
            .field("identity", &self.identity)
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}
