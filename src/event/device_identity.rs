// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable device identity.

use std::fmt;

use uuid::Uuid;

/// Namespace UUID for deriving device identities.
const IDENTITY_NAMESPACE: Uuid = Uuid::from_bytes([
    0x6b, 0x1d, 0xe5, 0x0a, 0x93, 0x2f, 0x4c, 0x41, 0x8a, 0xd7, 0x21, 0x5e, 0xc0, 0x9b, 0x3a, 0x77,
]);

/// Deterministic identity of an exposed device.
///
/// Derived as a UUID v5 over `(controller address, camera id)`, so the same
/// camera on the same controller always maps to the same identity across
/// process restarts. This is the sole key for exposed-device lookup and the
/// sole criterion for staleness during reconciliation.
///
/// A controller address change produces a different identity; re-keying
/// across address changes is deliberately not attempted.
///
/// # Examples
///
/// ```
/// use protectr_lib::event::DeviceIdentity;
///
/// let a = DeviceIdentity::derive("nvr.local", "cam42");
/// let b = DeviceIdentity::derive("nvr.local", "cam42");
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceIdentity(Uuid);

impl DeviceIdentity {
    /// Derives the identity for a camera on a controller.
    #[must_use]
    pub fn derive(controller_address: &str, camera_id: &str) -> Self {
        let mut name =
            String::with_capacity(controller_address.len() + camera_id.len() + 1);
        name.push_str(controller_address);
        name.push('/');
        name.push_str(camera_id);
        Self(Uuid::new_v5(&IDENTITY_NAMESPACE, name.as_bytes()))
    }

    /// Creates an identity from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the UUID as a hyphenated string.
    #[must_use]
    pub fn to_string_hyphenated(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only first 8 characters for readability
        let short = &self.0.to_string()[..8];
        write!(f, "DeviceIdentity({short}...)")
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DeviceIdentity {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DeviceIdentity> for Uuid {
    fn from(identity: DeviceIdentity) -> Self {
        identity.0
    }
}
