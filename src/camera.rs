// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera inventory data model.
//!
//! [`CameraRecord`] is the snapshot shape the controller client returns from
//! an inventory read. The core never owns these records; it reads a fresh
//! list on every reconciliation pass and derives its own state from them.

use chrono::{DateTime, Utc};

/// One camera as reported by the controller.
///
/// Identity fields (`id`, `name`, `kind`, `mac`, `host`) describe the camera;
/// the remaining fields are volatile and change between snapshots.
///
/// # Examples
///
/// ```
/// use protectr_lib::camera::CameraRecord;
///
/// let camera = CameraRecord::new("abc123", "Front Door")
///     .with_host("192.168.1.20")
///     .with_led_enabled(true);
/// assert_eq!(camera.id, "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRecord {
    /// Controller-assigned camera id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Model/type string, e.g. `"G4 Dome"`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Hardware MAC address.
    #[serde(default)]
    pub mac: String,
    /// Address the camera is reachable at.
    #[serde(default)]
    pub host: String,
    /// Timestamp of the most recent motion event, in epoch milliseconds.
    #[serde(default)]
    pub last_motion: Option<u64>,
    /// Whether the camera's status LED is currently on.
    #[serde(default)]
    pub led_enabled: bool,
    /// Whether the camera itself reports motion events.
    #[serde(default = "default_true")]
    pub motion_detection_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl CameraRecord {
    /// Creates a camera record with the given id and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: String::new(),
            mac: String::new(),
            host: String::new(),
            last_motion: None,
            led_enabled: false,
            motion_detection_enabled: true,
        }
    }

    /// Sets the model/type string.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Sets the MAC address.
    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = mac.into();
        self
    }

    /// Sets the host address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the last motion timestamp (epoch milliseconds).
    #[must_use]
    pub fn with_last_motion(mut self, timestamp: u64) -> Self {
        self.last_motion = Some(timestamp);
        self
    }

    /// Sets the status LED state.
    #[must_use]
    pub fn with_led_enabled(mut self, enabled: bool) -> Self {
        self.led_enabled = enabled;
        self
    }

    /// Returns the last motion timestamp as a UTC datetime, if present.
    #[must_use]
    pub fn last_motion_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.last_motion?).ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

/// Status LED settings as pushed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedSettings {
    /// Whether the LED is on.
    pub is_enabled: bool,
    /// Blink rate in milliseconds; zero means solid.
    #[serde(default)]
    pub blink_rate: u32,
}

impl LedSettings {
    /// Creates LED settings with a solid (non-blinking) state.
    #[must_use]
    pub fn solid(is_enabled: bool) -> Self {
        Self {
            is_enabled,
            blink_rate: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_camelcase_record() {
        let camera: CameraRecord = serde_json::from_str(
            r#"{
                "id": "cam1",
                "name": "Garage",
                "type": "G4 Bullet",
                "mac": "AA:BB:CC:DD:EE:FF",
                "host": "192.168.1.30",
                "lastMotion": 1700000000000,
                "ledEnabled": true,
                "motionDetectionEnabled": false
            }"#,
        )
        .unwrap();

        assert_eq!(camera.kind, "G4 Bullet");
        assert_eq!(camera.last_motion, Some(1_700_000_000_000));
        assert!(camera.led_enabled);
        assert!(!camera.motion_detection_enabled);
    }

    #[test]
    fn minimal_record_uses_defaults() {
        let camera: CameraRecord =
            serde_json::from_str(r#"{ "id": "cam1", "name": "Garage" }"#).unwrap();

        assert!(camera.kind.is_empty());
        assert!(camera.last_motion.is_none());
        assert!(!camera.led_enabled);
        assert!(camera.motion_detection_enabled);
    }

    #[test]
    fn last_motion_at_converts_epoch_millis() {
        let camera = CameraRecord::new("cam1", "Garage").with_last_motion(1_700_000_000_000);
        let at = camera.last_motion_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_700_000_000_000);

        let never = CameraRecord::new("cam2", "Porch");
        assert!(never.last_motion_at().is_none());
    }

    #[test]
    fn led_settings_deserialize() {
        let settings: LedSettings =
            serde_json::from_str(r#"{ "isEnabled": true, "blinkRate": 0 }"#).unwrap();
        assert_eq!(settings, LedSettings::solid(true));
    }
}
