// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Real-time feed packet shapes.
//!
//! The controller's feed multiplexes updates for many entity types. Both
//! halves of a packet are optional on the wire, so the router validates
//! presence before dispatch instead of assuming shape. Decoding the binary
//! framing into these structs is the transport layer's concern.

use crate::camera::LedSettings;

/// One decoded packet from the controller's real-time feed.
///
/// # Examples
///
/// ```
/// use protectr_lib::event::FeedPacket;
///
/// let packet: FeedPacket = serde_json::from_str(
///     r#"{
///         "action": { "action": "update", "modelKey": "camera", "id": "cam1" },
///         "payload": { "lastMotion": 1700000000000 }
///     }"#,
/// ).unwrap();
/// assert!(packet.is_camera_update());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeedPacket {
    /// Routing half: what happened to which entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PacketAction>,
    /// Data half: partial attributes of the referenced entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<PacketPayload>,
}

/// Routing header of a feed packet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketAction {
    /// Verb, e.g. `"update"` or `"add"`.
    pub action: String,
    /// Entity type the packet refers to, e.g. `"camera"` or `"nvr"`.
    pub model_key: String,
    /// Controller-assigned id of the referenced entity.
    pub id: String,
}

/// Partial camera attributes carried by an update packet.
///
/// Fields the packet does not carry deserialize to `None`; a present-but-null
/// `lastMotion` also maps to `None`, which the motion handler treats as a
/// no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacketPayload {
    /// Timestamp of a motion event, in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_motion: Option<u64>,
    /// New status LED settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub led_settings: Option<LedSettings>,
}

impl FeedPacket {
    /// Creates a camera update packet.
    ///
    /// Mainly useful for tests and for hosts that synthesize packets.
    #[must_use]
    pub fn camera_update(camera_id: impl Into<String>, payload: PacketPayload) -> Self {
        Self {
            action: Some(PacketAction {
                action: "update".to_string(),
                model_key: "camera".to_string(),
                id: camera_id.into(),
            }),
            payload: Some(payload),
        }
    }

    /// Returns `true` if this packet is a camera update with both halves
    /// present.
    #[must_use]
    pub fn is_camera_update(&self) -> bool {
        self.payload.is_some()
            && self
                .action
                .as_ref()
                .is_some_and(|a| a.model_key == "camera" && a.action == "update")
    }
}

impl PacketPayload {
    /// Creates a payload carrying only a motion timestamp.
    #[must_use]
    pub fn motion(timestamp: u64) -> Self {
        Self {
            last_motion: Some(timestamp),
            led_settings: None,
        }
    }

    /// Creates a payload carrying only LED settings.
    #[must_use]
    pub fn led(settings: LedSettings) -> Self {
        Self {
            last_motion: None,
            led_settings: Some(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_packet() {
        let packet: FeedPacket = serde_json::from_str(
            r#"{
                "action": { "action": "update", "modelKey": "camera", "id": "cam1" },
                "payload": { "lastMotion": 1700000000000, "ledSettings": { "isEnabled": true } }
            }"#,
        )
        .unwrap();

        assert!(packet.is_camera_update());
        let payload = packet.payload.unwrap();
        assert_eq!(payload.last_motion, Some(1_700_000_000_000));
        assert_eq!(payload.led_settings, Some(LedSettings::solid(true)));
    }

    #[test]
    fn deserialize_action_only_packet() {
        let packet: FeedPacket = serde_json::from_str(
            r#"{ "action": { "action": "update", "modelKey": "camera", "id": "cam1" } }"#,
        )
        .unwrap();

        assert!(packet.payload.is_none());
        assert!(!packet.is_camera_update());
    }

    #[test]
    fn deserialize_empty_packet() {
        let packet: FeedPacket = serde_json::from_str("{}").unwrap();
        assert!(packet.action.is_none());
        assert!(packet.payload.is_none());
    }

    #[test]
    fn null_last_motion_maps_to_none() {
        let packet: FeedPacket = serde_json::from_str(
            r#"{
                "action": { "action": "update", "modelKey": "camera", "id": "cam1" },
                "payload": { "lastMotion": null }
            }"#,
        )
        .unwrap();

        assert_eq!(packet.payload.unwrap().last_motion, None);
    }

    #[test]
    fn other_model_keys_are_not_camera_updates() {
        let packet: FeedPacket = serde_json::from_str(
            r#"{
                "action": { "action": "update", "modelKey": "nvr", "id": "nvr1" },
                "payload": {}
            }"#,
        )
        .unwrap();

        assert!(!packet.is_camera_update());
    }

    #[test]
    fn constructors_build_camera_updates() {
        let packet = FeedPacket::camera_update("cam1", PacketPayload::motion(42));
        assert!(packet.is_camera_update());
        assert_eq!(packet.action.unwrap().id, "cam1");
    }
}
