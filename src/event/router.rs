// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Feed packet routing.

use crate::manager::DeviceRegistry;

use super::{DeviceIdentity, FeedPacket};

/// Dispatches inbound feed packets to the device state owning the
/// referenced camera.
///
/// Routing is side-effect only and never fails: the feed carries many
/// unrelated entity types, so packets that are not camera updates, that lack
/// either half, or that reference an unmonitored camera are dropped
/// silently. A problem while handling one packet is logged and isolated;
/// it never propagates to the caller or to other devices' processing.
///
/// One router serves one controller; lookups resolve the packet's camera id
/// within that controller's registry.
#[derive(Debug, Clone)]
pub struct EventRouter {
    controller_address: String,
    registry: DeviceRegistry,
}

impl EventRouter {
    /// Creates a router over one controller's registry.
    #[must_use]
    pub fn new(controller_address: impl Into<String>, registry: DeviceRegistry) -> Self {
        Self {
            controller_address: controller_address.into(),
            registry,
        }
    }

    /// Routes one feed packet.
    ///
    /// If the payload carries a motion timestamp, the motion handler runs
    /// first; an LED settings update runs second. The order is fixed for
    /// determinism but the two dispatches are independent, and a single
    /// packet may trigger both.
    pub async fn route(&self, packet: &FeedPacket) {
        let Some(action) = &packet.action else {
            tracing::trace!("Dropping packet without action");
            return;
        };
        let Some(payload) = &packet.payload else {
            tracing::trace!(id = %action.id, "Dropping packet without payload");
            return;
        };

        if action.model_key != "camera" || action.action != "update" {
            tracing::trace!(
                model_key = %action.model_key,
                action = %action.action,
                "Ignoring non-camera-update packet"
            );
            return;
        }

        let identity = DeviceIdentity::derive(&self.controller_address, &action.id);
        let Some(device) = self.registry.get(identity).await else {
            tracing::trace!(id = %action.id, "No exposed device for camera");
            return;
        };

        if payload.last_motion.is_some() {
            device.state().handle_motion_event(payload.last_motion);
        }

        if let Some(settings) = &payload.led_settings {
            device.state().handle_led_settings_update(settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::broadcast;

    use crate::camera::{CameraRecord, LedSettings};
    use crate::client::ControllerClient;
    use crate::error::Result;
    use crate::event::{EventBus, PacketAction, PacketPayload};
    use crate::manager::InventorySynchronizer;

    struct NullClient {
        feed: broadcast::Sender<FeedPacket>,
    }

    impl NullClient {
        fn new() -> Self {
            let (feed, _) = broadcast::channel(4);
            Self { feed }
        }
    }

    #[async_trait]
    impl ControllerClient for NullClient {
        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn cameras(&self) -> Result<Vec<CameraRecord>> {
            Ok(Vec::new())
        }

        async fn update_camera_led(&self, _camera_id: &str, _enabled: bool) -> Result<bool> {
            Ok(true)
        }

        fn subscribe(&self) -> broadcast::Receiver<FeedPacket> {
            self.feed.subscribe()
        }
    }

    async fn router_with_camera() -> (EventRouter, DeviceRegistry) {
        let registry = DeviceRegistry::new();
        let sync = InventorySynchronizer::new(
            "nvr.local",
            registry.clone(),
            Arc::new(NullClient::new()),
            EventBus::new(),
            Duration::from_secs(10),
        );
        sync.reconcile(&[CameraRecord::new("cam1", "Front Door")])
            .await;
        (EventRouter::new("nvr.local", registry.clone()), registry)
    }

    async fn device(registry: &DeviceRegistry) -> crate::manager::ExposedDevice {
        registry
            .get(DeviceIdentity::derive("nvr.local", "cam1"))
            .await
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn routes_motion_to_owning_device() {
        let (router, registry) = router_with_camera().await;

        router
            .route(&FeedPacket::camera_update("cam1", PacketPayload::motion(100)))
            .await;

        assert!(device(&registry).await.motion_detected());
    }

    #[tokio::test(start_paused = true)]
    async fn routes_led_settings_to_owning_device() {
        let (router, registry) = router_with_camera().await;

        router
            .route(&FeedPacket::camera_update(
                "cam1",
                PacketPayload::led(LedSettings::solid(true)),
            ))
            .await;

        assert!(device(&registry).await.led_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn one_packet_may_trigger_both_handlers() {
        let (router, registry) = router_with_camera().await;

        let payload = PacketPayload {
            last_motion: Some(100),
            led_settings: Some(LedSettings::solid(true)),
        };
        router
            .route(&FeedPacket::camera_update("cam1", payload))
            .await;

        let device = device(&registry).await;
        assert!(device.motion_detected());
        assert!(device.led_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn drops_packet_without_action_or_payload() {
        let (router, registry) = router_with_camera().await;

        router
            .route(&FeedPacket {
                action: None,
                payload: Some(PacketPayload::motion(100)),
            })
            .await;
        router
            .route(&FeedPacket {
                action: Some(PacketAction {
                    action: "update".to_string(),
                    model_key: "camera".to_string(),
                    id: "cam1".to_string(),
                }),
                payload: None,
            })
            .await;

        assert!(!device(&registry).await.motion_detected());
    }

    #[tokio::test(start_paused = true)]
    async fn drops_other_model_keys_and_actions() {
        let (router, registry) = router_with_camera().await;

        let mut other_model = FeedPacket::camera_update("cam1", PacketPayload::motion(100));
        other_model.action.as_mut().unwrap().model_key = "nvr".to_string();
        router.route(&other_model).await;

        let mut delete = FeedPacket::camera_update("cam1", PacketPayload::motion(100));
        delete.action.as_mut().unwrap().action = "delete".to_string();
        router.route(&delete).await;

        let device = device(&registry).await;
        assert!(!device.motion_detected());
        assert_eq!(device.state().last_motion_timestamp(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drops_packets_for_unknown_cameras() {
        let (router, registry) = router_with_camera().await;

        router
            .route(&FeedPacket::camera_update("ghost", PacketPayload::motion(100)))
            .await;

        assert!(!device(&registry).await.motion_detected());
    }
}
