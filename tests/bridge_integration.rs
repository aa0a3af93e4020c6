// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests for the bridge core against a scripted controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use protectr_lib::camera::{CameraRecord, LedSettings};
use protectr_lib::client::ControllerClient;
use protectr_lib::config::{BridgeSettings, ControllerConfig};
use protectr_lib::error::{ApiError, Error, Result};
use protectr_lib::event::{AccessoryEvent, FeedPacket, PacketPayload};
use protectr_lib::manager::ControllerBridge;

/// Scripted controller: inventory, LED outcomes and the feed are all under
/// test control.
struct MockController {
    cameras: Mutex<Vec<CameraRecord>>,
    accept_led: AtomicBool,
    fail_inventory: AtomicBool,
    led_calls: Mutex<Vec<(String, bool)>>,
    feed: broadcast::Sender<FeedPacket>,
}

impl MockController {
    fn new(cameras: Vec<CameraRecord>) -> Arc<Self> {
        let (feed, _) = broadcast::channel(64);
        Arc::new(Self {
            cameras: Mutex::new(cameras),
            accept_led: AtomicBool::new(true),
            fail_inventory: AtomicBool::new(false),
            led_calls: Mutex::new(Vec::new()),
            feed,
        })
    }

    fn set_cameras(&self, cameras: Vec<CameraRecord>) {
        *self.cameras.lock() = cameras;
    }

    fn send_packet(&self, packet: FeedPacket) {
        let _ = self.feed.send(packet);
    }
}

#[async_trait]
impl ControllerClient for MockController {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn cameras(&self) -> Result<Vec<CameraRecord>> {
        if self.fail_inventory.load(Ordering::SeqCst) {
            return Err(ApiError::ConnectionFailed("mock outage".to_string()).into());
        }
        Ok(self.cameras.lock().clone())
    }

    async fn update_camera_led(&self, camera_id: &str, enabled: bool) -> Result<bool> {
        self.led_calls.lock().push((camera_id.to_string(), enabled));
        Ok(self.accept_led.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> broadcast::Receiver<FeedPacket> {
        self.feed.subscribe()
    }
}

fn bridge_for(client: Arc<MockController>) -> ControllerBridge {
    ControllerBridge::new(
        ControllerConfig::new("nvr.local", "bridge", "secret"),
        &BridgeSettings::default(),
        client,
    )
}

// ============================================================================
// Discovery and reconciliation
// ============================================================================

#[tokio::test]
async fn discovery_exposes_devices_and_is_idempotent() {
    let client = MockController::new(vec![
        CameraRecord::new("cam1", "Front Door").with_led_enabled(true),
        CameraRecord::new("cam2", "Garage"),
    ]);
    let bridge = bridge_for(Arc::clone(&client));

    let first = bridge.refresh().await.unwrap();
    assert_eq!(first.added.len(), 2);
    assert!(first.removed.is_empty());

    let second = bridge.refresh().await.unwrap();
    assert!(second.added.is_empty());
    assert!(second.removed.is_empty());
    assert_eq!(second.refreshed.len(), 2);

    let device = bridge.device("cam1").await.unwrap();
    assert!(device.led_enabled());
    assert!(device.motion_enabled());
}

#[tokio::test]
async fn stale_camera_is_removed_with_timer_canceled() {
    let client = MockController::new(vec![
        CameraRecord::new("cam1", "Front Door"),
        CameraRecord::new("cam2", "Garage"),
    ]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();

    // Open a motion window on the camera about to disappear.
    bridge
        .route(&FeedPacket::camera_update("cam2", PacketPayload::motion(100)))
        .await;
    let removed_device = bridge.device("cam2").await.unwrap();
    assert!(removed_device.motion_detected());

    client.set_cameras(vec![CameraRecord::new("cam1", "Front Door")]);
    let report = bridge.refresh().await.unwrap();

    assert_eq!(report.removed.len(), 1);
    assert!(bridge.device("cam2").await.is_none());
    assert!(!removed_device.motion_detected());

    // Subsequent packets for the removed camera are dropped silently.
    bridge
        .route(&FeedPacket::camera_update("cam2", PacketPayload::motion(200)))
        .await;
    assert!(!removed_device.motion_detected());
}

#[tokio::test]
async fn transient_inventory_failure_keeps_exposed_devices() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();

    client.fail_inventory.store(true, Ordering::SeqCst);
    assert!(matches!(bridge.refresh().await, Err(Error::Api(_))));
    assert!(bridge.device("cam1").await.is_some());

    // A later successful pass reconciles normally again.
    client.fail_inventory.store(false, Ordering::SeqCst);
    client.set_cameras(Vec::new());
    let report = bridge.refresh().await.unwrap();
    assert_eq!(report.removed.len(), 1);
    assert!(bridge.device("cam1").await.is_none());
}

#[tokio::test]
async fn refresh_preserves_motion_override_across_renames() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();

    bridge.device("cam1").await.unwrap().set_motion_enabled(false);

    client.set_cameras(vec![
        CameraRecord::new("cam1", "Doorbell").with_host("10.0.0.9"),
    ]);
    bridge.refresh().await.unwrap();

    let device = bridge.device("cam1").await.unwrap();
    assert_eq!(device.name(), "Doorbell");
    assert!(!device.motion_enabled());
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test(start_paused = true)]
async fn motion_packets_follow_the_debounce_window() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();
    let device = bridge.device("cam1").await.unwrap();

    bridge
        .route(&FeedPacket::camera_update("cam1", PacketPayload::motion(100)))
        .await;
    assert!(device.motion_detected());

    // A duplicate of an already seen timestamp is ignored.
    tokio::time::sleep(Duration::from_secs(5)).await;
    bridge
        .route(&FeedPacket::camera_update("cam1", PacketPayload::motion(100)))
        .await;

    // A newer event restarts the window.
    bridge
        .route(&FeedPacket::camera_update("cam1", PacketPayload::motion(105)))
        .await;

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert!(device.motion_detected());

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(!device.motion_detected());
}

#[tokio::test(start_paused = true)]
async fn unrelated_packets_cause_no_mutation() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();
    let device = bridge.device("cam1").await.unwrap();

    let mut other_model = FeedPacket::camera_update("cam1", PacketPayload::motion(100));
    other_model.action.as_mut().unwrap().model_key = "other".to_string();
    bridge.route(&other_model).await;

    let mut delete = FeedPacket::camera_update("cam1", PacketPayload::motion(100));
    delete.action.as_mut().unwrap().action = "delete".to_string();
    bridge.route(&delete).await;

    bridge.route(&FeedPacket { action: None, payload: None }).await;

    assert!(!device.motion_detected());
    assert_eq!(device.state().last_motion_timestamp(), 0);
}

#[tokio::test(start_paused = true)]
async fn combined_packet_updates_motion_and_led() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();
    let device = bridge.device("cam1").await.unwrap();

    let payload = PacketPayload {
        last_motion: Some(100),
        led_settings: Some(LedSettings::solid(true)),
    };
    bridge
        .route(&FeedPacket::camera_update("cam1", payload))
        .await;

    assert!(device.motion_detected());
    assert!(device.led_enabled());
}

#[tokio::test(start_paused = true)]
async fn run_loop_drives_packets_from_the_feed() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = Arc::new(bridge_for(Arc::clone(&client)));

    let runner = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move { bridge.run().await })
    };

    // Let the run loop connect, reconcile and subscribe to the feed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let device = bridge.device("cam1").await.unwrap();

    client.send_packet(FeedPacket::camera_update("cam1", PacketPayload::motion(100)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(device.motion_detected());
    runner.abort();
}

// ============================================================================
// LED optimistic updates through the exposed control
// ============================================================================

#[tokio::test(start_paused = true)]
async fn rejected_led_toggle_reverts_exposed_signal() {
    let client = MockController::new(vec![
        CameraRecord::new("cam1", "Front Door").with_led_enabled(true),
    ]);
    client.accept_led.store(false, Ordering::SeqCst);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();
    let device = bridge.device("cam1").await.unwrap();

    device.request_led(false);
    assert!(!device.led_enabled());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(device.led_enabled());
    assert_eq!(client.led_calls.lock().as_slice(), &[("cam1".to_string(), false)]);
}

#[tokio::test(start_paused = true)]
async fn remote_push_wins_over_pending_toggle() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    client.accept_led.store(false, Ordering::SeqCst);
    let bridge = bridge_for(Arc::clone(&client));
    bridge.refresh().await.unwrap();
    let device = bridge.device("cam1").await.unwrap();

    device.request_led(false);
    bridge
        .route(&FeedPacket::camera_update(
            "cam1",
            PacketPayload::led(LedSettings::solid(true)),
        ))
        .await;

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(device.led_enabled());
}

// ============================================================================
// Accessory events
// ============================================================================

#[tokio::test]
async fn lifecycle_and_signal_events_reach_subscribers() {
    let client = MockController::new(vec![CameraRecord::new("cam1", "Front Door")]);
    let bridge = bridge_for(Arc::clone(&client));
    let mut events = bridge.subscribe();

    bridge.refresh().await.unwrap();
    let added = events.recv().await.unwrap();
    assert!(matches!(added, AccessoryEvent::DeviceAdded { .. }));

    bridge
        .route(&FeedPacket::camera_update("cam1", PacketPayload::motion(100)))
        .await;
    let motion = events.recv().await.unwrap();
    assert!(matches!(
        motion,
        AccessoryEvent::MotionChanged { detected: true, .. }
    ));

    client.set_cameras(Vec::new());
    bridge.refresh().await.unwrap();
    let removed = events.recv().await.unwrap();
    assert!(matches!(removed, AccessoryEvent::DeviceRemoved { .. }));
}
