// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inventory reconciliation for one controller.
//!
//! The registry is the single identity-keyed map of exposed devices; the
//! synchronizer owns every mutation of it. Lookups from the router happen
//! through shared read access.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::camera::CameraRecord;
use crate::client::ControllerClient;
use crate::event::{AccessoryEvent, DeviceIdentity, EventBus};
use crate::state::DeviceState;

use super::ExposedDevice;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Identities newly exposed this pass.
    pub added: Vec<DeviceIdentity>,
    /// Identities whose devices were refreshed in place.
    pub refreshed: Vec<DeviceIdentity>,
    /// Identities removed because their camera went stale.
    pub removed: Vec<DeviceIdentity>,
}

impl ReconcileReport {
    /// Returns `true` if the pass changed the exposed device set.
    #[must_use]
    pub fn changed_inventory(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Identity-keyed registry of exposed devices for one controller.
///
/// Cloning yields another handle to the same registry.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<RwLock<HashMap<DeviceIdentity, ExposedDevice>>>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a device by identity.
    pub async fn get(&self, identity: DeviceIdentity) -> Option<ExposedDevice> {
        self.devices.read().await.get(&identity).cloned()
    }

    /// Returns `true` if the identity is registered.
    pub async fn contains(&self, identity: DeviceIdentity) -> bool {
        self.devices.read().await.contains_key(&identity)
    }

    /// Returns all registered identities.
    pub async fn identities(&self) -> Vec<DeviceIdentity> {
        self.devices.read().await.keys().copied().collect()
    }

    /// Returns a snapshot of all exposed devices.
    pub async fn devices(&self) -> Vec<ExposedDevice> {
        self.devices.read().await.values().cloned().collect()
    }

    /// Returns the number of exposed devices.
    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Returns `true` if no devices are exposed.
    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}

/// Reconciles a live camera list against the exposed devices for one
/// controller.
///
/// A pass is idempotent: running it twice with the same live list yields an
/// empty `added` and `removed` the second time. An empty live list is a
/// valid pass that removes every exposed device; callers must only feed a
/// confirmed inventory here (a failed read has to abandon the pass upstream
/// instead of presenting an empty list).
pub struct InventorySynchronizer {
    controller_address: String,
    registry: DeviceRegistry,
    client: Arc<dyn ControllerClient>,
    bus: EventBus,
    motion_duration: Duration,
}

impl InventorySynchronizer {
    /// Creates a synchronizer for one controller.
    #[must_use]
    pub fn new(
        controller_address: impl Into<String>,
        registry: DeviceRegistry,
        client: Arc<dyn ControllerClient>,
        bus: EventBus,
        motion_duration: Duration,
    ) -> Self {
        Self {
            controller_address: controller_address.into(),
            registry,
            client,
            bus,
            motion_duration,
        }
    }

    /// Returns the controller address this synchronizer reconciles for.
    #[must_use]
    pub fn controller_address(&self) -> &str {
        &self.controller_address
    }

    /// Runs one reconciliation pass against a confirmed camera inventory.
    ///
    /// New cameras get an exposed device with the motion filter defaulting
    /// to enabled and the LED seeded from the camera's current setting.
    /// Known cameras only have their descriptive attributes refreshed; the
    /// motion filter override and in-flight LED state are never touched.
    /// Registry entries whose identity is absent from the live list are
    /// detached (timers canceled) and removed.
    pub async fn reconcile(&self, live_cameras: &[CameraRecord]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut live = HashSet::with_capacity(live_cameras.len());

        let mut devices = self.registry.devices.write().await;

        for camera in live_cameras {
            let identity = DeviceIdentity::derive(&self.controller_address, &camera.id);
            live.insert(identity);

            if let Some(existing) = devices.get(&identity) {
                existing.refresh_attributes(camera);
                report.refreshed.push(identity);
            } else {
                let state = DeviceState::new(
                    identity,
                    &camera.id,
                    camera.led_enabled,
                    self.motion_duration,
                    Arc::clone(&self.client),
                    self.bus.clone(),
                );
                let device = ExposedDevice::new(identity, camera, state);
                devices.insert(identity, device);

                tracing::info!(
                    controller = %self.controller_address,
                    camera = %camera.name,
                    %identity,
                    "Exposing new camera"
                );
                self.bus.publish(AccessoryEvent::device_added(identity));
                report.added.push(identity);
            }
        }

        let stale: Vec<DeviceIdentity> = devices
            .keys()
            .filter(|identity| !live.contains(*identity))
            .copied()
            .collect();

        for identity in stale {
            if let Some(device) = devices.remove(&identity) {
                device.state().detach();

                tracing::info!(
                    controller = %self.controller_address,
                    name = %device.name(),
                    %identity,
                    "Removing stale camera"
                );
                self.bus.publish(AccessoryEvent::device_removed(identity));
                report.removed.push(identity);
            }
        }

        drop(devices);

        tracing::debug!(
            controller = %self.controller_address,
            added = report.added.len(),
            refreshed = report.refreshed.len(),
            removed = report.removed.len(),
            "Reconciliation pass complete"
        );
        report
    }
}

impl std::fmt::Debug for InventorySynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventorySynchronizer")
            .field("controller_address", &self.controller_address)
            .finish_non_exhaustive()
    }
}
