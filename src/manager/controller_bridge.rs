// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-controller facade.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::client::ControllerClient;
use crate::config::{BridgeSettings, ControllerConfig};
use crate::error::Result;
use crate::event::{AccessoryEvent, EventBus, EventRouter, FeedPacket};
use crate::manager::{DeviceRegistry, ExposedDevice, InventorySynchronizer, ReconcileReport};

/// Bridges one controller into a set of exposed smart-home devices.
///
/// Owns the registry, the synchronizer, the router and the event bus for a
/// single controller. Controllers are fully independent; an application
/// bridging several creates one `ControllerBridge` per
/// [`ControllerConfig`] entry.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use protectr_lib::config::{BridgeSettings, ControllerConfig};
/// use protectr_lib::manager::ControllerBridge;
/// use protectr_lib::protocol::HttpControllerClient;
///
/// #[tokio::main]
/// async fn main() -> protectr_lib::Result<()> {
///     let settings = BridgeSettings::default();
///     let config = ControllerConfig::new("nvr.local", "bridge", "secret");
///     let client = Arc::new(HttpControllerClient::new(&config)?);
///
///     let bridge = ControllerBridge::new(config, &settings, client);
///     let mut events = bridge.subscribe();
///
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("accessory event: {event:?}");
///         }
///     });
///
///     bridge.run().await
/// }
/// ```
pub struct ControllerBridge {
    config: ControllerConfig,
    client: Arc<dyn ControllerClient>,
    registry: DeviceRegistry,
    synchronizer: InventorySynchronizer,
    router: EventRouter,
    bus: EventBus,
}

impl ControllerBridge {
    /// Creates a bridge for one controller.
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        settings: &BridgeSettings,
        client: Arc<dyn ControllerClient>,
    ) -> Self {
        let registry = DeviceRegistry::new();
        let bus = EventBus::new();
        let synchronizer = InventorySynchronizer::new(
            config.address.clone(),
            registry.clone(),
            Arc::clone(&client),
            bus.clone(),
            settings.motion_duration(),
        );
        let router = EventRouter::new(config.address.clone(), registry.clone());

        Self {
            config,
            client,
            registry,
            synchronizer,
            router,
            bus,
        }
    }

    /// Returns the controller address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.config.address
    }

    /// Returns the registry of exposed devices.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Subscribes to accessory events for this controller.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AccessoryEvent> {
        self.bus.subscribe()
    }

    /// Looks up an exposed device by camera id.
    pub async fn device(&self, camera_id: &str) -> Option<ExposedDevice> {
        let identity = crate::event::DeviceIdentity::derive(&self.config.address, camera_id);
        self.registry.get(identity).await
    }

    /// Establishes the controller session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`](crate::error::Error::Auth) on credential
    /// rejection (surfaced to the operator, no retry here) or
    /// [`Error::Api`](crate::error::Error::Api) on transient failures.
    pub async fn connect(&self) -> Result<()> {
        self.client.connect().await
    }

    /// Reads the live inventory and reconciles the exposed device set.
    ///
    /// A failed inventory read abandons the pass for this cycle: the error
    /// is returned and previously exposed devices are left untouched until
    /// a future successful pass.
    ///
    /// # Errors
    ///
    /// Returns the inventory read failure, if any.
    pub async fn refresh(&self) -> Result<ReconcileReport> {
        let cameras = match self.client.cameras().await {
            Ok(cameras) => cameras,
            Err(error) => {
                tracing::warn!(
                    controller = %self.config.address,
                    error = %error,
                    "Inventory read failed; keeping previously exposed devices"
                );
                return Err(error);
            }
        };
        Ok(self.synchronizer.reconcile(&cameras).await)
    }

    /// Routes one feed packet.
    ///
    /// Exposed for hosts and tests that drive the feed themselves.
    pub async fn route(&self, packet: &FeedPacket) {
        self.router.route(packet).await;
    }

    /// Connects, reconciles once, then drives the real-time feed until the
    /// client's feed channel closes.
    ///
    /// # Errors
    ///
    /// Returns connection or discovery failures; feed lag is logged and
    /// skipped over, and a closed feed ends the run without error.
    pub async fn run(&self) -> Result<()> {
        self.connect().await.inspect_err(|error| {
            if error.is_auth() {
                tracing::error!(
                    controller = %self.config.address,
                    "Credentials rejected; check the bridge account"
                );
            }
        })?;
        self.refresh().await?;

        let mut feed = self.client.subscribe();
        loop {
            match feed.recv().await {
                Ok(packet) => self.router.route(&packet).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        controller = %self.config.address,
                        skipped,
                        "Feed subscriber lagged; packets dropped"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::debug!(
                        controller = %self.config.address,
                        "Feed closed; stopping bridge loop"
                    );
                    return Ok(());
                }
            }
        }
    }
}

impl std::fmt::Debug for ControllerBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerBridge")
            .field("address", &self.config.address)
            .finish_non_exhaustive()
    }
}
