// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exposed-device management for one controller.
//!
//! # Overview
//!
//! The [`ControllerBridge`] is the central component for applications that
//! mirror a controller's cameras into smart-home devices. It wires together:
//!
//! - **[`DeviceRegistry`]**: the identity-keyed map of exposed devices
//! - **[`InventorySynchronizer`]**: add/refresh/remove reconciliation against
//!   the live camera list
//! - **[`EventRouter`](crate::event::EventRouter)**: dispatch of feed packets
//!   into the registry
//! - **[`EventBus`](crate::event::EventBus)**: accessory-event fan-out to the
//!   host's presentation layer
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use protectr_lib::config::{BridgeSettings, ControllerConfig};
//! use protectr_lib::manager::ControllerBridge;
//! use protectr_lib::protocol::HttpControllerClient;
//!
//! #[tokio::main]
//! async fn main() -> protectr_lib::Result<()> {
//!     let settings = BridgeSettings::default();
//!     let config = ControllerConfig::new("nvr.local", "bridge", "secret");
//!     let client = Arc::new(HttpControllerClient::new(&config)?);
//!
//!     let bridge = ControllerBridge::new(config, &settings, client);
//!     bridge.run().await
//! }
//! ```
//!
//! ## Driving exposed controls
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use protectr_lib::config::{BridgeSettings, ControllerConfig};
//! # use protectr_lib::manager::ControllerBridge;
//! # use protectr_lib::protocol::HttpControllerClient;
//! # async fn example(bridge: &ControllerBridge) {
//! if let Some(device) = bridge.device("cam1").await {
//!     // Local filter: suppress motion without touching the camera.
//!     device.set_motion_enabled(false);
//!     // Optimistic LED write; reverts by itself if the controller refuses.
//!     device.request_led(true);
//! }
//! # }
//! ```

mod controller_bridge;
mod exposed_device;
mod inventory;

pub use controller_bridge::ControllerBridge;
pub use exposed_device::{CameraAttributes, ExposedDevice};
pub use inventory::{DeviceRegistry, InventorySynchronizer, ReconcileReport};
