// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ProtectR` Lib - A Rust library to mirror video-security controller
//! cameras into smart-home accessories.
//!
//! The library keeps a stable set of exposed devices in sync with a
//! controller's live camera inventory and its asynchronous real-time feed.
//! The interesting parts are the reconciliation and the per-device state
//! machines, not the network calls: a thin client reads snapshots and
//! performs writes, while this crate decides what counts as the same device
//! across restarts, debounces noisy motion events into a clean signal, and
//! keeps optimistic LED writes honest against remote-origin updates.
//!
//! # Supported Features
//!
//! - **Inventory reconciliation**: add/refresh/remove exposed devices
//!   against the live camera list, keyed by a deterministic identity
//! - **Event routing**: dispatch feed packets to the owning device state
//! - **Motion debounce**: a per-camera on/duration/off signal with a local
//!   enable filter and strict duplicate suppression
//! - **Optimistic LED control**: immediate local writes with automatic
//!   revert on failure, overridden by confirmed remote-origin pushes
//!
//! # Quick Start
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
//!
//!     // Accessory events feed the host's presentation layer.
//!     let mut events = bridge.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("{event:?}");
//!         }
//!     });
//!
//!     // Connect, reconcile, then drive the real-time feed.
//!     bridge.run().await
//! }
//! ```
//!
//! # Exposed Controls
//!
//! Each exposed device surfaces three independently addressable controls:
//!
//! ```no_run
//! # use protectr_lib::manager::ControllerBridge;
//! # async fn example(bridge: &ControllerBridge) {
//! if let Some(device) = bridge.device("cam1").await {
//!     let _ = device.motion_detected();   // read-only signal
//!     device.set_motion_enabled(false);   // local filter, persists locally
//!     device.request_led(true);           // optimistic remote write
//! }
//! # }
//! ```

pub mod camera;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod manager;
#[cfg(feature = "http")]
pub mod protocol;
pub mod state;

pub use camera::{CameraRecord, LedSettings};
pub use client::ControllerClient;
pub use config::{BridgeSettings, ControllerConfig, DEFAULT_MOTION_DURATION};
pub use error::{ApiError, Error, ParseError, Result};
pub use event::{
    AccessoryEvent, DeviceIdentity, EventBus, EventRouter, FeedPacket, PacketAction, PacketPayload,
};
pub use manager::{
    CameraAttributes, ControllerBridge, DeviceRegistry, ExposedDevice, InventorySynchronizer,
    ReconcileReport,
};
#[cfg(feature = "http")]
pub use protocol::HttpControllerClient;
pub use state::{DeviceState, MotionTimer};
