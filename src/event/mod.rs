// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system: feed packets in, accessory events out.
//!
//! Inbound, the [`EventRouter`] consumes decoded [`FeedPacket`]s from the
//! controller's real-time feed and dispatches them to the owning device
//! state. Outbound, the [`EventBus`] broadcasts [`AccessoryEvent`]s to the
//! accessory-presentation layer. [`DeviceIdentity`] is the stable key tying
//! both directions to the same exposed device.
//!
//! # Examples
//!
//! ```
//! use protectr_lib::event::{AccessoryEvent, DeviceIdentity, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let identity = DeviceIdentity::derive("nvr.local", "cam1");
//! bus.publish(AccessoryEvent::motion_changed(identity, true));
//! ```

mod accessory_event;
mod device_identity;
mod event_bus;
mod packet;
mod router;

pub use accessory_event::AccessoryEvent;
pub use device_identity::DeviceIdentity;
pub use event_bus::EventBus;
pub use packet::{FeedPacket, PacketAction, PacketPayload};
pub use router::EventRouter;
