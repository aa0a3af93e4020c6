// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Default controller client implementations.
//!
//! [`HttpControllerClient`] covers the controller's REST surface: session
//! login, the camera bootstrap, and LED writes. The real-time feed's wire
//! encoding is deliberately not implemented here; a transport layer decodes
//! frames into [`FeedPacket`](crate::event::FeedPacket)s and injects them
//! through [`HttpControllerClient::publish_packet`].

mod http;

pub use http::HttpControllerClient;
