// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller client boundary.
//!
//! The core talks to the controller exclusively through [`ControllerClient`].
//! Session establishment, transport reconnects and the feed's wire encoding
//! all live behind this trait; the core only sees inventory snapshots,
//! decoded feed packets and a boolean outcome for LED writes.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::camera::CameraRecord;
use crate::error::Result;
use crate::event::FeedPacket;

/// Client for one video-security controller.
///
/// Implementations must be cheap to share behind an `Arc`; per-device tasks
/// hold a clone for the lifetime of the device.
#[async_trait]
pub trait ControllerClient: Send + Sync {
    /// Establishes an authenticated session with the controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Auth`](crate::error::Error::Auth) on credential
    /// rejection and [`Error::Api`](crate::error::Error::Api) on transient
    /// failures.
    async fn connect(&self) -> Result<()>;

    /// Returns a snapshot of the live camera inventory.
    ///
    /// Callers must only feed a successfully read inventory into
    /// reconciliation; a failed read must abandon the pass instead of
    /// presenting an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::error::Error::Api) or
    /// [`Error::Parse`](crate::error::Error::Parse) when the inventory
    /// cannot be read.
    async fn cameras(&self) -> Result<Vec<CameraRecord>>;

    /// Pushes a new status LED setting to a camera.
    ///
    /// Returns `Ok(true)` when the controller accepted the write and
    /// `Ok(false)` when it rejected it. Both a rejection and an `Err` are
    /// treated by callers as a failed optimistic update.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::error::Error::Api) on transport
    /// failures.
    async fn update_camera_led(&self, camera_id: &str, enabled: bool) -> Result<bool>;

    /// Subscribes to the controller's decoded real-time feed.
    ///
    /// Each receiver sees every packet published after the subscription was
    /// created. Decoding the transport's wire format into [`FeedPacket`]s is
    /// the implementation's concern.
    fn subscribe(&self) -> broadcast::Receiver<FeedPacket>;
}
