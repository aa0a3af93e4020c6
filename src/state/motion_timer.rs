// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cancelable single-shot timer for motion debounce windows.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A cancelable, restartable single-shot deferred callback.
///
/// Each device state owns exactly one `MotionTimer`. Arming always cancels
/// the previous shot first, so there is never more than one outstanding
/// callback per owner; that invariant is structural rather than a calling
/// convention.
///
/// Must be armed from within a tokio runtime.
#[derive(Debug, Default)]
pub struct MotionTimer {
    handle: Option<JoinHandle<()>>,
}

impl MotionTimer {
    /// Creates an unarmed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Arms the timer, canceling any previous shot.
    ///
    /// `on_expire` runs once after `duration` unless the timer is re-armed
    /// or canceled first.
    pub fn arm<F>(&mut self, duration: Duration, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_expire();
        }));
    }

    /// Cancels the pending shot, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a shot is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for MotionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
