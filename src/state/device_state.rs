// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-camera state machine.
//!
//! Combines three concerns that share one lock: the motion debounce window,
//! the local motion-enable filter, and the optimistic LED state. All
//! transitions run in short non-async critical sections; the only suspension
//! points are the remote LED write and the revert delay, both of which run on
//! spawned tasks and re-validate their epoch before applying anything.

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::camera::LedSettings;
use crate::client::ControllerClient;
use crate::event::{AccessoryEvent, DeviceIdentity, EventBus};

use super::MotionTimer;

/// Delay before a failed LED write reverts the exposed signal.
///
/// Short enough to feel immediate, long enough that a host UI has redrawn
/// the optimistic value before it flips back.
const LED_REVERT_DELAY: Duration = Duration::from_millis(75);

/// Mutable core shared between handlers, timer expiry, and write tasks.
struct StateCore {
    motion_detected: bool,
    /// All-time high-water mark of seen motion timestamps (epoch ms).
    last_motion_timestamp: u64,
    motion_enabled: bool,
    /// Bumped whenever a debounce window starts or ends early; a pending
    /// expiry callback only applies if the epoch it captured is still
    /// current.
    window_epoch: u64,
    /// Last confirmed LED value.
    led_enabled: bool,
    pending_led: Option<bool>,
    /// Bumped on every local request and every remote-origin commit; stale
    /// completions and reverts check it before applying.
    led_epoch: u64,
    detached: bool,
    timer: MotionTimer,
}

/// State machine for one exposed camera device.
///
/// Cloning yields another handle to the same state. All methods must be
/// called from within a tokio runtime because motion events arm timers and
/// LED requests spawn write tasks.
///
/// # Exposed signals
///
/// - `motion_detected` - true from the first qualifying motion event until
///   the debounce window expires.
/// - `motion_enabled` - the local filter; suppresses the signal without
///   touching the camera's own settings.
/// - `led_enabled` - the optimistic view of the status LED: a pending local
///   request wins over the last confirmed value until it resolves.
#[derive(Clone)]
pub struct DeviceState {
    identity: DeviceIdentity,
    camera_id: Arc<str>,
    client: Arc<dyn ControllerClient>,
    bus: EventBus,
    motion_duration: Duration,
    inner: Arc<Mutex<StateCore>>,
}

impl DeviceState {
    /// Creates the state machine for a newly exposed camera.
    ///
    /// `led_enabled` is seeded from the camera's current LED setting;
    /// the motion filter starts enabled.
    pub(crate) fn new(
        identity: DeviceIdentity,
        camera_id: &str,
        led_enabled: bool,
        motion_duration: Duration,
        client: Arc<dyn ControllerClient>,
        bus: EventBus,
    ) -> Self {
        Self {
            identity,
            camera_id: Arc::from(camera_id),
            client,
            bus,
            motion_duration,
            inner: Arc::new(Mutex::new(StateCore {
                motion_detected: false,
                last_motion_timestamp: 0,
                motion_enabled: true,
                window_epoch: 0,
                led_enabled,
                pending_led: None,
                led_epoch: 0,
                detached: false,
                timer: MotionTimer::new(),
            })),
        }
    }

    /// Returns the device identity.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    /// Returns the controller-assigned camera id.
    #[must_use]
    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    /// Returns the exposed motion-detected signal.
    #[must_use]
    pub fn motion_detected(&self) -> bool {
        self.inner.lock().motion_detected
    }

    /// Returns the local motion-enable filter.
    #[must_use]
    pub fn motion_enabled(&self) -> bool {
        self.inner.lock().motion_enabled
    }

    /// Returns the high-water mark of seen motion timestamps (epoch ms).
    ///
    /// Zero means no event has been seen yet.
    #[must_use]
    pub fn last_motion_timestamp(&self) -> u64 {
        self.inner.lock().last_motion_timestamp
    }

    /// Returns the last seen motion timestamp as a UTC datetime.
    #[must_use]
    pub fn last_motion_at(&self) -> Option<DateTime<Utc>> {
        let timestamp = self.last_motion_timestamp();
        if timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(i64::try_from(timestamp).ok()?)
    }

    /// Returns the exposed LED signal.
    ///
    /// A pending optimistic request wins over the last confirmed value.
    #[must_use]
    pub fn led_enabled(&self) -> bool {
        let core = self.inner.lock();
        core.pending_led.unwrap_or(core.led_enabled)
    }

    /// Returns the pending optimistic LED request, if one is in flight.
    #[must_use]
    pub fn pending_led(&self) -> Option<bool> {
        self.inner.lock().pending_led
    }

    // =========================================================================
    // Motion debounce
    // =========================================================================

    /// Handles an inbound motion event.
    ///
    /// An absent timestamp is a no-op. A timestamp at or below the all-time
    /// high-water mark is a duplicate or out-of-order event and is dropped;
    /// a timestamp already seen can never retrigger a window, even after the
    /// device has returned to idle. Qualifying events (re)arm the debounce
    /// window; while the local filter is off the high-water mark still
    /// advances but no signal changes.
    pub fn handle_motion_event(&self, timestamp: Option<u64>) {
        let Some(timestamp) = timestamp else {
            return;
        };

        let newly_detected = {
            let mut core = self.inner.lock();
            if core.detached {
                return;
            }
            if timestamp <= core.last_motion_timestamp {
                tracing::trace!(
                    identity = %self.identity,
                    timestamp,
                    high_water = core.last_motion_timestamp,
                    "Dropping duplicate or out-of-order motion event"
                );
                return;
            }
            core.last_motion_timestamp = timestamp;

            if !core.motion_enabled {
                tracing::debug!(identity = %self.identity, "Motion suppressed by local filter");
                return;
            }

            core.window_epoch += 1;
            let epoch = core.window_epoch;
            let weak = Arc::downgrade(&self.inner);
            let bus = self.bus.clone();
            let identity = self.identity;
            core.timer.arm(self.motion_duration, move || {
                Self::expire_window(&weak, epoch, &bus, identity);
            });

            let newly = !core.motion_detected;
            core.motion_detected = true;
            newly
        };

        tracing::debug!(identity = %self.identity, timestamp, "Motion window (re)armed");
        if newly_detected {
            self.bus
                .publish(AccessoryEvent::motion_changed(self.identity, true));
        }
    }

    /// Timer expiry: close the window the callback was armed for.
    fn expire_window(
        weak: &Weak<Mutex<StateCore>>,
        epoch: u64,
        bus: &EventBus,
        identity: DeviceIdentity,
    ) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        {
            let mut core = inner.lock();
            if core.detached || core.window_epoch != epoch || !core.motion_detected {
                return;
            }
            core.motion_detected = false;
        }
        tracing::debug!(%identity, "Motion window expired");
        bus.publish(AccessoryEvent::motion_changed(identity, false));
    }

    /// Sets the local motion-enable filter.
    ///
    /// Disabling while a window is active cancels the timer and drops the
    /// exposed signal immediately; disabling always wins over an in-progress
    /// detection window. Re-enabling while idle only re-permits future
    /// events.
    pub fn set_motion_enabled(&self, enabled: bool) {
        let ended_window = {
            let mut core = self.inner.lock();
            if core.detached || core.motion_enabled == enabled {
                return;
            }
            core.motion_enabled = enabled;

            if !enabled && core.motion_detected {
                core.timer.cancel();
                core.window_epoch += 1;
                core.motion_detected = false;
                true
            } else {
                false
            }
        };

        tracing::debug!(identity = %self.identity, enabled, "Motion filter toggled");
        self.bus
            .publish(AccessoryEvent::motion_enabled_changed(self.identity, enabled));
        if ended_window {
            self.bus
                .publish(AccessoryEvent::motion_changed(self.identity, false));
        }
    }

    // =========================================================================
    // LED optimistic update / remote-origin sync
    // =========================================================================

    /// Requests a new status LED value.
    ///
    /// The exposed signal flips immediately; the remote write runs on a
    /// spawned task. On success the value is committed; on rejection or
    /// transport failure the signal reverts to the last confirmed value
    /// after a short delay. A newer request or a remote-origin push
    /// invalidates the outcome of an older request.
    pub fn request_led(&self, enabled: bool) {
        let (epoch, exposed_changed) = {
            let mut core = self.inner.lock();
            if core.detached {
                return;
            }
            let exposed_before = core.pending_led.unwrap_or(core.led_enabled);
            core.led_epoch += 1;
            core.pending_led = Some(enabled);
            (core.led_epoch, exposed_before != enabled)
        };

        tracing::debug!(identity = %self.identity, enabled, "LED write requested");
        if exposed_changed {
            self.bus
                .publish(AccessoryEvent::led_changed(self.identity, enabled));
        }

        let state = self.clone();
        tokio::spawn(async move {
            state.drive_led_request(enabled, epoch).await;
        });
    }

    /// Runs one optimistic LED write to completion.
    async fn drive_led_request(&self, enabled: bool, epoch: u64) {
        let accepted = match self.client.update_camera_led(&self.camera_id, enabled).await {
            Ok(accepted) => accepted,
            Err(error) => {
                tracing::warn!(
                    identity = %self.identity,
                    error = %error,
                    "LED write failed"
                );
                false
            }
        };

        if accepted {
            let mut core = self.inner.lock();
            if core.detached || core.led_epoch != epoch {
                // A newer request or remote push superseded this write.
                return;
            }
            core.led_enabled = enabled;
            core.pending_led = None;
            return;
        }

        tracing::warn!(identity = %self.identity, enabled, "Controller rejected LED write");
        tokio::time::sleep(LED_REVERT_DELAY).await;

        let confirmed = {
            let mut core = self.inner.lock();
            if core.detached || core.led_epoch != epoch {
                return;
            }
            core.pending_led = None;
            core.led_enabled
        };

        if confirmed != enabled {
            self.bus
                .publish(AccessoryEvent::led_changed(self.identity, confirmed));
        }
    }

    /// Applies a remote-origin LED settings push.
    ///
    /// A confirmed remote-origin change always wins: it commits
    /// unconditionally, overwrites any pending optimistic value, and
    /// invalidates any in-flight local request.
    pub fn handle_led_settings_update(&self, settings: &LedSettings) {
        let exposed_changed = {
            let mut core = self.inner.lock();
            if core.detached {
                return;
            }
            let exposed_before = core.pending_led.unwrap_or(core.led_enabled);
            core.led_epoch += 1;
            core.pending_led = None;
            core.led_enabled = settings.is_enabled;
            exposed_before != settings.is_enabled
        };

        tracing::debug!(
            identity = %self.identity,
            enabled = settings.is_enabled,
            "Remote-origin LED update"
        );
        if exposed_changed {
            self.bus
                .publish(AccessoryEvent::led_changed(self.identity, settings.is_enabled));
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Detaches the state from its device.
    ///
    /// Called when reconciliation removes the device: cancels the timer and
    /// invalidates every in-flight deferred effect so late completions
    /// become no-ops.
    pub(crate) fn detach(&self) {
        let mut core = self.inner.lock();
        core.detached = true;
        core.timer.cancel();
        core.window_epoch += 1;
        core.led_epoch += 1;
        core.motion_detected = false;
        core.pending_led = None;
    }

    /// Returns `true` once the device has been removed from its registry.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.inner.lock().detached
    }
}

impl std::fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("DeviceState")
            .field("identity", &self.identity)
            .field("camera_id", &self.camera_id)
            .field("motion_detected", &core.motion_detected)
            .field("motion_enabled", &core.motion_enabled)
            .field("led_enabled", &core.led_enabled)
            .finish_non_exhaustive()
    }
}
