// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device state machines.
//!
//! [`DeviceState`] holds everything the bridge tracks for one camera: the
//! motion debounce window, the local motion-enable filter, and the
//! optimistic LED state. [`MotionTimer`] is the cancelable single-shot
//! primitive backing the debounce window; each state owns exactly one.

mod device_state;
mod motion_timer;

pub use device_state::DeviceState;
pub use motion_timer::MotionTimer;
