// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration types consumed by the bridge.
//!
//! Loading and validating a configuration file is the embedding
//! application's concern; this module only defines the shapes the core
//! consumes. All fields deserialize with serde so hosts can feed JSON,
//! YAML or TOML through their loader of choice.

use std::time::Duration;

/// Default debounce window applied after the last qualifying motion event.
pub const DEFAULT_MOTION_DURATION: Duration = Duration::from_secs(10);

fn default_motion_duration_secs() -> u64 {
    DEFAULT_MOTION_DURATION.as_secs()
}

/// Connection parameters for one controller.
///
/// # Examples
///
/// ```
/// use protectr_lib::config::ControllerConfig;
///
/// let config = ControllerConfig::new("nvr.local", "bridge", "secret");
/// assert_eq!(config.address, "nvr.local");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ControllerConfig {
    /// Controller address (hostname or IP, optionally with a scheme).
    pub address: String,
    /// Account used for the API session.
    pub username: String,
    /// Password for the account.
    pub password: String,
}

impl ControllerConfig {
    /// Creates a controller configuration.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Settings for the whole bridge process.
///
/// # Examples
///
/// ```
/// use protectr_lib::config::BridgeSettings;
///
/// let settings: BridgeSettings = serde_json::from_str(
///     r#"{ "controllers": [], "motionDurationSecs": 5 }"#,
/// ).unwrap();
/// assert_eq!(settings.motion_duration().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSettings {
    /// Controllers to bridge; each gets its own independent reconciliation.
    #[serde(default)]
    pub controllers: Vec<ControllerConfig>,
    /// Seconds the exposed motion signal stays on after the last event.
    #[serde(default = "default_motion_duration_secs")]
    pub motion_duration_secs: u64,
    /// Enables verbose diagnostic logging in the embedding application.
    #[serde(default)]
    pub debug: bool,
}

impl BridgeSettings {
    /// Returns the motion debounce window as a [`Duration`].
    #[must_use]
    pub fn motion_duration(&self) -> Duration {
        Duration::from_secs(self.motion_duration_secs)
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            controllers: Vec::new(),
            motion_duration_secs: default_motion_duration_secs(),
            debug: false,
        }
    }
}
