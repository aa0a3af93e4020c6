// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP implementation of the controller client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tokio::sync::broadcast;

use crate::camera::CameraRecord;
use crate::client::ControllerClient;
use crate::config::ControllerConfig;
use crate::error::{ApiError, Error, ParseError, Result};
use crate::event::FeedPacket;

/// Session login endpoint.
const LOGIN_PATH: &str = "/api/auth/login";
/// Full-state bootstrap endpoint; carries the camera inventory.
const BOOTSTRAP_PATH: &str = "/proxy/protect/api/bootstrap";
/// Per-camera settings endpoint.
const CAMERAS_PATH: &str = "/proxy/protect/api/cameras";

/// Request timeout for controller calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the decoded-feed channel.
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Bootstrap response shape; only the camera list is consumed.
#[derive(serde::Deserialize)]
struct Bootstrap {
    cameras: Vec<CameraRecord>,
}

/// HTTP client for one video-security controller.
///
/// Covers the REST surface the core needs: session login, the camera
/// bootstrap and LED writes. Controllers ship self-signed certificates, so
/// certificate validation is disabled; the session cookie from login is
/// carried automatically on subsequent requests.
///
/// The feed's wire encoding is not handled here. A transport layer owns the
/// socket, decodes frames into [`FeedPacket`]s and hands them to
/// [`publish_packet`](Self::publish_packet); routing consumes them through
/// [`subscribe`](Self::subscribe).
///
/// # Examples
///
/// ```no_run
/// use protectr_lib::config::ControllerConfig;
/// use protectr_lib::protocol::HttpControllerClient;
///
/// # async fn example() -> protectr_lib::Result<()> {
/// let config = ControllerConfig::new("nvr.local", "bridge", "secret");
/// let client = HttpControllerClient::new(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpControllerClient {
    base_url: String,
    address: String,
    username: String,
    password: String,
    client: Client,
    feed_tx: broadcast::Sender<FeedPacket>,
}

impl HttpControllerClient {
    /// Creates a client for the configured controller.
    ///
    /// The address may carry an explicit scheme; without one, HTTPS is
    /// assumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let base_url = if config.address.starts_with("http://")
            || config.address.starts_with("https://")
        {
            config.address.clone()
        } else {
            format!("https://{}", config.address)
        };

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| Error::Api(ApiError::Http(e)))?;

        let (feed_tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);

        Ok(Self {
            base_url,
            address: config.address.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
            feed_tx,
        })
    }

    /// Returns the base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Injects one decoded feed packet.
    ///
    /// Called by the transport layer that owns the feed socket. The packet
    /// is fanned out to every [`subscribe`](Self::subscribe) receiver; with
    /// no receivers it is silently discarded.
    pub fn publish_packet(&self, packet: FeedPacket) {
        let _ = self.feed_tx.send(packet);
    }

    fn status_error(status: StatusCode) -> ApiError {
        ApiError::Status {
            code: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

#[async_trait]
impl ControllerClient for HttpControllerClient {
    async fn connect(&self) -> Result<()> {
        let url = format!("{}{LOGIN_PATH}", self.base_url);
        tracing::debug!(url = %url, "Logging in to controller");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": self.username,
                "password": self.password,
            }))
            .send()
            .await
            .map_err(|e| Error::Api(ApiError::Http(e)))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth {
                controller: self.address.clone(),
            }),
            status => Err(Error::Api(Self::status_error(status))),
        }
    }

    async fn cameras(&self) -> Result<Vec<CameraRecord>> {
        let url = format!("{}{BOOTSTRAP_PATH}", self.base_url);
        tracing::debug!(url = %url, "Reading camera inventory");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Api(ApiError::Http(e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth {
                controller: self.address.clone(),
            });
        }
        if !status.is_success() {
            return Err(Error::Api(Self::status_error(status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Api(ApiError::Http(e)))?;
        let bootstrap: Bootstrap =
            serde_json::from_str(&body).map_err(|e| Error::Parse(ParseError::Json(e)))?;

        tracing::debug!(count = bootstrap.cameras.len(), "Inventory read");
        Ok(bootstrap.cameras)
    }

    async fn update_camera_led(&self, camera_id: &str, enabled: bool) -> Result<bool> {
        let url = format!(
            "{}{CAMERAS_PATH}/{}",
            self.base_url,
            urlencoding::encode(camera_id)
        );
        tracing::debug!(url = %url, enabled, "Writing camera LED setting");

        let response = self
            .client
            .patch(&url)
            .json(&serde_json::json!({
                "ledSettings": { "isEnabled": enabled },
            }))
            .send()
            .await
            .map_err(|e| Error::Api(ApiError::Http(e)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Auth {
                controller: self.address.clone(),
            }),
            status if status.is_client_error() => {
                // The controller refused the write (camera gone, setting
                // locked); report a rejection rather than a transport error.
                tracing::debug!(code = status.as_u16(), "Controller refused LED write");
                Ok(false)
            }
            status => Err(Error::Api(Self::status_error(status))),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<FeedPacket> {
        self.feed_tx.subscribe()
    }
}
