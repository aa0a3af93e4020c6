// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ProtectR` library.
//!
//! Failures are split along the controller boundary: credential rejection,
//! transient API failures, and payload decoding. Malformed feed packets are
//! not represented here at all; the router drops them silently. Per-device
//! remote-write failures are absorbed by the optimistic-revert path and never
//! surface through these types either.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The controller rejected the provided credentials.
    ///
    /// Surfaced to the operator; the core performs no automatic retry.
    /// Reconnection policy belongs to the embedding application.
    #[error("controller {controller} rejected the provided credentials")]
    Auth {
        /// Address of the rejecting controller.
        controller: String,
    },

    /// A transient or server-side API failure.
    ///
    /// The reconciliation pass that hit this error is abandoned for the
    /// cycle; previously exposed devices are left untouched.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A controller response could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors from talking to the controller's API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed at the transport level.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The controller answered with a non-success status.
    #[error("controller returned HTTP {code} - {reason}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// Connection to the controller failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Errors related to decoding controller responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON decoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// The response had an unexpected overall shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

impl Error {
    /// Returns `true` if this is a credential rejection.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
