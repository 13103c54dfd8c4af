// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy.
//!
//! Transport, server-reported, and malformed-response failures are
//! [`ApiError`]s; they are always caught by the page and turned into a
//! transient notice. Playback failures are [`PlaybackError`]s; they escalate
//! only within the card they belong to.

use alloc::string::String;

use serde::Serialize;
use thiserror::Error;

/// Failure talking to one of the collaborator endpoints.
///
/// The `Display` text is the user-facing reason that follows
/// `"Upload failed: "` or `"Delete failed: "`.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error")]
    Transport(String),
    /// The server answered with an `error` payload.
    #[error("{0}")]
    Server(String),
    /// The server answered with a failure status and no readable payload.
    #[error("Server error")]
    Status(u16),
    /// The payload did not match the expected schema.
    #[error("Malformed server response")]
    Malformed(String),
}

/// Failure of a playback strategy for a single card.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum PlaybackError {
    /// The player library refused to initialize.
    #[error("Player initialization failed: {0}")]
    Player(String),
    /// `MediaSource` is not available in this browser.
    #[error("Your browser does not support Media Source Extensions (MSE)")]
    MediaSourceUnsupported,
    /// `VideoDecoder` is not available in this browser.
    #[error("Your browser does not support WebCodecs API")]
    DecoderUnsupported,
    /// The buffered-source pipeline failed.
    #[error("Failed to play MKV file with MSE: {0}")]
    MediaSource(String),
    /// The card's media container is no longer in the document.
    #[error("player container is gone")]
    Detached,
}

impl PlaybackError {
    /// Returns `true` when the failure should be reported on the card.
    ///
    /// A detached container means the card is gone, so there is nowhere to
    /// report it.
    #[must_use]
    pub const fn is_reportable(&self) -> bool {
        !matches!(self, Self::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    #[test]
    fn api_error_reasons() {
        assert_eq!(ApiError::Transport("offline".into()).to_string(), "Network error");
        assert_eq!(ApiError::Server("not found".into()).to_string(), "not found");
        assert_eq!(ApiError::Status(502).to_string(), "Server error");
        assert_eq!(
            ApiError::Malformed("missing field".into()).to_string(),
            "Malformed server response"
        );
    }

    #[test]
    fn detached_is_silent() {
        assert!(!PlaybackError::Detached.is_reportable());
        assert!(PlaybackError::DecoderUnsupported.is_reportable());
    }
}
