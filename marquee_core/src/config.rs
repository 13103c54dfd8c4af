// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page configuration.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use crate::movie::MovieId;

/// Configuration for the [`Page`](crate::page::Page) controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    /// Delay after a primary player is initialized before its readiness is
    /// checked, in milliseconds.
    pub readiness_timeout_ms: u32,
    /// How long a notice stays visible, in milliseconds.
    pub notice_dismiss_ms: u32,
    /// Lower-case file extensions whose native playback is unreliable. Cards
    /// for these formats get the fallback panel.
    pub unreliable_extensions: &'static [&'static str],
    /// Source-buffer MIME types tried, in order, by the buffered-source
    /// strategy.
    pub mse_codec_candidates: &'static [&'static str],
    /// Prefix of the collaborator endpoints, without a trailing slash.
    pub api_base: Cow<'static, str>,
}

impl PageConfig {
    /// Default configuration for the browser page.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            readiness_timeout_ms: 3_000,
            notice_dismiss_ms: 8_000,
            unreliable_extensions: &["mkv"],
            mse_codec_candidates: &[
                r#"video/webm; codecs="vp8,vorbis""#,
                r#"video/mp4; codecs="avc1.42E01E,mp4a.40.2""#,
            ],
            api_base: Cow::Borrowed("/api"),
        }
    }

    /// Returns `true` if `extension` needs the fallback panel.
    #[must_use]
    pub fn is_unreliable(&self, extension: &str) -> bool {
        self.unreliable_extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }

    /// `GET` endpoint returning the movie list.
    #[must_use]
    pub fn movies_url(&self) -> String {
        format!("{}/movies", self.api_base)
    }

    /// `POST` endpoint accepting a multipart upload.
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.api_base)
    }

    /// `DELETE` endpoint for a single movie.
    #[must_use]
    pub fn movie_url(&self, id: &MovieId) -> String {
        format!("{}/movies/{}", self.api_base, encode_path_segment(id.as_str()))
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn encode_path_segment(segment: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(segment.len());
    for &b in segment.as_bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(char::from(b));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(b >> 4)]));
            out.push(char::from(HEX[usize::from(b & 0x0f)]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        let config = PageConfig::web();
        assert_eq!(config.movies_url(), "/api/movies");
        assert_eq!(config.upload_url(), "/api/upload");
        assert_eq!(config.movie_url(&MovieId::new("17")), "/api/movies/17");
    }

    #[test]
    fn movie_url_encodes_id() {
        let config = PageConfig {
            api_base: Cow::Borrowed("https://media.example/api"),
            ..PageConfig::web()
        };
        assert_eq!(
            config.movie_url(&MovieId::new("a b/ü")),
            "https://media.example/api/movies/a%20b%2F%C3%BC"
        );
    }

    #[test]
    fn unreliable_match_ignores_case() {
        let config = PageConfig::web();
        assert!(config.is_unreliable("mkv"));
        assert!(config.is_unreliable("MKV"));
        assert!(!config.is_unreliable("mp4"));
    }
}
