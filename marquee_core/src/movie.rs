// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movie records as served by the listing endpoint.
//!
//! Records are immutable from the page's point of view: the server owns their
//! lifecycle and the page only reads fields and derives display strings.

use alloc::format;
use alloc::string::{String, ToString as _};
use core::fmt;

use chrono::{DateTime, Datelike as _, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned movie identifier.
///
/// The listing endpoint may send either a JSON string or a JSON integer; both
/// are normalized to their string form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    /// Creates an identifier from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Upload time of a record, normalized to UTC.
///
/// Accepts RFC 3339 (`2024-03-01T12:00:00Z`, `…+02:00`), naive ISO 8601
/// date-times as produced by Python's `isoformat()` (interpreted as UTC), and
/// bare dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTimestamp(NaiveDateTime);

impl UploadTimestamp {
    /// Parses a timestamp, returning `None` for unrecognized text.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self(dt.naive_utc()));
        }
        for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
                return Some(Self(naive));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(Self)
    }

    /// Returns the calendar day as `YYYY-MM-DD`.
    #[must_use]
    pub fn day(&self) -> String {
        let date = self.0.date();
        format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
    }

    /// Returns the underlying UTC date-time.
    #[must_use]
    pub const fn as_naive_utc(&self) -> NaiveDateTime {
        self.0
    }
}

impl<'de> Deserialize<'de> for UploadTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid upload_date `{text}`")))
    }
}

/// One entry of the movie listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MovieRecord {
    /// Server-assigned identifier.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Name of the file as uploaded.
    pub original_filename: String,
    /// File size in bytes.
    pub size: u64,
    /// When the file was uploaded.
    pub upload_date: UploadTimestamp,
    /// URL the asset can be fetched or streamed from.
    pub url: String,
    /// MIME type reported by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    /// Whether the browser can stream this asset natively.
    #[serde(default, deserialize_with = "null_as_default")]
    pub streamable: bool,
}

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MovieRecord {
    /// Returns the lower-cased text after the last `.` of the original
    /// filename, or the whole filename when it has no dot.
    #[must_use]
    pub fn extension(&self) -> String {
        self.original_filename
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Returns the upper-cased extension used as a format badge.
    #[must_use]
    pub fn format_label(&self) -> String {
        self.extension().to_uppercase()
    }
}

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count for display.
///
/// Uses base-1024 units up to TB with at most two decimals, trailing zeros
/// removed: `0 Bytes`, `1023 Bytes`, `1.5 KB`, `2 MB`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 Bytes");
    }

    let mut unit = 0;
    let mut scale = 1_u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= scale * 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    let mut text = format!("{value:.2}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    format!("{text} {}", SIZE_UNITS[unit])
}
