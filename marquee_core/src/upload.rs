// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Upload form state and progress reporting.

use alloc::format;
use alloc::string::String;

use serde::Serialize;

/// The file chosen in the upload form.
///
/// The backend keeps the browser `File` itself; the page only needs enough to
/// describe the upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    /// File name as reported by the browser.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// A transfer progress sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total bytes, when the length is computable.
    pub total: Option<u64>,
}

impl UploadProgress {
    /// Fraction transmitted in percent, clamped to `0.0..=100.0`.
    ///
    /// `None` when the total is unknown or zero.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        let total = self.total.filter(|&t| t > 0)?;
        let ratio = self.loaded as f64 / total as f64;
        Some((ratio * 100.0).clamp(0.0, 100.0))
    }

    /// Percent transmitted rounded half up to a whole number, at most 100.
    #[must_use]
    pub fn whole_percent(&self) -> Option<u8> {
        let total = self.total.filter(|&t| t > 0)?;
        let scaled = self.loaded.saturating_mul(100).saturating_add(total / 2) / total;
        Some(u8::try_from(scaled.min(100)).unwrap_or(100))
    }

    /// The in-flight view for this sample, if the length is computable.
    #[must_use]
    pub fn view(&self) -> Option<UploadView> {
        Some(UploadView::InFlight {
            percent: self.percent()?,
            whole: self.whole_percent()?,
        })
    }
}

/// State of the upload controls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum UploadView {
    /// Button enabled, progress hidden.
    Idle,
    /// Button disabled, progress shown.
    InFlight {
        /// Percentage transmitted; `0.0` until the first computable sample.
        percent: f64,
        /// `percent` rounded to a whole number.
        whole: u8,
    },
}

impl UploadView {
    /// Request sent, nothing reported yet.
    pub const STARTED: Self = Self::InFlight {
        percent: 0.0,
        whole: 0,
    };

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// Progress bar width, e.g. `42.50%`.
    #[must_use]
    pub fn bar_width(&self) -> String {
        match self {
            Self::Idle => String::from("0%"),
            Self::InFlight { percent, .. } => format!("{percent:.2}%"),
        }
    }

    /// Progress label, rounded to a whole percent, e.g. `43%`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Idle => String::from("0%"),
            Self::InFlight { whole, .. } => format!("{whole}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_a_total() {
        let unknown = UploadProgress {
            loaded: 10,
            total: None,
        };
        assert_eq!(unknown.percent(), None);

        let empty = UploadProgress {
            loaded: 0,
            total: Some(0),
        };
        assert_eq!(empty.percent(), None);
    }

    #[test]
    fn labels() {
        let sample = UploadProgress {
            loaded: 425,
            total: Some(1000),
        };
        let view = sample.view().unwrap();
        assert_eq!(view.bar_width(), "42.50%");
        assert_eq!(view.label(), "43%");
        assert!(view.is_busy());

        let done = UploadProgress {
            loaded: 1000,
            total: Some(1000),
        };
        assert_eq!(done.view().unwrap().label(), "100%");
        assert!(!UploadView::Idle.is_busy());
    }

    #[test]
    fn overshoot_is_clamped() {
        let sample = UploadProgress {
            loaded: 1200,
            total: Some(1000),
        };
        assert_eq!(sample.percent(), Some(100.0));
        assert_eq!(sample.whole_percent(), Some(100));
    }
}
