// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient success and error notices.

use alloc::format;
use alloc::string::String;
use core::fmt;

use serde::Serialize;

use crate::error::ApiError;

/// Notice severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeKind {
    /// Operation succeeded.
    Success,
    /// Operation failed or input was rejected.
    Error,
}

impl NoticeKind {
    /// CSS class applied to the notice element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A user-visible message in the notice slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Message text.
    pub text: String,
}

impl Notice {
    /// Success notice.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Submit pressed with no file selected.
    #[must_use]
    pub fn no_file_selected() -> Self {
        Self::error("Please select a file to upload.")
    }

    /// `Successfully uploaded: {title}`.
    #[must_use]
    pub fn uploaded(title: &str) -> Self {
        Self::success(format!("Successfully uploaded: {title}"))
    }

    /// `Upload failed: {reason}`.
    #[must_use]
    pub fn upload_failed(error: &ApiError) -> Self {
        Self::error(format!("Upload failed: {error}"))
    }

    /// `Successfully deleted: {title}`.
    #[must_use]
    pub fn deleted(title: &str) -> Self {
        Self::success(format!("Successfully deleted: {title}"))
    }

    /// `Delete failed: {reason}`.
    #[must_use]
    pub fn delete_failed(error: &ApiError) -> Self {
        Self::error(format!("Delete failed: {error}"))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The single notice slot and its dismiss timer.
///
/// Each shown notice gets a new generation. Replacing a notice drops (and so
/// cancels) the previous dismiss timer, and [`expire`](Self::expire) ignores
/// generations other than the current one.
#[derive(Debug)]
pub struct NoticeBoard<T> {
    current: Option<Notice>,
    generation: u32,
    timer: Option<T>,
}

impl<T> NoticeBoard<T> {
    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            generation: 0,
            timer: None,
        }
    }

    /// Makes `notice` current and returns its generation.
    ///
    /// The previous dismiss timer is cancelled; the caller schedules the new
    /// one and hands it to [`set_timer`](Self::set_timer).
    pub fn show(&mut self, notice: Notice) -> u32 {
        self.timer = None;
        self.generation = self.generation.wrapping_add(1);
        self.current = Some(notice);
        self.generation
    }

    /// Stores the dismiss timer for the current generation.
    pub fn set_timer(&mut self, generation: u32, timer: T) {
        if generation == self.generation {
            self.timer = Some(timer);
        }
    }

    /// Clears the notice if `generation` is still current.
    ///
    /// Returns `true` if the notice was cleared.
    pub fn expire(&mut self, generation: u32) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.timer = None;
        self.current = None;
        true
    }

    /// Drops the notice and cancels its timer.
    pub fn clear(&mut self) {
        self.timer = None;
        self.current = None;
    }

    /// The visible notice.
    #[must_use]
    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

impl<T> Default for NoticeBoard<T> {
    fn default() -> Self {
        Self::new()
    }
}
