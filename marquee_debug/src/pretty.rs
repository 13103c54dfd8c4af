// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr), tagged with
//! the event family, e.g. `[phase] video-3: primary-active -> ...`.

use std::io::Write;

use marquee_core::error::ApiError;
use marquee_core::notice::Notice;
use marquee_core::trace::{
    DeleteEvent, LaunchEvent, LibraryEvent, ReleaseEvent, SignalEvent, TraceSink,
    TransitionEvent, UploadEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    stale: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            stale: true,
        }
    }

    /// Whether signals from disposed players are printed (default: yes).
    #[must_use]
    pub fn show_stale(mut self, stale: bool) -> Self {
        self.stale = stale;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_library(&mut self, e: &LibraryEvent) {
        let _ = writeln!(self.writer, "[library] {e}");
    }

    fn on_library_failed(&mut self, e: &ApiError) {
        let _ = writeln!(self.writer, "[library] load failed: {e} ({e:?})");
    }

    fn on_launch(&mut self, e: &LaunchEvent) {
        let _ = writeln!(self.writer, "[launch] {e}");
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(self.writer, "[phase] {e}");
    }

    fn on_player_signal(&mut self, e: &SignalEvent) {
        let _ = writeln!(self.writer, "[signal] {e}");
    }

    fn on_stale_signal(&mut self, e: &SignalEvent) {
        if self.stale {
            let _ = writeln!(self.writer, "[signal] stale {e}");
        }
    }

    fn on_handle_released(&mut self, e: &ReleaseEvent) {
        let _ = writeln!(self.writer, "[registry] {e}");
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        let _ = writeln!(self.writer, "[upload] {e}");
    }

    fn on_delete(&mut self, e: &DeleteEvent) {
        let _ = writeln!(self.writer, "[delete] {e}");
    }

    fn on_notice(&mut self, n: &Notice) {
        let _ = writeln!(self.writer, "[notice:{}] {n}", n.kind.class_name());
    }
}
