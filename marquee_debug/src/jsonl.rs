// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines event recording.
//!
//! [`JsonLinesSink`] writes each event as one JSON object per line:
//!
//! ```text
//! {"event":"transition","card":"video-3","from":"primary-active",...}
//! ```
//!
//! The `event` field names the [`TraceSink`] method; the remaining fields are
//! the event's own serialization, flattened.

use std::io::Write;

use marquee_core::error::ApiError;
use marquee_core::notice::Notice;
use marquee_core::trace::{
    DeleteEvent, LaunchEvent, LibraryEvent, ReleaseEvent, SignalEvent, TraceSink,
    TransitionEvent, UploadEvent,
};
use serde::Serialize;

#[derive(Serialize)]
struct Line<'a, T: Serialize> {
    event: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct Failure<'a> {
    error: &'a ApiError,
}

/// Records events as JSON lines.
pub struct JsonLinesSink<W: Write = Vec<u8>> {
    writer: W,
    lines: usize,
    errors: usize,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("lines", &self.lines)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl JsonLinesSink {
    /// Creates a sink that records into memory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Vec::new())
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.writer
    }
}

impl Default for JsonLinesSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            errors: 0,
        }
    }

    /// Number of lines written.
    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of events that could not be written.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn record<T: Serialize>(&mut self, event: &str, body: &T) {
        let line = Line { event, body };
        let written = serde_json::to_writer(&mut self.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        match written {
            Ok(()) => self.lines += 1,
            Err(_) => self.errors += 1,
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_library(&mut self, e: &LibraryEvent) {
        self.record("library", e);
    }

    fn on_library_failed(&mut self, e: &ApiError) {
        self.record("library-failed", &Failure { error: e });
    }

    fn on_launch(&mut self, e: &LaunchEvent) {
        self.record("launch", e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.record("transition", e);
    }

    fn on_player_signal(&mut self, e: &SignalEvent) {
        self.record("signal", e);
    }

    fn on_stale_signal(&mut self, e: &SignalEvent) {
        self.record("stale-signal", e);
    }

    fn on_handle_released(&mut self, e: &ReleaseEvent) {
        self.record("release", e);
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        self.record("upload", e);
    }

    fn on_delete(&mut self, e: &DeleteEvent) {
        self.record("delete", e);
    }

    fn on_notice(&mut self, n: &Notice) {
        self.record("notice", n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::card::CardKey;
    use marquee_core::movie::MovieId;
    use marquee_core::strategy::{CardPhase, Strategy, StrategyEvent};

    fn lines(sink: &JsonLinesSink) -> Vec<serde_json::Value> {
        std::str::from_utf8(sink.as_bytes())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn one_object_per_event() {
        let mut sink = JsonLinesSink::new();
        sink.on_transition(&TransitionEvent {
            card: CardKey::for_movie(&MovieId::new("3")),
            from: CardPhase::PrimaryActive,
            to: CardPhase::FallbackOffered(Strategy::Primary),
            cause: StrategyEvent::Failed,
        });
        sink.on_library_failed(&ApiError::Status(500));

        assert_eq!(sink.lines(), 2);
        let lines = lines(&sink);
        assert_eq!(lines[0]["event"], "transition");
        assert_eq!(lines[0]["card"], "video-3");
        assert_eq!(lines[0]["cause"]["event"], "failed");
        assert_eq!(lines[1]["event"], "library-failed");
        assert_eq!(lines[1]["error"]["kind"], "status");
        assert_eq!(lines[1]["error"]["detail"], 500);
    }

    #[test]
    fn tagged_enums_flatten() {
        let mut sink = JsonLinesSink::new();
        sink.on_delete(&DeleteEvent::Requested {
            id: MovieId::new("7"),
        });
        let lines = lines(&sink);
        assert_eq!(lines[0]["event"], "delete");
        assert_eq!(lines[0]["delete"], "requested");
        assert_eq!(lines[0]["id"], "7");
    }
}
