// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console diagnostics.

use alloc::format;

use marquee_core::error::ApiError;
use marquee_core::notice::{Notice, NoticeKind};
use marquee_core::trace::{
    DeleteEvent, LaunchEvent, LibraryEvent, ReleaseEvent, SignalEvent, TraceSink,
    TransitionEvent, UploadEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

const PREFIX: &str = "[marquee]";

fn log(line: &str) {
    console::log_1(&JsValue::from_str(&format!("{PREFIX} {line}")));
}

fn fail(line: &str) {
    console::error_1(&JsValue::from_str(&format!("{PREFIX} {line}")));
}

/// Logs a browser failure the page cannot act on.
pub(crate) fn error(context: &str, err: &JsValue) {
    console::error_2(&JsValue::from_str(&format!("{PREFIX} {context}:")), err);
}

/// A [`TraceSink`] writing one console line per event.
///
/// Failures go to `console.error`, everything else to `console.log`. Signals
/// from disposed players are only logged when `verbose` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log stale signals and every live player signal.
    pub verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink that logs state changes and failures.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }
}

impl TraceSink for ConsoleSink {
    fn on_library(&mut self, e: &LibraryEvent) {
        log(&format!("{e}"));
    }

    fn on_library_failed(&mut self, e: &ApiError) {
        fail(&format!("error loading movies: {e} ({e:?})"));
    }

    fn on_launch(&mut self, e: &LaunchEvent) {
        if e.error.is_some() {
            fail(&format!("{e}"));
        } else {
            log(&format!("{e}"));
        }
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        log(&format!("{e}"));
    }

    fn on_player_signal(&mut self, e: &SignalEvent) {
        if self.verbose {
            log(&format!("{e}"));
        }
    }

    fn on_stale_signal(&mut self, e: &SignalEvent) {
        if self.verbose {
            log(&format!("stale {e}"));
        }
    }

    fn on_handle_released(&mut self, e: &ReleaseEvent) {
        log(&format!("{e}"));
    }

    fn on_upload(&mut self, e: &UploadEvent) {
        match e {
            UploadEvent::Failed { .. } => fail(&format!("{e}")),
            _ => log(&format!("{e}")),
        }
    }

    fn on_delete(&mut self, e: &DeleteEvent) {
        match e {
            DeleteEvent::Failed { .. } => fail(&format!("{e}")),
            _ => log(&format!("{e}")),
        }
    }

    fn on_notice(&mut self, n: &Notice) {
        if n.kind == NoticeKind::Error {
            fail(&format!("notice: {n}"));
        }
    }
}
