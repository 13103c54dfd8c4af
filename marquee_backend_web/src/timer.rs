// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot `setTimeout` timers that cancel on drop.

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so timers work
// without fetching (and unwrapping) the Window object.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, delay_ms: u32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// A pending `setTimeout` callback.
///
/// Dropping the `Timeout` clears the browser timer and releases the closure,
/// so the callback never runs after its owner is gone.
pub struct Timeout {
    id: i32,
    // Dropped after `clearTimeout`, never while the callback runs: callbacks
    // only enqueue work for the dispatcher.
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    /// Runs `callback` once after `delay_ms`.
    pub fn new(delay_ms: u32, callback: impl FnOnce() + 'static) -> Self {
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        let id = set_timeout(closure.as_ref().unchecked_ref(), delay_ms);
        Self {
            id,
            _closure: closure,
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        clear_timeout(self.id);
    }
}

impl core::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeout").field("id", &self.id).finish_non_exhaustive()
    }
}
