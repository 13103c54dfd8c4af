// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movie library page for the browser.
//!
//! Mounts the page on `#movies-container` of `index.html`, tracing to the
//! browser console. The server behind `/api/movies` is not part of this
//! workspace.
//!
//! Build with: `wasm-pack build --target web demos/movie_library`
//! Then serve `demos/movie_library/` next to the API and open `index.html`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;

use marquee_backend_web::{ConsoleSink, mount};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

/// Entry point for the movie library page.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("movies-container"))
        .ok_or_else(|| JsValue::from_str("#movies-container not found"))?
        .dyn_into::<HtmlElement>()?;

    let dispatcher = mount(root, Box::new(ConsoleSink::new()))?;
    core::mem::forget(dispatcher);
    Ok(())
}
