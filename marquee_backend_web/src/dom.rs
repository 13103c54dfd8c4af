// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small DOM construction helpers.

use alloc::format;
use alloc::string::String;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

/// Class toggled to hide an element.
pub(crate) const HIDDEN: &str = "hidden";

/// Creates `<tag class="class">`.
pub(crate) fn element(doc: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element(tag)?.unchecked_into();
    if !class.is_empty() {
        el.set_class_name(class);
    }
    Ok(el)
}

/// Creates `<tag class="class">text</tag>`.
pub(crate) fn text_element(
    doc: &Document,
    tag: &str,
    class: &str,
    text: &str,
) -> Result<HtmlElement, JsValue> {
    let el = element(doc, tag, class)?;
    el.set_text_content(Some(text));
    Ok(el)
}

/// Looks up an element by id.
pub(crate) fn by_id(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)?.dyn_into().ok()
}

/// Removes every child of `el`.
pub(crate) fn clear(el: &Element) {
    el.set_text_content(None);
}

/// Adds or removes the [`HIDDEN`] class.
pub(crate) fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force(HIDDEN, hidden);
}

/// Returns `true` if `target` or one of its ancestors matches `selector`.
pub(crate) fn within(target: &Element, selector: &str) -> bool {
    matches!(target.closest(selector), Ok(Some(_)))
}

/// The nearest ancestor-or-self of an event target matching `selector`.
pub(crate) fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
    target?.dyn_into::<Element>().ok()?.closest(selector).ok()?
}

/// Returns `true` if the global object has a property called `name`.
pub(crate) fn global_has(name: &str) -> bool {
    js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str(name)).unwrap_or(false)
}

/// Human-readable text for a thrown JavaScript value.
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return error.message().into();
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
