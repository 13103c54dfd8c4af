// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `fetch` and `XMLHttpRequest` plumbing.
//!
//! Replies are handed to the page as raw [`HttpReply`] values; validation
//! happens in the core.

use alloc::string::String;

use js_sys::ArrayBuffer;
use marquee_core::api::HttpReply;
use marquee_core::error::ApiError;
use marquee_core::page::Input;
use marquee_core::upload::UploadProgress;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Event, File, FormData, ProgressEvent, Request, RequestInit, Response, XmlHttpRequest,
};

use crate::dispatch::Emitter;
use crate::dom::describe;
use crate::listener::Listener;

fn transport(err: JsValue) -> ApiError {
    ApiError::Transport(describe(&err))
}

async fn fetch(method: &str, url: &str) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let init = RequestInit::new();
    init.set_method(method);
    let request = Request::new_with_str_and_init(url, &init)?;
    JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
}

/// Issues `method url` and reads the body as text.
///
/// Any status is a reply; only a failed exchange is an error.
pub(crate) async fn request(method: &str, url: &str) -> Result<HttpReply, ApiError> {
    let response = fetch(method, url).await.map_err(transport)?;
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    Ok(HttpReply::new(
        response.status(),
        text.as_string().unwrap_or_default(),
    ))
}

/// Downloads `url` in full.
///
/// The error is the reason shown on the card.
pub(crate) async fn fetch_bytes(url: &str) -> Result<ArrayBuffer, String> {
    const FAILED: &str = "Failed to fetch MKV file";
    let response = fetch("GET", url).await.map_err(|_| String::from(FAILED))?;
    if !response.ok() {
        return Err(FAILED.into());
    }
    let body = response.array_buffer().map_err(|e| describe(&e))?;
    JsFuture::from(body)
        .await
        .map_err(|e| describe(&e))?
        .dyn_into()
        .map_err(|e| describe(&e))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "progress counters are whole byte counts well below 2^53"
)]
pub(crate) fn byte_count(value: f64) -> u64 {
    value.max(0.0) as u64
}

/// A multipart upload in flight.
///
/// Dropping it aborts nothing but unregisters every callback, so the page
/// hears no more from it.
pub(crate) struct Upload {
    _progress: Listener,
    _load: Listener,
    _error: Listener,
}

impl Upload {
    /// Posts `file` as the `movie` field of a multipart form.
    pub(crate) fn send(url: &str, file: &File, emit: &Emitter<Input>) -> Result<Self, JsValue> {
        let form = FormData::new()?;
        form.append_with_blob_and_filename("movie", file, &file.name())?;
        let xhr = XmlHttpRequest::new()?;

        let progress = {
            let emit = emit.clone();
            Listener::new(&xhr.upload()?, "progress", move |event: Event| {
                let Some(event) = event.dyn_ref::<ProgressEvent>() else {
                    return;
                };
                emit.emit(Input::UploadProgress(UploadProgress {
                    loaded: byte_count(event.loaded()),
                    total: event
                        .length_computable()
                        .then(|| byte_count(event.total())),
                }));
            })?
        };

        let load = {
            let emit = emit.clone();
            Listener::new(&xhr, "load", move |event: Event| {
                let Some(xhr) = event
                    .target()
                    .and_then(|target| target.dyn_into::<XmlHttpRequest>().ok())
                else {
                    return;
                };
                let reply = HttpReply::new(
                    xhr.status().unwrap_or(0),
                    xhr.response_text().ok().flatten().unwrap_or_default(),
                );
                emit.emit(Input::UploadFinished(Ok(reply)));
            })?
        };

        let error = {
            let emit = emit.clone();
            Listener::new(&xhr, "error", move |_| {
                emit.emit(Input::UploadFinished(Err(ApiError::Transport(
                    "request failed".into(),
                ))));
            })?
        };

        xhr.open("POST", url)?;
        xhr.send_with_opt_form_data(Some(&form))?;

        Ok(Self {
            _progress: progress,
            _load: load,
            _error: error,
        })
    }
}

impl core::fmt::Debug for Upload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Upload").finish_non_exhaustive()
    }
}
