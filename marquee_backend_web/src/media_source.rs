// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-asset buffering through Media Source Extensions.
//!
//! The asset is downloaded in full and appended to a single source buffer as
//! one chunk. The source-buffer type is negotiated by trial: each candidate
//! that `MediaSource.isTypeSupported` accepts is passed to `addSourceBuffer`
//! until one succeeds. There is no demuxing, so only files whose bytes the
//! browser accepts as-is will play.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::{Cell, RefCell};

use js_sys::ArrayBuffer;
use marquee_core::error::PlaybackError;
use marquee_core::page::Input;
use marquee_core::player::PlayerSignal;
use marquee_core::registry::AttemptId;
use marquee_core::strategy::Readiness;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    Document, HtmlMediaElement, HtmlVideoElement, MediaSource, MediaSourceReadyState, SourceBuffer,
    Url,
};

use crate::console;
use crate::dispatch::Emitter;
use crate::dom::{self, describe};
use crate::http;
use crate::listener::Listener;

/// Shared between the handle and the asynchronous feed.
struct Feed {
    attempt: AttemptId,
    src: String,
    codecs: &'static [&'static str],
    media_source: MediaSource,
    video: HtmlVideoElement,
    emit: Emitter<Input>,
    disposed: Cell<bool>,
    update_end: RefCell<Option<Listener>>,
}

impl Feed {
    fn signal(&self, signal: PlayerSignal) {
        if !self.disposed.get() {
            self.emit.emit(Input::Signal {
                attempt: self.attempt.clone(),
                signal,
            });
        }
    }

    async fn run(self: Rc<Self>) {
        let bytes = match http::fetch_bytes(&self.src).await {
            Ok(bytes) => bytes,
            Err(reason) => return self.signal(PlayerSignal::Failed(Some(reason))),
        };
        if self.disposed.get() {
            return;
        }
        let Some(buffer) = self.negotiate() else {
            return self.signal(PlayerSignal::Failed(Some(
                "Unsupported codec format in MKV file".into(),
            )));
        };
        if let Err(reason) = self.append(&buffer, &bytes) {
            self.signal(PlayerSignal::Failed(Some(reason)));
        }
    }

    fn negotiate(&self) -> Option<SourceBuffer> {
        self.codecs
            .iter()
            .filter(|codec| MediaSource::is_type_supported(codec))
            .find_map(|codec| self.media_source.add_source_buffer(codec).ok())
    }

    fn append(self: &Rc<Self>, buffer: &SourceBuffer, bytes: &ArrayBuffer) -> Result<(), String> {
        let feed = Rc::clone(self);
        let listener = Listener::new(buffer, "updateend", move |_| feed.finish())
            .map_err(|e| describe(&e))?;
        *self.update_end.borrow_mut() = Some(listener);
        buffer
            .append_buffer_with_array_buffer(bytes)
            .map_err(|e| describe(&e))
    }

    /// The single append landed: end the stream and start playback.
    fn finish(&self) {
        if self.disposed.get() || self.media_source.ready_state() != MediaSourceReadyState::Open {
            return;
        }
        if let Err(err) = self.media_source.end_of_stream() {
            return self.signal(PlayerSignal::Failed(Some(describe(&err))));
        }
        if let Ok(promise) = self.video.play() {
            spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    console::error("play failed", &err);
                }
            });
        }
        self.signal(PlayerSignal::BufferingComplete);
    }
}

/// A `<video>` fed by a `MediaSource`.
pub(crate) struct MediaSourcePlayer {
    feed: Rc<Feed>,
    url: String,
    _source_open: Listener,
    _video_error: Listener,
}

impl MediaSourcePlayer {
    pub(crate) fn start(
        doc: &Document,
        attempt: &AttemptId,
        src: &str,
        codecs: &'static [&'static str],
        emit: &Emitter<Input>,
    ) -> Result<Self, PlaybackError> {
        if !dom::global_has("MediaSource") {
            return Err(PlaybackError::MediaSourceUnsupported);
        }
        let wrapper =
            dom::by_id(doc, &attempt.key.wrapper_id()).ok_or(PlaybackError::Detached)?;
        let failed = |e: JsValue| PlaybackError::MediaSource(describe(&e));

        let media_source = MediaSource::new().map_err(failed)?;
        let url = Url::create_object_url_with_source(&media_source).map_err(failed)?;
        let video: HtmlVideoElement = dom::element(doc, "video", "mse-video")
            .map_err(failed)?
            .unchecked_into();
        video.set_id(&format!("mse-{}", attempt.key));
        video.set_controls(true);
        let style = video.style();
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "auto");
        video.set_src(&url);

        dom::clear(&wrapper);
        wrapper.append_child(&video).map_err(failed)?;

        let feed = Rc::new(Feed {
            attempt: attempt.clone(),
            src: src.into(),
            codecs,
            media_source: media_source.clone(),
            video: video.clone(),
            emit: emit.clone(),
            disposed: Cell::new(false),
            update_end: RefCell::new(None),
        });

        let source_open = {
            let feed = Rc::clone(&feed);
            let started = Cell::new(false);
            Listener::new(&media_source, "sourceopen", move |_| {
                if !started.replace(true) {
                    spawn_local(Rc::clone(&feed).run());
                }
            })
            .map_err(failed)?
        };
        let video_error = {
            let feed = Rc::clone(&feed);
            Listener::new(&video, "error", move |_| {
                feed.signal(PlayerSignal::Failed(None));
            })
            .map_err(failed)?
        };

        Ok(Self {
            feed,
            url,
            _source_open: source_open,
            _video_error: video_error,
        })
    }

    pub(crate) fn dispose(&mut self) {
        self.feed.disposed.set(true);
        self.feed.update_end.borrow_mut().take();
        let _ = self.feed.video.pause();
        let _ = self.feed.video.remove_attribute("src");
        let _ = Url::revoke_object_url(&self.url);
    }

    pub(crate) fn readiness(&self) -> Readiness {
        Readiness {
            errored: false,
            ready: self.feed.video.ready_state() >= HtmlMediaElement::HAVE_METADATA,
        }
    }
}

impl core::fmt::Debug for MediaSourcePlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaSourcePlayer")
            .field("attempt", &self.feed.attempt)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
