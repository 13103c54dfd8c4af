// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! video.js bindings and the player-library strategy.
//!
//! The library is loaded by the host page as a global `videojs` function; it
//! is not bundled.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use marquee_core::card::CardKey;
use marquee_core::error::PlaybackError;
use marquee_core::page::Input;
use marquee_core::player::{PlayerOptions, PlayerSignal};
use marquee_core::registry::AttemptId;
use marquee_core::strategy::Readiness;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, Event, HtmlElement};

use crate::dispatch::Emitter;
use crate::dom::{self, describe};
use crate::listener::Listener;

#[wasm_bindgen]
extern "C" {
    /// A video.js player instance.
    #[derive(Debug, Clone)]
    pub(crate) type VjsPlayer;

    #[wasm_bindgen(catch, js_name = "videojs")]
    fn videojs(id: &str, options: &JsValue) -> Result<VjsPlayer, JsValue>;

    #[wasm_bindgen(method)]
    fn ready(this: &VjsPlayer, callback: &JsValue);

    #[wasm_bindgen(method)]
    fn on(this: &VjsPlayer, event: &str, callback: &JsValue);

    #[wasm_bindgen(method)]
    fn error(this: &VjsPlayer) -> JsValue;

    #[wasm_bindgen(method, js_name = "readyState")]
    fn ready_state(this: &VjsPlayer) -> f64;

    #[wasm_bindgen(method)]
    fn paused(this: &VjsPlayer) -> bool;

    #[wasm_bindgen(method)]
    fn play(this: &VjsPlayer) -> JsValue;

    #[wasm_bindgen(method)]
    fn pause(this: &VjsPlayer);

    #[wasm_bindgen(method)]
    fn muted(this: &VjsPlayer, muted: bool);

    #[wasm_bindgen(method)]
    fn dispose(this: &VjsPlayer);
}

/// `readyState` at which metadata is available.
const HAVE_METADATA: f64 = 1.0;

/// A live video.js player.
pub(crate) struct VideoJsPlayer {
    player: VjsPlayer,
    _callbacks: Vec<Closure<dyn FnMut()>>,
    _click: Listener,
}

impl VideoJsPlayer {
    /// Builds a fresh `<video>` in the card's wrapper and hands it to the
    /// library.
    pub(crate) fn start(
        doc: &Document,
        attempt: &AttemptId,
        src: &str,
        mime: &str,
        options: &PlayerOptions,
        emit: &Emitter<Input>,
    ) -> Result<Self, PlaybackError> {
        let wrapper =
            dom::by_id(doc, &attempt.key.wrapper_id()).ok_or(PlaybackError::Detached)?;
        let options = options
            .to_json()
            .map_err(|e| PlaybackError::Player(e.to_string()))?;
        let options =
            js_sys::JSON::parse(&options).map_err(|e| PlaybackError::Player(describe(&e)))?;

        dom::clear(&wrapper);
        mount_video(doc, &wrapper, &attempt.key, src, mime)
            .map_err(|e| PlaybackError::Player(describe(&e)))?;
        let player = videojs(attempt.key.as_str(), &options)
            .map_err(|e| PlaybackError::Player(describe(&e)))?;

        let signal = |signal: fn(&VjsPlayer) -> PlayerSignal| {
            let emit = emit.clone();
            let attempt = attempt.clone();
            let source = player.clone();
            Closure::wrap(Box::new(move || {
                emit.emit(Input::Signal {
                    attempt: attempt.clone(),
                    signal: signal(&source),
                });
            }) as Box<dyn FnMut()>)
        };
        let ready = signal(|_| PlayerSignal::Ready);
        let metadata = signal(|_| PlayerSignal::MetadataLoaded);
        let failed = signal(|player| PlayerSignal::Failed(error_message(player)));
        player.ready(ready.as_ref());
        player.on("loadedmetadata", metadata.as_ref());
        player.on("error", failed.as_ref());

        let click = {
            let player = player.clone();
            Listener::new(&wrapper, "click", move |event: Event| {
                on_wrapper_click(&player, &event);
            })
            .map_err(|e| PlaybackError::Player(describe(&e)))?
        };

        Ok(Self {
            player,
            _callbacks: alloc::vec![ready, metadata, failed],
            _click: click,
        })
    }

    pub(crate) fn dispose(&mut self) {
        self.player.dispose();
    }

    pub(crate) fn readiness(&self) -> Readiness {
        let error = self.player.error();
        Readiness {
            errored: !(error.is_null() || error.is_undefined()),
            ready: self.player.ready_state() >= HAVE_METADATA,
        }
    }
}

impl core::fmt::Debug for VideoJsPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VideoJsPlayer").finish_non_exhaustive()
    }
}

fn mount_video(
    doc: &Document,
    wrapper: &HtmlElement,
    key: &CardKey,
    src: &str,
    mime: &str,
) -> Result<(), JsValue> {
    let video = dom::element(
        doc,
        "video",
        "video-js vjs-default-skin vjs-big-play-centered",
    )?;
    video.set_id(key.as_str());
    video.set_attribute("controls", "")?;
    video.set_attribute("preload", "auto")?;
    video.set_attribute("playsinline", "")?;

    let source = doc.create_element("source")?;
    source.set_attribute("src", src)?;
    if !mime.is_empty() {
        source.set_attribute("type", mime)?;
    }
    video.append_child(&source)?;
    wrapper.append_child(&video)?;
    Ok(())
}

fn error_message(player: &VjsPlayer) -> Option<String> {
    let error = player.error();
    if error.is_null() || error.is_undefined() {
        return None;
    }
    js_sys::Reflect::get(&error, &JsValue::from_str("message"))
        .ok()?
        .as_string()
        .filter(|message| !message.is_empty())
}

/// Clicks on the picture toggle playback; the control bar handles its own.
fn on_wrapper_click(player: &VjsPlayer, event: &Event) {
    let Some(target) = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
    else {
        return;
    };
    if dom::within(&target, ".vjs-control-bar") {
        return;
    }
    if dom::within(&target, ".vjs-big-play-button") {
        event.stop_propagation();
        play(player);
    } else if player.paused() {
        play(player);
    } else {
        player.pause();
    }
}

/// Plays, retrying once muted if the browser's autoplay policy refuses.
fn play(player: &VjsPlayer) {
    let Ok(promise) = player.play().dyn_into::<js_sys::Promise>() else {
        return;
    };
    let player = player.clone();
    spawn_local(async move {
        if JsFuture::from(promise).await.is_ok() {
            return;
        }
        player.muted(true);
        if let Ok(retry) = player.play().dyn_into::<js_sys::Promise>()
            && let Err(err) = JsFuture::from(retry).await
        {
            web_sys::console::error_1(&JsValue::from_str(&format!(
                "[marquee] muted play failed: {}",
                describe(&err)
            )));
        }
    });
}
