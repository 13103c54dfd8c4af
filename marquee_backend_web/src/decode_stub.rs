// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame-decoding placeholder.
//!
//! Only checks that `VideoDecoder` exists, then draws a [`Placard`] and a
//! Play button that asks the page to re-open the fallback panel. Nothing is
//! fetched or decoded.

use alloc::format;

use marquee_core::error::PlaybackError;
use marquee_core::page::Input;
use marquee_core::placard::Placard;
use marquee_core::player::PlayerSignal;
use marquee_core::registry::AttemptId;
use marquee_core::strategy::Readiness;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::dispatch::Emitter;
use crate::dom::{self, describe};
use crate::listener::Listener;

/// The placard canvas and its controls.
pub(crate) struct DecodeStubPlayer {
    controls: HtmlElement,
    _play: Listener,
}

impl DecodeStubPlayer {
    pub(crate) fn start(
        doc: &Document,
        attempt: &AttemptId,
        placard: &Placard,
        emit: &Emitter<Input>,
    ) -> Result<Self, PlaybackError> {
        if !dom::global_has("VideoDecoder") {
            return Err(PlaybackError::DecoderUnsupported);
        }
        let wrapper =
            dom::by_id(doc, &attempt.key.wrapper_id()).ok_or(PlaybackError::Detached)?;
        build(doc, &wrapper, attempt, placard, emit)
            .map_err(|e| PlaybackError::Player(describe(&e)))
    }

    pub(crate) fn dispose(&mut self) {
        self.controls.remove();
    }

    pub(crate) fn readiness(&self) -> Readiness {
        Readiness::READY
    }
}

impl core::fmt::Debug for DecodeStubPlayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DecodeStubPlayer").finish_non_exhaustive()
    }
}

fn build(
    doc: &Document,
    wrapper: &HtmlElement,
    attempt: &AttemptId,
    placard: &Placard,
    emit: &Emitter<Input>,
) -> Result<DecodeStubPlayer, JsValue> {
    let canvas: HtmlCanvasElement =
        dom::element(doc, "canvas", "webcodecs-canvas")?.unchecked_into();
    canvas.set_id(&format!("webcodecs-canvas-{}", attempt.key));
    canvas.set_width(placard.width_px());
    canvas.set_height(placard.height_px());
    let style = canvas.style();
    style.set_property("width", "100%")?;
    style.set_property("height", "auto")?;
    draw(&canvas, placard)?;

    let controls = dom::element(doc, "div", "webcodecs-controls")?;
    let play = dom::text_element(doc, "button", "play-btn", "Play")?;
    play.set_id(&format!("play-btn-{}", attempt.key));
    controls.append_child(&play)?;

    dom::clear(wrapper);
    wrapper.append_child(&canvas)?;
    wrapper.append_child(&controls)?;

    let play = {
        let emit = emit.clone();
        let attempt = attempt.clone();
        Listener::new(&play, "click", move |_| {
            emit.emit(Input::Signal {
                attempt: attempt.clone(),
                signal: PlayerSignal::ReopenRequested,
            });
        })?
    };

    Ok(DecodeStubPlayer {
        controls,
        _play: play,
    })
}

fn draw(canvas: &HtmlCanvasElement, placard: &Placard) -> Result<(), JsValue> {
    let Some(ctx) = canvas.get_context("2d")? else {
        return Err(JsValue::from_str("2d context unavailable"));
    };
    let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
    ctx.set_fill_style_str("black");
    ctx.fill_rect(0.0, 0.0, placard.size.width, placard.size.height);
    ctx.set_fill_style_str("white");
    ctx.set_font(placard.font);
    ctx.set_text_align("center");
    for line in &placard.lines {
        ctx.fill_text(line.text, line.anchor.x, line.anchor.y)?;
    }
    Ok(())
}
