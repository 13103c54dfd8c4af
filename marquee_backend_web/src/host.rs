// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The browser [`Host`] and page wiring.

use alloc::borrow::ToOwned as _;
use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use marquee_core::api::DeleteRequest;
use marquee_core::backend::{Due, Host, Presenter};
use marquee_core::card::{CardKey, LibraryView};
use marquee_core::error::{ApiError, PlaybackError};
use marquee_core::movie::MovieId;
use marquee_core::notice::Notice;
use marquee_core::page::{Input, Page};
use marquee_core::player::{Launch, StageView};
use marquee_core::registry::AttemptId;
use marquee_core::strategy::Alternative;
use marquee_core::trace::TraceSink;
use marquee_core::upload::{SelectedFile, UploadView};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, File, HtmlElement, HtmlInputElement};

use crate::config::config_from_element;
use crate::decode_stub::DecodeStubPlayer;
use crate::dispatch::{Dispatcher, Emitter, Handler};
use crate::dom::{self, describe};
use crate::http::{self, Upload, byte_count};
use crate::listener::Listener;
use crate::media_source::MediaSourcePlayer;
use crate::player::WebPlayer;
use crate::presenter::DomPresenter;
use crate::timer::Timeout;
use crate::videojs::VideoJsPlayer;

/// Browser services for the page: requests, prompts, timers, and players.
///
/// Every callback it registers reports back through its [`Emitter`].
pub struct WebHost {
    presenter: DomPresenter,
    emit: Emitter<Input>,
    file_input: Option<HtmlInputElement>,
    upload: Option<Upload>,
    listeners: Vec<Listener>,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("presenter", &self.presenter)
            .field("uploading", &self.upload.is_some())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    /// Creates a host rendering through `presenter` and reporting to `emit`.
    #[must_use]
    pub fn new(presenter: DomPresenter, emit: Emitter<Input>) -> Self {
        let file_input = presenter
            .document()
            .get_element_by_id("movie-file")
            .and_then(|el| el.dyn_into().ok());
        Self {
            presenter,
            emit,
            file_input,
            upload: None,
            listeners: Vec::new(),
        }
    }

    /// Registers the page's user-facing listeners: upload submit, clicks in
    /// the movie list, and `beforeunload`.
    ///
    /// # Errors
    ///
    /// Propagates `addEventListener` failures.
    pub fn bind(&mut self) -> Result<(), JsValue> {
        if let Some(form) = self.presenter.form() {
            let emit = self.emit.clone();
            let input = self.file_input.clone();
            self.listeners.push(Listener::new(form, "submit", move |event: Event| {
                event.prevent_default();
                emit.emit(Input::SubmitUpload(
                    input.as_ref().and_then(selected_file).map(|file| describe_file(&file)),
                ));
            })?);
        }

        let emit = self.emit.clone();
        self.listeners.push(Listener::new(
            self.presenter.library(),
            "click",
            move |event: Event| {
                if let Some(input) = library_click(&event) {
                    emit.emit(input);
                }
            },
        )?);

        if let Some(window) = web_sys::window() {
            let emit = self.emit.clone();
            self.listeners
                .push(Listener::new(&window, "beforeunload", move |_| {
                    emit.emit(Input::Unload);
                })?);
        }
        Ok(())
    }

    fn finish_upload(&mut self) {
        self.upload = None;
    }
}

fn selected_file(input: &HtmlInputElement) -> Option<File> {
    input.files()?.get(0)
}

fn describe_file(file: &File) -> SelectedFile {
    SelectedFile {
        name: file.name(),
        size: byte_count(file.size()),
    }
}

/// Maps a click inside the movie list to an input by the button's class and
/// `data-id`.
fn library_click(event: &Event) -> Option<Input> {
    if let Some(button) = dom::closest(event.target(), ".delete-btn") {
        let id = button.get_attribute("data-id")?;
        return Some(Input::DeleteClicked(MovieId::new(id)));
    }
    Alternative::ALL.into_iter().find_map(|alternative| {
        let button = dom::closest(event.target(), &format!(".{}", alternative.class_name()))?;
        let id = MovieId::new(button.get_attribute("data-id")?);
        Some(Input::Choose {
            card: CardKey::for_movie(&id),
            alternative,
        })
    })
}

impl Presenter for WebHost {
    fn show_library(&mut self, view: &LibraryView) {
        self.presenter.show_library(view);
    }

    fn set_fallback_visible(&mut self, card: &CardKey, visible: bool) {
        self.presenter.set_fallback_visible(card, visible);
    }

    fn show_stage(&mut self, card: &CardKey, view: &StageView) {
        self.presenter.show_stage(card, view);
    }

    fn show_notice(&mut self, notice: Option<&Notice>) {
        self.presenter.show_notice(notice);
    }

    fn show_upload(&mut self, view: &UploadView) {
        self.presenter.show_upload(view);
    }

    fn reset_upload_form(&mut self) {
        self.presenter.reset_upload_form();
    }
}

impl Host for WebHost {
    type Player = WebPlayer;
    type Timer = Timeout;

    fn fetch_movies(&mut self, url: &str) {
        let emit = self.emit.clone();
        let url = url.to_owned();
        spawn_local(async move {
            emit.emit(Input::ListLoaded(http::request("GET", &url).await));
        });
    }

    fn send_upload(&mut self, url: &str, _file: &SelectedFile) {
        let Some(file) = self.file_input.as_ref().and_then(selected_file) else {
            self.emit.emit(Input::UploadFinished(Err(ApiError::Transport(
                "file selection was cleared".into(),
            ))));
            return;
        };
        match Upload::send(url, &file, &self.emit) {
            Ok(upload) => self.upload = Some(upload),
            Err(err) => self
                .emit
                .emit(Input::UploadFinished(Err(ApiError::Transport(describe(&err))))),
        }
    }

    fn send_delete(&mut self, url: &str, request: DeleteRequest) {
        let emit = self.emit.clone();
        let url = url.to_owned();
        spawn_local(async move {
            let reply = http::request("DELETE", &url).await;
            emit.emit(Input::DeleteFinished { request, reply });
        });
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }

    fn schedule(&mut self, due: Due, delay_ms: u32) -> Timeout {
        let emit = self.emit.clone();
        Timeout::new(delay_ms, move || emit.emit(Input::TimerFired(due)))
    }

    fn launch(&mut self, attempt: &AttemptId, launch: &Launch) -> Result<WebPlayer, PlaybackError> {
        let doc = self.presenter.document();
        match launch {
            Launch::Player {
                strategy,
                src,
                mime,
                options,
            } => VideoJsPlayer::start(doc, attempt, src, mime, options, &self.emit)
                .map(|player| WebPlayer::video_js(*strategy, player)),
            Launch::MediaSource { src, codecs } => {
                MediaSourcePlayer::start(doc, attempt, src, *codecs, &self.emit)
                    .map(WebPlayer::media_source)
            }
            Launch::DecodeStub { placard } => {
                DecodeStubPlayer::start(doc, attempt, placard, &self.emit)
                    .map(WebPlayer::decode_stub)
            }
        }
    }
}

/// Feeds queued inputs to the page.
#[derive(Debug)]
pub struct PageDriver {
    page: Page<WebHost>,
    host: WebHost,
}

impl PageDriver {
    /// Pairs a page with the host it drives.
    #[must_use]
    pub fn new(page: Page<WebHost>, host: WebHost) -> Self {
        Self { page, host }
    }

    /// The page controller.
    #[must_use]
    pub fn page(&self) -> &Page<WebHost> {
        &self.page
    }
}

impl Handler for PageDriver {
    type Input = Input;

    fn handle(&mut self, input: Input) {
        let settles_upload = matches!(input, Input::UploadFinished(_));
        self.page.handle(input, &mut self.host);
        if settles_upload {
            self.host.finish_upload();
        }
    }
}

/// Mounts the movie library on `root`, the movie list element.
///
/// Reads configuration from `root`'s `data-*` attributes, binds the page's
/// listeners, and queues the initial load. The page lives as long as the
/// returned dispatcher; callers normally leak it with `core::mem::forget`.
///
/// # Errors
///
/// Fails if `root` is detached or a listener cannot be registered.
pub fn mount(
    root: HtmlElement,
    sink: Box<dyn TraceSink>,
) -> Result<Dispatcher<PageDriver>, JsValue> {
    let config = config_from_element(&root);
    let dispatcher = Dispatcher::new();
    let mut host = WebHost::new(DomPresenter::new(root)?, dispatcher.emitter());
    host.bind()?;
    dispatcher.install(PageDriver::new(Page::with_sink(config, sink), host));
    dispatcher.send(Input::Mount);
    Ok(dispatcher)
}
