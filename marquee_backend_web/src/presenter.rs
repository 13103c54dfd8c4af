// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM rendering of the page view models.
//!
//! Cards are built element by element with `createElement` and
//! `textContent`; server-supplied strings never pass through an HTML parser.
//!
//! The presenter expects this markup in the host page:
//!
//! | id               | role                                         |
//! |------------------|----------------------------------------------|
//! | `movies-container` | movie list (the mount root)                |
//! | `upload-form`    | upload `<form>`                              |
//! | `movie-file`     | `<input type="file">`                        |
//! | `upload-btn`     | submit button                                |
//! | `upload-progress`| progress panel, containing a `.progress` bar |
//! | `upload-message` | notice slot                                  |
//!
//! Any of them except the list may be missing; the corresponding updates are
//! skipped.

use alloc::format;

use marquee_core::backend::Presenter;
use marquee_core::card::{CardKey, CardView, DownloadLink, LibraryView, MediaView};
use marquee_core::notice::Notice;
use marquee_core::player::StageView;
use marquee_core::strategy::Alternative;
use marquee_core::upload::UploadView;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlAnchorElement, HtmlButtonElement, HtmlElement, HtmlFormElement,
};

use crate::console;
use crate::dom::{self, by_id, element, text_element};

/// Applies view models to the page's DOM.
pub struct DomPresenter {
    doc: Document,
    library: HtmlElement,
    form: Option<HtmlFormElement>,
    upload_button: Option<HtmlButtonElement>,
    progress_panel: Option<HtmlElement>,
    progress_bar: Option<HtmlElement>,
    notice: Option<HtmlElement>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("library", &self.library.id())
            .field("has_form", &self.form.is_some())
            .field("has_notice", &self.notice.is_some())
            .finish_non_exhaustive()
    }
}

impl DomPresenter {
    /// Creates a presenter rendering the movie list into `library`.
    ///
    /// # Errors
    ///
    /// Fails if `library` is not attached to a document.
    pub fn new(library: HtmlElement) -> Result<Self, JsValue> {
        let doc = library
            .owner_document()
            .ok_or_else(|| JsValue::from_str("movie list is not in a document"))?;
        let progress_panel = by_id(&doc, "upload-progress");
        let progress_bar = progress_panel
            .as_ref()
            .and_then(|panel| panel.query_selector(".progress").ok().flatten())
            .and_then(|bar| bar.dyn_into().ok());
        Ok(Self {
            form: doc
                .get_element_by_id("upload-form")
                .and_then(|el| el.dyn_into().ok()),
            upload_button: doc
                .get_element_by_id("upload-btn")
                .and_then(|el| el.dyn_into().ok()),
            notice: by_id(&doc, "upload-message"),
            progress_panel,
            progress_bar,
            library,
            doc,
        })
    }

    /// The movie list element.
    #[must_use]
    pub fn library(&self) -> &HtmlElement {
        &self.library
    }

    /// The upload form, if present.
    #[must_use]
    pub fn form(&self) -> Option<&HtmlFormElement> {
        self.form.as_ref()
    }

    /// The owning document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    fn render_library(&self, view: &LibraryView) -> Result<(), JsValue> {
        dom::clear(&self.library);
        match view {
            LibraryView::Cards(cards) => {
                for card in cards {
                    self.library.append_child(&self.card(card)?)?;
                }
            }
            LibraryView::Empty => {
                self.library
                    .append_child(&text_element(&self.doc, "p", "", LibraryView::EMPTY_TEXT)?)?;
            }
            LibraryView::LoadFailed => {
                self.library.append_child(&text_element(
                    &self.doc,
                    "p",
                    "error",
                    LibraryView::LOAD_FAILED_TEXT,
                )?)?;
            }
        }
        Ok(())
    }

    fn card(&self, card: &CardView) -> Result<HtmlElement, JsValue> {
        let doc = &self.doc;
        let root = element(doc, "div", "movie-card")?;
        root.set_attribute("data-id", card.id.as_str())?;

        let container = match &card.media {
            MediaView::Fallback { .. } => {
                let container = element(doc, "div", "video-container")?;
                container.append_child(&self.wrapper(&card.key)?)?;
                container.append_child(&self.fallback_panel(card)?)?;
                container
            }
            MediaView::Direct { .. } => {
                let container = element(doc, "div", "video-container")?;
                container.append_child(&self.wrapper(&card.key)?)?;
                container
            }
            MediaView::Placeholder => {
                let container = element(doc, "div", "video-container non-streamable")?;
                let placeholder = element(doc, "div", "placeholder")?;
                placeholder.append_child(&text_element(
                    doc,
                    "div",
                    "file-icon",
                    &card.format_label,
                )?)?;
                placeholder.append_child(&text_element(
                    doc,
                    "p",
                    "",
                    &format!(
                        "This {} file cannot be played directly in the browser",
                        card.format_label
                    ),
                )?)?;
                placeholder.append_child(&self.link(
                    &card.download,
                    "download-link",
                    "Download to watch offline",
                )?)?;
                container.append_child(&placeholder)?;
                container
            }
        };
        root.append_child(&container)?;
        root.append_child(&self.info(card)?)?;
        Ok(root)
    }

    fn wrapper(&self, key: &CardKey) -> Result<HtmlElement, JsValue> {
        let wrapper = element(&self.doc, "div", "video-wrapper")?;
        wrapper.set_id(&key.wrapper_id());
        Ok(wrapper)
    }

    fn fallback_panel(&self, card: &CardView) -> Result<HtmlElement, JsValue> {
        let doc = &self.doc;
        let panel = element(doc, "div", "mkv-fallback")?;
        panel.set_id(&card.key.fallback_id());
        dom::set_hidden(&panel, true);
        panel.append_child(&text_element(doc, "div", "file-icon", &card.format_label)?)?;
        panel.append_child(&text_element(
            doc,
            "p",
            "",
            "Alternative MKV playback options:",
        )?)?;

        let options = element(doc, "div", "player-options")?;
        for alternative in Alternative::ALL {
            let button =
                text_element(doc, "button", alternative.class_name(), alternative.label())?;
            button.set_attribute("type", "button")?;
            button.set_attribute("data-id", card.id.as_str())?;
            options.append_child(&button)?;
        }
        options.append_child(&self.link(
            &card.download,
            "download-link",
            "Download to watch offline",
        )?)?;
        panel.append_child(&options)?;
        Ok(panel)
    }

    fn info(&self, card: &CardView) -> Result<HtmlElement, JsValue> {
        let doc = &self.doc;
        let info = element(doc, "div", "movie-info")?;
        info.append_child(&text_element(doc, "h3", "movie-title", &card.title)?)?;

        let details = element(doc, "div", "movie-details")?;
        for line in [
            format!("Size: {}", card.size),
            format!("Uploaded: {}", card.uploaded),
            format!("Format: {}", card.format_label),
        ] {
            details.append_child(&text_element(doc, "div", "", &line)?)?;
        }
        info.append_child(&details)?;

        let actions = element(doc, "div", "movie-actions")?;
        let delete = text_element(doc, "button", "delete-btn", "Delete")?;
        delete.set_attribute("type", "button")?;
        delete.set_attribute("data-id", card.id.as_str())?;
        actions.append_child(&delete)?;
        actions.append_child(&self.link(&card.download, "download-btn", "Download")?)?;
        info.append_child(&actions)?;
        Ok(info)
    }

    fn link(&self, target: &DownloadLink, class: &str, text: &str) -> Result<HtmlElement, JsValue> {
        let link = text_element(&self.doc, "a", class, text)?;
        let anchor: &HtmlAnchorElement = link.unchecked_ref();
        anchor.set_href(&target.href);
        anchor.set_download(&target.filename);
        Ok(link)
    }

    fn render_stage(&self, wrapper: &HtmlElement, view: &StageView) -> Result<(), JsValue> {
        let (class, text) = match view {
            StageView::Status(text) => ("loading", text),
            StageView::Failure(text) => ("error", text),
        };
        dom::clear(wrapper);
        wrapper.append_child(&text_element(&self.doc, "div", class, text)?)?;
        Ok(())
    }
}

impl Presenter for DomPresenter {
    fn show_library(&mut self, view: &LibraryView) {
        if let Err(err) = self.render_library(view) {
            console::error("failed to render the movie list", &err);
        }
    }

    fn set_fallback_visible(&mut self, card: &CardKey, visible: bool) {
        if let Some(panel) = by_id(&self.doc, &card.fallback_id()) {
            dom::set_hidden(&panel, !visible);
        }
    }

    fn show_stage(&mut self, card: &CardKey, view: &StageView) {
        let Some(wrapper) = by_id(&self.doc, &card.wrapper_id()) else {
            return;
        };
        if let Err(err) = self.render_stage(&wrapper, view) {
            console::error("failed to update the player area", &err);
        }
    }

    fn show_notice(&mut self, notice: Option<&Notice>) {
        let Some(slot) = &self.notice else {
            return;
        };
        match notice {
            Some(notice) => {
                slot.set_text_content(Some(&notice.text));
                slot.set_class_name(notice.kind.class_name());
            }
            None => {
                slot.set_text_content(None);
                slot.set_class_name("");
            }
        }
    }

    fn show_upload(&mut self, view: &UploadView) {
        if let Some(button) = &self.upload_button {
            button.set_disabled(view.is_busy());
        }
        if let Some(panel) = &self.progress_panel {
            dom::set_hidden(panel, !view.is_busy());
        }
        if let Some(bar) = &self.progress_bar {
            let _ = bar.style().set_property("width", &view.bar_width());
            bar.set_text_content(Some(&view.label()));
        }
    }

    fn reset_upload_form(&mut self) {
        if let Some(form) = &self.form {
            form.reset();
        }
    }
}
