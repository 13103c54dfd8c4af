// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Marquee splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Presenter**: implements [`Presenter`] to turn view models into a
//!   platform tree (DOM elements in the browser).
//!
//! - **Host**: implements [`Host`] to issue requests, ask for confirmation,
//!   schedule timers, and start players.
//!
//! - **Event pump**: converts every platform callback (click, response,
//!   media event, timer) into a [`page::Input`](crate::page::Input) and feeds
//!   it to [`Page::handle`](crate::page::Page::handle). This is not
//!   abstracted by a trait because callback wiring differs fundamentally
//!   across platforms.
//!
//! Requests are fire-and-forget: the host reports their completion later as
//! an input. Nothing a host method does may call back into the page
//! synchronously.

use crate::api::DeleteRequest;
use crate::card::{CardKey, LibraryView};
use crate::error::PlaybackError;
use crate::notice::Notice;
use crate::player::{Launch, StageView};
use crate::registry::{AttemptId, PlayerHandle};
use crate::upload::{SelectedFile, UploadView};

/// A deferred input the page asked a host to deliver later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Due {
    /// Clear the notice of this generation.
    NoticeExpiry(u32),
    /// Run the readiness check for this attempt.
    Readiness(AttemptId),
}

/// Applies page view models to a platform-native tree.
///
/// Both the DOM presenter and test doubles implement this trait. Every method
/// treats a missing target element as a silent no-op.
pub trait Presenter {
    /// Replaces the movie list.
    fn show_library(&mut self, view: &LibraryView);

    /// Shows or hides a card's fallback panel.
    fn set_fallback_visible(&mut self, card: &CardKey, visible: bool);

    /// Replaces a card's player wrapper content with a status or failure
    /// message.
    fn show_stage(&mut self, card: &CardKey, view: &StageView);

    /// Shows a notice, or hides the slot for `None`.
    fn show_notice(&mut self, notice: Option<&Notice>);

    /// Updates the upload button and progress controls.
    fn show_upload(&mut self, view: &UploadView);

    /// Clears the upload form's file selection.
    fn reset_upload_form(&mut self);
}

/// Platform services the page drives.
pub trait Host: Presenter {
    /// Live player owned by the page's registry.
    type Player: PlayerHandle;
    /// Pending timer; dropping it cancels delivery.
    type Timer;

    /// Starts `GET url`; completion arrives as
    /// [`Input::ListLoaded`](crate::page::Input::ListLoaded).
    fn fetch_movies(&mut self, url: &str);

    /// Starts the multipart upload of `file`; progress and completion arrive
    /// as [`Input::UploadProgress`](crate::page::Input::UploadProgress) and
    /// [`Input::UploadFinished`](crate::page::Input::UploadFinished).
    fn send_upload(&mut self, url: &str, file: &SelectedFile);

    /// Starts `DELETE url`; completion arrives as
    /// [`Input::DeleteFinished`](crate::page::Input::DeleteFinished) carrying
    /// `request` back.
    fn send_delete(&mut self, url: &str, request: DeleteRequest);

    /// Blocks on a yes/no prompt.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Delivers [`Input::TimerFired`](crate::page::Input::TimerFired) with
    /// `due` after `delay_ms`, unless the returned timer is dropped first.
    fn schedule(&mut self, due: Due, delay_ms: u32) -> Self::Timer;

    /// Starts a player in the card's wrapper. Signals from it must be tagged
    /// with `attempt`.
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the strategy cannot start in this
    /// environment or the card is no longer in the tree.
    fn launch(&mut self, attempt: &AttemptId, launch: &Launch)
    -> Result<Self::Player, PlaybackError>;
}
