// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The movie library page controller.
//!
//! [`Page`] owns the rendered cards, their playback phases, the player
//! registry, the notice slot, and the upload controls. A backend feeds it one
//! [`Input`] at a time; handling an input runs to completion and talks to the
//! platform only through the [`Host`] it is given.
//!
//! # Event turn
//!
//! ```rust,ignore
//! fn on_browser_callback(input: Input) {
//!     // Runs outside the callback that produced `input`, one at a time.
//!     page.handle(input, &mut host);
//! }
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString as _;
use alloc::vec::Vec;
use core::fmt;

use crate::api::{
    DeleteRequest, HttpReply, parse_delete_reply, parse_movie_list, parse_upload_reply,
};
use crate::backend::{Due, Host};
use crate::card::{CardKey, CardView, LibraryView, PlaybackPath, build_library};
use crate::config::PageConfig;
use crate::error::{ApiError, PlaybackError};
use crate::movie::MovieId;
use crate::notice::{Notice, NoticeBoard};
use crate::placard::Placard;
use crate::player::{Launch, PlayerOptions, PlayerSignal, StageView};
use crate::registry::{AttemptId, PlayerHandle as _, PlayerRegistry};
use crate::strategy::{Alternative, CardPhase, Strategy, StrategyEvent};
use crate::trace::{
    DeleteEvent, LaunchEvent, LibraryEvent, NoopSink, ReleaseEvent, ReleaseReason, SignalEvent,
    TraceSink, TransitionEvent, UploadEvent,
};
use crate::upload::{SelectedFile, UploadProgress, UploadView};

/// Everything that can happen to the page.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// The page finished loading.
    Mount,
    /// Reload the movie list.
    Refresh,
    /// The movie list request completed.
    ListLoaded(Result<HttpReply, ApiError>),
    /// The upload form was submitted, with the selected file if any.
    SubmitUpload(Option<SelectedFile>),
    /// Upload bytes were transmitted.
    UploadProgress(UploadProgress),
    /// The upload request completed.
    UploadFinished(Result<HttpReply, ApiError>),
    /// A card's delete button was clicked.
    DeleteClicked(MovieId),
    /// A delete request completed.
    DeleteFinished {
        /// The request as sent.
        request: DeleteRequest,
        /// The reply.
        reply: Result<HttpReply, ApiError>,
    },
    /// A player reported something.
    Signal {
        /// Attempt the player was started for.
        attempt: AttemptId,
        /// What happened.
        signal: PlayerSignal,
    },
    /// A fallback panel button was clicked.
    Choose {
        /// Card whose panel was clicked.
        card: CardKey,
        /// Button pressed.
        alternative: Alternative,
    },
    /// A scheduled timer elapsed.
    TimerFired(Due),
    /// The page is being unloaded.
    Unload,
}

#[derive(Debug)]
struct CardSlot {
    view: CardView,
    /// Only fallback-path cards run the strategy state machine.
    phase: Option<CardPhase>,
}

/// The page controller.
///
/// Generic over the backend's [`Host`] so the same controller drives the
/// browser and test doubles.
pub struct Page<H: Host> {
    config: PageConfig,
    cards: Vec<CardSlot>,
    players: PlayerRegistry<H::Player, H::Timer>,
    notices: NoticeBoard<H::Timer>,
    upload: UploadView,
    sink: Box<dyn TraceSink>,
}

impl<H: Host> fmt::Debug for Page<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("config", &self.config)
            .field("cards", &self.cards)
            .field("live_players", &self.players.len())
            .field("upload", &self.upload)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Page<H> {
    /// Creates a page that discards diagnostics.
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        Self::with_sink(config, Box::new(NoopSink))
    }

    /// Creates a page reporting to `sink`.
    #[must_use]
    pub fn with_sink(config: PageConfig, sink: Box<dyn TraceSink>) -> Self {
        Self {
            config,
            cards: Vec::new(),
            players: PlayerRegistry::new(),
            notices: NoticeBoard::new(),
            upload: UploadView::Idle,
            sink,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Number of live player handles.
    #[must_use]
    pub fn live_players(&self) -> usize {
        self.players.len()
    }

    /// Rendered cards in display order.
    pub fn cards(&self) -> impl Iterator<Item = &CardView> {
        self.cards.iter().map(|slot| &slot.view)
    }

    /// Playback phase of a fallback-path card.
    #[must_use]
    pub fn phase(&self, card: &CardKey) -> Option<CardPhase> {
        self.slot(card).and_then(|slot| slot.phase)
    }

    /// The visible notice.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// State of the upload controls.
    #[must_use]
    pub fn upload(&self) -> UploadView {
        self.upload
    }

    /// Handles one input.
    pub fn handle(&mut self, input: Input, host: &mut H) {
        match input {
            Input::Mount => {
                host.show_upload(&self.upload);
                host.fetch_movies(&self.config.movies_url());
            }
            Input::Refresh => host.fetch_movies(&self.config.movies_url()),
            Input::ListLoaded(reply) => self.list_loaded(reply, host),
            Input::SubmitUpload(file) => self.submit_upload(file, host),
            Input::UploadProgress(progress) => {
                if self.upload.is_busy()
                    && let Some(view) = progress.view()
                {
                    self.upload = view;
                    host.show_upload(&self.upload);
                }
            }
            Input::UploadFinished(reply) => self.upload_finished(reply, host),
            Input::DeleteClicked(id) => self.delete_clicked(id, host),
            Input::DeleteFinished { request, reply } => self.delete_finished(request, reply, host),
            Input::Signal { attempt, signal } => self.signal(attempt, signal, host),
            Input::Choose { card, alternative } => self.choose(&card, alternative, host),
            Input::TimerFired(Due::NoticeExpiry(generation)) => {
                if self.notices.expire(generation) {
                    host.show_notice(None);
                }
            }
            Input::TimerFired(Due::Readiness(attempt)) => self.check_readiness(&attempt, host),
            Input::Unload => {
                self.release_all(ReleaseReason::Unload);
                self.notices.clear();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Library
    // -----------------------------------------------------------------------

    fn list_loaded(&mut self, reply: Result<HttpReply, ApiError>, host: &mut H) {
        match reply.and_then(|reply| parse_movie_list(&reply)) {
            Ok(movies) => {
                let view = build_library(movies, &self.config);
                self.render(&view, host);
            }
            Err(error) => {
                self.release_all(ReleaseReason::Rerender);
                self.cards.clear();
                host.show_library(&LibraryView::LoadFailed);
                self.sink.on_library_failed(&error);
            }
        }
    }

    fn render(&mut self, view: &LibraryView, host: &mut H) {
        let released = self.release_all(ReleaseReason::Rerender);
        let mut event = LibraryEvent {
            cards: view.cards().len(),
            released,
            ..LibraryEvent::default()
        };

        self.cards = view
            .cards()
            .iter()
            .map(|card| CardSlot {
                view: card.clone(),
                phase: (card.path() == PlaybackPath::Fallback).then_some(CardPhase::PrimaryActive),
            })
            .collect();
        host.show_library(view);

        for card in view.cards() {
            match card.path() {
                PlaybackPath::Fallback => event.fallback += 1,
                PlaybackPath::Direct => event.direct += 1,
                PlaybackPath::Placeholder => {
                    event.placeholder += 1;
                    continue;
                }
            }
            if let Err(error) = self.start(&card.key, Strategy::Primary, host) {
                self.report_failure(&card.key, &error, false, host);
            }
        }

        self.sink.on_library(&event);
    }

    // -----------------------------------------------------------------------
    // Playback
    // -----------------------------------------------------------------------

    /// Disposes the card's current handle, then starts `strategy`.
    fn start(
        &mut self,
        key: &CardKey,
        strategy: Strategy,
        host: &mut H,
    ) -> Result<(), PlaybackError> {
        let slot = self.slot(key).ok_or(PlaybackError::Detached)?;
        let (src, mime) = slot.view.media.source().ok_or(PlaybackError::Detached)?;
        let watch = slot.phase.is_some() && strategy.uses_player_library();
        let launch = match PlayerOptions::for_strategy(strategy) {
            Some(options) => Launch::Player {
                strategy,
                src: src.into(),
                mime: mime.into(),
                options,
            },
            None if strategy == Strategy::MediaSource => Launch::MediaSource {
                src: src.into(),
                codecs: self.config.mse_codec_candidates,
            },
            None => Launch::DecodeStub {
                placard: Placard::default(),
            },
        };

        if let Some(previous) = self.players.release(key) {
            self.sink.on_handle_released(&ReleaseEvent {
                attempt: previous,
                reason: ReleaseReason::Replaced,
            });
        }

        let attempt = self.players.next_attempt(key);
        let result = host.launch(&attempt, &launch);
        self.sink.on_launch(&LaunchEvent {
            attempt: attempt.clone(),
            strategy,
            error: result.as_ref().err().cloned(),
        });
        let player = result?;
        self.players.replace(attempt.clone(), player);

        if watch {
            let timer = host.schedule(
                Due::Readiness(attempt.clone()),
                self.config.readiness_timeout_ms,
            );
            self.players.attach_timer(&attempt, timer);
        }
        Ok(())
    }

    fn choose(&mut self, card: &CardKey, alternative: Alternative, host: &mut H) {
        if self
            .apply(card, StrategyEvent::Chosen(alternative), host)
            .is_none()
        {
            return;
        }
        host.show_stage(card, &StageView::Status(alternative.status_text().into()));
        if let Err(error) = self.start(card, alternative.strategy(), host) {
            self.report_failure(card, &error, true, host);
        }
    }

    fn signal(&mut self, attempt: AttemptId, signal: PlayerSignal, host: &mut H) {
        let event = SignalEvent { attempt, signal };
        if !self.players.is_current(&event.attempt) {
            self.sink.on_stale_signal(&event);
            return;
        }
        self.sink.on_player_signal(&event);

        let SignalEvent { attempt, signal } = event;
        let Some(strategy_event) = signal.strategy_event() else {
            return;
        };
        if let PlayerSignal::Failed(reason) = &signal {
            self.players.clear_timer(&attempt);
            if let Some(reason) = reason
                && self.phase(&attempt.key) == Some(CardPhase::MseActive)
            {
                let error = PlaybackError::MediaSource(reason.clone());
                host.show_stage(&attempt.key, &StageView::Failure(error.to_string()));
            }
        }
        self.apply(&attempt.key, strategy_event, host);
    }

    fn check_readiness(&mut self, attempt: &AttemptId, host: &mut H) {
        self.players.clear_timer(attempt);
        let Some(readiness) = self.players.get(attempt).map(|player| player.readiness()) else {
            return;
        };
        self.apply(
            &attempt.key,
            StrategyEvent::ReadinessChecked(readiness),
            host,
        );
    }

    fn report_failure(
        &mut self,
        card: &CardKey,
        error: &PlaybackError,
        on_stage: bool,
        host: &mut H,
    ) {
        if !error.is_reportable() {
            return;
        }
        if on_stage {
            host.show_stage(card, &StageView::Failure(error.to_string()));
        }
        self.apply(card, StrategyEvent::Failed, host);
    }

    /// Runs the state machine for `card`, syncing the panel on change.
    fn apply(
        &mut self,
        card: &CardKey,
        event: StrategyEvent,
        host: &mut H,
    ) -> Option<CardPhase> {
        let slot = self.cards.iter_mut().find(|slot| slot.view.key == *card)?;
        let from = slot.phase?;
        let to = from.on(event)?;
        slot.phase = Some(to);

        if from.offers_fallback() != to.offers_fallback() {
            host.set_fallback_visible(card, to.offers_fallback());
        }
        self.sink.on_transition(&TransitionEvent {
            card: card.clone(),
            from,
            to,
            cause: event,
        });
        Some(to)
    }

    fn release_all(&mut self, reason: ReleaseReason) -> usize {
        let released = self.players.release_all();
        for attempt in &released {
            self.sink.on_handle_released(&ReleaseEvent {
                attempt: attempt.clone(),
                reason,
            });
        }
        released.len()
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    fn submit_upload(&mut self, file: Option<SelectedFile>, host: &mut H) {
        if self.upload.is_busy() {
            self.sink.on_upload(&UploadEvent::Ignored);
            return;
        }
        let Some(file) = file else {
            self.sink.on_upload(&UploadEvent::Rejected);
            self.notify(Notice::no_file_selected(), host);
            return;
        };

        self.upload = UploadView::STARTED;
        host.show_upload(&self.upload);
        host.send_upload(&self.config.upload_url(), &file);
        self.sink.on_upload(&UploadEvent::Started {
            name: file.name,
            size: file.size,
        });
    }

    fn upload_finished(&mut self, reply: Result<HttpReply, ApiError>, host: &mut H) {
        if !self.upload.is_busy() {
            return;
        }
        self.upload = UploadView::Idle;
        host.show_upload(&self.upload);

        match reply.and_then(|reply| parse_upload_reply(&reply)) {
            Ok(title) => {
                self.notify(Notice::uploaded(&title), host);
                host.reset_upload_form();
                host.fetch_movies(&self.config.movies_url());
                self.sink.on_upload(&UploadEvent::Succeeded { title });
            }
            Err(error) => {
                self.notify(Notice::upload_failed(&error), host);
                self.sink.on_upload(&UploadEvent::Failed { error });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    fn delete_clicked(&mut self, id: MovieId, host: &mut H) {
        let Some(title) = self
            .cards
            .iter()
            .find(|slot| slot.view.id == id)
            .map(|slot| slot.view.title.clone())
        else {
            return;
        };

        if !host.confirm(&format!("Are you sure you want to delete \"{title}\"?")) {
            self.sink.on_delete(&DeleteEvent::Declined { id });
            return;
        }
        host.send_delete(
            &self.config.movie_url(&id),
            DeleteRequest {
                id: id.clone(),
                title,
            },
        );
        self.sink.on_delete(&DeleteEvent::Requested { id });
    }

    fn delete_finished(
        &mut self,
        request: DeleteRequest,
        reply: Result<HttpReply, ApiError>,
        host: &mut H,
    ) {
        match reply.and_then(|reply| parse_delete_reply(&reply)) {
            Ok(_) => {
                if let Some(attempt) = self.players.release(&CardKey::for_movie(&request.id)) {
                    self.sink.on_handle_released(&ReleaseEvent {
                        attempt,
                        reason: ReleaseReason::Deleted,
                    });
                }
                self.notify(Notice::deleted(&request.title), host);
                host.fetch_movies(&self.config.movies_url());
                self.sink.on_delete(&DeleteEvent::Succeeded { id: request.id });
            }
            Err(error) => {
                self.notify(Notice::delete_failed(&error), host);
                self.sink.on_delete(&DeleteEvent::Failed {
                    id: request.id,
                    error,
                });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn notify(&mut self, notice: Notice, host: &mut H) {
        host.show_notice(Some(&notice));
        self.sink.on_notice(&notice);
        let generation = self.notices.show(notice);
        let timer = host.schedule(
            Due::NoticeExpiry(generation),
            self.config.notice_dismiss_ms,
        );
        self.notices.set_timer(generation, timer);
    }

    fn slot(&self, card: &CardKey) -> Option<&CardSlot> {
        self.cards.iter().find(|slot| slot.view.key == *card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::Cell;

    use crate::backend::Presenter;
    use crate::registry::PlayerHandle;
    use crate::registry::tests::DropFlag;
    use crate::strategy::Readiness;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    #[derive(Debug)]
    struct FakePlayer {
        disposed: Rc<Cell<bool>>,
        readiness: Rc<Cell<Readiness>>,
    }

    impl PlayerHandle for FakePlayer {
        fn dispose(&mut self) {
            assert!(!self.disposed.get(), "disposed twice");
            self.disposed.set(true);
        }

        fn readiness(&self) -> Readiness {
            self.readiness.get()
        }
    }

    #[derive(Debug)]
    struct Started {
        attempt: AttemptId,
        strategy: Strategy,
        disposed: Rc<Cell<bool>>,
        readiness: Rc<Cell<Readiness>>,
        /// Every earlier player on the same card was disposed before this
        /// one was launched.
        prior_disposed: bool,
    }

    #[derive(Debug, Default)]
    struct RecordingHost {
        library: Option<LibraryView>,
        panels: BTreeMap<CardKey, bool>,
        panel_shown: usize,
        stages: Vec<(CardKey, StageView)>,
        notice: Option<Notice>,
        uploads: Vec<UploadView>,
        form_resets: usize,
        fetches: Vec<String>,
        upload_requests: Vec<(String, SelectedFile)>,
        delete_requests: Vec<(String, DeleteRequest)>,
        prompts: Vec<String>,
        decline: bool,
        timers: Vec<(Due, u32, Rc<Cell<bool>>)>,
        started: Vec<Started>,
        unsupported: Vec<Strategy>,
    }

    impl RecordingHost {
        fn live(&self) -> usize {
            self.started.iter().filter(|s| !s.disposed.get()).count()
        }

        fn last_for(&self, key: &CardKey) -> &Started {
            self.started
                .iter()
                .rev()
                .find(|s| s.attempt.key == *key)
                .expect("no player started for card")
        }

        fn readiness_timer(&self, attempt: &AttemptId) -> Rc<Cell<bool>> {
            self.timers
                .iter()
                .find(|(due, _, _)| *due == Due::Readiness(attempt.clone()))
                .map(|(_, _, cancelled)| Rc::clone(cancelled))
                .expect("no readiness timer")
        }

        fn panel_visible(&self, key: &CardKey) -> bool {
            self.panels.get(key).copied().unwrap_or(false)
        }

        fn rendered_ids(&self) -> Vec<&str> {
            self.library
                .as_ref()
                .map(|view| view.cards().iter().map(|c| c.id.as_str()).collect())
                .unwrap_or_default()
        }
    }

    impl Presenter for RecordingHost {
        fn show_library(&mut self, view: &LibraryView) {
            self.library = Some(view.clone());
            self.panels.clear();
        }

        fn set_fallback_visible(&mut self, card: &CardKey, visible: bool) {
            if visible {
                self.panel_shown += 1;
            }
            self.panels.insert(card.clone(), visible);
        }

        fn show_stage(&mut self, card: &CardKey, view: &StageView) {
            self.stages.push((card.clone(), view.clone()));
        }

        fn show_notice(&mut self, notice: Option<&Notice>) {
            self.notice = notice.cloned();
        }

        fn show_upload(&mut self, view: &UploadView) {
            self.uploads.push(*view);
        }

        fn reset_upload_form(&mut self) {
            self.form_resets += 1;
        }
    }

    impl Host for RecordingHost {
        type Player = FakePlayer;
        type Timer = DropFlag;

        fn fetch_movies(&mut self, url: &str) {
            self.fetches.push(url.into());
        }

        fn send_upload(&mut self, url: &str, file: &SelectedFile) {
            self.upload_requests.push((url.into(), file.clone()));
        }

        fn send_delete(&mut self, url: &str, request: DeleteRequest) {
            self.delete_requests.push((url.into(), request));
        }

        fn confirm(&mut self, prompt: &str) -> bool {
            self.prompts.push(prompt.into());
            !self.decline
        }

        fn schedule(&mut self, due: Due, delay_ms: u32) -> DropFlag {
            let cancelled = Rc::new(Cell::new(false));
            self.timers.push((due, delay_ms, Rc::clone(&cancelled)));
            DropFlag(cancelled)
        }

        fn launch(
            &mut self,
            attempt: &AttemptId,
            launch: &Launch,
        ) -> Result<FakePlayer, PlaybackError> {
            let strategy = launch.strategy();
            if self.unsupported.contains(&strategy) {
                return Err(match strategy {
                    Strategy::MediaSource => PlaybackError::MediaSourceUnsupported,
                    Strategy::DecodeStub => PlaybackError::DecoderUnsupported,
                    _ => PlaybackError::Player("videojs is not defined".into()),
                });
            }
            let prior_disposed = self
                .started
                .iter()
                .filter(|s| s.attempt.key == attempt.key)
                .all(|s| s.disposed.get());
            let disposed = Rc::new(Cell::new(false));
            let readiness = Rc::new(Cell::new(Readiness::READY));
            self.started.push(Started {
                attempt: attempt.clone(),
                strategy,
                disposed: Rc::clone(&disposed),
                readiness: Rc::clone(&readiness),
                prior_disposed,
            });
            Ok(FakePlayer {
                disposed,
                readiness,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    fn record(id: &str, filename: &str, date: &str, streamable: bool) -> String {
        format!(
            r#"{{"id": "{id}", "title": "Movie {id}", "original_filename": "{filename}",
                "size": 1048576, "upload_date": "{date}", "url": "/media/{filename}",
                "mime_type": "", "streamable": {streamable}}}"#
        )
    }

    fn listing(records: &[String]) -> Input {
        Input::ListLoaded(Ok(HttpReply::new(200, format!("[{}]", records.join(",")))))
    }

    fn key(id: &str) -> CardKey {
        CardKey::for_movie(&MovieId::new(id))
    }

    /// One fallback card (`m`), one direct card (`d`), one placeholder (`p`).
    fn mounted() -> (Page<RecordingHost>, RecordingHost) {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost::default();
        page.handle(Input::Mount, &mut host);
        page.handle(
            listing(&[
                record("m", "m.mkv", "2024-03-01T00:00:00", false),
                record("d", "d.mp4", "2024-02-01T00:00:00", true),
                record("p", "p.avi", "2024-01-01T00:00:00", false),
            ]),
            &mut host,
        );
        (page, host)
    }

    fn fire_readiness(page: &mut Page<RecordingHost>, host: &mut RecordingHost, card: &str) {
        let attempt = host.last_for(&key(card)).attempt.clone();
        page.handle(Input::TimerFired(Due::Readiness(attempt)), host);
    }

    fn signal(page: &mut Page<RecordingHost>, host: &mut RecordingHost, card: &str, s: PlayerSignal) {
        let attempt = host.last_for(&key(card)).attempt.clone();
        page.handle(Input::Signal { attempt, signal: s }, host);
    }

    fn choose(page: &mut Page<RecordingHost>, host: &mut RecordingHost, alternative: Alternative) {
        page.handle(
            Input::Choose {
                card: key("m"),
                alternative,
            },
            host,
        );
    }

    // -----------------------------------------------------------------------
    // Library
    // -----------------------------------------------------------------------

    #[test]
    fn mount_fetches_the_listing() {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost::default();
        page.handle(Input::Mount, &mut host);
        assert_eq!(host.fetches, ["/api/movies"]);
        assert_eq!(host.uploads, [UploadView::Idle]);
    }

    #[test]
    fn newer_upload_is_rendered_first() {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost::default();
        page.handle(
            listing(&[
                record("t1", "a.mp4", "2024-01-01T10:00:00", true),
                record("t2", "b.mp4", "2024-01-02T10:00:00", true),
            ]),
            &mut host,
        );
        assert_eq!(host.rendered_ids(), ["t2", "t1"]);
        let ids: Vec<_> = page.cards().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["t2", "t1"]);
    }

    #[test]
    fn playable_cards_get_players() {
        let (page, host) = mounted();
        let launched: Vec<_> = host
            .started
            .iter()
            .map(|s| (s.attempt.key.as_str(), s.strategy))
            .collect();
        assert_eq!(
            launched,
            [
                ("video-m", Strategy::Primary),
                ("video-d", Strategy::Primary)
            ]
        );
        assert_eq!(page.live_players(), 2);
        assert_eq!(page.phase(&key("m")), Some(CardPhase::PrimaryActive));
        assert_eq!(page.phase(&key("d")), None, "direct cards have no panel");
        assert_eq!(page.phase(&key("p")), None);
    }

    #[test]
    fn only_fallback_cards_get_a_readiness_check() {
        let (_page, host) = mounted();
        let readiness: Vec<_> = host
            .timers
            .iter()
            .filter_map(|(due, delay, _)| match due {
                Due::Readiness(attempt) => Some((attempt.key.as_str(), *delay)),
                Due::NoticeExpiry(_) => None,
            })
            .collect();
        assert_eq!(readiness, [("video-m", 3_000)]);
    }

    #[test]
    fn refresh_releases_previous_players() {
        let (mut page, mut host) = mounted();
        let first: Vec<_> = host.started.iter().map(|s| Rc::clone(&s.disposed)).collect();
        let first_timer = host.readiness_timer(&host.last_for(&key("m")).attempt.clone());

        page.handle(
            listing(&[record("d", "d.mp4", "2024-02-01T00:00:00", true)]),
            &mut host,
        );

        assert!(first.iter().all(|d| d.get()), "every old handle disposed");
        assert!(first_timer.get(), "old readiness check cancelled");
        assert_eq!(page.live_players(), 1);
        assert_eq!(host.live(), 1);
    }

    #[test]
    fn live_handles_never_exceed_playable_cards() {
        let (mut page, mut host) = mounted();
        let playable = 2;
        for alternative in [
            Alternative::RetryPrimary,
            Alternative::MediaSource,
            Alternative::DecodeStub,
        ] {
            signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
            choose(&mut page, &mut host, alternative);
            assert!(page.live_players() <= playable);
            assert!(host.live() <= playable);
            assert!(host.started.iter().all(|s| s.prior_disposed));
        }
        page.handle(Input::Refresh, &mut host);
        page.handle(
            listing(&[record("m", "m.mkv", "2024-03-01T00:00:00", false)]),
            &mut host,
        );
        assert_eq!(host.live(), 1);
    }

    #[test]
    fn list_failure_shows_error_state() {
        let (mut page, mut host) = mounted();
        page.handle(
            Input::ListLoaded(Err(ApiError::Transport("offline".into()))),
            &mut host,
        );
        assert_eq!(host.library, Some(LibraryView::LoadFailed));
        assert_eq!(page.live_players(), 0);
        assert_eq!(host.live(), 0);
        assert_eq!(page.cards().count(), 0);
    }

    #[test]
    fn malformed_listing_is_a_failure() {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost::default();
        page.handle(
            Input::ListLoaded(Ok(HttpReply::new(200, r#"{"error": "db down"}"#))),
            &mut host,
        );
        assert_eq!(host.library, Some(LibraryView::LoadFailed));
    }

    #[test]
    fn empty_listing() {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost::default();
        page.handle(listing(&[]), &mut host);
        assert_eq!(host.library, Some(LibraryView::Empty));
        assert!(host.started.is_empty());
    }

    // -----------------------------------------------------------------------
    // Fallback state machine
    // -----------------------------------------------------------------------

    #[test]
    fn ready_player_keeps_panel_hidden() {
        let (mut page, mut host) = mounted();
        fire_readiness(&mut page, &mut host, "m");
        assert_eq!(
            page.phase(&key("m")),
            Some(CardPhase::ConfirmedPlaying(Strategy::Primary))
        );
        assert!(!host.panel_visible(&key("m")));
        assert_eq!(host.panel_shown, 0);
    }

    #[test]
    fn metadata_then_passing_check_never_shows_panel() {
        let (mut page, mut host) = mounted();
        signal(&mut page, &mut host, "m", PlayerSignal::MetadataLoaded);
        fire_readiness(&mut page, &mut host, "m");
        assert_eq!(host.panel_shown, 0);
        assert_eq!(
            page.phase(&key("m")),
            Some(CardPhase::ConfirmedPlaying(Strategy::Primary))
        );
    }

    #[test]
    fn player_not_ready_by_check_shows_panel() {
        let (mut page, mut host) = mounted();
        host.last_for(&key("m")).readiness.set(Readiness {
            errored: false,
            ready: false,
        });
        fire_readiness(&mut page, &mut host, "m");
        assert!(host.panel_visible(&key("m")));
        assert!(page.phase(&key("m")).unwrap().offers_fallback());
    }

    #[test]
    fn player_error_shows_panel() {
        let (mut page, mut host) = mounted();
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        assert!(host.panel_visible(&key("m")));

        // The check that follows an error leaves the panel up.
        fire_readiness(&mut page, &mut host, "m");
        assert!(host.panel_visible(&key("m")));
    }

    #[test]
    fn primary_launch_failure_shows_panel() {
        let mut page = Page::new(PageConfig::web());
        let mut host = RecordingHost {
            unsupported: vec![Strategy::Primary],
            ..RecordingHost::default()
        };
        page.handle(
            listing(&[
                record("m", "m.mkv", "2024-03-01T00:00:00", false),
                record("d", "d.mp4", "2024-02-01T00:00:00", true),
            ]),
            &mut host,
        );
        assert!(host.panel_visible(&key("m")));
        assert!(!host.panel_visible(&key("d")));
        assert_eq!(page.live_players(), 0);
        assert!(host.stages.is_empty());
    }

    #[test]
    fn retry_disposes_then_launches_with_its_own_check() {
        let (mut page, mut host) = mounted();
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        let primary = host.last_for(&key("m")).disposed.clone();

        choose(&mut page, &mut host, Alternative::RetryPrimary);

        assert!(primary.get());
        let retry = host.last_for(&key("m"));
        assert_eq!(retry.strategy, Strategy::RetryPrimary);
        assert!(retry.prior_disposed);
        assert!(!host.panel_visible(&key("m")));
        assert_eq!(
            host.stages.last(),
            Some(&(
                key("m"),
                StageView::Status("Retrying with enhanced VideoJS settings...".into())
            ))
        );
        let attempt = retry.attempt.clone();
        assert!(!host.readiness_timer(&attempt).get());

        signal(&mut page, &mut host, "m", PlayerSignal::MetadataLoaded);
        assert_eq!(
            page.phase(&key("m")),
            Some(CardPhase::ConfirmedPlaying(Strategy::RetryPrimary))
        );
    }

    #[test]
    fn panel_buttons_are_inert_while_hidden() {
        let (mut page, mut host) = mounted();
        choose(&mut page, &mut host, Alternative::MediaSource);
        assert_eq!(host.started.len(), 2);
        assert_eq!(page.phase(&key("m")), Some(CardPhase::PrimaryActive));
    }

    #[test]
    fn mse_unsupported_reports_and_reoffers() {
        let (mut page, mut host) = mounted();
        host.unsupported.push(Strategy::MediaSource);
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        choose(&mut page, &mut host, Alternative::MediaSource);

        assert_eq!(
            host.stages.last(),
            Some(&(
                key("m"),
                StageView::Failure(
                    "Your browser does not support Media Source Extensions (MSE)".into()
                )
            ))
        );
        assert!(host.panel_visible(&key("m")));
        assert_eq!(
            page.phase(&key("m")),
            Some(CardPhase::FallbackOffered(Strategy::MediaSource))
        );
        assert_eq!(page.live_players(), 1, "only the direct card is left");
    }

    #[test]
    fn mse_buffering_confirms_and_pipeline_errors_reoffer() {
        let (mut page, mut host) = mounted();
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        choose(&mut page, &mut host, Alternative::MediaSource);
        assert_eq!(page.phase(&key("m")), Some(CardPhase::MseActive));

        signal(&mut page, &mut host, "m", PlayerSignal::BufferingComplete);
        assert_eq!(
            page.phase(&key("m")),
            Some(CardPhase::ConfirmedPlaying(Strategy::MediaSource))
        );

        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        choose(&mut page, &mut host, Alternative::MediaSource);
        signal(
            &mut page,
            &mut host,
            "m",
            PlayerSignal::Failed(Some("No supported codec found".into())),
        );
        assert_eq!(
            host.stages.last(),
            Some(&(
                key("m"),
                StageView::Failure("Failed to play MKV file with MSE: No supported codec found".into())
            ))
        );
        assert!(host.panel_visible(&key("m")));
    }

    #[test]
    fn decode_stub_reopens_panel() {
        let (mut page, mut host) = mounted();
        signal(&mut page, &mut host, "m", PlayerSignal::Failed(None));
        choose(&mut page, &mut host, Alternative::DecodeStub);
        assert_eq!(page.phase(&key("m")), Some(CardPhase::DecodeStub));
        assert!(!host.panel_visible(&key("m")));

        signal(&mut page, &mut host, "m", PlayerSignal::ReopenRequested);
        assert!(host.panel_visible(&key("m")));
    }

    #[test]
    fn stale_signals_are_ignored() {
        let (mut page, mut host) = mounted();
        let old = host.last_for(&key("m")).attempt.clone();
        page.handle(Input::Refresh, &mut host);
        page.handle(
            listing(&[record("m", "m.mkv", "2024-03-01T00:00:00", false)]),
            &mut host,
        );

        page.handle(
            Input::Signal {
                attempt: old.clone(),
                signal: PlayerSignal::Failed(None),
            },
            &mut host,
        );
        page.handle(Input::TimerFired(Due::Readiness(old)), &mut host);

        assert_eq!(page.phase(&key("m")), Some(CardPhase::PrimaryActive));
        assert!(!host.panel_visible(&key("m")));
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_success_releases_and_refreshes() {
        let (mut page, mut host) = mounted();
        page.handle(Input::DeleteClicked(MovieId::new("d")), &mut host);

        assert_eq!(host.prompts, ["Are you sure you want to delete \"Movie d\"?"]);
        let (url, request) = host.delete_requests[0].clone();
        assert_eq!(url, "/api/movies/d");

        let player = Rc::clone(&host.last_for(&key("d")).disposed);
        page.handle(
            Input::DeleteFinished {
                request,
                reply: Ok(HttpReply::new(200, r#"{"message": "Movie deleted"}"#)),
            },
            &mut host,
        );

        assert!(player.get());
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Successfully deleted: Movie d")
        );
        assert_eq!(host.fetches.len(), 2, "list refreshed once");
    }

    #[test]
    fn delete_error_shows_reason_and_keeps_list() {
        let (mut page, mut host) = mounted();
        page.handle(Input::DeleteClicked(MovieId::new("d")), &mut host);
        let (_, request) = host.delete_requests[0].clone();

        page.handle(
            Input::DeleteFinished {
                request,
                reply: Ok(HttpReply::new(404, r#"{"error": "not found"}"#)),
            },
            &mut host,
        );

        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Delete failed: not found")
        );
        assert_eq!(host.fetches.len(), 1, "no refresh after a failed delete");
        assert_eq!(page.live_players(), 2);
        assert_eq!(host.rendered_ids(), ["m", "d", "p"]);
    }

    #[test]
    fn declined_delete_sends_nothing() {
        let (mut page, mut host) = mounted();
        host.decline = true;
        page.handle(Input::DeleteClicked(MovieId::new("m")), &mut host);
        assert_eq!(host.prompts.len(), 1);
        assert!(host.delete_requests.is_empty());
    }

    #[test]
    fn delete_network_failure() {
        let (mut page, mut host) = mounted();
        page.handle(Input::DeleteClicked(MovieId::new("m")), &mut host);
        let (_, request) = host.delete_requests[0].clone();
        page.handle(
            Input::DeleteFinished {
                request,
                reply: Err(ApiError::Transport("TypeError: Failed to fetch".into())),
            },
            &mut host,
        );
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Delete failed: Network error")
        );
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    fn file() -> SelectedFile {
        SelectedFile {
            name: "test.mp4".into(),
            size: 1000,
        }
    }

    #[test]
    fn upload_without_file_sends_nothing() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(None), &mut host);
        assert!(host.upload_requests.is_empty());
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Please select a file to upload.")
        );
        assert_eq!(page.upload(), UploadView::Idle);
    }

    #[test]
    fn upload_success_refreshes_list() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(Some(file())), &mut host);
        assert_eq!(host.upload_requests, [("/api/upload".into(), file())]);
        assert!(page.upload().is_busy());

        page.handle(
            Input::UploadProgress(UploadProgress {
                loaded: 500,
                total: Some(1000),
            }),
            &mut host,
        );
        assert_eq!(page.upload().label(), "50%");

        page.handle(
            Input::UploadFinished(Ok(HttpReply::new(200, r#"{"title": "Test"}"#))),
            &mut host,
        );
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Successfully uploaded: Test")
        );
        assert_eq!(host.fetches.len(), 2);
        assert_eq!(host.form_resets, 1);
        assert_eq!(host.uploads.last(), Some(&UploadView::Idle));
    }

    #[test]
    fn upload_failure_keeps_form() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(Some(file())), &mut host);
        page.handle(
            Input::UploadFinished(Ok(HttpReply::new(500, "<h1>Internal Server Error</h1>"))),
            &mut host,
        );
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Upload failed: Server error")
        );
        assert_eq!(host.form_resets, 0);
        assert_eq!(host.fetches.len(), 1);
        assert!(!page.upload().is_busy());
    }

    #[test]
    fn second_submit_is_ignored_while_in_flight() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(Some(file())), &mut host);
        page.handle(Input::SubmitUpload(Some(file())), &mut host);
        assert_eq!(host.upload_requests.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Notices and lifecycle
    // -----------------------------------------------------------------------

    fn notice_timers(host: &RecordingHost) -> Vec<(u32, u32, Rc<Cell<bool>>)> {
        host.timers
            .iter()
            .filter_map(|(due, delay, cancelled)| match due {
                Due::NoticeExpiry(generation) => Some((*generation, *delay, Rc::clone(cancelled))),
                Due::Readiness(_) => None,
            })
            .collect()
    }

    #[test]
    fn notices_auto_dismiss() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(None), &mut host);
        let timers = notice_timers(&host);
        assert_eq!(timers.len(), 1);
        let (generation, delay, _) = timers[0].clone();
        assert_eq!(delay, 8_000);

        page.handle(Input::TimerFired(Due::NoticeExpiry(generation)), &mut host);
        assert!(host.notice.is_none());
        assert!(page.notice().is_none());
    }

    #[test]
    fn stale_dismiss_keeps_newer_notice() {
        let (mut page, mut host) = mounted();
        page.handle(Input::SubmitUpload(None), &mut host);
        page.handle(Input::DeleteClicked(MovieId::new("m")), &mut host);
        let (_, request) = host.delete_requests[0].clone();
        page.handle(
            Input::DeleteFinished {
                request,
                reply: Ok(HttpReply::new(200, r#"{"message": "ok"}"#)),
            },
            &mut host,
        );

        let timers = notice_timers(&host);
        assert_eq!(timers.len(), 2);
        assert!(timers[0].2.get(), "first dismiss timer cancelled");

        page.handle(Input::TimerFired(Due::NoticeExpiry(timers[0].0)), &mut host);
        assert_eq!(
            host.notice.as_ref().map(|n| n.text.as_str()),
            Some("Successfully deleted: Movie m")
        );
    }

    #[test]
    fn unload_releases_everything() {
        let (mut page, mut host) = mounted();
        let check = host.readiness_timer(&host.last_for(&key("m")).attempt.clone());
        page.handle(Input::Unload, &mut host);
        assert_eq!(page.live_players(), 0);
        assert_eq!(host.live(), 0);
        assert!(check.get(), "pending readiness check cancelled");
    }
}
