// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted movie-library session on the native host.
//!
//! Drives a [`Page`] against an in-memory server through one session: the
//! initial load, an MKV card whose primary player never becomes ready, each
//! fallback alternative in turn, a stale player signal, an upload, and a
//! delete. Every trace event is written to stdout through a
//! [`PrettyPrintSink`](marquee_debug::pretty::PrettyPrintSink), or a
//! [`JsonLinesSink`](marquee_debug::jsonl::JsonLinesSink) with `--json`.
//!
//! Run with: `cargo run -p library_replay [-- --json]`

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use marquee_core::api::{DeleteRequest, HttpReply};
use marquee_core::backend::{Due, Host, Presenter};
use marquee_core::card::{CardKey, LibraryView};
use marquee_core::config::PageConfig;
use marquee_core::error::PlaybackError;
use marquee_core::movie::MovieId;
use marquee_core::notice::Notice;
use marquee_core::page::{Input, Page};
use marquee_core::player::{Launch, PlayerSignal, StageView};
use marquee_core::registry::{AttemptId, PlayerHandle};
use marquee_core::strategy::{Alternative, Readiness, Strategy};
use marquee_core::trace::TraceSink;
use marquee_core::upload::{SelectedFile, UploadProgress, UploadView};
use marquee_debug::jsonl::JsonLinesSink;
use marquee_debug::pretty::PrettyPrintSink;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// In-memory server
// ---------------------------------------------------------------------------

struct Server {
    movies: Vec<Value>,
    next_id: u64,
}

impl Server {
    fn seeded() -> Self {
        Self {
            movies: vec![
                movie(1, "Road Trip", "road_trip.mkv", "2024-03-01T18:30:00", false),
                movie(2, "Birthday", "birthday.mp4", "2024-05-12T09:00:00", true),
                movie(3, "Old Tape", "old_tape.avi", "2023-11-20T21:15:00", false),
            ],
            next_id: 4,
        }
    }

    fn list(&self) -> HttpReply {
        HttpReply::new(200, Value::Array(self.movies.clone()).to_string())
    }

    fn upload(&mut self, file: &SelectedFile) -> HttpReply {
        let title = file
            .name
            .rsplit_once('.')
            .map_or(file.name.as_str(), |(stem, _)| stem)
            .to_owned();
        self.movies.push(movie(
            self.next_id,
            &title,
            &file.name,
            "2024-06-01T12:00:00",
            true,
        ));
        self.next_id += 1;
        HttpReply::new(200, json!({ "title": title }).to_string())
    }

    fn delete(&mut self, id: &MovieId) -> HttpReply {
        let before = self.movies.len();
        self.movies
            .retain(|m| m["id"].as_u64().map(|n| n.to_string()).as_deref() != Some(id.as_str()));
        if self.movies.len() < before {
            HttpReply::new(200, json!({ "message": "Movie deleted" }).to_string())
        } else {
            HttpReply::new(404, json!({ "error": "Movie not found" }).to_string())
        }
    }
}

fn movie(id: u64, title: &str, filename: &str, date: &str, streamable: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "original_filename": filename,
        "size": 734_003_200_u64,
        "upload_date": date,
        "url": format!("/media/{filename}"),
        "mime_type": if filename.ends_with(".mp4") { "video/mp4" } else { "" },
        "streamable": streamable,
    })
}

// ---------------------------------------------------------------------------
// Scripted host
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ReplayPlayer {
    readiness: Readiness,
}

impl PlayerHandle for ReplayPlayer {
    fn dispose(&mut self) {}

    fn readiness(&self) -> Readiness {
        self.readiness
    }
}

/// Drops set the flag; the host skips cancelled timers.
#[derive(Debug)]
struct ReplayTimer(Rc<Cell<bool>>);

impl Drop for ReplayTimer {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

struct ScriptedHost {
    server: Server,
    pending: VecDeque<Input>,
    timers: Vec<(Due, u32, Rc<Cell<bool>>)>,
    launched: Vec<(AttemptId, Strategy)>,
    show_views: bool,
}

impl ScriptedHost {
    fn new(show_views: bool) -> Self {
        Self {
            server: Server::seeded(),
            pending: VecDeque::new(),
            timers: Vec::new(),
            launched: Vec::new(),
            show_views,
        }
    }

    fn view(&self, line: std::fmt::Arguments<'_>) {
        if self.show_views {
            println!("  [view] {line}");
        }
    }

    fn attempt(&self, key: &CardKey, nth: usize) -> Option<AttemptId> {
        self.launched
            .iter()
            .filter(|(attempt, _)| attempt.key == *key)
            .nth(nth)
            .map(|(attempt, _)| attempt.clone())
    }

    fn latest(&self, key: &CardKey) -> Option<AttemptId> {
        self.launched
            .iter()
            .rev()
            .find(|(attempt, _)| attempt.key == *key)
            .map(|(attempt, _)| attempt.clone())
    }
}

impl Presenter for ScriptedHost {
    fn show_library(&mut self, view: &LibraryView) {
        match view {
            LibraryView::Cards(cards) => {
                for card in cards {
                    self.view(format_args!(
                        "card {} \"{}\" {} {} {:?}",
                        card.key,
                        card.title,
                        card.size,
                        card.uploaded,
                        card.media.path()
                    ));
                }
            }
            LibraryView::Empty => self.view(format_args!("{}", LibraryView::EMPTY_TEXT)),
            LibraryView::LoadFailed => self.view(format_args!("{}", LibraryView::LOAD_FAILED_TEXT)),
        }
    }

    fn set_fallback_visible(&mut self, card: &CardKey, visible: bool) {
        let state = if visible { "shown" } else { "hidden" };
        self.view(format_args!("{} panel {state}", card.fallback_id()));
    }

    fn show_stage(&mut self, card: &CardKey, view: &StageView) {
        self.view(format_args!("{} {view:?}", card.wrapper_id()));
    }

    fn show_notice(&mut self, notice: Option<&Notice>) {
        match notice {
            Some(notice) => self.view(format_args!("notice: {notice}")),
            None => self.view(format_args!("notice cleared")),
        }
    }

    fn show_upload(&mut self, view: &UploadView) {
        self.view(format_args!("upload {} busy={}", view.label(), view.is_busy()));
    }

    fn reset_upload_form(&mut self) {
        self.view(format_args!("upload form reset"));
    }
}

impl Host for ScriptedHost {
    type Player = ReplayPlayer;
    type Timer = ReplayTimer;

    fn fetch_movies(&mut self, _url: &str) {
        self.pending.push_back(Input::ListLoaded(Ok(self.server.list())));
    }

    fn send_upload(&mut self, _url: &str, file: &SelectedFile) {
        self.pending.push_back(Input::UploadProgress(UploadProgress {
            loaded: file.size / 2,
            total: Some(file.size),
        }));
        self.pending.push_back(Input::UploadProgress(UploadProgress {
            loaded: file.size,
            total: Some(file.size),
        }));
        let reply = self.server.upload(file);
        self.pending.push_back(Input::UploadFinished(Ok(reply)));
    }

    fn send_delete(&mut self, _url: &str, request: DeleteRequest) {
        let reply = self.server.delete(&request.id);
        self.pending.push_back(Input::DeleteFinished {
            request,
            reply: Ok(reply),
        });
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.view(format_args!("confirm: {prompt} -> yes"));
        true
    }

    fn schedule(&mut self, due: Due, delay_ms: u32) -> ReplayTimer {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.push((due, delay_ms, Rc::clone(&cancelled)));
        ReplayTimer(cancelled)
    }

    fn launch(
        &mut self,
        attempt: &AttemptId,
        launch: &Launch,
    ) -> Result<ReplayPlayer, PlaybackError> {
        self.launched.push((attempt.clone(), launch.strategy()));
        // MKV through the player library never reaches a ready state here.
        let readiness = match launch {
            Launch::Player { mime, .. } if mime == "video/x-matroska" => Readiness {
                errored: false,
                ready: false,
            },
            _ => Readiness::READY,
        };
        Ok(ReplayPlayer { readiness })
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Handles `input`, then every completion the host queued in response.
fn step(page: &mut Page<ScriptedHost>, host: &mut ScriptedHost, input: Input) {
    page.handle(input, host);
    while let Some(next) = host.pending.pop_front() {
        page.handle(next, host);
    }
}

/// Fires every live timer, shortest delay first.
fn elapse(page: &mut Page<ScriptedHost>, host: &mut ScriptedHost) {
    let mut timers = std::mem::take(&mut host.timers);
    timers.sort_by_key(|(_, delay, _)| *delay);
    for (due, _, cancelled) in timers {
        if !cancelled.get() {
            step(page, host, Input::TimerFired(due));
        }
    }
}

fn signal(
    page: &mut Page<ScriptedHost>,
    host: &mut ScriptedHost,
    attempt: Option<AttemptId>,
    signal: PlayerSignal,
) {
    if let Some(attempt) = attempt {
        step(page, host, Input::Signal { attempt, signal });
    }
}

fn choose(
    page: &mut Page<ScriptedHost>,
    host: &mut ScriptedHost,
    card: &CardKey,
    alternative: Alternative,
) {
    step(
        page,
        host,
        Input::Choose {
            card: card.clone(),
            alternative,
        },
    );
}

fn main() {
    let json = std::env::args().skip(1).any(|arg| arg == "--json");
    let sink: Box<dyn TraceSink> = if json {
        Box::new(JsonLinesSink::with_writer(std::io::stdout()))
    } else {
        Box::new(PrettyPrintSink::new(Box::new(std::io::stdout())))
    };

    let mut host = ScriptedHost::new(!json);
    let mut page = Page::with_sink(PageConfig::web(), sink);
    let mkv = CardKey::for_movie(&MovieId::new("1"));
    let mp4 = CardKey::for_movie(&MovieId::new("2"));

    // -- load --------------------------------------------------------------
    step(&mut page, &mut host, Input::Mount);
    let mp4_attempt = host.latest(&mp4);
    signal(&mut page, &mut host, mp4_attempt, PlayerSignal::MetadataLoaded);

    // -- the MKV card never becomes ready ----------------------------------
    elapse(&mut page, &mut host);

    // -- walk the fallback panel -------------------------------------------
    choose(&mut page, &mut host, &mkv, Alternative::RetryPrimary);
    let retry = host.latest(&mkv);
    signal(&mut page, &mut host, retry, PlayerSignal::Failed(None));

    choose(&mut page, &mut host, &mkv, Alternative::MediaSource);
    let mse = host.latest(&mkv);
    signal(
        &mut page,
        &mut host,
        mse,
        PlayerSignal::Failed(Some("Unsupported codec format in MKV file".into())),
    );

    choose(&mut page, &mut host, &mkv, Alternative::DecodeStub);
    let stub = host.latest(&mkv);
    signal(&mut page, &mut host, stub, PlayerSignal::ReopenRequested);

    // The first primary player reports late; it was disposed long ago.
    let first = host.attempt(&mkv, 0);
    signal(&mut page, &mut host, first, PlayerSignal::MetadataLoaded);

    // -- upload --------------------------------------------------------------
    step(&mut page, &mut host, Input::SubmitUpload(None));
    step(
        &mut page,
        &mut host,
        Input::SubmitUpload(Some(SelectedFile {
            name: "Beach Day.mp4".into(),
            size: 52_428_800,
        })),
    );

    // -- delete --------------------------------------------------------------
    step(
        &mut page,
        &mut host,
        Input::DeleteClicked(MovieId::new("2")),
    );

    // -- notices expire, then the page goes away -----------------------------
    elapse(&mut page, &mut host);
    step(&mut page, &mut host, Input::Unload);

    if !json {
        println!(
            "done: {} cards, {} live players",
            page.cards().count(),
            page.live_players()
        );
    }
}
