// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for the page controller.
//!
//! The [`Page`](crate::page::Page) reports what it does through a
//! [`TraceSink`]. All methods default to no-ops, so a sink only overrides the
//! events it cares about. Every event derives `Serialize` for structured
//! recorders and implements `Display` for line-oriented ones.

use alloc::string::String;
use core::fmt;

use serde::Serialize;

use crate::card::CardKey;
use crate::error::{ApiError, PlaybackError};
use crate::movie::MovieId;
use crate::notice::Notice;
use crate::player::PlayerSignal;
use crate::registry::AttemptId;
use crate::strategy::{CardPhase, Strategy, StrategyEvent};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after the movie list is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LibraryEvent {
    /// Cards rendered.
    pub cards: usize,
    /// Cards with the fallback panel.
    pub fallback: usize,
    /// Cards with a primary player only.
    pub direct: usize,
    /// Placeholder cards.
    pub placeholder: usize,
    /// Handles released before rendering.
    pub released: usize,
}

impl fmt::Display for LibraryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "library: {} cards ({} fallback, {} direct, {} placeholder), released {}",
            self.cards, self.fallback, self.direct, self.placeholder, self.released
        )
    }
}

/// Emitted when a player is started for a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LaunchEvent {
    /// The new attempt.
    pub attempt: AttemptId,
    /// Strategy started.
    pub strategy: Strategy,
    /// Why the launch failed, if it did.
    pub error: Option<PlaybackError>,
}

impl fmt::Display for LaunchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "launch {} {}", self.attempt, self.strategy.as_str()),
            Some(e) => write!(
                f,
                "launch {} {} failed: {e}",
                self.attempt,
                self.strategy.as_str()
            ),
        }
    }
}

/// Emitted when a card's playback phase changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransitionEvent {
    /// Card that changed.
    pub card: CardKey,
    /// Phase before the event.
    pub from: CardPhase,
    /// Phase after the event.
    pub to: CardPhase,
    /// What caused the change.
    pub cause: StrategyEvent,
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({:?})",
            self.card, self.from, self.to, self.cause
        )
    }
}

/// A player signal as received by the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalEvent {
    /// Attempt the signal was tagged with.
    pub attempt: AttemptId,
    /// The signal.
    pub signal: PlayerSignal,
}

impl fmt::Display for SignalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attempt, self.signal)
    }
}

/// Why a player handle was disposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseReason {
    /// The list was re-rendered or failed to load.
    Rerender,
    /// The card switched strategy.
    Replaced,
    /// The movie was deleted.
    Deleted,
    /// The page is unloading.
    Unload,
}

/// Emitted when a player handle is disposed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReleaseEvent {
    /// The disposed attempt.
    pub attempt: AttemptId,
    /// Why.
    pub reason: ReleaseReason,
}

impl fmt::Display for ReleaseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "release {} ({:?})", self.attempt, self.reason)
    }
}

/// Upload progress through the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "upload", rename_all = "kebab-case")]
pub enum UploadEvent {
    /// Submitted without a file.
    Rejected,
    /// Submitted while another upload was running.
    Ignored,
    /// Request sent.
    Started {
        /// File name.
        name: String,
        /// File size in bytes.
        size: u64,
    },
    /// The server stored the file.
    Succeeded {
        /// Stored title.
        title: String,
    },
    /// The upload failed.
    Failed {
        /// Why.
        error: ApiError,
    },
}

impl fmt::Display for UploadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected => f.write_str("upload rejected: no file"),
            Self::Ignored => f.write_str("upload ignored: already in flight"),
            Self::Started { name, size } => write!(f, "upload started: {name} ({size} bytes)"),
            Self::Succeeded { title } => write!(f, "upload succeeded: {title}"),
            Self::Failed { error } => write!(f, "upload failed: {error:?}"),
        }
    }
}

/// Delete progress through the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "delete", rename_all = "kebab-case")]
pub enum DeleteEvent {
    /// The user declined the confirmation prompt.
    Declined {
        /// Movie.
        id: MovieId,
    },
    /// Request sent.
    Requested {
        /// Movie.
        id: MovieId,
    },
    /// The server deleted the movie.
    Succeeded {
        /// Movie.
        id: MovieId,
    },
    /// The delete failed.
    Failed {
        /// Movie.
        id: MovieId,
        /// Why.
        error: ApiError,
    },
}

impl fmt::Display for DeleteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined { id } => write!(f, "delete {id}: declined"),
            Self::Requested { id } => write!(f, "delete {id}: requested"),
            Self::Succeeded { id } => write!(f, "delete {id}: succeeded"),
            Self::Failed { id, error } => write!(f, "delete {id}: failed: {error:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives diagnostics from the page controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after the movie list is rendered.
    fn on_library(&mut self, e: &LibraryEvent) {
        _ = e;
    }

    /// Called when the movie list could not be loaded.
    fn on_library_failed(&mut self, e: &ApiError) {
        _ = e;
    }

    /// Called when a player is started, or fails to start.
    fn on_launch(&mut self, e: &LaunchEvent) {
        _ = e;
    }

    /// Called when a card's playback phase changes.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called for every signal from a live attempt.
    fn on_player_signal(&mut self, e: &SignalEvent) {
        _ = e;
    }

    /// Called for a signal or timer whose attempt is no longer live.
    fn on_stale_signal(&mut self, e: &SignalEvent) {
        _ = e;
    }

    /// Called when a player handle is disposed.
    fn on_handle_released(&mut self, e: &ReleaseEvent) {
        _ = e;
    }

    /// Called at each upload step.
    fn on_upload(&mut self, e: &UploadEvent) {
        _ = e;
    }

    /// Called at each delete step.
    fn on_delete(&mut self, e: &DeleteEvent) {
        _ = e;
    }

    /// Called when a notice is shown.
    fn on_notice(&mut self, n: &Notice) {
        _ = n;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}
