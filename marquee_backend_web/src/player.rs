// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The browser's player handle.

use marquee_core::registry::PlayerHandle;
use marquee_core::strategy::{Readiness, Strategy};

use crate::decode_stub::DecodeStubPlayer;
use crate::media_source::MediaSourcePlayer;
use crate::videojs::VideoJsPlayer;

#[derive(Debug)]
enum Kind {
    VideoJs(Strategy, VideoJsPlayer),
    MediaSource(MediaSourcePlayer),
    DecodeStub(DecodeStubPlayer),
}

/// A live player started by [`WebHost`](crate::WebHost).
///
/// Owns every closure and listener the player registered; dropping it after
/// [`dispose`](PlayerHandle::dispose) leaves nothing behind in the page.
#[derive(Debug)]
pub struct WebPlayer {
    kind: Kind,
}

impl WebPlayer {
    pub(crate) fn video_js(strategy: Strategy, player: VideoJsPlayer) -> Self {
        Self {
            kind: Kind::VideoJs(strategy, player),
        }
    }

    pub(crate) fn media_source(player: MediaSourcePlayer) -> Self {
        Self {
            kind: Kind::MediaSource(player),
        }
    }

    pub(crate) fn decode_stub(player: DecodeStubPlayer) -> Self {
        Self {
            kind: Kind::DecodeStub(player),
        }
    }

    /// The strategy this player implements.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match &self.kind {
            Kind::VideoJs(strategy, _) => *strategy,
            Kind::MediaSource(_) => Strategy::MediaSource,
            Kind::DecodeStub(_) => Strategy::DecodeStub,
        }
    }
}

impl PlayerHandle for WebPlayer {
    fn dispose(&mut self) {
        match &mut self.kind {
            Kind::VideoJs(_, player) => player.dispose(),
            Kind::MediaSource(player) => player.dispose(),
            Kind::DecodeStub(player) => player.dispose(),
        }
    }

    fn readiness(&self) -> Readiness {
        match &self.kind {
            Kind::VideoJs(_, player) => player.readiness(),
            Kind::MediaSource(player) => player.readiness(),
            Kind::DecodeStub(player) => player.readiness(),
        }
    }
}
