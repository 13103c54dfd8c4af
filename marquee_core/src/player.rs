// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Player configuration and launch requests.
//!
//! The page decides *what* to launch; the backend turns a [`Launch`] into a
//! live [`PlayerHandle`](crate::registry::PlayerHandle).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Serialize;

use crate::placard::Placard;
use crate::strategy::{Strategy, StrategyEvent};

/// Options object handed to the player library's initializer.
///
/// Serializes to the camel-case object the library expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    /// Scale to the container width.
    pub fluid: bool,
    /// Adapt controls to the player size.
    pub responsive: bool,
    /// Preload hint.
    pub preload: &'static str,
    /// Show the control bar.
    pub controls: bool,
    /// Start playing on load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Play inline on mobile browsers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playsinline: Option<bool>,
    /// Control bar components.
    pub control_bar: ControlBar,
    /// HTML5 tech options.
    pub html5: Html5Options,
    /// Playback technologies to try, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tech_order: Vec<&'static str>,
}

/// Control bar components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBar {
    /// Play/pause toggle.
    pub play_toggle: bool,
    /// Volume panel.
    pub volume_panel: bool,
    /// Current time.
    pub current_time_display: bool,
    /// Separator between current time and duration.
    pub time_divider: bool,
    /// Duration.
    pub duration_display: bool,
    /// Progress control.
    pub progress_control: ProgressControl,
    /// Fullscreen toggle.
    pub fullscreen_toggle: bool,
}

/// Progress control components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressControl {
    /// Seek bar.
    pub seek_bar: bool,
}

/// HTML5 tech options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Html5Options {
    /// Streaming engine options, keyed as `vhs` or `hls`.
    #[serde(flatten)]
    pub streaming: Streaming,
    /// Use native audio tracks.
    pub native_audio_tracks: bool,
    /// Use native video tracks.
    pub native_video_tracks: bool,
    /// Use native text tracks.
    pub native_text_tracks: bool,
}

/// Streaming engine options under their library key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Streaming {
    /// Current engine key.
    Vhs(StreamingOptions),
    /// Legacy engine key.
    Hls(StreamingOptions),
}

/// Streaming engine options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingOptions {
    /// Prefer the library's engine over native playback.
    pub override_native: bool,
}

impl PlayerOptions {
    /// Options for the first attempt on every playable card.
    #[must_use]
    pub fn primary() -> Self {
        Self {
            fluid: true,
            responsive: true,
            preload: "auto",
            controls: true,
            autoplay: Some(false),
            playsinline: Some(true),
            control_bar: ControlBar::FULL,
            html5: Html5Options::library_tracks(Streaming::Vhs(StreamingOptions {
                override_native: true,
            })),
            tech_order: Vec::new(),
        }
    }

    /// Options for the user-requested retry: HTML5 tech only.
    #[must_use]
    pub fn retry() -> Self {
        Self {
            autoplay: None,
            playsinline: None,
            html5: Html5Options::library_tracks(Streaming::Hls(StreamingOptions {
                override_native: true,
            })),
            tech_order: alloc::vec!["html5"],
            ..Self::primary()
        }
    }

    /// Options for `strategy`, if it is driven by the player library.
    #[must_use]
    pub fn for_strategy(strategy: Strategy) -> Option<Self> {
        match strategy {
            Strategy::Primary => Some(Self::primary()),
            Strategy::RetryPrimary => Some(Self::retry()),
            Strategy::MediaSource | Strategy::DecodeStub => None,
        }
    }

    /// Serializes to the JSON text handed to the library.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ControlBar {
    /// Every component enabled.
    pub const FULL: Self = Self {
        play_toggle: true,
        volume_panel: true,
        current_time_display: true,
        time_divider: true,
        duration_display: true,
        progress_control: ProgressControl { seek_bar: true },
        fullscreen_toggle: true,
    };
}

impl Html5Options {
    fn library_tracks(streaming: Streaming) -> Self {
        Self {
            streaming,
            native_audio_tracks: false,
            native_video_tracks: false,
            native_text_tracks: false,
        }
    }
}

/// What the backend should start for one attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum Launch {
    /// Fresh `<video>` with one `<source>`, handed to the player library.
    Player {
        /// [`Strategy::Primary`] or [`Strategy::RetryPrimary`].
        strategy: Strategy,
        /// Source URL.
        src: String,
        /// Source MIME type.
        mime: String,
        /// Library options.
        options: PlayerOptions,
    },
    /// Whole-asset buffering through a `MediaSource`.
    MediaSource {
        /// Asset URL.
        src: String,
        /// Source-buffer MIME types, tried in order.
        codecs: &'static [&'static str],
    },
    /// Explanatory canvas and a button that re-opens the panel.
    DecodeStub {
        /// Canvas contents.
        placard: Placard,
    },
}

impl Launch {
    /// The strategy this launch implements.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Player { strategy, .. } => *strategy,
            Self::MediaSource { .. } => Strategy::MediaSource,
            Self::DecodeStub { .. } => Strategy::DecodeStub,
        }
    }
}

/// A notification from a live player, tagged by the backend with the
/// attempt that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", content = "detail", rename_all = "kebab-case")]
pub enum PlayerSignal {
    /// The player library finished initializing.
    Ready,
    /// Media metadata loaded.
    MetadataLoaded,
    /// The buffered source ended its stream and playback started.
    BufferingComplete,
    /// The player reported an error.
    Failed(Option<String>),
    /// The decode stub's play button was pressed.
    ReopenRequested,
}

impl PlayerSignal {
    /// The state-machine event this signal drives, if any.
    #[must_use]
    pub const fn strategy_event(&self) -> Option<StrategyEvent> {
        match self {
            Self::Ready => None,
            Self::MetadataLoaded => Some(StrategyEvent::MetadataLoaded),
            Self::BufferingComplete => Some(StrategyEvent::BufferingComplete),
            Self::Failed(_) => Some(StrategyEvent::Failed),
            Self::ReopenRequested => Some(StrategyEvent::ReopenRequested),
        }
    }
}

impl fmt::Display for PlayerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("ready"),
            Self::MetadataLoaded => f.write_str("loadedmetadata"),
            Self::BufferingComplete => f.write_str("buffering-complete"),
            Self::Failed(Some(reason)) => write!(f, "error: {reason}"),
            Self::Failed(None) => f.write_str("error"),
            Self::ReopenRequested => f.write_str("reopen"),
        }
    }
}

/// Transient content of a card's player wrapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageView {
    /// Progress text while an alternative is being set up.
    Status(String),
    /// An alternative failed before it could run.
    Failure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_options_json() {
        let json: serde_json::Value =
            serde_json::from_str(&PlayerOptions::primary().to_json().unwrap()).unwrap();
        assert_eq!(json["preload"], "auto");
        assert_eq!(json["autoplay"], false);
        assert_eq!(json["playsinline"], true);
        assert_eq!(json["controlBar"]["progressControl"]["seekBar"], true);
        assert_eq!(json["html5"]["vhs"]["overrideNative"], true);
        assert_eq!(json["html5"]["nativeTextTracks"], false);
        assert!(json.get("techOrder").is_none());
    }

    #[test]
    fn retry_options_json() {
        let json: serde_json::Value =
            serde_json::from_str(&PlayerOptions::retry().to_json().unwrap()).unwrap();
        assert_eq!(json["techOrder"], serde_json::json!(["html5"]));
        assert_eq!(json["html5"]["hls"]["overrideNative"], true);
        assert!(json["html5"].get("vhs").is_none());
        assert!(json.get("autoplay").is_none());
        assert_eq!(json["preload"], "auto");
    }

    #[test]
    fn options_per_strategy() {
        assert_eq!(
            PlayerOptions::for_strategy(Strategy::RetryPrimary),
            Some(PlayerOptions::retry())
        );
        assert_eq!(PlayerOptions::for_strategy(Strategy::MediaSource), None);
    }

    #[test]
    fn launch_strategy() {
        let launch = Launch::Player {
            strategy: Strategy::RetryPrimary,
            src: "/m.mkv".into(),
            mime: "video/x-matroska".into(),
            options: PlayerOptions::retry(),
        };
        assert_eq!(launch.strategy(), Strategy::RetryPrimary);
    }
}
