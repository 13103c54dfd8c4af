// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-card playback strategy state machine.
//!
//! Cards on the [`Fallback`](crate::card::PlaybackPath::Fallback) path start
//! in [`CardPhase::PrimaryActive`]. The fallback panel is visible exactly
//! when the card is in [`CardPhase::FallbackOffered`].
//!
//! ```text
//!                 metadata / ready check ok
//!  PrimaryActive ───────────────────────────► ConfirmedPlaying
//!       │  error / ready check failed               │ error
//!       ▼                                           ▼
//!  FallbackOffered ◄──────────────────────── (any active phase)
//!       │ user picks one alternative
//!       ├──► RetryPrimary ──► ConfirmedPlaying (metadata / ready check ok)
//!       ├──► MseActive ─────► ConfirmedPlaying (buffering complete)
//!       └──► DecodeStub ────► FallbackOffered  (re-open requested)
//! ```
//!
//! There is nothing beyond the three alternatives: the decode stub never
//! decodes and only offers to re-open the panel.

use core::fmt;

use serde::Serialize;

/// A concrete way of playing a card's media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The player library with the default configuration.
    Primary,
    /// The player library re-initialized with a stricter configuration.
    RetryPrimary,
    /// The whole asset buffered through a `MediaSource`.
    MediaSource,
    /// The frame-decoding placeholder.
    DecodeStub,
}

impl Strategy {
    /// Short label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::RetryPrimary => "retry-primary",
            Self::MediaSource => "mse",
            Self::DecodeStub => "decode-stub",
        }
    }

    /// Returns `true` for the strategies driven by the player library, which
    /// report metadata and are subject to the readiness check.
    #[must_use]
    pub const fn uses_player_library(self) -> bool {
        matches!(self, Self::Primary | Self::RetryPrimary)
    }
}

/// One of the three user-selectable alternatives on the fallback panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// "Try VideoJS Player".
    RetryPrimary,
    /// "Try MSE Playback".
    MediaSource,
    /// "Try WebCodecs".
    DecodeStub,
}

impl Alternative {
    /// All alternatives in panel order.
    pub const ALL: [Self; 3] = [Self::RetryPrimary, Self::MediaSource, Self::DecodeStub];

    /// Button caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RetryPrimary => "Try VideoJS Player",
            Self::MediaSource => "Try MSE Playback",
            Self::DecodeStub => "Try WebCodecs",
        }
    }

    /// Button CSS class.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::RetryPrimary => "try-videojs-player-btn",
            Self::MediaSource => "try-mse-player-btn",
            Self::DecodeStub => "try-webcodecs-player-btn",
        }
    }

    /// Wrapper text shown while the alternative is set up.
    #[must_use]
    pub const fn status_text(self) -> &'static str {
        match self {
            Self::RetryPrimary => "Retrying with enhanced VideoJS settings...",
            Self::MediaSource => "Setting up MSE playback for MKV...",
            Self::DecodeStub => "Setting up WebCodecs playback for MKV...",
        }
    }

    /// The strategy this alternative starts.
    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::RetryPrimary => Strategy::RetryPrimary,
            Self::MediaSource => Strategy::MediaSource,
            Self::DecodeStub => Strategy::DecodeStub,
        }
    }
}

/// Result of probing a player when its readiness check fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Readiness {
    /// The player reports an error.
    pub errored: bool,
    /// The player has at least loaded metadata.
    pub ready: bool,
}

impl Readiness {
    /// A healthy player.
    pub const READY: Self = Self {
        errored: false,
        ready: true,
    };

    /// Returns `true` when there is no error and the ready state is satisfied.
    #[must_use]
    pub const fn passed(self) -> bool {
        !self.errored && self.ready
    }
}

/// Something that happened to a card's current strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "detail", rename_all = "kebab-case")]
pub enum StrategyEvent {
    /// The player library loaded metadata.
    MetadataLoaded,
    /// The buffered source finished appending and playback was started.
    BufferingComplete,
    /// The current strategy failed.
    Failed,
    /// The post-initialization readiness check fired.
    ReadinessChecked(Readiness),
    /// The user picked an alternative from the panel.
    Chosen(Alternative),
    /// The user asked the decode stub to show the panel again.
    ReopenRequested,
}

/// Playback phase of a fallback-path card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "phase", content = "strategy", rename_all = "kebab-case")]
pub enum CardPhase {
    /// Primary player initialized, outcome pending.
    PrimaryActive,
    /// A strategy is known to be working.
    ConfirmedPlaying(Strategy),
    /// The panel is visible; `last` is the strategy that failed.
    FallbackOffered(Strategy),
    /// Stricter player configuration initialized, outcome pending.
    RetryPrimary,
    /// Buffered source being fed.
    MseActive,
    /// Placeholder shown; waits for the user to re-open the panel.
    DecodeStub,
}

impl CardPhase {
    /// The strategy currently owning the card's player handle.
    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::PrimaryActive => Strategy::Primary,
            Self::RetryPrimary => Strategy::RetryPrimary,
            Self::MseActive => Strategy::MediaSource,
            Self::DecodeStub => Strategy::DecodeStub,
            Self::ConfirmedPlaying(s) | Self::FallbackOffered(s) => s,
        }
    }

    /// Returns `true` if the fallback panel is visible in this phase.
    #[must_use]
    pub const fn offers_fallback(self) -> bool {
        matches!(self, Self::FallbackOffered(_))
    }

    /// Applies `event`, returning the next phase or `None` if the event does
    /// not apply in this phase.
    #[must_use]
    pub fn on(self, event: StrategyEvent) -> Option<Self> {
        use StrategyEvent as E;

        let strategy = self.strategy();
        match (self, event) {
            // A late metadata event from the current player also withdraws
            // a panel that the readiness check or an error had surfaced.
            (Self::PrimaryActive | Self::RetryPrimary, E::MetadataLoaded) => {
                Some(Self::ConfirmedPlaying(strategy))
            }
            (Self::FallbackOffered(s), E::MetadataLoaded) if s.uses_player_library() => {
                Some(Self::ConfirmedPlaying(s))
            }

            (Self::MseActive, E::BufferingComplete) => {
                Some(Self::ConfirmedPlaying(Strategy::MediaSource))
            }

            (Self::PrimaryActive | Self::RetryPrimary, E::ReadinessChecked(r)) => {
                Some(if r.passed() {
                    Self::ConfirmedPlaying(strategy)
                } else {
                    Self::FallbackOffered(strategy)
                })
            }
            (Self::ConfirmedPlaying(s), E::ReadinessChecked(r))
                if s.uses_player_library() && !r.passed() =>
            {
                Some(Self::FallbackOffered(s))
            }

            (Self::FallbackOffered(_), E::Failed) => None,
            (_, E::Failed) => Some(Self::FallbackOffered(strategy)),

            (Self::FallbackOffered(_), E::Chosen(alternative)) => Some(match alternative {
                Alternative::RetryPrimary => Self::RetryPrimary,
                Alternative::MediaSource => Self::MseActive,
                Alternative::DecodeStub => Self::DecodeStub,
            }),

            (Self::DecodeStub, E::ReopenRequested) => {
                Some(Self::FallbackOffered(Strategy::DecodeStub))
            }

            _ => None,
        }
    }
}

impl fmt::Display for CardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryActive => f.write_str("primary-active"),
            Self::ConfirmedPlaying(s) => write!(f, "confirmed-playing({})", s.as_str()),
            Self::FallbackOffered(s) => write!(f, "fallback-offered({})", s.as_str()),
            Self::RetryPrimary => f.write_str("retry-primary"),
            Self::MseActive => f.write_str("mse-active"),
            Self::DecodeStub => f.write_str("decode-stub"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_READY: Readiness = Readiness {
        errored: false,
        ready: false,
    };
    const ERRORED: Readiness = Readiness {
        errored: true,
        ready: true,
    };

    fn offered() -> CardPhase {
        CardPhase::FallbackOffered(Strategy::Primary)
    }

    #[test]
    fn primary_confirmed_by_metadata() {
        let next = CardPhase::PrimaryActive.on(StrategyEvent::MetadataLoaded);
        assert_eq!(next, Some(CardPhase::ConfirmedPlaying(Strategy::Primary)));
    }

    #[test]
    fn primary_error_offers_fallback() {
        let next = CardPhase::PrimaryActive.on(StrategyEvent::Failed);
        assert_eq!(next, Some(offered()));
        assert!(next.unwrap().offers_fallback());
    }

    #[test]
    fn readiness_check_outcomes() {
        let ok = CardPhase::PrimaryActive.on(StrategyEvent::ReadinessChecked(Readiness::READY));
        assert_eq!(ok, Some(CardPhase::ConfirmedPlaying(Strategy::Primary)));

        let late = CardPhase::PrimaryActive.on(StrategyEvent::ReadinessChecked(NOT_READY));
        assert_eq!(late, Some(offered()));

        let broken = CardPhase::PrimaryActive.on(StrategyEvent::ReadinessChecked(ERRORED));
        assert_eq!(broken, Some(offered()));
    }

    #[test]
    fn passing_check_after_metadata_keeps_panel_hidden() {
        let confirmed = CardPhase::ConfirmedPlaying(Strategy::Primary);
        assert_eq!(
            confirmed.on(StrategyEvent::ReadinessChecked(Readiness::READY)),
            None,
            "a passing check must not touch a confirmed card"
        );
    }

    #[test]
    fn failing_check_after_metadata_offers_fallback() {
        let confirmed = CardPhase::ConfirmedPlaying(Strategy::Primary);
        assert_eq!(
            confirmed.on(StrategyEvent::ReadinessChecked(ERRORED)),
            Some(offered())
        );
    }

    #[test]
    fn late_metadata_withdraws_panel() {
        assert_eq!(
            offered().on(StrategyEvent::MetadataLoaded),
            Some(CardPhase::ConfirmedPlaying(Strategy::Primary))
        );
        let after_mse = CardPhase::FallbackOffered(Strategy::MediaSource);
        assert_eq!(after_mse.on(StrategyEvent::MetadataLoaded), None);
    }

    #[test]
    fn alternatives_only_from_panel() {
        for alternative in Alternative::ALL {
            let next = offered().on(StrategyEvent::Chosen(alternative)).unwrap();
            assert_eq!(next.strategy(), alternative.strategy());
            assert!(!next.offers_fallback());

            assert_eq!(
                CardPhase::PrimaryActive.on(StrategyEvent::Chosen(alternative)),
                None,
                "panel buttons are inert while the panel is hidden"
            );
        }
    }

    #[test]
    fn each_alternative_falls_back_on_error() {
        for phase in [
            CardPhase::RetryPrimary,
            CardPhase::MseActive,
            CardPhase::DecodeStub,
        ] {
            let next = phase.on(StrategyEvent::Failed).unwrap();
            assert_eq!(next, CardPhase::FallbackOffered(phase.strategy()));
        }
    }

    #[test]
    fn mse_confirmed_by_buffering() {
        assert_eq!(
            CardPhase::MseActive.on(StrategyEvent::BufferingComplete),
            Some(CardPhase::ConfirmedPlaying(Strategy::MediaSource))
        );
        assert_eq!(CardPhase::MseActive.on(StrategyEvent::MetadataLoaded), None);
    }

    #[test]
    fn decode_stub_is_a_dead_end() {
        let stub = CardPhase::DecodeStub;
        assert_eq!(stub.on(StrategyEvent::MetadataLoaded), None);
        assert_eq!(stub.on(StrategyEvent::BufferingComplete), None);
        assert_eq!(
            stub.on(StrategyEvent::ReadinessChecked(Readiness::READY)),
            None
        );
        assert_eq!(
            stub.on(StrategyEvent::ReopenRequested),
            Some(CardPhase::FallbackOffered(Strategy::DecodeStub))
        );
    }

    #[test]
    fn repeated_errors_are_absorbed() {
        assert_eq!(offered().on(StrategyEvent::Failed), None);
    }

    #[test]
    fn confirmed_playing_can_still_fail() {
        let playing = CardPhase::ConfirmedPlaying(Strategy::MediaSource);
        assert_eq!(
            playing.on(StrategyEvent::Failed),
            Some(CardPhase::FallbackOffered(Strategy::MediaSource))
        );
    }
}
