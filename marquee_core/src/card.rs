// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Card keys, playback-path classification, and card view models.
//!
//! The presenter never inspects a [`MovieRecord`] directly; it renders the
//! [`LibraryView`] built here, so ordering and classification are decided in
//! one place.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::Serialize;

use crate::config::PageConfig;
use crate::movie::{MovieId, MovieRecord, format_file_size};

/// Identifier of a rendered card, `video-{id}`.
///
/// Doubles as the DOM id of the card's primary `<video>` element; the player
/// wrapper and fallback panel ids derive from it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CardKey(String);

impl CardKey {
    /// Returns the key of the card showing `id`.
    #[must_use]
    pub fn for_movie(id: &MovieId) -> Self {
        Self(format!("video-{id}"))
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// DOM id of the element wrapping the card's player.
    #[must_use]
    pub fn wrapper_id(&self) -> String {
        format!("{}-wrapper", self.0)
    }

    /// DOM id of the card's fallback panel.
    #[must_use]
    pub fn fallback_id(&self) -> String {
        format!("{}-fallback", self.0)
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a card plays its media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackPath {
    /// Native support is unreliable: primary player plus a fallback panel.
    Fallback,
    /// Streamable format: primary player only.
    Direct,
    /// Not playable in the browser: placeholder with a download link.
    Placeholder,
}

impl PlaybackPath {
    /// Returns `true` if cards on this path own a player handle.
    #[must_use]
    pub const fn has_player(self) -> bool {
        !matches!(self, Self::Placeholder)
    }
}

/// Decides the playback path for a record.
///
/// The unreliable-format check wins over the server's `streamable` flag.
#[must_use]
pub fn classify(movie: &MovieRecord, config: &PageConfig) -> PlaybackPath {
    if config.is_unreliable(&movie.extension()) {
        PlaybackPath::Fallback
    } else if movie.streamable {
        PlaybackPath::Direct
    } else {
        PlaybackPath::Placeholder
    }
}

/// A `download` link to the original file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    /// Link target.
    pub href: String,
    /// Suggested filename.
    pub filename: String,
}

/// Media portion of a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaView {
    /// Player wrapper plus a hidden panel offering alternative strategies.
    Fallback {
        /// Source URL.
        src: String,
        /// MIME type given to the `<source>` element.
        mime: String,
    },
    /// Player wrapper only.
    Direct {
        /// Source URL.
        src: String,
        /// MIME type given to the `<source>` element.
        mime: String,
    },
    /// Non-interactive placeholder.
    Placeholder,
}

impl MediaView {
    /// Returns the playback path this view renders.
    #[must_use]
    pub const fn path(&self) -> PlaybackPath {
        match self {
            Self::Fallback { .. } => PlaybackPath::Fallback,
            Self::Direct { .. } => PlaybackPath::Direct,
            Self::Placeholder => PlaybackPath::Placeholder,
        }
    }

    /// Returns the source URL and MIME type of a playable view.
    #[must_use]
    pub fn source(&self) -> Option<(&str, &str)> {
        match self {
            Self::Fallback { src, mime } | Self::Direct { src, mime } => Some((src, mime)),
            Self::Placeholder => None,
        }
    }
}

/// Everything needed to render one card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    /// Card identifier.
    pub key: CardKey,
    /// Movie shown on this card.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Human-readable size, e.g. `1.5 MB`.
    pub size: String,
    /// Upload day, `YYYY-MM-DD`.
    pub uploaded: String,
    /// Format badge, e.g. `MKV`.
    pub format_label: String,
    /// Link to the original file.
    pub download: DownloadLink,
    /// Media portion.
    pub media: MediaView,
}

impl CardView {
    /// Builds the view for one record.
    #[must_use]
    pub fn new(movie: &MovieRecord, config: &PageConfig) -> Self {
        let media = match classify(movie, config) {
            PlaybackPath::Fallback => MediaView::Fallback {
                src: movie.url.clone(),
                mime: fallback_mime(movie),
            },
            PlaybackPath::Direct => MediaView::Direct {
                src: movie.url.clone(),
                mime: movie.mime_type.clone(),
            },
            PlaybackPath::Placeholder => MediaView::Placeholder,
        };

        Self {
            key: CardKey::for_movie(&movie.id),
            id: movie.id.clone(),
            title: movie.title.clone(),
            size: format_file_size(movie.size),
            uploaded: movie.upload_date.day(),
            format_label: movie.format_label(),
            download: DownloadLink {
                href: movie.url.clone(),
                filename: movie.original_filename.clone(),
            },
            media,
        }
    }

    /// Returns the card's playback path.
    #[must_use]
    pub const fn path(&self) -> PlaybackPath {
        self.media.path()
    }
}

fn fallback_mime(movie: &MovieRecord) -> String {
    if movie.extension() == "mkv" {
        String::from("video/x-matroska")
    } else {
        movie.mime_type.clone()
    }
}

/// What the movie list area shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LibraryView {
    /// One card per record, newest first.
    Cards(Vec<CardView>),
    /// The listing was empty.
    Empty,
    /// The listing could not be loaded.
    LoadFailed,
}

impl LibraryView {
    /// Text shown for [`LibraryView::Empty`].
    pub const EMPTY_TEXT: &'static str = "No videos found. Upload your first video above!";
    /// Text shown for [`LibraryView::LoadFailed`].
    pub const LOAD_FAILED_TEXT: &'static str = "Error loading movies. Please refresh the page.";

    /// Returns the rendered cards, if any.
    #[must_use]
    pub fn cards(&self) -> &[CardView] {
        match self {
            Self::Cards(cards) => cards,
            Self::Empty | Self::LoadFailed => &[],
        }
    }
}

/// Orders `movies` newest first and builds their cards.
///
/// The sort is stable, so records sharing an upload time keep server order.
#[must_use]
pub fn build_library(mut movies: Vec<MovieRecord>, config: &PageConfig) -> LibraryView {
    if movies.is_empty() {
        return LibraryView::Empty;
    }
    movies.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    LibraryView::Cards(
        movies
            .iter()
            .map(|movie| CardView::new(movie, config))
            .collect(),
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::movie::UploadTimestamp;

    pub(crate) fn movie(id: &str, filename: &str, date: &str, streamable: bool) -> MovieRecord {
        MovieRecord {
            id: MovieId::new(id),
            title: format!("Movie {id}"),
            original_filename: filename.into(),
            size: 2048,
            upload_date: UploadTimestamp::parse(date).unwrap(),
            url: format!("/media/{filename}"),
            mime_type: if filename.ends_with(".mp4") {
                "video/mp4".into()
            } else {
                String::new()
            },
            streamable,
        }
    }

    #[test]
    fn keys_and_dom_ids() {
        let key = CardKey::for_movie(&MovieId::new("7"));
        assert_eq!(key.as_str(), "video-7");
        assert_eq!(key.wrapper_id(), "video-7-wrapper");
        assert_eq!(key.fallback_id(), "video-7-fallback");
    }

    #[test]
    fn classification() {
        let config = PageConfig::web();
        let mkv = movie("1", "a.mkv", "2024-01-01", false);
        let mkv_streamable = movie("2", "b.MKV", "2024-01-01", true);
        let mp4 = movie("3", "c.mp4", "2024-01-01", true);
        let avi = movie("4", "d.avi", "2024-01-01", false);

        assert_eq!(classify(&mkv, &config), PlaybackPath::Fallback);
        assert_eq!(classify(&mkv_streamable, &config), PlaybackPath::Fallback);
        assert_eq!(classify(&mp4, &config), PlaybackPath::Direct);
        assert_eq!(classify(&avi, &config), PlaybackPath::Placeholder);
    }

    #[test]
    fn newest_first() {
        let older = movie("t1", "a.mp4", "2024-01-01T00:00:00", true);
        let newer = movie("t2", "b.mp4", "2024-06-01T00:00:00", true);
        let view = build_library(alloc::vec![older, newer], &PageConfig::web());
        let ids: Vec<_> = view.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["t2", "t1"]);
    }

    #[test]
    fn order_is_independent_of_input_order() {
        let dates = [
            "2023-05-01",
            "2024-02-01T08:00:00Z",
            "2022-12-31T23:59:59",
            "2024-02-01T09:00:00+02:00",
            "2025-01-01",
        ];
        let movies: Vec<_> = dates
            .iter()
            .enumerate()
            .map(|(i, d)| movie(&format!("{i}"), "x.mp4", d, true))
            .collect();

        let mut reversed = movies.clone();
        reversed.reverse();

        for input in [movies, reversed] {
            let view = build_library(input, &PageConfig::web());
            let ids: Vec<_> = view.cards().iter().map(|c| c.id.as_str()).collect();
            // 2024-02-01T09:00+02:00 is 07:00Z, one hour before index 1.
            assert_eq!(ids, ["4", "1", "3", "0", "2"]);
        }
    }

    #[test]
    fn equal_timestamps_keep_server_order() {
        let a = movie("a", "a.mp4", "2024-01-01", true);
        let b = movie("b", "b.mp4", "2024-01-01", true);
        let view = build_library(alloc::vec![a, b], &PageConfig::web());
        let ids: Vec<_> = view.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn empty_listing() {
        assert_eq!(
            build_library(Vec::new(), &PageConfig::web()),
            LibraryView::Empty
        );
    }

    #[test]
    fn card_fields() {
        let card = CardView::new(
            &movie("9", "Trip.mkv", "2024-03-05T10:00:00", false),
            &PageConfig::web(),
        );
        assert_eq!(card.size, "2 KB");
        assert_eq!(card.uploaded, "2024-03-05");
        assert_eq!(card.format_label, "MKV");
        assert_eq!(card.download.filename, "Trip.mkv");
        assert_eq!(
            card.media.source(),
            Some(("/media/Trip.mkv", "video/x-matroska"))
        );
    }
}
