// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout of the decode-stub explanation canvas.

use kurbo::{Point, Size};

/// One centered line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacardLine {
    /// Text to draw.
    pub text: &'static str,
    /// Anchor point; the text is horizontally centered on it.
    pub anchor: Point,
}

/// White text on a black canvas explaining why frame decoding is not
/// available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placard {
    /// Canvas size in pixels.
    pub size: Size,
    /// CSS font shorthand.
    pub font: &'static str,
    /// Lines in drawing order.
    pub lines: [PlacardLine; 3],
}

impl Placard {
    const TEXT: [(&'static str, f64); 3] = [
        ("WebCodecs API requires custom MKV demuxer", -20.0),
        ("which is beyond the scope of this implementation.", 10.0),
        ("Try the other playback options instead.", 40.0),
    ];

    /// The placard for a canvas of `size`.
    #[must_use]
    pub fn new(size: Size) -> Self {
        let center = size.to_rect().center();
        Self {
            size,
            font: "16px Arial",
            lines: Self::TEXT.map(|(text, dy)| PlacardLine {
                text,
                anchor: Point::new(center.x, center.y + dy),
            }),
        }
    }

    /// Canvas width in whole pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "canvas dimensions are small positive integers"
    )]
    pub fn width_px(&self) -> u32 {
        self.size.width.max(0.0) as u32
    }

    /// Canvas height in whole pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "canvas dimensions are small positive integers"
    )]
    pub fn height_px(&self) -> u32 {
        self.size.height.max(0.0) as u32
    }
}

impl Default for Placard {
    fn default() -> Self {
        Self::new(Size::new(640.0, 360.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let placard = Placard::default();
        assert_eq!((placard.width_px(), placard.height_px()), (640, 360));
        let ys: [f64; 3] = placard.lines.map(|l| l.anchor.y);
        assert_eq!(ys, [160.0, 190.0, 220.0]);
        assert!(placard.lines.iter().all(|l| l.anchor.x == 320.0));
        assert_eq!(
            placard.lines[2].text,
            "Try the other playback options instead."
        );
    }
}
