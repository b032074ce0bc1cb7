// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color parsing and the pixel-read result type.

use peniko::Color;
use peniko::color::Srgb;

/// Parse a CSS color string (`#rrggbb`, `rgb(...)`, named colors, ...).
///
/// Returns `None` when the string is empty, `"transparent"`, or does not
/// parse. Callers that need transparent-as-a-color can map `None` to
/// [`Color::TRANSPARENT`] themselves; the view layer treats `None` as "do
/// not paint a background".
#[must_use]
pub fn parse_css_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("transparent") {
        return None;
    }
    peniko::color::parse_color(s)
        .ok()
        .map(|c| c.to_alpha_color::<Srgb>())
}

/// Format a color as `#rrggbb` (alpha dropped, CSS hex form).
#[must_use]
pub fn format_hex(color: Color) -> String {
    let c = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Format a color as `rgba(r,g,b,a)` with the alpha printed to 3 decimals.
#[must_use]
pub fn format_rgba(color: Color) -> String {
    let c = color.to_rgba8();
    format!(
        "rgba({},{},{},{:.3})",
        c.r,
        c.g,
        c.b,
        f64::from(c.a) / 255.0
    )
}

/// A pixel read result: channel values plus display renderings.
///
/// `r`, `g`, `b` are 0–255 sRGB; `a` is normalized to `[0, 1]`. The `hex`
/// and `rgba` fields are the CSS strings a host color picker shows.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelColor {
    /// Red channel, 0–255.
    pub r: u8,
    /// Green channel, 0–255.
    pub g: u8,
    /// Blue channel, 0–255.
    pub b: u8,
    /// Alpha, normalized to `[0, 1]`.
    pub a: f64,
    /// `#rrggbb` rendering (alpha dropped).
    pub hex: String,
    /// `rgba(r,g,b,a)` rendering with 3-decimal alpha.
    pub rgba: String,
}

impl PixelColor {
    /// Build a pixel color from unpremultiplied 8-bit channels.
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let alpha = f64::from(a) / 255.0;
        Self {
            r,
            g,
            b,
            a: alpha,
            hex: format!("#{r:02x}{g:02x}{b:02x}"),
            rgba: format!("rgba({r},{g},{b},{alpha:.3})"),
        }
    }

    /// Fully transparent black, the out-of-range / denied-read result.
    #[must_use]
    pub fn transparent() -> Self {
        Self::from_rgba8(0, 0, 0, 0)
    }

    /// Returns `true` if this read is fully transparent.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_and_named() {
        let red = parse_css_color("#ff0000").unwrap();
        assert_eq!(red.to_rgba8().r, 255);
        assert_eq!(red.to_rgba8().g, 0);

        let white = parse_css_color("white").unwrap();
        assert_eq!(white.to_rgba8().b, 255);
    }

    #[test]
    fn transparent_and_empty_parse_to_none() {
        assert!(parse_css_color("").is_none());
        assert!(parse_css_color("  ").is_none());
        assert!(parse_css_color("transparent").is_none());
        assert!(parse_css_color("TRANSPARENT").is_none());
        assert!(parse_css_color("not a color").is_none());
    }

    #[test]
    fn pixel_color_formats() {
        let c = PixelColor::from_rgba8(255, 128, 0, 255);
        assert_eq!(c.hex, "#ff8000");
        assert_eq!(c.rgba, "rgba(255,128,0,1.000)");

        let half = PixelColor::from_rgba8(0, 0, 0, 128);
        assert!((half.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(half.rgba, "rgba(0,0,0,0.502)");
    }

    #[test]
    fn transparent_black_is_marked_transparent() {
        let c = PixelColor::transparent();
        assert!(c.is_transparent());
        assert_eq!(c.hex, "#000000");
    }

    #[test]
    fn hex_rendering_of_parsed_color_roundtrips() {
        let c = parse_css_color("#a1b2c3").unwrap();
        assert_eq!(format_hex(c), "#a1b2c3");
        assert_eq!(format_rgba(c), "rgba(161,178,195,1.000)");
    }
}
