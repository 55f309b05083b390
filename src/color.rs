//! CSS color values.
//!
//! Colors travel through the scene untouched as the string the caller supplied, so a
//! host renderer sees exactly what was configured. [`Color::to_rgba`] resolves them with
//! the CSS color parser from [`peniko`] when pixels are needed.

use image::Rgba;
use peniko::color::{parse_color, AlphaColor, Srgb};
use std::fmt;

/// A CSS color as supplied by the caller, e.g. `#000000`, `white` or `rgb(255,0,0)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Color(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the color into 8-bit sRGB with alpha.
    ///
    /// Accepts any CSS color syntax: hex, named colors, `rgb()`, `hsl()` and friends.
    /// Returns `None` when the string is not a color.
    pub fn to_rgba(&self) -> Option<Rgba<u8>> {
        let parsed = parse_color(self.0.trim()).ok()?;
        let srgb: AlphaColor<Srgb> = parsed.to_alpha_color();
        let rgba = srgb.to_rgba8();
        Some(Rgba([rgba.r, rgba.g, rgba.b, rgba.a]))
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::new(value)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Color(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
