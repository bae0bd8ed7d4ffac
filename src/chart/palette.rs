//! Theme palettes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Theme;

/// An sRGB colour with alpha, serialized as a CSS colour string.
///
/// Opaque colours render as `#rrggbb`, translucent ones as `rgba(r,g,b,a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `rgba(r,g,b,a)`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let inner = s.strip_prefix("rgba(")?.strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [r, g, b, a] = parts.as_slice() else {
            return None;
        };
        let a: f64 = a.parse().ok()?;
        if !(0.0..=1.0).contains(&a) {
            return None;
        }
        Some(Self::rgba(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?, a))
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgba::parse(&s).ok_or_else(|| format!("invalid colour '{s}'"))
    }
}

/// Colours for one theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub axis_text: Rgba,
    pub axis_line: Rgba,
    pub grid_line: Rgba,
    /// Current-year sales line.
    pub accent: Rgba,
    /// Prior-year line.
    pub accent_secondary: Rgba,
    /// Area fill under the sales line.
    pub area_fill: Rgba,
    pub positive: Rgba,
    pub negative: Rgba,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        let accent = Rgba::rgb(0x7a, 0xa2, 0xff);
        let accent_secondary = Rgba::rgb(0x74, 0xe0, 0xc0);
        match theme {
            Theme::Dark => Self {
                axis_text: Rgba::rgb(0xcf, 0xd6, 0xff),
                axis_line: Rgba::rgb(0x40, 0x50, 0x85),
                grid_line: Rgba::rgba(255, 255, 255, 0.1),
                accent,
                accent_secondary,
                area_fill: Rgba::rgba(122, 162, 255, 0.15),
                positive: accent_secondary,
                negative: Rgba::rgb(0xff, 0x66, 0x89),
            },
            Theme::Light => Self {
                axis_text: Rgba::rgb(0x33, 0x41, 0x55),
                axis_line: Rgba::rgb(0xcb, 0xd5, 0xe1),
                grid_line: Rgba::rgba(0, 0, 0, 0.08),
                accent,
                accent_secondary,
                area_fill: Rgba::rgba(122, 162, 255, 0.10),
                positive: accent_secondary,
                negative: Rgba::rgb(0xff, 0x66, 0x89),
            },
        }
    }

    /// Bar colour for a change value; zero counts as positive.
    pub fn for_change(&self, change_percent: f64) -> Rgba {
        if change_percent >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings_parse_back() {
        for s in ["#7aa2ff", "rgba(255,255,255,0.1)", "rgba(0,0,0,0.08)"] {
            assert_eq!(Rgba::parse(s).unwrap().to_string(), s);
        }
        assert_eq!(Rgba::parse("#zzzzzz"), None);
        assert_eq!(Rgba::parse("rgba(1,2,3)"), None);
    }

    #[test]
    fn themes_differ_only_in_chrome() {
        let dark = Palette::for_theme(Theme::Dark);
        let light = Palette::for_theme(Theme::Light);
        assert_eq!(dark.accent, light.accent);
        assert_ne!(dark.axis_text, light.axis_text);
        assert_eq!(dark.axis_text.to_string(), "#cfd6ff");
        assert_eq!(light.axis_text.to_string(), "#334155");
    }

    #[test]
    fn zero_change_is_positive() {
        let p = Palette::for_theme(Theme::Dark);
        assert_eq!(p.for_change(0.0), p.positive);
        assert_eq!(p.for_change(-0.1), p.negative);
    }
}
