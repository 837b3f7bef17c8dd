//! RGBA color values for the indicator bars.
//!
//! Colors arrive from configuration as hex strings and leave through the
//! platform layer as GDI `COLORREF` values; this module owns both
//! conversions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Solid RGBA color displayed by an overlay bar.
///
/// The alpha channel drives the layered-window opacity of the surface; the
/// RGB channels become the fill brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (case-insensitive, `#` optional).
    ///
    /// The eight-digit form is ARGB, not RGBA. Returns `None` for anything
    /// else; callers fall back to their default color rather than failing
    /// startup.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            6 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Some(Self {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// GDI `COLORREF` layout: `0x00BBGGRR`.
    pub fn to_colorref(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_rgb() {
        let c = Color::parse_hex("#1E90FF").unwrap();
        assert_eq!(c, Color::rgb(0x1E, 0x90, 0xFF));
        assert_eq!(c.a, 255);
    }

    #[test]
    fn parses_eight_digit_argb() {
        let c = Color::parse_hex("#FF32CD32").unwrap();
        assert_eq!(c, Color::rgba(0x32, 0xCD, 0x32, 0xFF));
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(Color::parse_hex("1e90ff"), Color::parse_hex("#1E90FF"));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(Color::parse_hex(""), None);
        assert_eq!(Color::parse_hex("#12345"), None);
        assert_eq!(Color::parse_hex("#GGGGGG"), None);
        assert_eq!(Color::parse_hex("blue"), None);
    }

    #[test]
    fn colorref_is_bgr_packed() {
        assert_eq!(Color::rgb(0x1E, 0x90, 0xFF).to_colorref(), 0x00FF901E);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(Color::parse_hex(&c.to_string()), Some(c));
    }
}
