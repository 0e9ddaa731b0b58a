//! Color values used by particles and connection lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An opaque 8-bit RGB color. Serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color with a fractional alpha, as handed to a [`DrawContext`](crate::DrawContext).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgb {
    /// Default particle and connection color.
    pub const INDIGO: Rgb = Rgb::new(0x63, 0x66, 0xf1);
    /// Cyan used by section backdrops.
    pub const CYAN: Rgb = Rgb::new(0x06, 0xb6, 0xd4);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| ConfigError::Color(hex.to_owned()))?;

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ConfigError::Color(hex.to_owned()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Converts hue (degrees), saturation and lightness (both 0..=1).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);

        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let m = lightness - chroma / 2.0;

        let (r, g, b) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(to_byte(r), to_byte(g), to_byte(b))
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl Rgba {
    /// Alpha quantized to a byte, for hosts with 8-bit color.
    pub fn alpha_u8(&self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex() {
        assert_eq!(Rgb::from_hex("#6366f1").unwrap(), Rgb::INDIGO);
        assert_eq!(Rgb::from_hex("#06B6D4").unwrap(), Rgb::CYAN);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["6366f1", "#6366f", "#6366fg", "#63é6f1", ""] {
            assert!(matches!(Rgb::from_hex(bad), Err(ConfigError::Color(_))), "{bad}");
        }
    }

    #[test]
    fn formats_back_to_hex() {
        assert_eq!(Rgb::INDIGO.to_string(), "#6366f1");
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::from_hsl(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hsl(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hsl(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
        assert_eq!(Rgb::from_hsl(42.0, 0.0, 1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn hsl_variation_range_is_blue_to_purple() {
        let blue = Rgb::from_hsl(220.0, 0.7, 0.6);
        let purple = Rgb::from_hsl(279.0, 0.7, 0.6);
        assert!(blue.b > blue.r && blue.b > blue.g);
        assert!(purple.b > purple.g && purple.r > purple.g);
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgb::INDIGO.with_alpha(1.5).alpha, 1.0);
        assert_eq!(Rgb::INDIGO.with_alpha(-0.2).alpha_u8(), 0);
    }
}
