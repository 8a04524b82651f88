//! Customization color with hex parsing

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a color string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Expected '#RRGGBB' format, got '{0}'")]
    InvalidFormat(String),

    #[error("Invalid hex digit in '{0}'")]
    InvalidHexDigit(String),
}

/// An sRGB surface color selected in the configurator.
///
/// Serialized as a `#RRGGBB` hex string so saved configurations stay
/// readable and match the values the UI layer works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorValue {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl ColorValue {
    /// Create a color from normalized RGB components (clamped to 0..=1)
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Parse a `#RRGGBB` hex string
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::InvalidFormat(hex.to_string()))?;
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidFormat(hex.to_string()));
        }

        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::InvalidHexDigit(hex.to_string()))
        };

        let r = byte(0..2)?;
        let g = byte(2..4)?;
        let b = byte(4..6)?;

        Ok(Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        })
    }

    /// Format as a `#RRGGBB` hex string
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// RGBA components with full opacity, the form scene materials use
    pub fn rgba(&self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl Serialize for ColorValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ColorValue::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
