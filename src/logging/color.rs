//! RGBA colors and their hex encoding
//!
//! Colors are carried as four `f32` components in `[0, 1]` and rendered as
//! eight uppercase hex digits (`RRGGBBAA`) inside console markup.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::LogError;

/// A color with red, green, blue and alpha components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// All components zero; what an unspecified color renders as
    pub const CLEAR: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from float components
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from byte components
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Byte components after clamping, in r, g, b, a order
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b),
            channel_to_byte(self.a),
        ]
    }

    /// Render as eight uppercase hex digits, e.g. `FFFFFFFF`
    pub fn to_hex(&self) -> String {
        self.to_rgba8()
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect()
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
    ///
    /// Six-digit input is treated as fully opaque.
    pub fn from_hex(text: &str) -> Result<Self, LogError> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || LogError::InvalidColor(text.to_string());

        if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte_at = |index: usize| {
            u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16).map_err(|_| invalid())
        };

        let alpha = if digits.len() == 8 { byte_at(3)? } else { 0xFF };
        Ok(Self::from_rgba8(byte_at(0)?, byte_at(1)?, byte_at(2)?, alpha))
    }
}

/// Clamp into `[0, 1]` (NaN becomes 0) and map to a rounded byte
fn channel_to_byte(component: f32) -> u8 {
    let clamped = if component.is_nan() {
        0.0
    } else {
        component.clamp(0.0, 1.0)
    };
    (clamped * 255.0).round() as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
