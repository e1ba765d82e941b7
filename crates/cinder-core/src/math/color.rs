// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between shader colors and `#RRGGBB` strings.

use super::Vec4;
use std::fmt;

/// An error produced when a hexadecimal color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string is not `#` followed by exactly six characters.
    InvalidLength(String),
    /// A character pair is not a valid hexadecimal byte.
    InvalidDigit(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidLength(s) => {
                write!(f, "Color '{s}' must have the form #RRGGBB")
            }
            ColorParseError::InvalidDigit(s) => {
                write!(f, "Color '{s}' contains a non hexadecimal digit")
            }
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Converts a color to its `#RRGGBB` representation.
///
/// The alpha channel is ignored and every channel is clamped to `[0, 1]`.
///
/// # Examples
///
/// ```
/// use cinder_core::math::{rgb_to_hex, Vec4};
/// assert_eq!(rgb_to_hex(Vec4::new(1.0, 0.0, 0.5, 1.0)), "#FF0080");
/// ```
pub fn rgb_to_hex(color: Vec4) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(color.x),
        channel(color.y),
        channel(color.z)
    )
}

/// Parses a `#RRGGBB` string (case insensitive) into a color with alpha 1.
pub fn hex_to_rgb(hex: &str) -> Result<Vec4, ColorParseError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.is_ascii())
        .ok_or_else(|| ColorParseError::InvalidLength(hex.to_string()))?;

    let mut channels = [0.0f32; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        let pair = &digits[i * 2..i * 2 + 2];
        let value = u8::from_str_radix(pair, 16)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))?;
        *channel = value as f32 / 255.0;
    }

    Ok(Vec4::new(channels[0], channels[1], channels[2], 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_to_hex_pads_and_clamps() {
        assert_eq!(rgb_to_hex(Vec4::new(0.0, 0.0, 0.0, 1.0)), "#000000");
        assert_eq!(rgb_to_hex(Vec4::new(2.0, -1.0, 1.0, 0.0)), "#FF00FF");
    }

    #[test]
    fn test_hex_to_rgb() {
        let color = hex_to_rgb("#ff8000").unwrap();
        assert_relative_eq!(color.x, 1.0);
        assert_relative_eq!(color.y, 128.0 / 255.0);
        assert_relative_eq!(color.z, 0.0);
        assert_relative_eq!(color.w, 1.0);
    }

    #[test]
    fn test_hex_round_trip_of_exact_bytes() {
        let original = "#1A2B3C";
        assert_eq!(rgb_to_hex(hex_to_rgb(original).unwrap()), original);
    }

    #[test]
    fn test_hex_to_rgb_errors() {
        assert_eq!(
            hex_to_rgb("123456"),
            Err(ColorParseError::InvalidLength("123456".to_string()))
        );
        assert_eq!(
            hex_to_rgb("#12345G"),
            Err(ColorParseError::InvalidDigit("#12345G".to_string()))
        );
        assert_eq!(
            ColorParseError::InvalidLength("#1".to_string()).to_string(),
            "Color '#1' must have the form #RRGGBB"
        );
    }
}
