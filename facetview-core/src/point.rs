//! Point, vector and color types

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An RGB color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Sky blue (`#87ceeb`), the viewer background
    pub const SKY_BLUE: Color = Color::new(135.0 / 255.0, 206.0 / 255.0, 235.0 / 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    /// Quantize back to 8-bit channels
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::Parse(format!("invalid hex color '{}'", hex)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| Error::Parse(format!("invalid hex color '{}'", hex)))
        };
        Ok(Self::from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
    }

    /// Format as a lowercase `#rrggbb` string
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Decode the sRGB channels to linear light, as expected by sRGB render targets
    pub fn to_linear(self) -> Self {
        let decode = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        Self::new(decode(self.r), decode(self.g), decode(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb8_scaling() {
        let c = Color::from_rgb8([255, 0, 51]);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
        assert_eq!(c.to_rgb8(), [255, 0, 51]);
    }

    #[test]
    fn test_linear_decoding() {
        let white = Color::WHITE.to_linear();
        assert!((white.r - 1.0).abs() < 1e-6 && (white.b - 1.0).abs() < 1e-6);
        assert_eq!(Color::new(0.0, 0.0, 0.0).to_linear(), Color::new(0.0, 0.0, 0.0));

        // Mid grey from a file is about 21% linear light
        let grey = Color::from_rgb8([128, 128, 128]).to_linear();
        assert!((grey.r - 0.2158).abs() < 1e-3);

        let sky = Color::SKY_BLUE.to_linear();
        assert!((sky.r - 0.2423).abs() < 1e-3);
        assert!((sky.g - 0.6172).abs() < 1e-3);
        assert!((sky.b - 0.8308).abs() < 1e-3);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#87ceeb").unwrap(), Color::SKY_BLUE);
        assert_eq!(Color::from_hex("ffffff").unwrap(), Color::WHITE);
        assert_eq!(Color::SKY_BLUE.to_hex(), "#87ceeb");

        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
    }
}
