//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They travel from the
//! config and CLI layers into [`geometry`](super::geometry) and the
//! [`compositor`](super::compositor).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 90). Clamped on construction.
//! - [`AspectRatio`]: Crop target as `width:height` (default 16:9).
//! - [`OutputSize`]: Composite dimensions, parsed from `WxH` strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Target aspect ratio for slot crops, stored as integer `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// 16:9, the ratio every slot image is cropped to by default.
    pub const WIDESCREEN: Self = Self {
        width: 16,
        height: 9,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_f64(self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::WIDESCREEN
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid output size '{0}', expected WIDTHxHEIGHT (e.g. 1920x1080)")]
pub struct OutputSizeError(pub String);

/// Pixel dimensions of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    pub const UHD: Self = Self {
        width: 3840,
        height: 2160,
    };

    /// Size the live preview is composed at.
    pub const PREVIEW: Self = Self {
        width: 640,
        height: 360,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for OutputSize {
    type Err = OutputSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || OutputSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width: u32 = w.parse().map_err(|_| err())?;
        let height: u32 = h.parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn widescreen_ratio_value() {
        assert!((AspectRatio::WIDESCREEN.as_f64() - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn output_size_parses_both_separators() {
        assert_eq!("1920x1080".parse(), Ok(OutputSize::FULL_HD));
        assert_eq!("3840X2160".parse(), Ok(OutputSize::UHD));
    }

    #[test]
    fn output_size_rejects_garbage_and_zero() {
        assert!("1920".parse::<OutputSize>().is_err());
        assert!("axb".parse::<OutputSize>().is_err());
        assert!("0x1080".parse::<OutputSize>().is_err());
    }

    #[test]
    fn output_size_display_matches_export_suffix() {
        assert_eq!(OutputSize::new(3841, 2161).to_string(), "3841x2161");
    }
}
