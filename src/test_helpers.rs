//! Shared test utilities for the quadframe test suite.
//!
//! Synthetic fixtures only: images are generated in memory and encoded on the
//! fly, so no binary fixtures ship with the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = png_bytes(&gradient_image(400, 200));
//! let mut store = SlotStore::default();
//! store.load(SlotId::FIRST, &bytes, "a.png").unwrap();
//! ```

use image::{ImageEncoder, Rgb, RgbImage};
use std::path::Path;

use crate::imaging::Adjustment;

// =========================================================================
// Pixel fixtures
// =========================================================================

/// Deterministic image whose pixels encode their own coordinates.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Single-color image.
pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// Encode an image as PNG bytes (lossless, so decoded pixels match exactly).
pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

/// Write an image as a PNG file.
pub fn write_png(path: &Path, img: &RgbImage) {
    std::fs::write(path, png_bytes(img)).unwrap();
}

pub fn adjustment(exposure: i32, shadow: i32, highlight: i32) -> Adjustment {
    Adjustment::new(exposure, shadow, highlight).unwrap()
}
