//! Center-crop geometry.
//!
//! [`crop_rect`] is pure dimension math and testable without pixels;
//! [`crop_to_aspect`] applies it to an RGB buffer.

use super::params::AspectRatio;
use image::RgbImage;

/// Ratios closer than this are treated as already matching.
const RATIO_EPSILON: f64 = 1e-9;

/// A crop window inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the centered crop window that brings `(width, height)` to `aspect`.
///
/// Returns `None` when the source already has the target ratio or has a
/// zero dimension.
/// Too-wide sources lose columns on both sides, too-tall sources lose rows
/// top and bottom. Computed dimensions are never smaller than 1.
///
/// # Examples
/// ```
/// # use quadframe::imaging::{AspectRatio, CropRect, crop_rect};
/// // 4000x2000 is wider than 16:9 → keep 3555 columns starting at 222
/// assert_eq!(
///     crop_rect(4000, 2000, AspectRatio::WIDESCREEN),
///     Some(CropRect { x: 222, y: 0, width: 3555, height: 2000 })
/// );
///
/// assert_eq!(crop_rect(1920, 1080, AspectRatio::WIDESCREEN), None);
/// ```
pub fn crop_rect(width: u32, height: u32, aspect: AspectRatio) -> Option<CropRect> {
    if width == 0 || height == 0 {
        return None;
    }
    let target = aspect.as_f64();
    let current = width as f64 / height as f64;

    if (current - target).abs() < RATIO_EPSILON {
        return None;
    }

    if current > target {
        // Too wide: trim columns
        let new_width = floor_scale(height, aspect.width, aspect.height).clamp(1, width);
        Some(CropRect {
            x: (width - new_width) / 2,
            y: 0,
            width: new_width,
            height,
        })
    } else {
        // Too tall: trim rows
        let new_height = floor_scale(width, aspect.height, aspect.width).clamp(1, height);
        Some(CropRect {
            x: 0,
            y: (height - new_height) / 2,
            width,
            height: new_height,
        })
    }
}

/// `floor(value * num / den)` in integer arithmetic.
fn floor_scale(value: u32, num: u32, den: u32) -> u32 {
    (value as u64 * num as u64 / den as u64) as u32
}

/// Crop `image` around its center to `aspect`.
///
/// An image that already has the target ratio is handed back as-is, without
/// a copy.
pub fn crop_to_aspect(image: RgbImage, aspect: AspectRatio) -> RgbImage {
    match crop_rect(image.width(), image.height(), aspect) {
        None => image,
        Some(rect) => {
            image::imageops::crop_imm(&image, rect.x, rect.y, rect.width, rect.height).to_image()
        }
    }
}
