//! Pixel-level building blocks: pure functions over `image::RgbImage`.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` → `to_rgb8` |
//! | **Center crop** | [`crop_rect`] + `image::imageops::crop_imm` |
//! | **Tone curve** | 256-entry lookup table, rows mapped with rayon |
//! | **Tile resize** | `image::imageops::resize` with `Lanczos3` |
//! | **Grid paste** | `image::imageops::replace` |
//!
//! The module is split into:
//! - **Parameters**: aspect ratio, output size, encode quality
//! - **Geometry**: crop-window math (unit testable without pixels)
//! - **Tone**: the exposure/shadow/highlight transform
//! - **Compositor**: 2×2 tile assembly

pub mod compositor;
pub mod geometry;
mod params;
pub mod tone;

pub use compositor::{GridLayout, TilePosition, compose};
pub use geometry::{CropRect, crop_rect, crop_to_aspect};
pub use params::{AspectRatio, OutputSize, OutputSizeError, Quality};
pub use tone::{ADJUSTMENT_MAX, ADJUSTMENT_MIN, Adjustment, AdjustmentRangeError, adjust};
