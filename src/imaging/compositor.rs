//! 2×2 grid compositor.
//!
//! Four optional RGB buffers become one image:
//!
//! ```text
//! +-------+-------+
//! |   0   |   1   |
//! +-------+-------+
//! |   2   |   3   |
//! +-------+-------+
//! ```
//!
//! Each tile is `width / 2 × height / 2` (integer halves). Tiles are resized
//! with Lanczos3 in parallel, then pasted onto a black canvas of the full
//! requested size. With odd dimensions the last column/row is left black.
//! Missing tiles stay black as well, so an all-empty grid is a valid
//! all-black image.

use super::params::OutputSize;
use image::RgbImage;
use image::imageops::FilterType;
use rayon::prelude::*;

/// Fixed grid cell, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TilePosition {
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Top-left corner of this cell for the given tile size.
    pub fn offset(self, tile_width: u32, tile_height: u32) -> (u32, u32) {
        match self {
            Self::TopLeft => (0, 0),
            Self::TopRight => (tile_width, 0),
            Self::BottomLeft => (0, tile_height),
            Self::BottomRight => (tile_width, tile_height),
        }
    }
}

/// Canvas and tile dimensions for one composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub canvas: OutputSize,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl GridLayout {
    pub fn new(canvas: OutputSize) -> Self {
        Self {
            canvas,
            tile_width: canvas.width / 2,
            tile_height: canvas.height / 2,
        }
    }

    /// Area actually covered by tiles (drops the odd remainder).
    pub fn covered(&self) -> (u32, u32) {
        (self.tile_width * 2, self.tile_height * 2)
    }

    fn is_degenerate(&self) -> bool {
        self.tile_width == 0 || self.tile_height == 0
    }
}

fn fit_tile(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    image::imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Compose four tiles (slot order 0..3) into a `size` canvas.
pub fn compose(tiles: [Option<&RgbImage>; 4], size: OutputSize) -> RgbImage {
    let layout = GridLayout::new(size);
    let mut canvas = RgbImage::new(size.width, size.height);
    if layout.is_degenerate() {
        return canvas;
    }

    let resized: Vec<Option<RgbImage>> = tiles
        .as_slice()
        .par_iter()
        .map(|tile| tile.map(|img| fit_tile(img, layout.tile_width, layout.tile_height)))
        .collect();

    for (position, tile) in TilePosition::ALL.into_iter().zip(resized) {
        // Empty slots keep the black canvas as their placeholder
        let Some(tile) = tile else { continue };
        let (x, y) = position.offset(layout.tile_width, layout.tile_height);
        image::imageops::replace(&mut canvas, &tile, x as i64, y as i64);
    }

    let (covered_width, covered_height) = layout.covered();
    log::debug!(
        "composed {}x{} grid from {} tile(s), tiles cover {}x{}",
        size.width,
        size.height,
        tiles.iter().filter(|t| t.is_some()).count(),
        covered_width,
        covered_height
    );
    canvas
}
