//! A single image slot and its state machine.
//!
//! ## States
//!
//! ```text
//!            load / load_image
//!   Empty ───────────────────────▶ Filled
//!     ▲                              │  ▲
//!     │            clear             │  │ load (adjustment kept)
//!     └──────────────────────────────┘  │ set_adjustment
//!                                       └─┘
//! ```
//!
//! A slot owns its canonical image (already cropped), the identifier it came
//! from, and its [`Adjustment`]. The displayed image is derived from those two
//! and recomputed on every mutation; it is never set directly.

use crate::imaging::{
    Adjustment, AdjustmentRangeError, AspectRatio, TilePosition, adjust, crop_to_aspect,
};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("adjustment out of range: {0}")]
    OutOfRange(#[from] AdjustmentRangeError),
    #[error("no slot {0} (slots are numbered 0 to 3)")]
    InvalidSlotReference(usize),
}

/// Stable identity of one of the four slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SlotId(u8);

impl SlotId {
    pub const COUNT: usize = 4;
    pub const FIRST: Self = Self(0);
    pub const ALL: [Self; Self::COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    /// Resolve a raw index, failing for anything outside `0..4`.
    pub fn new(index: usize) -> Result<Self, SlotError> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(SlotError::InvalidSlotReference(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Grid cell this slot is composed into.
    pub fn position(self) -> TilePosition {
        TilePosition::ALL[self.index()]
    }
}

impl TryFrom<usize> for SlotId {
    type Error = SlotError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<SlotId> for usize {
    fn from(id: SlotId) -> Self {
        id.index()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything that defines a slot's content, detached from the slot itself.
///
/// Owned copies only: mutating a slot after taking a state never changes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotState {
    pub image: Option<RgbImage>,
    pub source: String,
    pub adjustment: Adjustment,
}

/// Decode raw bytes as a color image and crop it to `aspect`.
pub fn decode_cropped(raw: &[u8], aspect: AspectRatio) -> Result<RgbImage, SlotError> {
    let decoded = image::load_from_memory(raw).map_err(SlotError::Decode)?;
    Ok(crop_to_aspect(decoded.to_rgb8(), aspect))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    id: SlotId,
    image: Option<RgbImage>,
    source: String,
    adjustment: Adjustment,
    displayed: Option<RgbImage>,
}

impl Slot {
    /// An empty slot.
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            image: None,
            source: String::new(),
            adjustment: Adjustment::NEUTRAL,
            displayed: None,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// The cropped, unadjusted image.
    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    /// The cropped image with the slot's adjustment applied.
    pub fn displayed(&self) -> Option<&RgbImage> {
        self.displayed.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn adjustment(&self) -> Adjustment {
        self.adjustment
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Decode, crop and store `raw`. On error the slot is left unchanged.
    ///
    /// The current adjustment is kept.
    pub fn load(
        &mut self,
        raw: &[u8],
        source: impl Into<String>,
        aspect: AspectRatio,
    ) -> Result<(), SlotError> {
        let image = decode_cropped(raw, aspect)?;
        self.install_cropped(image, source.into());
        Ok(())
    }

    /// Crop and store an already-decoded image.
    pub fn load_image(&mut self, image: RgbImage, source: impl Into<String>, aspect: AspectRatio) {
        self.install_cropped(crop_to_aspect(image, aspect), source.into());
    }

    /// Store an image that already has the target aspect ratio.
    pub(crate) fn install_cropped(&mut self, image: RgbImage, source: String) {
        log::debug!(
            "slot {}: loaded {}x{} from '{}'",
            self.id,
            image.width(),
            image.height(),
            source
        );
        self.image = Some(image);
        self.source = source;
        self.refresh();
    }

    /// Validate and store a new adjustment. On error the slot is left unchanged.
    pub fn set_adjustment(&mut self, adjustment: Adjustment) -> Result<(), SlotError> {
        adjustment.validate()?;
        self.adjustment = adjustment;
        self.refresh();
        Ok(())
    }

    /// Reset to the empty state, adjustment included.
    pub fn clear(&mut self) {
        *self = Self::new(self.id);
        log::debug!("slot {}: cleared", self.id);
    }

    /// Independent copy of the slot's content.
    pub fn snapshot(&self) -> SlotState {
        SlotState {
            image: self.image.clone(),
            source: self.source.clone(),
            adjustment: self.adjustment,
        }
    }

    /// Install `state` wholesale and return what was there before.
    ///
    /// Callers validate `state.adjustment` first.
    pub(crate) fn replace_state(&mut self, state: SlotState) -> SlotState {
        let previous = SlotState {
            image: self.image.take(),
            source: std::mem::take(&mut self.source),
            adjustment: self.adjustment,
        };
        self.image = state.image;
        self.source = state.source;
        self.adjustment = state.adjustment;
        self.refresh();
        previous
    }

    fn refresh(&mut self) {
        self.displayed = self
            .image
            .as_ref()
            .map(|image| adjust(image, self.adjustment));
    }
}
