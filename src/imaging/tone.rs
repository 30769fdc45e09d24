//! Exposure / shadow / highlight tone adjustment.
//!
//! The transform works on each 8-bit channel value independently:
//!
//! ```text
//! v' = v + exposure
//! v' < 128  → v' + shadow
//! v' >= 128 → v' + highlight
//! clamp to 0..=255, truncate
//! ```
//!
//! The shadow/highlight split is taken on the exposure-adjusted value, so a
//! pixel's R, G and B channels may land on different sides of the threshold.
//! Because the result depends only on the input value, [`adjust`] evaluates
//! the curve once into a 256-entry table and maps every row through it.

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted value for any of the three adjustment knobs.
pub const ADJUSTMENT_MIN: i32 = -50;
/// Highest accepted value for any of the three adjustment knobs.
pub const ADJUSTMENT_MAX: i32 = 50;

/// Post-exposure channel values below this are shadows, the rest highlights.
const SHADOW_THRESHOLD: f32 = 128.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} must be between {ADJUSTMENT_MIN} and {ADJUSTMENT_MAX}, got {value}")]
pub struct AdjustmentRangeError {
    pub field: &'static str,
    pub value: i32,
}

/// Per-slot tone settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Adjustment {
    pub exposure: i32,
    pub shadow: i32,
    pub highlight: i32,
}

impl Adjustment {
    /// The do-nothing adjustment.
    pub const NEUTRAL: Self = Self {
        exposure: 0,
        shadow: 0,
        highlight: 0,
    };

    /// Build a validated adjustment.
    pub fn new(exposure: i32, shadow: i32, highlight: i32) -> Result<Self, AdjustmentRangeError> {
        let adjustment = Self {
            exposure,
            shadow,
            highlight,
        };
        adjustment.validate()?;
        Ok(adjustment)
    }

    /// Check every knob is within `ADJUSTMENT_MIN..=ADJUSTMENT_MAX`.
    pub fn validate(&self) -> Result<(), AdjustmentRangeError> {
        for (field, value) in [
            ("exposure", self.exposure),
            ("shadow", self.shadow),
            ("highlight", self.highlight),
        ] {
            if !(ADJUSTMENT_MIN..=ADJUSTMENT_MAX).contains(&value) {
                return Err(AdjustmentRangeError { field, value });
            }
        }
        Ok(())
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Apply the tone curve to a single channel value.
pub fn adjust_channel(value: u8, adjustment: Adjustment) -> u8 {
    let exposed = value as f32 + adjustment.exposure as f32;
    let offset = if exposed < SHADOW_THRESHOLD {
        adjustment.shadow
    } else {
        adjustment.highlight
    };
    (exposed + offset as f32).clamp(0.0, 255.0) as u8
}

fn build_lut(adjustment: Adjustment) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, out) in lut.iter_mut().enumerate() {
        *out = adjust_channel(value as u8, adjustment);
    }
    lut
}

/// Return a tone-adjusted copy of `image`. The input is never modified.
pub fn adjust(image: &RgbImage, adjustment: Adjustment) -> RgbImage {
    let mut out = image.clone();
    if adjustment.is_neutral() {
        return out;
    }

    let lut = build_lut(adjustment);
    let stride = (out.width() as usize * 3).max(1);
    out.par_chunks_mut(stride).for_each(|row| {
        for channel in row.iter_mut() {
            *channel = lut[*channel as usize];
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_image;
    use image::Rgb;

    fn adj(e: i32, s: i32, h: i32) -> Adjustment {
        Adjustment::new(e, s, h).unwrap()
    }

    #[test]
    fn neutral_is_identity() {
        let img = gradient_image(64, 36);
        assert_eq!(adjust(&img, Adjustment::NEUTRAL), img);
        for v in 0..=255u8 {
            assert_eq!(adjust_channel(v, Adjustment::NEUTRAL), v);
        }
    }

    #[test]
    fn shadow_branch_uses_post_exposure_value() {
        // 100 + 20 = 120 < 128 → shadow: 120 - 30 = 90
        assert_eq!(adjust_channel(100, adj(20, -30, 10)), 90);
    }

    #[test]
    fn exposure_can_push_value_into_highlights() {
        // 110 + 20 = 130 >= 128 → highlight: 130 + 10 = 140
        assert_eq!(adjust_channel(110, adj(20, -30, 10)), 140);
    }

    #[test]
    fn threshold_128_selects_highlight() {
        // v + e == 128 exactly
        assert_eq!(adjust_channel(118, adj(10, -50, 5)), 133);
        assert_eq!(adjust_channel(128, adj(0, -50, 5)), 133);
        // one below stays in shadows
        assert_eq!(adjust_channel(117, adj(10, -50, 5)), 77);
    }

    #[test]
    fn matches_closed_form_for_every_value() {
        let settings = [adj(20, -30, 10), adj(-50, 50, -50), adj(50, 50, 50), adj(-7, 3, -11)];
        for a in settings {
            for v in 0..=255i32 {
                let exposed = v + a.exposure;
                let expected = if exposed < 128 {
                    exposed + a.shadow
                } else {
                    exposed + a.highlight
                }
                .clamp(0, 255);
                assert_eq!(adjust_channel(v as u8, a) as i32, expected, "v={v} {a:?}");
            }
        }
    }

    #[test]
    fn results_clamp_at_both_ends() {
        assert_eq!(adjust_channel(250, adj(50, 0, 50)), 255);
        assert_eq!(adjust_channel(5, adj(-50, -50, 0)), 0);
    }

    #[test]
    fn channels_classified_independently() {
        let img = RgbImage::from_pixel(2, 1, Rgb([100, 200, 127]));
        let out = adjust(&img, adj(1, -10, 10));
        // 101 → shadow 91, 201 → highlight 211, 128 → highlight 138
        assert_eq!(out.get_pixel(0, 0), &Rgb([91, 211, 138]));
        assert_eq!(out.get_pixel(1, 0), &Rgb([91, 211, 138]));
    }

    #[test]
    fn adjust_leaves_input_untouched() {
        let img = gradient_image(32, 18);
        let before = img.clone();
        let _ = adjust(&img, adj(30, 30, 30));
        assert_eq!(img, before);
    }

    #[test]
    fn new_rejects_out_of_range_values() {
        assert_eq!(
            Adjustment::new(51, 0, 0),
            Err(AdjustmentRangeError {
                field: "exposure",
                value: 51
            })
        );
        assert_eq!(
            Adjustment::new(0, -51, 0).unwrap_err().field,
            "shadow"
        );
        assert_eq!(
            Adjustment::new(0, 0, 1000).unwrap_err().field,
            "highlight"
        );
        assert!(Adjustment::new(-50, 50, 0).is_ok());
    }
}
