//! Drag payload: what a front end carries from the dragged slot to the drop
//! target.
//!
//! Text form, one record per drag:
//!
//! ```text
//! {source_slot}|{source}|{exposure}|{shadow}|{highlight}
//! 0|photos/dawn.jpg|20|-30|10
//! ```
//!
//! The identifier may itself contain `|`; only the first and the last three
//! separators are structural.

use crate::imaging::Adjustment;
use crate::slot::Slot;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("expected 5 '|'-separated fields in '{0}'")]
    FieldCount(String),
    #[error("field '{field}' is not an integer: '{value}'")]
    NotANumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPayload {
    /// Raw index of the dragged slot; resolved (and possibly rejected) at drop.
    pub source_slot: usize,
    pub source: String,
    pub adjustment: Adjustment,
}

impl SwapPayload {
    /// Payload describing a drag that starts at `slot`.
    pub fn from_slot(slot: &Slot) -> Self {
        Self {
            source_slot: slot.id().index(),
            source: slot.source().to_string(),
            adjustment: slot.adjustment(),
        }
    }
}

impl fmt::Display for SwapPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}",
            self.source_slot,
            self.source,
            self.adjustment.exposure,
            self.adjustment.shadow,
            self.adjustment.highlight
        )
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, PayloadError> {
    value.trim().parse().map_err(|_| PayloadError::NotANumber {
        field,
        value: value.to_string(),
    })
}

impl FromStr for SwapPayload {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field_count = || PayloadError::FieldCount(s.to_string());
        let (slot, rest) = s.split_once('|').ok_or_else(field_count)?;

        // rsplitn yields highlight, shadow, exposure, then the identifier
        let mut tail = rest.rsplitn(4, '|');
        let highlight = tail.next().ok_or_else(field_count)?;
        let shadow = tail.next().ok_or_else(field_count)?;
        let exposure = tail.next().ok_or_else(field_count)?;
        let source = tail.next().ok_or_else(field_count)?;

        // Range is checked at drop time, together with the slot reference
        Ok(Self {
            source_slot: parse_field("slot", slot)?,
            source: source.to_string(),
            adjustment: Adjustment {
                exposure: parse_field("exposure", exposure)?,
                shadow: parse_field("shadow", shadow)?,
                highlight: parse_field("highlight", highlight)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::AspectRatio;
    use crate::slot::SlotId;
    use crate::test_helpers::{adjustment, solid_image};

    #[test]
    fn parses_text_form() {
        let p: SwapPayload = "0|photos/dawn.jpg|20|-30|10".parse().unwrap();
        assert_eq!(p.source_slot, 0);
        assert_eq!(p.source, "photos/dawn.jpg");
        assert_eq!(p.adjustment, adjustment(20, -30, 10));
    }

    #[test]
    fn text_form_survives_display() {
        let p = SwapPayload {
            source_slot: 3,
            source: "a|b.png".into(),
            adjustment: adjustment(-1, 0, 50),
        };
        assert_eq!(p.to_string(), "3|a|b.png|-1|0|50");
        assert_eq!(p.to_string().parse::<SwapPayload>(), Ok(p));
    }

    #[test]
    fn empty_identifier_is_allowed() {
        let p: SwapPayload = "2||0|0|0".parse().unwrap();
        assert_eq!(p.source, "");
    }

    #[test]
    fn too_few_fields() {
        assert!(matches!(
            "1|x.png|0|0".parse::<SwapPayload>(),
            Err(PayloadError::FieldCount(_))
        ));
        assert!(matches!(
            "garbage".parse::<SwapPayload>(),
            Err(PayloadError::FieldCount(_))
        ));
    }

    #[test]
    fn non_numeric_fields() {
        assert_eq!(
            "x|a.png|0|0|0".parse::<SwapPayload>(),
            Err(PayloadError::NotANumber {
                field: "slot",
                value: "x".into()
            })
        );
        assert!(matches!(
            "0|a.png|0|high|0".parse::<SwapPayload>(),
            Err(PayloadError::NotANumber { field: "shadow", .. })
        ));
    }

    #[test]
    fn out_of_range_values_still_parse() {
        let p: SwapPayload = "9|a.png|99|0|0".parse().unwrap();
        assert_eq!(p.source_slot, 9);
        assert_eq!(p.adjustment.exposure, 99);
    }

    #[test]
    fn from_slot_captures_identity_and_adjustment() {
        let mut slot = Slot::new(SlotId::new(1).unwrap());
        slot.load_image(solid_image(16, 9, [0, 0, 0]), "b.jpg", AspectRatio::WIDESCREEN);
        slot.set_adjustment(adjustment(4, 5, 6)).unwrap();

        assert_eq!(
            SwapPayload::from_slot(&slot).to_string(),
            "1|b.jpg|4|5|6"
        );
    }
}
