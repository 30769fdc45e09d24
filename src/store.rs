//! The four-slot collection and the swap protocol.
//!
//! [`SlotStore`] is the only owner of slot state; front ends hold it and call
//! into it one event at a time. Every mutating method either succeeds
//! completely or leaves every slot untouched.
//!
//! ## Swap
//!
//! A swap models dropping the content of slot *S* onto slot *D*:
//!
//! 1. check that *S* names one of the four slots;
//! 2. stop here if *S* is *D* (a slot dropped on itself);
//! 3. check the incoming adjustment and decode the incoming image;
//! 4. install the incoming state in *D*, keeping *D*'s previous state;
//! 5. install *D*'s previous state in *S*.
//!
//! All fallible work happens in steps 1–3, before either slot is mutated.

use crate::imaging::{Adjustment, AspectRatio, OutputSize, compose};
use crate::payload::SwapPayload;
use crate::slot::{Slot, SlotError, SlotId, SlotState, decode_cropped};
use image::RgbImage;

#[derive(Debug, Clone, PartialEq)]
pub struct SlotStore {
    slots: [Slot; SlotId::COUNT],
    aspect: AspectRatio,
}

impl Default for SlotStore {
    fn default() -> Self {
        Self::new(AspectRatio::WIDESCREEN)
    }
}

impl SlotStore {
    /// Four empty slots cropping to `aspect`.
    pub fn new(aspect: AspectRatio) -> Self {
        Self {
            slots: SlotId::ALL.map(Slot::new),
            aspect,
        }
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.index()]
    }

    pub fn slots(&self) -> &[Slot; SlotId::COUNT] {
        &self.slots
    }

    /// True when no slot holds an image.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_empty)
    }

    pub fn load(
        &mut self,
        id: SlotId,
        raw: &[u8],
        source: impl Into<String>,
    ) -> Result<(), SlotError> {
        let aspect = self.aspect;
        self.slots[id.index()].load(raw, source, aspect)
    }

    pub fn load_image(&mut self, id: SlotId, image: RgbImage, source: impl Into<String>) {
        let aspect = self.aspect;
        self.slots[id.index()].load_image(image, source, aspect);
    }

    pub fn set_adjustment(&mut self, id: SlotId, adjustment: Adjustment) -> Result<(), SlotError> {
        self.slots[id.index()].set_adjustment(adjustment)
    }

    pub fn clear(&mut self, id: SlotId) {
        self.slots[id.index()].clear();
    }

    pub fn clear_all(&mut self) {
        self.slots.iter_mut().for_each(Slot::clear);
    }

    /// Exchange the full content of two slots already held in memory.
    ///
    /// `source` is a raw index so that stale references from a front end are
    /// reported instead of panicking.
    pub fn swap(&mut self, dest: SlotId, source: usize) -> Result<(), SlotError> {
        let source = SlotId::new(source)?;
        if source == dest {
            log::debug!("slot {dest}: dropped on itself, nothing to swap");
            return Ok(());
        }
        let incoming = self.slots[source.index()].snapshot();
        self.exchange(dest, source, incoming);
        Ok(())
    }

    /// Full swap protocol with the incoming image supplied as encoded bytes.
    ///
    /// `raw` is decoded and cropped into `dest` together with
    /// `incoming_source` and `incoming_adjustment`; `dest`'s previous content
    /// moves to `source`.
    pub fn swap_incoming(
        &mut self,
        dest: SlotId,
        source: usize,
        raw: &[u8],
        incoming_source: impl Into<String>,
        incoming_adjustment: Adjustment,
    ) -> Result<(), SlotError> {
        let source = SlotId::new(source)?;
        if source == dest {
            log::debug!("slot {dest}: dropped on itself, nothing to swap");
            return Ok(());
        }
        incoming_adjustment.validate()?;
        let image = decode_cropped(raw, self.aspect)?;

        self.exchange(
            dest,
            source,
            SlotState {
                image: Some(image),
                source: incoming_source.into(),
                adjustment: incoming_adjustment,
            },
        );
        Ok(())
    }

    /// Apply a drag payload dropped on `dest`; `raw` is the image the payload's
    /// identifier points at.
    pub fn drop_payload(
        &mut self,
        dest: SlotId,
        payload: &SwapPayload,
        raw: &[u8],
    ) -> Result<(), SlotError> {
        self.swap_incoming(
            dest,
            payload.source_slot,
            raw,
            payload.source.clone(),
            payload.adjustment,
        )
    }

    /// Infallible tail of a swap. `incoming.adjustment` must be valid.
    fn exchange(&mut self, dest: SlotId, source: SlotId, incoming: SlotState) {
        let previous = self.slots[dest.index()].replace_state(incoming);
        self.slots[source.index()].replace_state(previous);
        log::debug!("swapped slot {source} into slot {dest}");
    }

    /// Displayed images in grid order, `None` for empty slots.
    pub fn tiles(&self) -> [Option<&RgbImage>; SlotId::COUNT] {
        self.slots.each_ref().map(Slot::displayed)
    }

    /// Compose the current displayed images into a 2×2 grid.
    pub fn compose(&self, size: OutputSize) -> RgbImage {
        compose(self.tiles(), size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{adjustment, gradient_image, png_bytes, solid_image};
    use image::Rgb;

    fn id(i: usize) -> SlotId {
        SlotId::new(i).unwrap()
    }

    fn filled_store() -> SlotStore {
        let mut store = SlotStore::default();
        store.load_image(id(0), gradient_image(64, 36), "a.png");
        store.set_adjustment(id(0), adjustment(10, -5, 5)).unwrap();
        store.load_image(id(1), solid_image(32, 18, [200, 10, 10]), "b.png");
        store.set_adjustment(id(1), adjustment(-20, 0, 30)).unwrap();
        store
    }

    #[test]
    fn default_store_is_empty() {
        let store = SlotStore::default();
        assert!(store.is_empty());
        assert_eq!(store.aspect(), AspectRatio::WIDESCREEN);
        for (i, slot) in store.slots().iter().enumerate() {
            assert_eq!(slot.id().index(), i);
        }
    }

    #[test]
    fn swap_exchanges_image_source_and_adjustment() {
        let mut store = filled_store();
        let a = store.slot(id(0)).snapshot();
        let b = store.slot(id(1)).snapshot();

        store.swap(id(1), 0).unwrap();

        assert_eq!(store.slot(id(1)).snapshot(), a);
        assert_eq!(store.slot(id(0)).snapshot(), b);
    }

    #[test]
    fn swap_recomputes_displayed_images() {
        let mut store = filled_store();
        store.swap(id(1), 0).unwrap();

        for slot in store.slots() {
            let expected = slot
                .image()
                .map(|img| crate::imaging::adjust(img, slot.adjustment()));
            assert_eq!(slot.displayed(), expected.as_ref());
        }
    }

    #[test]
    fn swapping_twice_restores_original_state() {
        let mut store = filled_store();
        let original = store.clone();

        store.swap(id(1), 0).unwrap();
        assert_ne!(store, original);
        store.swap(id(1), 0).unwrap();

        assert_eq!(store, original);
    }

    #[test]
    fn self_swap_is_noop() {
        let mut store = filled_store();
        let original = store.clone();
        store.swap(id(0), 0).unwrap();
        assert_eq!(store, original);
    }

    #[test]
    fn swap_with_empty_slot_moves_content() {
        let mut store = filled_store();
        let a = store.slot(id(0)).snapshot();
        store.swap(id(3), 0).unwrap();

        assert_eq!(store.slot(id(3)).snapshot(), a);
        assert!(store.slot(id(0)).is_empty());
        assert!(store.slot(id(0)).displayed().is_none());
    }

    #[test]
    fn swap_with_unknown_source_touches_nothing() {
        let mut store = filled_store();
        let original = store.clone();
        assert!(matches!(
            store.swap(id(0), 7),
            Err(SlotError::InvalidSlotReference(7))
        ));
        assert_eq!(store, original);
    }

    #[test]
    fn swap_incoming_decodes_into_dest() {
        let mut store = filled_store();
        let old_dest = store.slot(id(1)).snapshot();
        let incoming = png_bytes(&gradient_image(400, 200));

        store
            .swap_incoming(id(1), 0, &incoming, "c.png", adjustment(1, 2, 3))
            .unwrap();

        let dest = store.slot(id(1));
        assert_eq!(dest.image().unwrap().dimensions(), (355, 200));
        assert_eq!(dest.source(), "c.png");
        assert_eq!(dest.adjustment(), adjustment(1, 2, 3));
        assert_eq!(store.slot(id(0)).snapshot(), old_dest);
    }

    #[test]
    fn swap_incoming_is_all_or_nothing() {
        let mut store = filled_store();
        let original = store.clone();
        let good = png_bytes(&gradient_image(32, 18));

        assert!(matches!(
            store.swap_incoming(id(1), 0, b"not an image", "x", Adjustment::NEUTRAL),
            Err(SlotError::Decode(_))
        ));
        let too_bright = Adjustment {
            exposure: 51,
            ..Adjustment::NEUTRAL
        };
        assert!(matches!(
            store.swap_incoming(id(1), 0, &good, "x", too_bright),
            Err(SlotError::OutOfRange(_))
        ));
        assert!(matches!(
            store.swap_incoming(id(1), 4, &good, "x", Adjustment::NEUTRAL),
            Err(SlotError::InvalidSlotReference(4))
        ));

        assert_eq!(store, original);
    }

    #[test]
    fn drop_payload_on_itself_does_not_reload() {
        let mut store = filled_store();
        let original = store.clone();
        let payload = SwapPayload::from_slot(store.slot(id(0)));

        // Bytes are ignored for a self-drop, even if they would not decode
        store.drop_payload(id(0), &payload, b"").unwrap();
        assert_eq!(store, original);
    }

    #[test]
    fn drop_payload_swaps_with_reloaded_image() {
        let mut store = SlotStore::default();
        let red = solid_image(32, 18, [255, 0, 0]);
        let blue = solid_image(32, 18, [0, 0, 255]);
        store.load_image(id(0), red.clone(), "red.png");
        store.load_image(id(2), blue.clone(), "blue.png");
        store.set_adjustment(id(2), adjustment(0, 0, -5)).unwrap();

        let payload = SwapPayload::from_slot(store.slot(id(0)));
        store.drop_payload(id(2), &payload, &png_bytes(&red)).unwrap();

        assert_eq!(store.slot(id(2)).image(), Some(&red));
        assert_eq!(store.slot(id(2)).source(), "red.png");
        assert_eq!(store.slot(id(2)).adjustment(), Adjustment::NEUTRAL);
        assert_eq!(store.slot(id(0)).image(), Some(&blue));
        assert_eq!(store.slot(id(0)).adjustment(), adjustment(0, 0, -5));
    }

    #[test]
    fn clear_all_empties_every_slot() {
        let mut store = filled_store();
        store.clear_all();
        assert_eq!(store, SlotStore::default());
    }

    #[test]
    fn compose_uses_displayed_images() {
        let mut store = SlotStore::default();
        store.load_image(id(0), solid_image(16, 9, [100, 100, 100]), "grey");
        store.set_adjustment(id(0), adjustment(20, -30, 10)).unwrap();

        let out = store.compose(OutputSize::new(32, 18));
        assert_eq!(out.get_pixel(0, 0), &Rgb([90, 90, 90]));
        assert_eq!(out.get_pixel(31, 17), &Rgb([0, 0, 0]));
    }

    #[test]
    fn compose_empty_store_full_hd_is_black() {
        let out = SlotStore::default().compose(OutputSize::FULL_HD);
        assert_eq!(out.dimensions(), (1920, 1080));
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
