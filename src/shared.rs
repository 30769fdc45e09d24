//! Thread-safe variant of [`SlotStore`](crate::store::SlotStore).
//!
//! Each slot sits behind its own mutex. Operations that touch two slots take
//! both locks in ascending slot order, so concurrent swaps in opposite
//! directions cannot deadlock. A poisoned lock is recovered: all fallible
//! work runs before the first write, so a slot is never left half-written.

use crate::imaging::{Adjustment, AspectRatio, OutputSize, compose};
use crate::payload::SwapPayload;
use crate::slot::{Slot, SlotError, SlotId, SlotState, decode_cropped};
use image::RgbImage;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
pub struct SharedSlotStore {
    slots: [Mutex<Slot>; SlotId::COUNT],
    aspect: AspectRatio,
}

impl Default for SharedSlotStore {
    fn default() -> Self {
        Self::new(AspectRatio::WIDESCREEN)
    }
}

impl SharedSlotStore {
    pub fn new(aspect: AspectRatio) -> Self {
        Self {
            slots: SlotId::ALL.map(|id| Mutex::new(Slot::new(id))),
            aspect,
        }
    }

    fn lock(&self, id: SlotId) -> MutexGuard<'_, Slot> {
        self.slots[id.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of one slot's content.
    pub fn snapshot(&self, id: SlotId) -> SlotState {
        self.lock(id).snapshot()
    }

    pub fn load(&self, id: SlotId, raw: &[u8], source: impl Into<String>) -> Result<(), SlotError> {
        // Decode outside the lock; only the store itself is serialized
        let image = decode_cropped(raw, self.aspect)?;
        self.lock(id).install_cropped(image, source.into());
        Ok(())
    }

    pub fn set_adjustment(&self, id: SlotId, adjustment: Adjustment) -> Result<(), SlotError> {
        self.lock(id).set_adjustment(adjustment)
    }

    pub fn clear(&self, id: SlotId) {
        self.lock(id).clear();
    }

    /// Lock `dest` and `source` in ascending id order; guards come back as
    /// `(dest, source)`.
    fn lock_pair(
        &self,
        dest: SlotId,
        source: SlotId,
    ) -> (MutexGuard<'_, Slot>, MutexGuard<'_, Slot>) {
        if dest < source {
            let dest_guard = self.lock(dest);
            (dest_guard, self.lock(source))
        } else {
            let source_guard = self.lock(source);
            (self.lock(dest), source_guard)
        }
    }

    /// Install `incoming` in `dest` and move `dest`'s previous state to `source`.
    /// `None` takes the incoming state from `source` under the same locks.
    fn exchange(&self, dest: SlotId, source: SlotId, incoming: Option<SlotState>) {
        let (mut dest_slot, mut source_slot) = self.lock_pair(dest, source);
        let incoming = incoming.unwrap_or_else(|| source_slot.snapshot());
        let previous = dest_slot.replace_state(incoming);
        source_slot.replace_state(previous);
        log::debug!("swapped slot {source} into slot {dest}");
    }

    /// Exchange two slots, locking the lower id first.
    pub fn swap(&self, dest: SlotId, source: usize) -> Result<(), SlotError> {
        let source = SlotId::new(source)?;
        if source == dest {
            return Ok(());
        }
        self.exchange(dest, source, None);
        Ok(())
    }

    /// Swap with the incoming image supplied as encoded bytes.
    ///
    /// Validation and decoding happen before any lock is taken; on error no
    /// slot changes.
    pub fn swap_incoming(
        &self,
        dest: SlotId,
        source: usize,
        raw: &[u8],
        incoming_source: impl Into<String>,
        incoming_adjustment: Adjustment,
    ) -> Result<(), SlotError> {
        let source = SlotId::new(source)?;
        if source == dest {
            return Ok(());
        }
        incoming_adjustment.validate()?;
        let image = decode_cropped(raw, self.aspect)?;

        self.exchange(
            dest,
            source,
            Some(SlotState {
                image: Some(image),
                source: incoming_source.into(),
                adjustment: incoming_adjustment,
            }),
        );
        Ok(())
    }

    /// Apply a drag payload dropped on `dest`; `raw` is the image the payload's
    /// identifier points at.
    pub fn drop_payload(
        &self,
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

    /// Compose a grid from a consistent view of all four slots.
    ///
    /// All locks are held (in slot order) while tiles are copied out, so no
    /// swap can be observed half-way.
    pub fn compose(&self, size: OutputSize) -> RgbImage {
        let guards = SlotId::ALL.map(|id| self.lock(id));
        let tiles = guards.each_ref().map(|slot| slot.displayed().cloned());
        drop(guards);

        compose(tiles.each_ref().map(Option::as_ref), size)
    }
}
