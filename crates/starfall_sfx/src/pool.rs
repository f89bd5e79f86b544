//! # Effect Pool
//!
//! Fixed-size slot array owned by one reference frame.
//!
//! ## Design
//!
//! - Storage is materialized on first allocation; until then the pool is
//!   empty and every operation treats it as 1024 free slots
//! - Allocation takes the lowest-indexed free slot (linear scan)
//! - A full pool refuses the allocation; the caller drops the effect
//! - After materialization nothing allocates: slots are reused in place

use starfall_shared::Matrix4x4d;
use tracing::debug;

use crate::render::{EffectRenderer, EffectStyle};
use crate::slot::EffectSlot;

/// Slots per pool.
pub const POOL_CAPACITY: usize = 1024;

/// Per-frame effect storage.
///
/// Slot indices are only meaningful within one call: a retired slot is handed
/// to the next spawn, and loading a save packs effects into the leading slots.
#[derive(Clone, Debug, Default)]
pub struct EffectPool {
    /// `None` until the first allocation.
    slots: Option<Box<[EffectSlot]>>,
}

impl EffectPool {
    /// Creates an empty, unmaterialized pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: None }
    }

    /// Total slots, allocated or not.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        POOL_CAPACITY
    }

    /// True once storage exists.
    #[inline]
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        self.slots.is_some()
    }

    /// All slots in index order. Empty slice if unmaterialized.
    #[must_use]
    pub fn slots(&self) -> &[EffectSlot] {
        self.slots.as_deref().unwrap_or(&[])
    }

    /// Slot at `index`, if materialized and in range.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&EffectSlot> {
        self.slots().get(index)
    }

    /// Mutable slot at `index`, if materialized and in range.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut EffectSlot> {
        self.slots.as_deref_mut()?.get_mut(index)
    }

    /// Returns the first free slot, materializing storage if needed.
    ///
    /// `None` means all [`POOL_CAPACITY`] slots are live. The returned slot is
    /// still [`EffectSlot::Empty`]; write the new effect into it.
    pub fn allocate(&mut self) -> Option<&mut EffectSlot> {
        let slots = self.slots.get_or_insert_with(|| {
            debug!("Materializing effect pool ({} slots)", POOL_CAPACITY);
            vec![EffectSlot::Empty; POOL_CAPACITY].into_boxed_slice()
        });
        slots.iter_mut().find(|slot| !slot.is_live())
    }

    /// Advances every slot by `dt`. No-op if unmaterialized.
    ///
    /// Returns how many effects retired during this step.
    pub fn time_step(&mut self, dt: f32) -> usize {
        let Some(slots) = self.slots.as_deref_mut() else {
            return 0;
        };
        let mut retired = 0;
        for slot in slots {
            if slot.time_step(dt) {
                retired += 1;
            }
        }
        retired
    }

    /// Renders every live slot through `transform` (frame space to camera space).
    ///
    /// Returns the number of draw commands emitted.
    pub fn render<R: EffectRenderer + ?Sized>(
        &self,
        transform: &Matrix4x4d,
        style: &EffectStyle,
        renderer: &mut R,
    ) -> usize {
        self.slots()
            .iter()
            .filter(|slot| slot.is_live())
            .map(|slot| slot.render(transform, style, &mut *renderer))
            .sum()
    }

    /// Number of live slots.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots().iter().filter(|slot| slot.is_live()).count()
    }

    /// Live slots with their current indices, ascending.
    pub fn iter_live(&self) -> impl Iterator<Item = (usize, &EffectSlot)> {
        self.slots()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_live())
    }

    /// Drops the storage, returning the pool to its unmaterialized state.
    pub fn release(&mut self) {
        self.slots = None;
    }
}
