//! Frame-aged slot arena.
//!
//! [`SlotArena`] stores fixed-shape items in a `Vec` and hands out
//! [`SlotIndex`] handles. Every slot sits on exactly one of two singly
//! linked chains threaded through the vector:
//!
//! ```text
//! live chain:  head ─► [used] ─► [unused] ─► [used] ─► ∅
//! free chain:  head ─► [free] ─► [free] ─► ∅
//! ```
//!
//! Liveness is a two-generation clock. Touching an item (a cache hit or a
//! fresh allocation) marks it `Used`. Each [`SlotArena::end_frame`] sweep
//! demotes `Used` to `Unused` and reclaims everything that was already
//! `Unused`, so an item survives exactly as long as it is touched at least
//! once every two sweeps.

use glint_core::{ArenaError, ConfigError, SlotIndex};
use tracing::{trace, warn};

use crate::config::ArenaConfig;
use crate::stats::FrameStats;

/// Release hook run on an item when its slot is reclaimed.
///
/// Called by the sweep after the owning store's eviction callback, so the
/// store can still read the item (e.g. to unregister it from an index)
/// before it is cleared.
pub trait Evictable {
    /// Drop any state that must not outlive the item.
    fn on_evict(&mut self);
}

/// Liveness marker of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Touched since the last sweep.
    Used,
    /// Survived one sweep without a touch; the next sweep reclaims it.
    Unused,
    /// On the free chain, waiting to be recycled.
    Free,
}

struct Slot<T> {
    state: SlotState,
    /// Bumped every time the slot is recycled.
    generation: u32,
    /// Next slot on whichever chain this slot is linked into.
    next: Option<u32>,
    item: T,
}

/// Index-stable pool of reusable items with frame-based eviction.
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    /// Head of the used/unused chain, most recently allocated first.
    live_head: Option<u32>,
    /// Head of the recycled-slot chain.
    free_head: Option<u32>,
    /// Number of slots on the live chain.
    live: u32,
    config: ArenaConfig,
    stats: FrameStats,
}

impl<T> SlotArena<T> {
    /// Create an empty arena.
    ///
    /// Returns `Err(ConfigError)` if `config` fails validation.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            slots: Vec::new(),
            live_head: None,
            free_head: None,
            live: 0,
            config,
            stats: FrameStats::default(),
        })
    }

    /// Reset the per-frame counters. Has no effect on liveness.
    pub fn begin_frame(&mut self) {
        self.stats = FrameStats::default();
    }

    /// Mark an item as used in the current frame.
    pub fn touch(&mut self, index: SlotIndex) -> Result<(), ArenaError> {
        let pos = self.position(index)?;
        self.slots[pos].state = SlotState::Used;
        Ok(())
    }

    /// Liveness state of a live item.
    pub fn state(&self, index: SlotIndex) -> Result<SlotState, ArenaError> {
        let pos = self.position(index)?;
        Ok(self.slots[pos].state)
    }

    /// Shared access to a live item.
    pub fn get(&self, index: SlotIndex) -> Result<&T, ArenaError> {
        let pos = self.position(index)?;
        Ok(&self.slots[pos].item)
    }

    /// Mutable access to a live item. Does not touch it.
    pub fn get_mut(&mut self, index: SlotIndex) -> Result<&mut T, ArenaError> {
        let pos = self.position(index)?;
        Ok(&mut self.slots[pos].item)
    }

    /// Whether `index` currently resolves to a live item.
    pub fn contains(&self, index: SlotIndex) -> bool {
        self.position(index).is_ok()
    }

    /// Iterate over live items, most recently allocated first.
    pub fn iter(&self) -> LiveIter<'_, T> {
        LiveIter {
            slots: &self.slots,
            cursor: self.live_head,
        }
    }

    /// Visit every live item mutably, in the same order as [`SlotArena::iter`].
    pub fn for_each_live_mut(&mut self, mut f: impl FnMut(SlotIndex, &mut T)) {
        let mut cursor = self.live_head;
        while let Some(slot) = cursor {
            let entry = &mut self.slots[slot as usize];
            cursor = entry.next;
            f(SlotIndex::new(slot, entry.generation), &mut entry.item);
        }
    }

    /// Number of live (used or unused) items.
    pub fn len(&self) -> usize {
        self.live as usize
    }

    /// Whether the arena holds no live items.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots ever created (live plus free).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slots waiting on the free chain.
    pub fn free_count(&self) -> usize {
        self.slots.len() - self.live as usize
    }

    /// Counters for the current frame.
    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    fn position(&self, index: SlotIndex) -> Result<usize, ArenaError> {
        let pos = index.slot as usize;
        let slot = self
            .slots
            .get(pos)
            .ok_or(ArenaError::InvalidHandle { index })?;
        if slot.state == SlotState::Free {
            return Err(ArenaError::InvalidHandle { index });
        }
        if slot.generation != index.generation {
            return Err(ArenaError::StaleHandle {
                index,
                current: slot.generation,
            });
        }
        Ok(pos)
    }
}

impl<T: Default + Evictable> SlotArena<T> {
    /// Allocate a slot holding `T::default()`, marked used.
    ///
    /// Recycles the most recently freed slot when one exists; otherwise
    /// grows the arena by one. Returns `Err(ArenaError::CapacityExceeded)`
    /// if growing would exceed `max_items`.
    pub fn allocate(&mut self) -> Result<SlotIndex, ArenaError> {
        let slot = match self.free_head {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                self.free_head = entry.next;
                entry.generation = entry.generation.wrapping_add(1);
                entry.item = T::default();
                slot
            }
            None => {
                if self.slots.len() >= self.config.max_items as usize {
                    warn!(max_items = self.config.max_items, "slot arena capacity exceeded");
                    return Err(ArenaError::CapacityExceeded {
                        max_items: self.config.max_items,
                    });
                }
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    state: SlotState::Free,
                    generation: 0,
                    next: None,
                    item: T::default(),
                });
                slot
            }
        };

        let entry = &mut self.slots[slot as usize];
        entry.state = SlotState::Used;
        entry.next = self.live_head;
        self.live_head = Some(slot);
        self.live += 1;
        self.stats.allocated += 1;
        Ok(SlotIndex::new(slot, entry.generation))
    }

    /// Age every live item by one generation.
    ///
    /// `Unused` items are handed to `on_evict`, then to
    /// [`Evictable::on_evict`], and moved to the free chain. `Used` items
    /// are demoted to `Unused` and stay on the live chain in their current
    /// order. Returns whether anything was evicted.
    pub fn end_frame(&mut self, mut on_evict: impl FnMut(SlotIndex, &mut T)) -> bool {
        let mut cursor = self.live_head.take();
        let mut tail: Option<u32> = None;
        let mut evicted = 0u32;
        let mut alive = 0u32;

        while let Some(slot) = cursor {
            let pos = slot as usize;
            cursor = self.slots[pos].next.take();
            match self.slots[pos].state {
                SlotState::Unused => {
                    let entry = &mut self.slots[pos];
                    on_evict(SlotIndex::new(slot, entry.generation), &mut entry.item);
                    entry.item.on_evict();
                    entry.state = SlotState::Free;
                    entry.next = self.free_head;
                    self.free_head = Some(slot);
                    evicted += 1;
                }
                SlotState::Used => {
                    self.slots[pos].state = SlotState::Unused;
                    match tail {
                        Some(prev) => self.slots[prev as usize].next = Some(slot),
                        None => self.live_head = Some(slot),
                    }
                    tail = Some(slot);
                    alive += 1;
                }
                SlotState::Free => {
                    debug_assert!(false, "free slot {slot} linked into the live chain");
                }
            }
        }

        self.live = alive;
        self.stats.evicted = evicted;
        self.stats.alive = alive;
        self.stats.slots = self.slots.len() as u32;
        trace!(evicted, alive, slots = self.slots.len(), "slot arena sweep");
        evicted > 0
    }
}

/// Iterator over the live chain of a [`SlotArena`].
pub struct LiveIter<'a, T> {
    slots: &'a [Slot<T>],
    cursor: Option<u32>,
}

impl<'a, T> Iterator for LiveIter<'a, T> {
    type Item = (SlotIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let entry = &self.slots[slot as usize];
        self.cursor = entry.next;
        Some((SlotIndex::new(slot, entry.generation), &entry.item))
    }
}
