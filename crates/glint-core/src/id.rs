//! Slot handles and the strongly-typed store indices built on them.

use std::fmt;

/// Position of an item inside a slot arena plus the generation it was
/// allocated in.
///
/// The `slot` is stable for the item's whole lifetime. The `generation` is
/// bumped every time the slot is recycled, so a handle that outlived its
/// item is detected in O(1) instead of silently aliasing whatever entry
/// reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex {
    /// Position in the arena's item vector.
    pub slot: u32,
    /// Recycle count of the slot at allocation time.
    pub generation: u32,
}

impl SlotIndex {
    /// Create a handle for `slot` at `generation`.
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.slot, self.generation)
    }
}

/// Identifies an entry of the interned-text store.
///
/// Two interning requests for byte-equal content made within the same
/// liveness window resolve to equal `TextIndex` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextIndex(pub SlotIndex);

impl fmt::Display for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text#{}", self.0)
    }
}

impl From<SlotIndex> for TextIndex {
    fn from(v: SlotIndex) -> Self {
        Self(v)
    }
}

/// Identifies an entry of the shaped-text store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapedIndex(pub SlotIndex);

impl fmt::Display for ShapedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shaped#{}", self.0)
    }
}

impl From<SlotIndex> for ShapedIndex {
    fn from(v: SlotIndex) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_display() {
        assert_eq!(SlotIndex::new(7, 2).to_string(), "7v2");
        assert_eq!(TextIndex(SlotIndex::new(1, 0)).to_string(), "text#1v0");
        assert_eq!(ShapedIndex(SlotIndex::new(3, 4)).to_string(), "shaped#3v4");
    }

    #[test]
    fn generation_participates_in_equality() {
        let a = TextIndex(SlotIndex::new(5, 0));
        let b = TextIndex(SlotIndex::new(5, 1));
        assert_ne!(a, b);
        assert_eq!(a, TextIndex::from(SlotIndex::new(5, 0)));
    }
}
