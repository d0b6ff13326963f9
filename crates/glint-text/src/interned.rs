//! De-duplicating store for raw text content.
//!
//! [`InternedTextStore`] maps byte content to a stable [`TextIndex`]. All
//! content lives in one shared [`TextBuffer`]; each arena entry records
//! only a span into it and the content hash it was registered under.
//!
//! Lookups are heterogeneous: [`InternedTextStore::find`] hashes the raw
//! probe with the same function used for stored entries and compares the
//! probe against each candidate's dereferenced span, so a hit never
//! requires allocating an entry first.

use std::borrow::Cow;

use glint_arena::{content_hash, ArenaConfig, ConsIndex, Evictable, FrameStats, SlotArena};
use glint_core::{ArenaError, ConfigError, TextIndex};
use tracing::debug;

use crate::buffer::{Span, TextBuffer};
use crate::config::TextLimits;

/// Arena payload of the interned-text store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InternedText {
    /// Location of the content in the shared buffer.
    pub span: Span,
    /// Hash of the stored content; the key under which it is consed.
    pub hash: u64,
}

impl Evictable for InternedText {
    fn on_evict(&mut self) {
        *self = Self::default();
    }
}

/// Content-addressed store of byte strings with frame-based eviction.
pub struct InternedTextStore {
    arena: SlotArena<InternedText>,
    cons: ConsIndex,
    buffer: TextBuffer,
    limits: TextLimits,
}

impl InternedTextStore {
    /// Create an empty store.
    ///
    /// Returns `Err(ConfigError)` if either the arena config or the text
    /// limits fail validation.
    pub fn new(arena: ArenaConfig, limits: TextLimits) -> Result<Self, ConfigError> {
        limits.validate()?;
        Ok(Self {
            arena: SlotArena::new(arena)?,
            cons: ConsIndex::new(),
            buffer: TextBuffer::new(limits.max_total_bytes),
            limits,
        })
    }

    /// Return the index for `text`, interning it on a miss.
    ///
    /// A hit marks the existing entry used. A miss allocates a slot and
    /// copies at most `min(len, max_item_bytes, remaining buffer)` bytes;
    /// the excess is dropped silently. Only arena exhaustion is an error.
    pub fn intern(&mut self, text: &[u8]) -> Result<TextIndex, ArenaError> {
        let probe = &text[..text.len().min(self.limits.max_item_bytes as usize)];
        if let Some(found) = self.find(probe) {
            self.arena.touch(found.0)?;
            return Ok(found);
        }

        // A nearly full buffer stores an even shorter prefix; that prefix
        // may already be interned.
        let stored = &probe[..probe.len().min(self.buffer.remaining())];
        if stored.len() < probe.len() {
            if let Some(found) = self.find(stored) {
                self.arena.touch(found.0)?;
                return Ok(found);
            }
        }

        let index = self.arena.allocate()?;
        let span = self.buffer.append(stored);
        let hash = content_hash(stored);
        *self.arena.get_mut(index)? = InternedText { span, hash };
        self.cons.insert(hash, index);
        Ok(TextIndex(index))
    }

    /// Look up `text` without touching or allocating anything.
    ///
    /// Matches stored content exactly; callers that want the truncation
    /// rules applied should go through [`InternedTextStore::intern`].
    pub fn find(&self, text: &[u8]) -> Option<TextIndex> {
        let hash = content_hash(text);
        self.cons
            .find(hash, |index| {
                self.arena
                    .get(index)
                    .is_ok_and(|entry| self.buffer.slice(entry.span) == text)
            })
            .map(TextIndex)
    }

    /// Mark an entry used in the current frame.
    pub fn touch(&mut self, index: TextIndex) -> Result<(), ArenaError> {
        self.arena.touch(index.0)
    }

    /// The stored bytes of an entry.
    pub fn get(&self, index: TextIndex) -> Result<&[u8], ArenaError> {
        let entry = self.arena.get(index.0)?;
        Ok(self.buffer.slice(entry.span))
    }

    /// The stored bytes of an entry, decoded as UTF-8 with replacement.
    pub fn get_str(&self, index: TextIndex) -> Result<Cow<'_, str>, ArenaError> {
        Ok(String::from_utf8_lossy(self.get(index)?))
    }

    /// Whether `index` currently resolves to a live entry.
    pub fn contains(&self, index: TextIndex) -> bool {
        self.arena.contains(index.0)
    }

    /// Reset per-frame counters.
    pub fn begin_frame(&mut self) {
        self.arena.begin_frame();
    }

    /// Age all entries by one frame, compacting the buffer if anything
    /// was evicted. Returns whether anything was evicted.
    pub fn end_frame(&mut self) -> bool {
        let cons = &mut self.cons;
        let evicted = self.arena.end_frame(|index, entry| {
            cons.remove(entry.hash, index);
        });
        if evicted {
            self.compact();
        }
        evicted
    }

    /// Rebuild the shared buffer from surviving entries only.
    ///
    /// Survivors are copied in live-chain order and their spans rewritten.
    /// Content is byte-identical afterwards. Returns bytes reclaimed.
    pub fn compact(&mut self) -> usize {
        let before = self.buffer.used();
        let mut compaction = self.buffer.start_compaction();
        self.arena.for_each_live_mut(|_, entry| {
            entry.span = compaction.relocate(entry.span);
        });
        let packed = compaction.into_packed();
        let reclaimed = self.buffer.finish_compaction(packed);
        debug!(before, after = self.buffer.used(), reclaimed, "compacted interned text");
        reclaimed
    }

    /// Iterate over live entries and their content.
    pub fn iter(&self) -> impl Iterator<Item = (TextIndex, &[u8])> + '_ {
        self.arena
            .iter()
            .map(|(index, entry)| (TextIndex(index), self.buffer.slice(entry.span)))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Bytes held by the shared buffer, including not-yet-compacted holes.
    pub fn buffer_len(&self) -> usize {
        self.buffer.used()
    }

    /// Per-frame arena counters.
    pub fn frame_stats(&self) -> FrameStats {
        self.arena.frame_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InternedTextStore {
        InternedTextStore::new(ArenaConfig::default(), TextLimits::default()).unwrap()
    }

    fn small_store(max_item_bytes: u32, max_total_bytes: u32) -> InternedTextStore {
        InternedTextStore::new(
            ArenaConfig::default(),
            TextLimits {
                max_item_bytes,
                max_total_bytes,
            },
        )
        .unwrap()
    }

    #[test]
    fn interning_twice_in_a_frame_dedups() {
        let mut s = store();
        s.begin_frame();
        let a = s.intern(b"hello").unwrap();
        let b = s.intern(b"hello").unwrap();
        assert_eq!(a, b);
        assert_eq!(s.len(), 1);
        assert_eq!(s.buffer_len(), 5);
        assert_eq!(s.get(a).unwrap(), b"hello");
    }

    #[test]
    fn distinct_content_gets_distinct_indices() {
        let mut s = store();
        let a = s.intern(b"alpha").unwrap();
        let b = s.intern(b"beta").unwrap();
        assert_ne!(a, b);
        assert_eq!(s.get_str(b).unwrap(), "beta");
    }

    #[test]
    fn oversize_text_truncated_without_error() {
        let mut s = small_store(4, 100);
        let idx = s.intern(b"truncated").unwrap();
        assert_eq!(s.get(idx).unwrap(), b"trun");
        // The same long input keeps resolving to the truncated entry.
        assert_eq!(s.intern(b"truncated").unwrap(), idx);
        assert_eq!(s.intern(b"trun").unwrap(), idx);
    }

    #[test]
    fn full_buffer_stores_shorter_prefix_and_dedups_it() {
        let mut s = small_store(8, 10);
        s.intern(b"12345678").unwrap();
        let a = s.intern(b"abcdef").unwrap();
        assert_eq!(s.get(a).unwrap(), b"ab");
        assert_eq!(s.intern(b"ab").unwrap(), a);
        let empty = s.intern(b"zzz").unwrap();
        assert_eq!(s.get(empty).unwrap(), b"");
        assert_eq!(s.intern(b"yyy").unwrap(), empty);
    }

    #[test]
    fn untouched_entry_survives_one_frame_then_evicts() {
        let mut s = store();
        s.begin_frame();
        let idx = s.intern(b"ephemeral").unwrap();
        assert!(!s.end_frame());

        s.begin_frame();
        assert_eq!(s.find(b"ephemeral"), Some(idx));
        assert!(s.end_frame());

        assert_eq!(s.find(b"ephemeral"), None);
        assert!(s.get(idx).is_err());
        assert_eq!(s.buffer_len(), 0);
    }

    #[test]
    fn compaction_preserves_survivor_content() {
        let mut s = store();
        s.begin_frame();
        let keep_a = s.intern(b"keep-a").unwrap();
        s.intern(b"drop-me").unwrap();
        let keep_b = s.intern(b"keep-b").unwrap();
        s.end_frame();

        s.begin_frame();
        s.touch(keep_a).unwrap();
        s.touch(keep_b).unwrap();
        assert!(s.end_frame());

        assert_eq!(s.get(keep_a).unwrap(), b"keep-a");
        assert_eq!(s.get(keep_b).unwrap(), b"keep-b");
        assert_eq!(s.buffer_len(), 12);
        assert_eq!(s.find(b"keep-b"), Some(keep_b));
    }

    #[test]
    fn capacity_exceeded_surfaces_from_arena() {
        let mut s = InternedTextStore::new(ArenaConfig::new(2), TextLimits::default()).unwrap();
        s.intern(b"a").unwrap();
        s.intern(b"b").unwrap();
        assert_eq!(
            s.intern(b"c"),
            Err(ArenaError::CapacityExceeded { max_items: 2 })
        );
        // Hits still work at capacity.
        assert!(s.intern(b"a").is_ok());
    }

    #[test]
    fn evicted_slot_reuse_is_stale_for_old_handle() {
        let mut s = store();
        let old = s.intern(b"old").unwrap();
        s.end_frame();
        s.end_frame();
        let new = s.intern(b"new").unwrap();
        assert_eq!(old.0.slot, new.0.slot);
        assert!(matches!(s.get(old), Err(ArenaError::StaleHandle { .. })));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn equal_content_yields_equal_index(
                words in proptest::collection::vec("[a-d]{0,4}", 1..40),
            ) {
                let mut s = store();
                let first: Vec<_> = words.iter().map(|w| s.intern(w.as_bytes()).unwrap()).collect();
                for (i, w) in words.iter().enumerate() {
                    prop_assert_eq!(s.intern(w.as_bytes()).unwrap(), first[i]);
                    prop_assert_eq!(s.get(first[i]).unwrap(), w.as_bytes());
                }
                let distinct: std::collections::HashSet<_> = words.iter().collect();
                prop_assert_eq!(s.len(), distinct.len());
            }

            #[test]
            fn survivors_unchanged_across_compacting_frames(
                frames in proptest::collection::vec(
                    proptest::collection::vec("[a-f]{1,6}", 0..12),
                    1..10,
                ),
            ) {
                let mut s = store();
                for words in &frames {
                    s.begin_frame();
                    let interned: Vec<_> = words
                        .iter()
                        .map(|w| (s.intern(w.as_bytes()).unwrap(), w.clone()))
                        .collect();
                    s.end_frame();
                    for (idx, w) in &interned {
                        prop_assert_eq!(s.get(*idx).unwrap(), w.as_bytes());
                    }
                    let live: usize = s.iter().map(|(_, bytes)| bytes.len()).sum();
                    prop_assert!(s.buffer_len() >= live);
                }
            }
        }
    }
}
