//! Shared append-only byte buffer backing the interned-text store.
//!
//! A [`TextBuffer`] is a `Vec<u8>` with bump-style appends, bounded by a
//! total byte cap. Evicted entries leave holes behind; the buffer never
//! reuses them in place. Instead the owning store periodically runs a
//! [`Compaction`], copying every surviving span into a fresh vector and
//! rewriting the spans to their new offsets.

/// A byte range inside a [`TextBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset in bytes.
    pub offset: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    fn range(self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// Append-only byte storage with a hard size cap.
#[derive(Debug)]
pub struct TextBuffer {
    data: Vec<u8>,
    max_total_bytes: u32,
}

impl TextBuffer {
    /// Create an empty buffer that will never grow past `max_total_bytes`.
    pub fn new(max_total_bytes: u32) -> Self {
        Self {
            data: Vec::new(),
            max_total_bytes,
        }
    }

    /// Append as much of `bytes` as still fits and return its span.
    ///
    /// Anything past the remaining capacity is dropped; a full buffer
    /// yields an empty span.
    pub fn append(&mut self, bytes: &[u8]) -> Span {
        let len = bytes.len().min(self.remaining());
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(&bytes[..len]);
        Span {
            offset,
            len: len as u32,
        }
    }

    /// Bytes covered by `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` extends past the end of the buffer.
    pub fn slice(&self, span: Span) -> &[u8] {
        &self.data[span.range()]
    }

    /// Bytes currently stored, including holes left by evicted entries.
    pub fn used(&self) -> usize {
        self.data.len()
    }

    /// Bytes that may still be appended.
    pub fn remaining(&self) -> usize {
        (self.max_total_bytes as usize).saturating_sub(self.data.len())
    }

    /// Begin rebuilding the buffer from its surviving spans.
    pub fn start_compaction(&self) -> Compaction<'_> {
        Compaction {
            source: &self.data,
            packed: Vec::with_capacity(self.data.len()),
        }
    }

    /// Replace the contents with a packed vector produced by a
    /// [`Compaction`]. Returns the number of bytes reclaimed.
    pub fn finish_compaction(&mut self, packed: Vec<u8>) -> usize {
        let reclaimed = self.data.len().saturating_sub(packed.len());
        self.data = packed;
        reclaimed
    }
}

/// In-progress rebuild of a [`TextBuffer`].
///
/// Borrows the old contents; survivors are copied out one span at a time
/// in whatever order the caller visits them.
pub struct Compaction<'a> {
    source: &'a [u8],
    packed: Vec<u8>,
}

impl Compaction<'_> {
    /// Copy `span`'s bytes into the packed buffer and return its new span.
    pub fn relocate(&mut self, span: Span) -> Span {
        let offset = self.packed.len() as u32;
        self.packed.extend_from_slice(&self.source[span.range()]);
        Span {
            offset,
            len: span.len,
        }
    }

    /// Finish copying and hand back the packed bytes.
    pub fn into_packed(self) -> Vec<u8> {
        self.packed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_appends_do_not_overlap() {
        let mut buf = TextBuffer::new(1024);
        let a = buf.append(b"hello");
        let b = buf.append(b"world");
        assert_eq!(a, Span { offset: 0, len: 5 });
        assert_eq!(b, Span { offset: 5, len: 5 });
        assert_eq!(buf.slice(a), b"hello");
        assert_eq!(buf.slice(b), b"world");
        assert_eq!(buf.used(), 10);
    }

    #[test]
    fn append_truncates_at_total_cap() {
        let mut buf = TextBuffer::new(8);
        buf.append(b"abcde");
        let span = buf.append(b"fghij");
        assert_eq!(span.len, 3);
        assert_eq!(buf.slice(span), b"fgh");
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.append(b"x").len, 0);
    }

    #[test]
    fn compaction_drops_unvisited_spans() {
        let mut buf = TextBuffer::new(64);
        let _dead = buf.append(b"dead-");
        let live = buf.append(b"alive");

        let mut compaction = buf.start_compaction();
        let moved = compaction.relocate(live);
        let packed = compaction.into_packed();
        assert_eq!(buf.finish_compaction(packed), 5);

        assert_eq!(moved, Span { offset: 0, len: 5 });
        assert_eq!(buf.slice(moved), b"alive");
        assert_eq!(buf.used(), 5);
        assert_eq!(buf.remaining(), 59);
    }

    #[test]
    fn empty_span_slices_to_empty() {
        let buf = TextBuffer::new(4);
        assert!(buf.slice(Span::default()).is_empty());
    }
}
