//! Per-frame cache statistics.
//!
//! [`FrameReport`] summarises one `end_frame()` of a
//! [`TextCache`](crate::TextCache): what each store allocated and evicted,
//! how large the shared text buffer is after compaction, and how many
//! textures are alive.

use glint_arena::FrameStats;

/// Statistics for one completed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Number of the frame, counting completed frames from zero.
    pub frame: u64,
    /// Interned-text store counters.
    pub interned: FrameStats,
    /// Shaped-text store counters.
    pub shaped: FrameStats,
    /// Bytes in the interned buffer after the sweep.
    pub interned_bytes: usize,
    /// Shaped entries holding a texture after the sweep.
    pub textures: usize,
}

impl FrameReport {
    /// Entries evicted across both stores.
    pub fn evicted(&self) -> u32 {
        self.interned.evicted + self.shaped.evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_zero() {
        let r = FrameReport::default();
        assert_eq!(r.frame, 0);
        assert_eq!(r.evicted(), 0);
        assert_eq!(r.interned_bytes, 0);
    }
}
