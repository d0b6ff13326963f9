//! Per-frame diagnostic counters.

/// Counters describing one frame of arena activity.
///
/// Reset by `begin_frame()`; `allocated` accumulates during the frame,
/// the remaining fields are filled in by the `end_frame()` sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Slots handed out since the frame began.
    pub allocated: u32,
    /// Items reclaimed by the last sweep.
    pub evicted: u32,
    /// Items that survived the last sweep.
    pub alive: u32,
    /// Total slots in the arena after the last sweep (live plus free).
    pub slots: u32,
}
