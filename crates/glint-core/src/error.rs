//! Error types for the glint text cache, organised by layer: slot arena,
//! configuration, rendering backend, and the combined cache error.

use thiserror::Error;

use crate::id::SlotIndex;

/// Errors raised by slot-arena operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// Allocating one more item would exceed the configured maximum.
    ///
    /// Reachable through pathological input (e.g. an unbounded number of
    /// distinct strings within one frame), so it is reported rather than
    /// treated as fatal.
    #[error("arena capacity exceeded: {max_items} items already allocated")]
    CapacityExceeded {
        /// The configured maximum item count.
        max_items: u32,
    },
    /// The handle points outside the arena or at a slot that is free.
    #[error("invalid handle {index}")]
    InvalidHandle {
        /// The offending handle.
        index: SlotIndex,
    },
    /// The slot was recycled after the handle was issued.
    #[error("stale handle {index}: slot is now at generation {current}")]
    StaleHandle {
        /// The offending handle.
        index: SlotIndex,
        /// The generation currently occupying the slot.
        current: u32,
    },
}

/// Rejected construction parameters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A capacity limit that must be non-zero was zero.
    #[error("{name} must be greater than zero")]
    ZeroLimit {
        /// Name of the offending field.
        name: &'static str,
    },
    /// The per-item byte limit is larger than the total byte limit.
    #[error("max_item_bytes ({max_item_bytes}) exceeds max_total_bytes ({max_total_bytes})")]
    ItemLargerThanTotal {
        /// Per-item limit.
        max_item_bytes: u32,
        /// Whole-buffer limit.
        max_total_bytes: u32,
    },
}

/// Failure reported by a rendering backend while creating a texture.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("texture upload failed: {reason}")]
pub struct BackendError {
    /// Human-readable description from the backend.
    pub reason: String,
}

impl BackendError {
    /// Wrap a backend-specific description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Any error surfaced by the text cache facade.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A slot-arena failure in one of the stores.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The rendering backend could not create a texture.
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The cache was configured with invalid limits.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
