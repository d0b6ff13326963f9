//! Frame-aged slot arena for the glint text cache.
//!
//! Provides the allocation and liveness machinery shared by every cache
//! store in the workspace.
//!
//! # Architecture
//!
//! ```text
//! cache store (interned text, shaped text, ...)
//! ├── SlotArena<Entry>   index-stable items, used/unused/free clock
//! └── ConsIndex          content hash → SlotIndex, probed with equality
//! ```
//!
//! # Liveness
//!
//! - **Used:** touched (looked up or allocated) since the last sweep.
//! - **Unused:** survived one sweep without a touch.
//! - **Free:** reclaimed by the second untouched sweep; the slot is
//!   recycled by a later allocation under a new generation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cons;
pub mod slot;
pub mod stats;

// Public re-exports for the primary API surface.
pub use config::ArenaConfig;
pub use cons::{content_hash, ConsIndex};
pub use slot::{Evictable, LiveIter, SlotArena, SlotState};
pub use stats::FrameStats;
