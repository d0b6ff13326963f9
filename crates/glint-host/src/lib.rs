//! Per-frame text cache facade tying the glint stores together.
//!
//! Provides [`TextCache`], which owns an interned-text store, a
//! shaped-text store and the rendering backend, and drives both stores
//! through frame boundaries.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod report;

// Public re-exports for the primary API surface.
pub use cache::TextCache;
pub use config::CacheConfig;
pub use report::FrameReport;
