//! Core types for the glint frame-scoped text cache.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary shared by the rest of the workspace:
//! slot handles, typed store indices, pixel geometry and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geom;
pub mod id;

pub use error::{ArenaError, BackendError, CacheError, ConfigError};
pub use geom::{Point, Rect, Rgba8};
pub use id::{ShapedIndex, SlotIndex, TextIndex};
