//! glint: a frame-scoped slot arena with content-addressed text caching.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! glint sub-crates. For most users, adding `glint` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use glint::prelude::*;
//! use glint_test_utils::MockBackend;
//!
//! let mut cache = TextCache::new(MockBackend::new(), CacheConfig::default()).unwrap();
//!
//! cache.begin_frame();
//! let title = cache.intern_text("Settings").unwrap();
//! let shaped = cache
//!     .shape_text(ShapeTextParameters::new(title).with_max_width(120))
//!     .unwrap();
//! cache.draw_text(Point::new(8, 8), shaped, Rgba8::WHITE).unwrap();
//! let report = cache.end_frame();
//!
//! assert_eq!(report.textures, 1);
//! assert_eq!(cache.text(title).unwrap(), b"Settings");
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `glint-core` | Handles, geometry, error types |
//! | [`arena`] | `glint-arena` | `SlotArena`, `ConsIndex`, frame statistics |
//! | [`text`] | `glint-text` | Interned/shaped stores, layout, backend traits |
//! | [`host`] | `glint-host` | `TextCache` facade and its configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, geometry and errors (`glint-core`).
pub use glint_core as types;

/// Frame-aged slot arena and hash-consing index (`glint-arena`).
///
/// Reach for [`arena::SlotArena`] directly when caching something other
/// than text.
pub use glint_arena as arena;

/// Text stores, layout and rendering contracts (`glint-text`).
pub use glint_text as text;

/// The per-frame cache facade (`glint-host`).
pub use glint_host as host;

/// Common imports for typical glint usage.
///
/// ```rust
/// use glint::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use glint_core::{Point, Rect, Rgba8, ShapedIndex, TextIndex};

    // Errors
    pub use glint_core::{ArenaError, BackendError, CacheError, ConfigError};

    // Text
    pub use glint_text::{
        Alignment, GlyphMetrics, GlyphStyle, Pixmap, RenderBackend, ShapeTextParameters,
        TextLayout, TextLimits,
    };

    // Host
    pub use glint_host::{CacheConfig, FrameReport, TextCache};
}
