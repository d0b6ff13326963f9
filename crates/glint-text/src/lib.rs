//! Interned and shaped text stores for the glint text cache.
//!
//! Both stores are [`glint_arena::SlotArena`] specializations paired with a
//! [`glint_arena::ConsIndex`]:
//!
//! - [`InternedTextStore`] de-duplicates raw byte strings into one shared
//!   [`TextBuffer`] and compacts it after evictions.
//! - [`ShapedTextStore`] caches a [`TextLayout`] plus a lazily created
//!   texture per distinct [`ShapeTextParameters`].
//!
//! Rendering is abstracted behind [`GlyphMetrics`] and [`RenderBackend`];
//! [`TextLayout::styled`] recovers the inline formatting a backend draws.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod buffer;
pub mod config;
pub mod interned;
pub mod layout;
pub mod params;
pub mod shaped;
pub mod style;

// Public re-exports for the primary API surface.
pub use backend::{GlyphMetrics, Pixmap, RenderBackend, DEFAULT_LINE_HEIGHT};
pub use buffer::{Span, TextBuffer};
pub use config::TextLimits;
pub use interned::{InternedText, InternedTextStore};
pub use layout::{OverflowRegion, Region, TextLayout, TextPosition, BULLET};
pub use params::{Alignment, MaxWidth, ShapeTextParameters};
pub use shaped::{ShapedText, ShapedTextStore, TextureSlot};
pub use style::{palette, GlyphStyle, StyledGlyphs};
