//! Test utilities and mock backends for glint development.
//!
//! Provides [`MockBackend`], a recording implementation of
//! [`RenderBackend`] that hands out numbered textures and counts every
//! create, destroy and draw, plus text fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashSet;

use glint_core::{BackendError, Point, Rect, Rgba8};
use glint_text::{GlyphMetrics, Pixmap, RenderBackend, TextLayout};

pub use fixtures::{distinct_strings, lorem, FixedMetrics};

/// Glyph width used by [`MockBackend::new`].
pub const DEFAULT_GLYPH_WIDTH: i32 = 6;

/// Texture handed out by [`MockBackend`].
///
/// Deliberately not `Clone`: a texture has exactly one owner.
#[derive(Debug, PartialEq, Eq)]
pub struct MockTexture {
    pub id: u32,
    pub size: Point,
}

/// One recorded `draw_texture` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub texture: u32,
    pub dest: Rect,
    pub color: Rgba8,
}

/// Recording backend with fixed-width glyphs.
///
/// Every visible glyph is [`DEFAULT_GLYPH_WIDTH`] pixels wide unless
/// configured otherwise; control characters take no space. Uploads can be
/// made to fail with [`MockBackend::fail_uploads`].
pub struct MockBackend {
    metrics: FixedMetrics,
    next_id: u32,
    live: HashSet<u32>,
    created: usize,
    destroyed: Vec<u32>,
    double_destroys: usize,
    draws: Vec<DrawCall>,
    fail_uploads: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_metrics(FixedMetrics::default())
    }

    pub fn with_metrics(metrics: FixedMetrics) -> Self {
        Self {
            metrics,
            next_id: 0,
            live: HashSet::new(),
            created: 0,
            destroyed: Vec::new(),
            double_destroys: 0,
            draws: Vec::new(),
            fail_uploads: false,
        }
    }

    /// Make subsequent uploads fail (or succeed again).
    pub fn fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    /// Textures created so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Ids of destroyed textures, in destruction order.
    pub fn destroyed(&self) -> &[u32] {
        &self.destroyed
    }

    /// Textures created and not yet destroyed.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Destroy calls for ids that were not live.
    pub fn double_destroys(&self) -> usize {
        self.double_destroys
    }

    /// Every recorded draw call.
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphMetrics for MockBackend {
    fn char_width(&self, ch: char) -> i32 {
        self.metrics.char_width(ch)
    }

    fn line_height(&self) -> i32 {
        self.metrics.line_height()
    }
}

impl RenderBackend for MockBackend {
    type Texture = MockTexture;

    /// Fills one solid cell per material glyph in its styled ink colour,
    /// with the bottom row as underline. Overflow cells use plain white.
    fn rasterize(&self, layout: &TextLayout, text: &[u8]) -> Pixmap {
        let mut pixmap = Pixmap::new(layout.wrapped_size());
        let lh = layout.line_height();
        for (region, style) in layout.styled(text).filter(|(r, _)| r.material) {
            let pos = Point::new(region.left, region.line * lh) + style.offset;
            let ink = style.ink().pack();
            pixmap.fill_rect(Rect::new(pos, Point::new(region.width, lh)), ink);
            if style.underline {
                let bar = Point::new(pos.x, pos.y + lh - 1);
                pixmap.fill_rect(Rect::new(bar, Point::new(region.width, 1)), ink);
            }
        }
        let white = Rgba8::WHITE.pack();
        for region in layout.overflow_regions() {
            let cell = Rect::new(
                Point::new(region.left, region.line * lh),
                Point::new(region.width, lh),
            );
            pixmap.fill_rect(cell, white);
        }
        pixmap
    }

    fn upload_texture(&mut self, pixmap: &Pixmap) -> Result<MockTexture, BackendError> {
        if self.fail_uploads {
            return Err(BackendError::new("mock upload failure"));
        }
        self.next_id += 1;
        self.created += 1;
        self.live.insert(self.next_id);
        Ok(MockTexture {
            id: self.next_id,
            size: pixmap.size,
        })
    }

    fn destroy_texture(&mut self, texture: MockTexture) {
        if !self.live.remove(&texture.id) {
            self.double_destroys += 1;
        }
        self.destroyed.push(texture.id);
    }

    fn draw_texture(&mut self, texture: &MockTexture, dest: Rect, color: Rgba8) {
        self.draws.push(DrawCall {
            texture: texture.id,
            dest,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_and_destroy_are_counted() {
        let mut b = MockBackend::new();
        let t = b.upload_texture(&Pixmap::new(Point::new(2, 2))).unwrap();
        assert_eq!(t.id, 1);
        assert_eq!(b.live_textures(), 1);
        b.destroy_texture(t);
        assert_eq!(b.live_textures(), 0);
        assert_eq!(b.destroyed(), &[1]);
        assert_eq!(b.double_destroys(), 0);
    }

    #[test]
    fn failing_uploads() {
        let mut b = MockBackend::new();
        b.fail_uploads(true);
        assert!(b.upload_texture(&Pixmap::default()).is_err());
        assert_eq!(b.created(), 0);
    }

    #[test]
    fn fixtures_are_deterministic() {
        assert_eq!(distinct_strings(2), vec!["item-00000", "item-00001"]);
        assert_eq!(lorem(3), "lorem ipsum dolor");
        assert_eq!(FixedMetrics::default().char_width('\n'), 0);
    }
}
