//! The per-frame text cache.
//!
//! [`TextCache`] owns both stores and the rendering backend. GUI code
//! calls [`TextCache::intern_text`], [`TextCache::shape_text`] and
//! [`TextCache::draw_text`] freely during a frame; every call marks the
//! entry it resolves as used. [`TextCache::end_frame`] then ages both
//! stores in a fixed order:
//!
//! ```text
//! 1. shaped sweep      evict untouched shapes, destroy their textures
//! 2. pin               survivors touch the texts they were shaped from
//! 3. interned sweep    evict untouched texts, compact the buffer
//! ```
//!
//! Step 2 means a text stays alive for as long as any shape built from
//! it does, even if the text itself is never interned again.

use std::borrow::Cow;

use glint_core::{CacheError, Point, Rect, Rgba8, ShapedIndex, TextIndex};
use glint_text::{
    InternedTextStore, RenderBackend, ShapeTextParameters, ShapedTextStore, TextLayout,
};
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::report::FrameReport;

/// Frame-scoped cache of interned and shaped text.
pub struct TextCache<B: RenderBackend> {
    backend: B,
    texts: InternedTextStore,
    shaped: ShapedTextStore<B::Texture>,
    frame: u64,
    last_report: FrameReport,
}

impl<B: RenderBackend> TextCache<B> {
    /// Create an empty cache drawing through `backend`.
    ///
    /// Returns `Err(CacheError::Config)` if `config` fails validation.
    pub fn new(backend: B, config: CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            backend,
            texts: InternedTextStore::new(config.interned, config.text)?,
            shaped: ShapedTextStore::new(config.shaped)?,
            frame: 0,
            last_report: FrameReport::default(),
        })
    }

    // ── Frame boundaries ───────────────────────────────────────────

    /// Start a frame. Resets per-frame counters only.
    pub fn begin_frame(&mut self) {
        self.texts.begin_frame();
        self.shaped.begin_frame();
    }

    /// Finish a frame: sweep shapes, pin their texts, sweep texts.
    pub fn end_frame(&mut self) -> FrameReport {
        self.shaped.end_frame(&mut self.backend);
        for text in self.shaped.referenced_texts() {
            if let Err(err) = self.texts.touch(text) {
                warn!(%err, %text, "shaped entry references a dead text");
            }
        }
        self.texts.end_frame();

        let report = FrameReport {
            frame: self.frame,
            interned: self.texts.frame_stats(),
            shaped: self.shaped.frame_stats(),
            interned_bytes: self.texts.buffer_len(),
            textures: self.shaped.texture_count(),
        };
        debug!(
            frame = report.frame,
            texts = self.texts.len(),
            shapes = self.shaped.len(),
            evicted = report.evicted(),
            bytes = report.interned_bytes,
            textures = report.textures,
            "text cache frame"
        );
        self.frame += 1;
        self.last_report = report;
        report
    }

    /// Statistics of the most recently completed frame.
    pub fn frame_report(&self) -> FrameReport {
        self.last_report
    }

    // ── Text ───────────────────────────────────────────────────────

    /// Intern `text`, returning the shared index for its content.
    pub fn intern_text(&mut self, text: impl AsRef<[u8]>) -> Result<TextIndex, CacheError> {
        Ok(self.texts.intern(text.as_ref())?)
    }

    /// Stored bytes of an interned text.
    pub fn text(&self, index: TextIndex) -> Result<&[u8], CacheError> {
        Ok(self.texts.get(index)?)
    }

    /// Stored content of an interned text as (lossy) UTF-8.
    pub fn text_str(&self, index: TextIndex) -> Result<Cow<'_, str>, CacheError> {
        Ok(self.texts.get_str(index)?)
    }

    // ── Shaping ────────────────────────────────────────────────────

    /// Shape interned text, reusing the entry for equal parameters.
    pub fn shape_text(&mut self, params: ShapeTextParameters) -> Result<ShapedIndex, CacheError> {
        self.shaped.shape(params, &self.texts, &self.backend)
    }

    /// Intern `text` and shape it centred, optionally wrapped.
    pub fn shape_simple(
        &mut self,
        text: &str,
        max_width: Option<i32>,
    ) -> Result<ShapedIndex, CacheError> {
        let index = self.intern_text(text)?;
        let mut params = ShapeTextParameters::new(index);
        if let Some(width) = max_width {
            params = params.with_max_width(width);
        }
        self.shape_text(params)
    }

    /// Layout of a shaped text.
    pub fn layout(&self, shaped: ShapedIndex) -> Result<&TextLayout, CacheError> {
        Ok(self.shaped.layout(shaped)?)
    }

    // ── Drawing ────────────────────────────────────────────────────

    /// Draw a shaped text with its top-left corner at `pos`.
    ///
    /// Creates the texture on first draw. Zero-area layouts draw nothing.
    pub fn draw_text(
        &mut self,
        pos: Point,
        shaped: ShapedIndex,
        color: Rgba8,
    ) -> Result<(), CacheError> {
        self.shaped.touch(shaped)?;
        let size = self.shaped.layout(shaped)?.wrapped_size();
        let texture = self.shaped.texture(shaped, &self.texts, &mut self.backend)?;
        if let Some(texture) = texture {
            self.backend.draw_texture(texture, Rect::new(pos, size), color);
        }
        Ok(())
    }

    /// Intern, shape and draw `text` in one call.
    pub fn draw_str(
        &mut self,
        pos: Point,
        text: &str,
        color: Rgba8,
    ) -> Result<ShapedIndex, CacheError> {
        let shaped = self.shape_simple(text, None)?;
        self.draw_text(pos, shaped, color)?;
        Ok(shaped)
    }

    /// Destroy every texture, leaving entries to re-render on next draw.
    pub fn release_textures(&mut self) -> usize {
        self.shaped.release_textures(&mut self.backend)
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The interned-text store.
    pub fn texts(&self) -> &InternedTextStore {
        &self.texts
    }

    /// The shaped-text store.
    pub fn shaped(&self) -> &ShapedTextStore<B::Texture> {
        &self.shaped
    }

    /// The rendering backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the rendering backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl<B: RenderBackend> Drop for TextCache<B> {
    fn drop(&mut self) {
        let released = self.release_textures();
        debug!(released, "text cache dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_test_utils::MockBackend;

    fn cache() -> TextCache<MockBackend> {
        TextCache::new(MockBackend::new(), CacheConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = TextCache::new(MockBackend::new(), CacheConfig::with_max_items(0));
        assert!(matches!(err, Err(CacheError::Config(_))));
    }

    #[test]
    fn shape_simple_interns_and_wraps() {
        let mut c = cache();
        let s = c.shape_simple("aaa bbb", Some(30)).unwrap();
        assert_eq!(c.layout(s).unwrap().wrapped_lines(), 2);
        assert_eq!(c.texts().len(), 1);
    }

    #[test]
    fn draw_str_draws_once_per_call_with_one_texture() {
        let mut c = cache();
        c.begin_frame();
        let a = c.draw_str(Point::new(1, 2), "hi", Rgba8::WHITE).unwrap();
        let b = c.draw_str(Point::new(5, 5), "hi", Rgba8::WHITE).unwrap();
        assert_eq!(a, b);
        assert_eq!(c.backend().created(), 1);
        assert_eq!(c.backend().draws().len(), 2);
        let first = c.backend().draws()[0];
        assert_eq!(first.dest, Rect::new(Point::new(1, 2), Point::new(12, 12)));
    }

    #[test]
    fn frame_counter_and_report() {
        let mut c = cache();
        c.begin_frame();
        c.intern_text("x").unwrap();
        let r = c.end_frame();
        assert_eq!(r.frame, 0);
        assert_eq!(r.interned.allocated, 1);
        assert_eq!(r.interned_bytes, 1);
        assert_eq!(c.frame(), 1);
        assert_eq!(c.frame_report(), r);
    }
}
