//! Cache of shaped text keyed by [`ShapeTextParameters`].
//!
//! Each entry holds the measured [`TextLayout`] (computed eagerly on a
//! miss) and a texture that is only created the first time the entry is
//! drawn. Textures are exclusively owned by their entry: the store hands
//! them back to the backend when the entry is evicted or when the caller
//! releases all textures at once.

use glint_arena::{content_hash, ArenaConfig, ConsIndex, Evictable, FrameStats, SlotArena};
use glint_core::{ArenaError, CacheError, ConfigError, ShapedIndex, TextIndex};
use tracing::warn;

use crate::backend::{GlyphMetrics, RenderBackend};
use crate::interned::InternedTextStore;
use crate::layout::TextLayout;
use crate::params::ShapeTextParameters;

/// Texture state of a shaped entry.
#[derive(Debug)]
pub enum TextureSlot<T> {
    /// Not rendered yet.
    Pending,
    /// Rendered, but the layout covers no pixels.
    Empty,
    /// Uploaded and owned by the entry.
    Ready(T),
}

impl<T> Default for TextureSlot<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> TextureSlot<T> {
    /// The texture, if one was uploaded.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Ready(texture) => Some(texture),
            _ => None,
        }
    }

    /// Whether rendering has happened (with or without a texture).
    pub fn is_rendered(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Arena payload of the shaped-text store.
#[derive(Debug)]
pub struct ShapedText<T> {
    params: Option<ShapeTextParameters>,
    hash: u64,
    layout: TextLayout,
    texture: TextureSlot<T>,
}

impl<T> Default for ShapedText<T> {
    fn default() -> Self {
        Self {
            params: None,
            hash: 0,
            layout: TextLayout::default(),
            texture: TextureSlot::Pending,
        }
    }
}

impl<T> ShapedText<T> {
    /// Parameters the entry was shaped with. `None` only for a slot that
    /// has not been filled yet.
    pub fn params(&self) -> Option<&ShapeTextParameters> {
        self.params.as_ref()
    }

    /// The measured layout.
    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Current texture state.
    pub fn texture(&self) -> &TextureSlot<T> {
        &self.texture
    }
}

impl<T> Evictable for ShapedText<T> {
    fn on_evict(&mut self) {
        self.params = None;
        self.hash = 0;
        self.layout = TextLayout::default();
        self.texture = TextureSlot::Pending;
    }
}

/// Content-addressed store of shaped layouts and their textures.
pub struct ShapedTextStore<T> {
    arena: SlotArena<ShapedText<T>>,
    cons: ConsIndex,
}

impl<T> ShapedTextStore<T> {
    /// Create an empty store.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            arena: SlotArena::new(config)?,
            cons: ConsIndex::new(),
        })
    }

    /// Look up an entry by parameters without touching it.
    pub fn find(&self, params: &ShapeTextParameters) -> Option<ShapedIndex> {
        self.cons
            .find(content_hash(params), |index| {
                self.arena
                    .get(index)
                    .is_ok_and(|entry| entry.params.as_ref() == Some(params))
            })
            .map(ShapedIndex)
    }

    /// Return the entry for `params`, shaping it on a miss.
    ///
    /// The layout is computed from the texts in `texts` immediately; the
    /// texture stays pending until [`ShapedTextStore::texture`] is called.
    /// Fails if a referenced text handle is dead or the arena is full.
    pub fn shape(
        &mut self,
        params: ShapeTextParameters,
        texts: &InternedTextStore,
        metrics: &impl GlyphMetrics,
    ) -> Result<ShapedIndex, CacheError> {
        if let Some(found) = self.find(&params) {
            self.arena.touch(found.0)?;
            return Ok(found);
        }

        let text = texts.get(params.text)?;
        let overflow = params.overflow_text.map(|i| texts.get(i)).transpose()?;
        let layout = TextLayout::compute(text, &params, overflow, metrics);

        let index = self.arena.allocate()?;
        let hash = content_hash(&params);
        *self.arena.get_mut(index)? = ShapedText {
            params: Some(params),
            hash,
            layout,
            texture: TextureSlot::Pending,
        };
        self.cons.insert(hash, index);
        Ok(ShapedIndex(index))
    }

    /// Mark an entry used in the current frame.
    pub fn touch(&mut self, index: ShapedIndex) -> Result<(), ArenaError> {
        self.arena.touch(index.0)
    }

    /// Shared access to an entry.
    pub fn get(&self, index: ShapedIndex) -> Result<&ShapedText<T>, ArenaError> {
        self.arena.get(index.0)
    }

    /// The layout of an entry.
    pub fn layout(&self, index: ShapedIndex) -> Result<&TextLayout, ArenaError> {
        Ok(&self.arena.get(index.0)?.layout)
    }

    /// Whether `index` currently resolves to a live entry.
    pub fn contains(&self, index: ShapedIndex) -> bool {
        self.arena.contains(index.0)
    }

    /// The entry's texture, rendering and uploading it on first use.
    ///
    /// The source text is read back from `texts` so the backend can apply
    /// inline formatting. Layouts with no area are marked rendered without
    /// creating a texture and yield `Ok(None)`. A failed upload leaves the
    /// entry pending so a later call retries.
    pub fn texture<B>(
        &mut self,
        index: ShapedIndex,
        texts: &InternedTextStore,
        backend: &mut B,
    ) -> Result<Option<&T>, CacheError>
    where
        B: RenderBackend<Texture = T>,
    {
        let entry = self.arena.get_mut(index.0)?;
        if let TextureSlot::Pending = entry.texture {
            entry.texture = if entry.layout.wrapped_size().is_empty_area() {
                TextureSlot::Empty
            } else {
                let text: &[u8] = match entry.params {
                    Some(params) => texts.get(params.text)?,
                    None => &[],
                };
                let pixmap = backend.rasterize(&entry.layout, text);
                match backend.upload_texture(&pixmap) {
                    Ok(texture) => TextureSlot::Ready(texture),
                    Err(err) => {
                        warn!(%err, %index, "texture upload failed");
                        return Err(err.into());
                    }
                }
            };
        }
        Ok(entry.texture.get())
    }

    /// Reset per-frame counters.
    pub fn begin_frame(&mut self) {
        self.arena.begin_frame();
    }

    /// Age all entries by one frame. Evicted entries give their texture
    /// back to `backend` and leave the cons index. Returns whether
    /// anything was evicted.
    pub fn end_frame<B>(&mut self, backend: &mut B) -> bool
    where
        B: RenderBackend<Texture = T>,
    {
        let cons = &mut self.cons;
        self.arena.end_frame(|index, entry| {
            cons.remove(entry.hash, index);
            if let TextureSlot::Ready(texture) = std::mem::take(&mut entry.texture) {
                backend.destroy_texture(texture);
            }
        })
    }

    /// Destroy every held texture and mark all entries pending again.
    ///
    /// Used when the renderer goes away. Returns how many textures were
    /// destroyed.
    pub fn release_textures<B>(&mut self, backend: &mut B) -> usize
    where
        B: RenderBackend<Texture = T>,
    {
        let mut released = 0;
        self.arena.for_each_live_mut(|_, entry| {
            if let TextureSlot::Ready(texture) = std::mem::take(&mut entry.texture) {
                backend.destroy_texture(texture);
                released += 1;
            }
        });
        released
    }

    /// Every text handle referenced by a live entry.
    pub fn referenced_texts(&self) -> impl Iterator<Item = TextIndex> + '_ {
        self.arena
            .iter()
            .filter_map(|(_, entry)| entry.params)
            .flat_map(ShapeTextParameters::referenced_texts)
    }

    /// Iterate over live entries, most recently shaped first.
    pub fn iter(&self) -> impl Iterator<Item = (ShapedIndex, &ShapedText<T>)> + '_ {
        self.arena.iter().map(|(index, entry)| (ShapedIndex(index), entry))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of entries currently holding a texture.
    pub fn texture_count(&self) -> usize {
        self.arena
            .iter()
            .filter(|(_, entry)| matches!(entry.texture, TextureSlot::Ready(_)))
            .count()
    }

    /// Per-frame arena counters.
    pub fn frame_stats(&self) -> FrameStats {
        self.arena.frame_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Pixmap;
    use crate::config::TextLimits;
    use glint_core::{BackendError, Rect, Rgba8};

    #[derive(Default)]
    struct Recorder {
        next_id: u32,
        live: Vec<u32>,
        destroyed: Vec<u32>,
        fail_uploads: bool,
    }

    impl GlyphMetrics for Recorder {
        fn char_width(&self, _: char) -> i32 {
            6
        }
    }

    impl RenderBackend for Recorder {
        type Texture = u32;

        fn rasterize(&self, layout: &TextLayout, _: &[u8]) -> Pixmap {
            Pixmap::new(layout.wrapped_size())
        }

        fn upload_texture(&mut self, _: &Pixmap) -> Result<u32, BackendError> {
            if self.fail_uploads {
                return Err(BackendError::new("device lost"));
            }
            self.next_id += 1;
            self.live.push(self.next_id);
            Ok(self.next_id)
        }

        fn destroy_texture(&mut self, texture: u32) {
            self.live.retain(|&t| t != texture);
            self.destroyed.push(texture);
        }

        fn draw_texture(&mut self, _: &u32, _: Rect, _: Rgba8) {}
    }

    fn texts() -> InternedTextStore {
        InternedTextStore::new(ArenaConfig::default(), TextLimits::default()).unwrap()
    }

    fn store() -> ShapedTextStore<u32> {
        ShapedTextStore::new(ArenaConfig::default()).unwrap()
    }

    #[test]
    fn equal_params_share_an_entry() {
        let mut t = texts();
        let mut s = store();
        let b = Recorder::default();
        let hello = t.intern(b"hello").unwrap();
        let p = ShapeTextParameters::new(hello).with_max_width(100);

        let a = s.shape(p, &t, &b).unwrap();
        assert_eq!(s.shape(p, &t, &b).unwrap(), a);
        assert_ne!(s.shape(p.with_dots(true), &t, &b).unwrap(), a);
        assert_eq!(s.len(), 2);
        assert_eq!(s.layout(a).unwrap().wrapped_size().x, 30);
    }

    #[test]
    fn texture_is_created_once_on_demand() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder::default();
        let idx = s
            .shape(ShapeTextParameters::new(t.intern(b"hi").unwrap()), &t, &b)
            .unwrap();
        assert!(!s.get(idx).unwrap().texture().is_rendered());

        assert_eq!(s.texture(idx, &t, &mut b).unwrap(), Some(&1));
        assert_eq!(s.texture(idx, &t, &mut b).unwrap(), Some(&1));
        assert_eq!(b.live, vec![1]);
        assert_eq!(s.texture_count(), 1);
    }

    #[test]
    fn empty_layout_is_rendered_without_texture() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder::default();
        let idx = s
            .shape(ShapeTextParameters::new(t.intern(b"").unwrap()), &t, &b)
            .unwrap();
        assert_eq!(s.texture(idx, &t, &mut b).unwrap(), None);
        assert!(s.get(idx).unwrap().texture().is_rendered());
        assert!(b.live.is_empty());
    }

    #[test]
    fn failed_upload_stays_pending() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder {
            fail_uploads: true,
            ..Recorder::default()
        };
        let idx = s
            .shape(ShapeTextParameters::new(t.intern(b"x").unwrap()), &t, &b)
            .unwrap();
        assert!(matches!(s.texture(idx, &t, &mut b), Err(CacheError::Backend(_))));
        assert!(!s.get(idx).unwrap().texture().is_rendered());

        b.fail_uploads = false;
        assert!(s.texture(idx, &t, &mut b).unwrap().is_some());
    }

    #[test]
    fn eviction_destroys_texture_exactly_once() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder::default();
        let p = ShapeTextParameters::new(t.intern(b"bye").unwrap());
        let idx = s.shape(p, &t, &b).unwrap();
        s.texture(idx, &t, &mut b).unwrap();

        assert!(!s.end_frame(&mut b));
        assert!(s.end_frame(&mut b));
        assert_eq!(b.destroyed, vec![1]);
        assert!(b.live.is_empty());
        assert_eq!(s.find(&p), None);
        assert!(matches!(s.get(idx), Err(ArenaError::InvalidHandle { .. })));

        s.end_frame(&mut b);
        assert_eq!(b.destroyed, vec![1]);
    }

    #[test]
    fn release_textures_resets_to_pending() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder::default();
        let idx = s
            .shape(ShapeTextParameters::new(t.intern(b"abc").unwrap()), &t, &b)
            .unwrap();
        s.texture(idx, &t, &mut b).unwrap();

        assert_eq!(s.release_textures(&mut b), 1);
        assert!(b.live.is_empty());
        assert!(!s.get(idx).unwrap().texture().is_rendered());

        // Redrawing creates a fresh texture.
        assert_eq!(s.texture(idx, &t, &mut b).unwrap(), Some(&2));
        assert_eq!(b.live, vec![2]);
    }

    #[test]
    fn texture_needs_a_live_source_text() {
        let mut t = texts();
        let mut s = store();
        let mut b = Recorder::default();
        let idx = s
            .shape(ShapeTextParameters::new(t.intern(b"orphan").unwrap()), &t, &b)
            .unwrap();
        t.end_frame();
        t.end_frame();
        assert!(matches!(
            s.texture(idx, &t, &mut b),
            Err(CacheError::Arena(ArenaError::InvalidHandle { .. }))
        ));
        assert!(!s.get(idx).unwrap().texture().is_rendered());
        assert!(b.live.is_empty());
    }

    #[test]
    fn dead_text_handle_fails_shaping() {
        let mut t = texts();
        let mut s = store();
        let b = Recorder::default();
        let gone = t.intern(b"gone").unwrap();
        t.end_frame();
        t.end_frame();
        assert!(matches!(
            s.shape(ShapeTextParameters::new(gone), &t, &b),
            Err(CacheError::Arena(ArenaError::InvalidHandle { .. }))
        ));
        assert!(s.is_empty());
    }

    #[test]
    fn referenced_texts_lists_text_and_marker() {
        let mut t = texts();
        let mut s = store();
        let b = Recorder::default();
        let body = t.intern(b"body").unwrap();
        let dots = t.intern(b"...").unwrap();
        let p = ShapeTextParameters::new(body)
            .with_max_width(10)
            .with_overflow_text(dots);
        s.shape(p, &t, &b).unwrap();
        let mut refs: Vec<_> = s.referenced_texts().collect();
        refs.sort();
        let mut expected = vec![body, dots];
        expected.sort();
        assert_eq!(refs, expected);
    }
}
