//! Contracts the rendering backend must satisfy.
//!
//! The cache never rasterizes or talks to a GPU itself. It measures glyphs
//! through [`GlyphMetrics`] while shaping, and hands finished layouts plus
//! their source text to a [`RenderBackend`] to turn into textures. Textures are owned by exactly
//! one shaped entry and returned to the backend exactly once through
//! [`RenderBackend::destroy_texture`].

use glint_core::{BackendError, Point, Rect, Rgba8};

use crate::layout::TextLayout;

/// Default height of one wrapped line, in pixels.
pub const DEFAULT_LINE_HEIGHT: i32 = 12;

/// Glyph measurements used by layout.
pub trait GlyphMetrics {
    /// Advance width of `ch` in pixels.
    fn char_width(&self, ch: char) -> i32;

    /// Height of one line in pixels.
    fn line_height(&self) -> i32 {
        DEFAULT_LINE_HEIGHT
    }
}

/// A CPU-side image in `0xAARRGGBB` pixels, row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixmap {
    /// Width and height in pixels.
    pub size: Point,
    /// `size.x * size.y` pixels.
    pub pixels: Vec<u32>,
}

impl Pixmap {
    /// A fully transparent pixmap of `size`.
    pub fn new(size: Point) -> Self {
        let len = size.x.max(0) as usize * size.y.max(0) as usize;
        Self {
            size,
            pixels: vec![0; len],
        }
    }

    /// Fill the intersection of `rect` with the pixmap.
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        if self.size.is_empty_area() {
            return;
        }
        let x0 = rect.pos.x.clamp(0, self.size.x);
        let y0 = rect.pos.y.clamp(0, self.size.y);
        let x1 = (rect.pos.x + rect.size.x).clamp(0, self.size.x);
        let y1 = (rect.pos.y + rect.size.y).clamp(0, self.size.y);
        if x0 >= x1 {
            return;
        }
        let stride = self.size.x as usize;
        for y in y0..y1 {
            let row = y as usize * stride;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }
}

/// Texture creation, destruction and drawing.
pub trait RenderBackend: GlyphMetrics {
    /// Backend-specific texture handle.
    type Texture;

    /// Draw the glyphs of `layout` into a pixmap sized to its wrapped size.
    ///
    /// `text` is the source the layout was computed from; walk both with
    /// [`TextLayout::styled`] to honour inline formatting.
    fn rasterize(&self, layout: &TextLayout, text: &[u8]) -> Pixmap;

    /// Create a texture from `pixmap`.
    fn upload_texture(&mut self, pixmap: &Pixmap) -> Result<Self::Texture, BackendError>;

    /// Release a texture created by [`RenderBackend::upload_texture`].
    fn destroy_texture(&mut self, texture: Self::Texture);

    /// Draw `texture` into `dest`, modulated by `color`.
    fn draw_texture(&mut self, texture: &Self::Texture, dest: Rect, color: Rgba8);
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn char_width(&self, ch: char) -> i32 {
        (**self).char_width(ch)
    }

    fn line_height(&self) -> i32 {
        (**self).line_height()
    }
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &mut M {
    fn char_width(&self, ch: char) -> i32 {
        (**self).char_width(ch)
    }

    fn line_height(&self) -> i32 {
        (**self).line_height()
    }
}

/// Lets a cache borrow a backend the caller keeps ownership of.
impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type Texture = B::Texture;

    fn rasterize(&self, layout: &TextLayout, text: &[u8]) -> Pixmap {
        (**self).rasterize(layout, text)
    }

    fn upload_texture(&mut self, pixmap: &Pixmap) -> Result<Self::Texture, BackendError> {
        (**self).upload_texture(pixmap)
    }

    fn destroy_texture(&mut self, texture: Self::Texture) {
        (**self).destroy_texture(texture)
    }

    fn draw_texture(&mut self, texture: &Self::Texture, dest: Rect, color: Rgba8) {
        (**self).draw_texture(texture, dest, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut p = Pixmap::new(Point::new(4, 2));
        p.fill_rect(Rect::new(Point::new(2, -1), Point::new(5, 2)), 7);
        assert_eq!(p.pixels, vec![0, 0, 7, 7, 0, 0, 0, 0]);
    }

    #[test]
    fn empty_pixmap_has_no_pixels() {
        assert!(Pixmap::new(Point::new(0, 12)).pixels.is_empty());
        assert!(Pixmap::new(Point::new(-3, 5)).pixels.is_empty());
    }

    #[test]
    fn fill_on_negative_size_is_a_no_op() {
        let mut p = Pixmap::new(Point::new(-3, 5));
        p.fill_rect(Rect::new(Point::new(-1, 0), Point::new(4, 4)), 7);
        assert!(p.pixels.is_empty());

        let mut p = Pixmap::new(Point::new(4, -2));
        p.fill_rect(Rect::new(Point::ZERO, Point::new(4, 4)), 7);
        assert!(p.pixels.is_empty());
    }

    struct Fixed;

    impl GlyphMetrics for Fixed {
        fn char_width(&self, _: char) -> i32 {
            5
        }
    }

    #[test]
    fn line_height_defaults() {
        assert_eq!(Fixed.line_height(), DEFAULT_LINE_HEIGHT);
        assert_eq!(Fixed.char_width('x'), 5);
    }
}
