//! Integration test: interned and shaped stores driven together against
//! the recording mock backend, without the host facade.

use glint_arena::ArenaConfig;
use glint_core::{Point, Rgba8};
use glint_test_utils::{lorem, FixedMetrics, MockBackend};
use glint_text::{
    Alignment, InternedTextStore, RenderBackend, ShapeTextParameters, ShapedTextStore, TextLimits,
};

fn stores() -> (InternedTextStore, ShapedTextStore<glint_test_utils::MockTexture>) {
    (
        InternedTextStore::new(ArenaConfig::default(), TextLimits::default()).unwrap(),
        ShapedTextStore::new(ArenaConfig::default()).unwrap(),
    )
}

#[test]
fn rasterized_pixmap_covers_glyph_cells() {
    let (mut texts, mut shaped) = stores();
    let mut backend = MockBackend::new();
    let idx = texts.intern(b"ab").unwrap();
    let s = shaped
        .shape(
            ShapeTextParameters::new(idx).with_alignment(Alignment::LEFT),
            &texts,
            &backend,
        )
        .unwrap();

    let pixmap = backend.rasterize(shaped.layout(s).unwrap(), b"ab");
    assert_eq!((pixmap.size.x, pixmap.size.y), (12, 12));
    let ink = Rgba8::WHITE.pack();
    assert!(pixmap.pixels.iter().all(|&p| p == ink));

    let texture = shaped.texture(s, &texts, &mut backend).unwrap().unwrap();
    assert_eq!(texture.size, pixmap.size);
}

#[test]
fn colour_escape_tints_following_glyphs() {
    let (mut texts, mut shaped) = stores();
    let mut backend = MockBackend::new();
    let idx = texts.intern("a\x0F\u{c8}\x10\x20b".as_bytes()).unwrap();
    let s = shaped
        .shape(
            ShapeTextParameters::new(idx).with_alignment(Alignment::LEFT),
            &texts,
            &backend,
        )
        .unwrap();
    let layout = shaped.layout(s).unwrap();
    assert_eq!(layout.regions().len(), 2);

    let pixmap = backend.rasterize(layout, texts.get(idx).unwrap());
    assert_eq!(pixmap.size, Point::new(12, 12));
    let white = Rgba8::WHITE.pack();
    let tint = Rgba8::new(200, 16, 32, 255).pack();
    for row in pixmap.pixels.chunks(12) {
        assert!(row[..6].iter().all(|&p| p == white));
        assert!(row[6..].iter().all(|&p| p == tint));
    }

    let texture = shaped.texture(s, &texts, &mut backend).unwrap().unwrap();
    assert_eq!(texture.size, pixmap.size);
}

#[test]
fn palette_escape_selects_named_colour() {
    let (mut texts, mut shaped) = stores();
    let backend = MockBackend::new();
    let idx = texts.intern(b"\x08rx").unwrap();
    let s = shaped
        .shape(ShapeTextParameters::new(idx), &texts, &backend)
        .unwrap();

    let pixmap = backend.rasterize(shaped.layout(s).unwrap(), texts.get(idx).unwrap());
    let red = Rgba8::new(255, 0, 0, 255).pack();
    assert_eq!(pixmap.pixels.len(), 6 * 12);
    assert!(pixmap.pixels.iter().all(|&p| p == red));
}

#[test]
fn prose_wraps_within_max_width() {
    let (mut texts, mut shaped) = stores();
    let backend = MockBackend::with_metrics(FixedMetrics::new(5));
    let prose = lorem(40);
    let idx = texts.intern(prose.as_bytes()).unwrap();
    let s = shaped
        .shape(
            ShapeTextParameters::new(idx)
                .with_max_width(120)
                .with_alignment(Alignment::LEFT),
            &texts,
            &backend,
        )
        .unwrap();

    let layout = shaped.layout(s).unwrap();
    assert!(layout.wrapped_lines() > 1);
    for region in layout.regions().iter().filter(|r| r.material) {
        assert!(region.left + region.width <= 120);
    }
}

#[test]
fn shapes_survive_text_compaction() {
    let (mut texts, mut shaped) = stores();
    let mut backend = MockBackend::new();

    let doomed = texts.intern(b"doomed").unwrap();
    let kept = texts.intern(b"kept").unwrap();
    let s = shaped
        .shape(ShapeTextParameters::new(kept), &texts, &backend)
        .unwrap();
    texts.end_frame();
    shaped.end_frame(&mut backend);

    texts.touch(kept).unwrap();
    shaped.touch(s).unwrap();
    assert!(texts.end_frame());
    assert!(!shaped.end_frame(&mut backend));

    assert!(texts.get(doomed).is_err());
    assert_eq!(texts.get(kept).unwrap(), b"kept");
    assert_eq!(texts.buffer_len(), 4);
    assert!(shaped.texture(s, &texts, &mut backend).unwrap().is_some());
}
