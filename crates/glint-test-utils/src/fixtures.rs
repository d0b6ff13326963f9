//! Reusable text fixtures.
//!
//! Deterministic inputs for cache and layout tests:
//!
//! - [`FixedMetrics`] measures glyphs without a backend.
//! - [`distinct_strings`] yields N different short strings.
//! - [`lorem`] builds wrappable prose of a given word count.

use glint_text::GlyphMetrics;

/// Monospace metrics: every visible glyph is `width` pixels wide,
/// control characters are zero-width.
#[derive(Clone, Copy, Debug)]
pub struct FixedMetrics {
    pub width: i32,
    pub line_height: i32,
}

impl FixedMetrics {
    pub fn new(width: i32) -> Self {
        Self {
            width,
            line_height: glint_text::DEFAULT_LINE_HEIGHT,
        }
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(crate::DEFAULT_GLYPH_WIDTH)
    }
}

impl GlyphMetrics for FixedMetrics {
    fn char_width(&self, ch: char) -> i32 {
        if ch.is_control() {
            0
        } else {
            self.width
        }
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }
}

/// `n` pairwise different strings: `"item-00000"`, `"item-00001"`, ...
pub fn distinct_strings(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("item-{i:05}")).collect()
}

const WORDS: [&str; 12] = [
    "lorem", "ipsum", "dolor", "sit", "amet,", "consectetur", "adipiscing", "elit.", "sed", "do",
    "eiusmod", "tempor",
];

/// `words` space-separated words cycling through a fixed vocabulary.
pub fn lorem(words: usize) -> String {
    WORDS
        .iter()
        .cycle()
        .take(words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
