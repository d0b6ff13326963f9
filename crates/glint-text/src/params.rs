//! Shaping parameters: the cache key of the shaped-text store.

use glint_core::TextIndex;

/// Placement of a line within the wrapped width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Flush left (or top).
    Low,
    /// Centred.
    #[default]
    Center,
    /// Flush right (or bottom).
    High,
}

impl Alignment {
    /// Horizontal alias for [`Alignment::Low`].
    pub const LEFT: Self = Self::Low;
    /// Horizontal alias for [`Alignment::High`].
    pub const RIGHT: Self = Self::High;
    /// Vertical alias for [`Alignment::Low`].
    pub const TOP: Self = Self::Low;
    /// Vertical alias for [`Alignment::High`].
    pub const BOTTOM: Self = Self::High;

    /// Multiplier applied to half the free space: 0, 1 or 2.
    pub fn factor(self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Center => 1,
            Self::High => 2,
        }
    }
}

/// Wrapping width limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaxWidth {
    /// Width in pixels; clamped to `0..=10_000` when shaping.
    pub width: i32,
    /// Report `width` as the wrapped width even if the text is narrower.
    pub fill: bool,
}

/// Everything that determines a shaped layout.
///
/// Equality and hashing of this struct are the shaped store's cache
/// identity: two requests with equal parameters share one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeTextParameters {
    /// The interned text to shape.
    pub text: TextIndex,
    /// Optional wrapping limit; `None` lays out up to the hard maximum.
    pub max_width: Option<MaxWidth>,
    /// Horizontal placement of each line.
    pub alignment: Alignment,
    /// Extra offset of the first line, in pixels.
    pub first_line_indent: i32,
    /// Marker appended when the text does not fit on one line.
    pub overflow_text: Option<TextIndex>,
    /// Render every visible character as a bullet.
    pub replace_with_dots: bool,
}

impl ShapeTextParameters {
    /// Centred, unwrapped shaping of `text`.
    pub fn new(text: TextIndex) -> Self {
        Self {
            text,
            max_width: None,
            alignment: Alignment::default(),
            first_line_indent: 0,
            overflow_text: None,
            replace_with_dots: false,
        }
    }

    /// Wrap at `width` pixels.
    pub fn with_max_width(mut self, width: i32) -> Self {
        self.max_width = Some(MaxWidth { width, fill: false });
        self
    }

    /// Wrap at `width` pixels and report `width` as the wrapped width.
    pub fn with_fill_width(mut self, width: i32) -> Self {
        self.max_width = Some(MaxWidth { width, fill: true });
        self
    }

    /// Set the line alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Indent the first line by `indent` pixels.
    pub fn with_first_line_indent(mut self, indent: i32) -> Self {
        self.first_line_indent = indent;
        self
    }

    /// Truncate to one line, ending in `marker`, when the text would wrap.
    pub fn with_overflow_text(mut self, marker: TextIndex) -> Self {
        self.overflow_text = Some(marker);
        self
    }

    /// Mask the text with bullets.
    pub fn with_dots(mut self, replace_with_dots: bool) -> Self {
        self.replace_with_dots = replace_with_dots;
        self
    }

    /// Text entries this shape depends on.
    pub fn referenced_texts(self) -> impl Iterator<Item = TextIndex> {
        std::iter::once(self.text).chain(self.overflow_text)
    }
}
