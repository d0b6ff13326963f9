//! Word wrapping and glyph placement.
//!
//! [`TextLayout::compute`] turns a byte string plus [`ShapeTextParameters`]
//! into a list of positioned [`Region`]s, one per decoded character, that
//! a backend can rasterize and a text field can hit-test.
//!
//! Wrapping is greedy. Characters are grouped into words and runs of
//! spaces; a word that would cross the max width moves to the next line
//! (the spaces in front of it stop being drawn), and a word wider than the
//! whole line is broken mid-word. Inline formatting escapes are skipped
//! without taking up space, except `\x11`, whose following character
//! nudges the pen by a signed number of pixels (code points from `0x80`
//! up count down from zero).

use glint_core::Point;

use crate::backend::GlyphMetrics;
use crate::params::{MaxWidth, ShapeTextParameters};

/// Characters considered per layout; the rest of the text is ignored.
pub const MAX_CHARACTERS: usize = 100_000;

/// Lines after which wrapping stops.
pub const MAX_WRAPPED_LINES: i32 = 1000;

/// Upper clamp for the max width, and the width used when there is none.
pub const MAX_MAX_WIDTH: i32 = 10_000;

/// Glyph substituted for every character when masking with dots.
pub const BULLET: char = '\u{2022}';

/// One placed character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// The character drawn (after bullet substitution).
    pub ch: char,
    /// False for spaces that were swallowed by a wrap.
    pub material: bool,
    /// Wrapped line the character sits on.
    pub line: i32,
    /// Left edge in pixels.
    pub left: i32,
    /// Advance width in pixels, clipped to the max width.
    pub width: i32,
    /// Byte offset of the character in the source text.
    pub raw: u32,
    /// Byte offset counting only laid-out characters, escapes excluded.
    pub unformatted: u32,
}

/// One placed character of the overflow marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverflowRegion {
    /// The marker character.
    pub ch: char,
    /// Line the marker is on.
    pub line: i32,
    /// Left edge in pixels.
    pub left: i32,
    /// Advance width in pixels.
    pub width: i32,
}

/// A caret position: byte offsets plus index into [`TextLayout::regions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextPosition {
    /// Byte offset in the source text.
    pub raw: u32,
    /// Byte offset in the source text with formatting escapes removed.
    pub unformatted: u32,
    /// Region index; equal to the region count past the end.
    pub clear: usize,
}

/// Measured line and glyph geometry of a shaped text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextLayout {
    regions: Vec<Region>,
    overflow: Vec<OverflowRegion>,
    wrapped_lines: i32,
    wrapped_width: i32,
    line_height: i32,
    after_last_left: i32,
    after_last_line: i32,
    raw_len: u32,
    unformatted_len: u32,
}

impl TextLayout {
    /// Lay out `text` according to `params`.
    ///
    /// `text` is the content behind `params.text`, and `overflow_text` the
    /// content behind `params.overflow_text`. The overflow marker only
    /// applies together with a max width, and only when the text would
    /// otherwise need two or more lines.
    pub fn compute(
        text: &[u8],
        params: &ShapeTextParameters,
        overflow_text: Option<&[u8]>,
        metrics: &impl GlyphMetrics,
    ) -> Self {
        let max_width = params.max_width.map(|m| MaxWidth {
            width: m.width.clamp(0, MAX_MAX_WIDTH),
            fill: m.fill,
        });
        let effective = max_width.map_or(MAX_MAX_WIDTH, |m| m.width);

        let marker = match (overflow_text, max_width) {
            (Some(marker), Some(_)) => {
                let probe = Self::wrap(text, params, max_width, None, metrics);
                if probe.wrapped_lines < 2 {
                    return probe;
                }
                Some(Marker {
                    text: marker,
                    width: marker_width(marker, effective, metrics),
                })
            }
            _ => None,
        };
        Self::wrap(text, params, max_width, marker, metrics)
    }

    fn wrap(
        text: &[u8],
        params: &ShapeTextParameters,
        max_width: Option<MaxWidth>,
        marker: Option<Marker<'_>>,
        metrics: &impl GlyphMetrics,
    ) -> Self {
        let effective = max_width.map_or(MAX_MAX_WIDTH, |m| m.width);
        let units = decode(text);
        let mut w = Wrapper::new(effective, params.first_line_indent.min(effective));
        let mut end_word_if_not_punctuation = false;
        let mut chars = 0usize;
        let mut i = 0usize;

        while i < units.len() && chars < MAX_CHARACTERS && w.wrapped_lines < MAX_WRAPPED_LINES {
            let unit = units[i];
            let Some(mut ch) = unit.ch else {
                w.unformatted += unit.len;
                chars += 1;
                i += 1;
                continue;
            };

            if ch == '\x11' {
                i += 1;
                let Some(next) = units.get(i) else {
                    break;
                };
                let delta = next.ch.map_or(0, nudge);
                if w.state == State::Word {
                    let word = w.word_width.unwrap_or(0);
                    w.word_width = Some((word + delta).clamp(0, effective));
                } else {
                    w.line_width = (w.line_width + delta).clamp(0, effective);
                }
                i += 1;
                continue;
            }

            if let Some(len) = escape_len(ch) {
                if i + len > units.len() {
                    break;
                }
                i += len;
                continue;
            }

            if params.replace_with_dots {
                ch = BULLET;
            }
            let char_width = metrics.char_width(ch);
            if char_width > effective {
                break;
            }

            if let Some(marker) = &marker {
                let pending = w.space_width.unwrap_or(0) + w.word_width.unwrap_or(0);
                if char_width + w.line_width + pending + marker.width > effective {
                    w.end_space();
                    w.end_word();
                    w.push_marker(marker.text, metrics);
                    break;
                }
            }

            let glyph = Glyph {
                ch,
                raw: unit.raw,
                width: char_width,
            };
            let prev_end_word_if_not_punctuation = end_word_if_not_punctuation;
            end_word_if_not_punctuation = false;
            match classify(ch) {
                Class::Newline => {
                    w.end_word();
                    w.begin_space();
                    w.consume(glyph);
                    w.end_line();
                }
                Class::Punctuation => {
                    w.end_space();
                    w.begin_word();
                    w.consume(glyph);
                    end_word_if_not_punctuation = true;
                }
                Class::Space if w.past_first_word_start => {
                    w.end_word();
                    w.begin_space();
                    w.consume(glyph);
                    if marker.is_some() {
                        w.commit_space();
                        w.end_space();
                    }
                }
                Class::Space | Class::Letter => {
                    if prev_end_word_if_not_punctuation {
                        w.end_word();
                    }
                    w.past_first_word_start = true;
                    w.end_space();
                    w.begin_word();
                    w.consume(glyph);
                    if marker.is_some() {
                        w.end_word();
                    }
                }
            }
            w.unformatted += unit.len;
            chars += 1;
            i += 1;
        }
        w.end_line();

        let raw_len = units.get(i).map_or(text.len() as u32, |u| u.raw);
        let mut layout = Self {
            regions: w.regions,
            overflow: w.overflow,
            wrapped_lines: w.wrapped_lines,
            wrapped_width: w.wrapped_width,
            line_height: metrics.line_height(),
            after_last_left: w.last_line_width,
            after_last_line: w.wrapped_lines - 1,
            raw_len,
            unformatted_len: w.unformatted,
        };
        if let Some(MaxWidth { width, fill: true }) = max_width {
            layout.wrapped_width = width;
        }
        layout.align(params.alignment.factor());
        layout
    }

    /// Shift every line by `factor` halves of its free space.
    fn align(&mut self, factor: i32) {
        let mut overflow_offset = 0;
        let mut start = 0;
        loop {
            let end = match self.regions.get(start) {
                Some(first) => {
                    let line = first.line;
                    start
                        + self.regions[start..]
                            .iter()
                            .take_while(|r| r.line == line)
                            .count()
                }
                None => start,
            };
            let group = &mut self.regions[start..end];
            let first_left = group.iter().find(|r| r.material).map(|r| r.left);
            let last_right = group.iter().rev().find(|r| r.material).map(|r| r.left + r.width);
            let mut width = match (first_left, last_right) {
                (Some(l), Some(r)) => r - l,
                _ => 0,
            };
            if let Some(back) = self.overflow.last() {
                width = back.left + back.width - first_left.unwrap_or(0);
            }
            let offset = factor * (self.wrapped_width - width) / 2;
            for region in group.iter_mut() {
                region.left += offset;
            }
            overflow_offset = offset;
            if end >= self.regions.len() {
                break;
            }
            start = end;
        }
        for region in &mut self.overflow {
            region.left += overflow_offset;
        }
        self.after_last_left += factor * (self.wrapped_width - self.after_last_left) / 2;
    }

    /// Size of the wrapped text block in pixels.
    pub fn wrapped_size(&self) -> Point {
        Point::new(self.wrapped_width, self.wrapped_lines * self.line_height)
    }

    /// Number of wrapped lines. Always at least one.
    pub fn wrapped_lines(&self) -> i32 {
        self.wrapped_lines
    }

    /// Height of one line, as reported by the metrics used for shaping.
    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Placed characters in source order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Placed characters of the overflow marker, if it was appended.
    pub fn overflow_regions(&self) -> &[OverflowRegion] {
        &self.overflow
    }

    /// Bytes of the source text consumed by layout.
    pub fn raw_len(&self) -> u32 {
        self.raw_len
    }

    /// Position before the first character.
    pub fn index_begin(&self) -> TextPosition {
        TextPosition::default()
    }

    /// Position after the last laid-out character.
    pub fn index_end(&self) -> TextPosition {
        TextPosition {
            raw: self.raw_len,
            unformatted: self.unformatted_len,
            clear: self.regions.len(),
        }
    }

    /// Caret position closest to `point`, relative to the layout origin.
    pub fn point_to_index(&self, point: Point) -> TextPosition {
        if point.y < 0 {
            return self.index_begin();
        }
        let lh = self.line_height;
        let mut hit: Option<usize> = None;
        let mut prev_width: Option<i32> = None;
        for (i, region) in self.regions.iter().enumerate() {
            if !(region.line * lh <= point.y && (region.line + 1) * lh > point.y) {
                continue;
            }
            if prev_width.is_none_or(|w| region.left - w / 2 <= point.x) {
                hit = Some(i);
            }
            prev_width = Some(region.width);
        }
        if let (Some(i), Some(w)) = (hit, prev_width) {
            if self.regions[i].line == self.after_last_line
                && self.after_last_left - w / 2 < point.x
            {
                hit = None;
            }
        }
        match hit {
            Some(i) => self.regions[i].position(i),
            None => self.index_end(),
        }
    }

    /// Top-left pixel of the caret before region `clear`.
    ///
    /// Out-of-range indices map to the position after the last character.
    pub fn index_to_point(&self, clear: usize) -> Point {
        match self.regions.get(clear) {
            Some(region) => Point::new(region.left, region.line * self.line_height),
            None => Point::new(self.after_last_left, self.after_last_line * self.line_height),
        }
    }

    /// Full caret position of region `clear`, clamped to the end.
    ///
    /// A layout without regions only has the begin position.
    pub fn clear_to_index(&self, clear: usize) -> TextPosition {
        if self.regions.is_empty() {
            return self.index_begin();
        }
        match self.regions.get(clear) {
            Some(region) => region.position(clear),
            None => self.index_end(),
        }
    }
}

impl Region {
    fn position(&self, clear: usize) -> TextPosition {
        TextPosition {
            raw: self.raw,
            unformatted: self.unformatted,
            clear,
        }
    }
}

/// Signed pen nudge carried by the character after `\x11`.
fn nudge(ch: char) -> i32 {
    let code = ch as i32;
    if code >= 0x80 {
        code - 0x100
    } else {
        code
    }
}

struct Marker<'a> {
    text: &'a [u8],
    width: i32,
}

#[derive(Clone, Copy)]
pub(crate) struct Unit {
    pub(crate) raw: u32,
    len: u32,
    /// `None` for an invalid byte sequence.
    pub(crate) ch: Option<char>,
}

#[derive(Clone, Copy)]
struct Glyph {
    ch: char,
    raw: u32,
    width: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    None,
    Word,
    Space,
}

enum Class {
    Newline,
    Punctuation,
    Space,
    Letter,
}

fn classify(ch: char) -> Class {
    match ch {
        '\n' => Class::Newline,
        '?' | ';' | ',' | ':' | '.' | '-' | '!' => Class::Punctuation,
        ' ' | '\t' => Class::Space,
        _ => Class::Letter,
    }
}

/// Number of characters (escape included) a formatting escape spans.
fn escape_len(ch: char) -> Option<usize> {
    match ch {
        '\x01' | '\x0E' | '\x12' => Some(1),
        '\x08' => Some(2),
        '\x10' => Some(3),
        '\x0F' => Some(4),
        _ => None,
    }
}

pub(crate) fn decode(text: &[u8]) -> Vec<Unit> {
    let mut units = Vec::with_capacity(text.len());
    let mut offset = 0usize;
    for chunk in text.utf8_chunks() {
        let valid = chunk.valid();
        units.extend(valid.char_indices().map(|(i, ch)| Unit {
            raw: (offset + i) as u32,
            len: ch.len_utf8() as u32,
            ch: Some(ch),
        }));
        offset += valid.len();
        if !chunk.invalid().is_empty() {
            units.push(Unit {
                raw: offset as u32,
                len: chunk.invalid().len() as u32,
                ch: None,
            });
            offset += chunk.invalid().len();
        }
    }
    units
}

fn valid_chars(text: &[u8]) -> impl Iterator<Item = char> + '_ {
    text.utf8_chunks().flat_map(|chunk| chunk.valid().chars())
}

/// Width of the marker prefix that fits in `max_width`.
fn marker_width(marker: &[u8], max_width: i32, metrics: &impl GlyphMetrics) -> i32 {
    let mut width = 0;
    for ch in valid_chars(marker) {
        let w = metrics.char_width(ch);
        if width + w > max_width {
            break;
        }
        width += w;
    }
    width
}

/// Mutable state of one wrapping pass.
struct Wrapper {
    max_width: i32,
    regions: Vec<Region>,
    overflow: Vec<OverflowRegion>,
    state: State,
    past_first_word_start: bool,
    indent: i32,
    line_width: i32,
    /// Width of the pending run of spaces, not yet added to `line_width`.
    space_width: Option<i32>,
    /// Width of the word in progress.
    word_width: Option<i32>,
    space_begins_at: usize,
    word_begins_at: usize,
    wrapped_lines: i32,
    wrapped_width: i32,
    last_line_width: i32,
    /// Bytes of laid-out (non-escape) characters seen so far.
    unformatted: u32,
}

impl Wrapper {
    fn new(max_width: i32, indent: i32) -> Self {
        Self {
            max_width,
            regions: Vec::new(),
            overflow: Vec::new(),
            state: State::None,
            past_first_word_start: false,
            indent,
            line_width: indent,
            space_width: None,
            word_width: None,
            space_begins_at: 0,
            word_begins_at: 0,
            wrapped_lines: 0,
            wrapped_width: 0,
            last_line_width: 0,
            unformatted: 0,
        }
    }

    fn begin_space(&mut self) {
        if self.state != State::Space {
            self.state = State::Space;
            self.space_begins_at = self.regions.len();
            self.space_width = Some(0);
        }
    }

    fn end_space(&mut self) {
        if self.state == State::Space {
            self.state = State::None;
        }
    }

    fn begin_word(&mut self) {
        if self.state != State::Word {
            self.state = State::Word;
            self.word_begins_at = self.regions.len();
            self.word_width = Some(0);
        }
    }

    fn commit_space(&mut self) {
        if let Some(space) = self.space_width.take() {
            self.line_width += space;
        }
    }

    fn end_word(&mut self) {
        if self.state == State::Word {
            self.commit_space();
            self.line_width += self.word_width.take().unwrap_or(0);
            self.state = State::None;
        }
    }

    fn wrap(&mut self) {
        self.commit_space();
        self.wrapped_width = self.wrapped_width.max(self.line_width);
        self.last_line_width = self.line_width;
        self.line_width = 0;
        self.wrapped_lines += 1;
        self.indent = 0;
    }

    fn end_line(&mut self) {
        self.end_space();
        self.end_word();
        self.past_first_word_start = false;
        self.wrap();
    }

    fn consume(&mut self, glyph: Glyph) {
        let max = self.max_width;
        if self.state == State::Word {
            let word = self.word_width.unwrap_or(0);
            if self.indent + word + glyph.width > max {
                // Wider than a whole line: break mid-word.
                self.end_word();
                self.wrap();
                self.begin_word();
            } else {
                let pending = self.line_width + self.space_width.unwrap_or(0);
                if word + pending + glyph.width > max {
                    if self.space_width.is_some() {
                        for region in self
                            .regions
                            .iter_mut()
                            .take(self.word_begins_at)
                            .skip(self.space_begins_at)
                        {
                            region.material = false;
                        }
                    }
                    for region in self.regions.iter_mut().skip(self.word_begins_at) {
                        region.left -= pending;
                        region.line += 1;
                    }
                    self.wrap();
                }
            }
            let pending = self.word_width.unwrap_or(0) + self.space_width.unwrap_or(0);
            let left = (self.line_width + pending).clamp(0, max);
            self.push_region(glyph, left);
        }
        if self.state == State::Space {
            let left = (self.line_width + self.space_width.unwrap_or(0)).clamp(0, max);
            self.push_region(glyph, left);
        }
        match self.state {
            State::Word => self.word_width = Some(self.word_width.unwrap_or(0) + glyph.width),
            State::Space => self.space_width = Some(self.space_width.unwrap_or(0) + glyph.width),
            State::None => {}
        }
    }

    fn push_region(&mut self, glyph: Glyph, left: i32) {
        self.regions.push(Region {
            ch: glyph.ch,
            material: true,
            line: self.wrapped_lines,
            left,
            width: glyph.width.min(self.max_width - left),
            raw: glyph.raw,
            unformatted: self.unformatted,
        });
    }

    fn push_marker(&mut self, marker: &[u8], metrics: &impl GlyphMetrics) {
        for ch in valid_chars(marker) {
            let width = metrics.char_width(ch);
            self.overflow.push(OverflowRegion {
                ch,
                line: self.wrapped_lines,
                left: self.line_width,
                width,
            });
            self.line_width += width;
        }
    }
}
