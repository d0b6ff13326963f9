//! Inline formatting state for rasterization.
//!
//! Layout skips formatting escapes; rendering has to honour them. Backends
//! walk the source text together with the layout through
//! [`TextLayout::styled`], which yields every placed [`Region`] with the
//! [`GlyphStyle`] active at that point:
//!
//! | Escape | Arguments | Effect |
//! |--------|-----------|--------|
//! | `\x0F` | r, g, b code points | set the colour |
//! | `\x08` | one letter | palette colour, or `U` to toggle underline |
//! | `\x10` | x, y (7-bit signed) | offset the next glyph only |
//! | `\x01` | | toggle inverted colour |
//! | `\x0E` | | reset to the default style |
//! | `\x11` | one character | pen nudge, already applied by layout |

use glint_core::{Point, Rgba8};

use crate::layout::{decode, Region, TextLayout, Unit};

/// Rendering state attached to one glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphStyle {
    /// Ink colour before inversion. Always opaque.
    pub color: Rgba8,
    /// Pixel offset applied to this glyph's cell.
    pub offset: Point,
    /// Draw a line under the glyph.
    pub underline: bool,
    /// Invert the ink colour.
    pub invert: bool,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::WHITE,
            offset: Point::ZERO,
            underline: false,
            invert: false,
        }
    }
}

impl GlyphStyle {
    /// Colour to draw with, inversion applied.
    pub fn ink(&self) -> Rgba8 {
        if self.invert {
            let Rgba8 { r, g, b, a } = self.color;
            Rgba8::new(255 - r, 255 - g, 255 - b, a)
        } else {
            self.color
        }
    }
}

/// Colour selected by `\x08` followed by `code`.
pub fn palette(code: char) -> Option<Rgba8> {
    let rgb = match code {
        'w' => 0xFFFFFF,
        'g' => 0xC0C0C0,
        'o' => 0xFFD820,
        'r' => 0xFF0000,
        'l' => 0xFF4B4B,
        'b' => 0x0000FF,
        't' => 0x20AAFF,
        'u' => 0x9353D3,
        'i' => 0x8C8CFF,
        _ => return None,
    };
    Some(Rgba8::unpack(0xFF00_0000 | rgb))
}

impl TextLayout {
    /// Pair each region with the inline style in effect for it.
    ///
    /// `text` must be the bytes the layout was computed from.
    pub fn styled<'a>(&'a self, text: &[u8]) -> StyledGlyphs<'a> {
        StyledGlyphs {
            units: decode(text),
            pos: 0,
            regions: self.regions().iter(),
            style: GlyphStyle::default(),
        }
    }
}

/// Iterator returned by [`TextLayout::styled`].
pub struct StyledGlyphs<'a> {
    units: Vec<Unit>,
    pos: usize,
    regions: std::slice::Iter<'a, Region>,
    style: GlyphStyle,
}

impl StyledGlyphs<'_> {
    /// Code point of the next unit, consuming it. Invalid bytes read as 0.
    fn arg(&mut self) -> u32 {
        let code = self
            .units
            .get(self.pos)
            .and_then(|u| u.ch)
            .map_or(0, u32::from);
        self.pos += 1;
        code
    }

    fn apply(&mut self, ch: char) {
        match ch {
            '\x11' => self.pos += 1,
            '\x10' => {
                let x = offset_arg(self.arg());
                let y = offset_arg(self.arg());
                self.style.offset = Point::new(x, y);
            }
            '\x0F' => {
                let r = self.arg() as u8;
                let g = self.arg() as u8;
                let b = self.arg() as u8;
                self.style.color = Rgba8::new(r, g, b, 255);
            }
            '\x0E' => self.style = GlyphStyle::default(),
            '\x01' => self.style.invert = !self.style.invert,
            '\x08' => {
                let code = char::from_u32(self.arg()).unwrap_or('\0');
                if code == 'U' {
                    self.style.underline = !self.style.underline;
                } else if let Some(color) = palette(code) {
                    self.style.color = color;
                }
            }
            _ => {}
        }
    }
}

fn offset_arg(code: u32) -> i32 {
    let v = (code & 0x7F) as i32;
    if v >= 0x40 {
        v - 0x80
    } else {
        v
    }
}

impl<'a> Iterator for StyledGlyphs<'a> {
    type Item = (&'a Region, GlyphStyle);

    fn next(&mut self) -> Option<Self::Item> {
        let region = *self.regions.as_slice().first()?;
        while let Some(unit) = self.units.get(self.pos).copied() {
            self.pos += 1;
            let Some(ch) = unit.ch else {
                continue;
            };
            if unit.raw == region.raw {
                let style = self.style;
                self.style.offset = Point::ZERO;
                return self.regions.next().map(|r| (r, style));
            }
            self.apply(ch);
        }
        None
    }
}
