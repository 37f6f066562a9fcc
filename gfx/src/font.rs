//! Monochrome Glyph Font
//!
//! Fixed 8x8 cells, one bit per pixel, most significant bit first, rows
//! packed back to back. Glyph `n` of the table renders code point `n + 32`;
//! codes from 0x7F upward hold the pieces of the logo mark.

/// Glyph cell width in pixels
pub const CHAR_WIDTH: u32 = 8;
/// Glyph cell height in pixels
pub const CHAR_HEIGHT: u32 = 8;
/// Bytes per glyph
pub const GLYPH_BYTES: usize = (CHAR_WIDTH * CHAR_HEIGHT / 8) as usize;
/// First code point with a glyph
pub const FIRST_CHAR: u8 = 32;
/// Last code point the console will rasterize
pub const LAST_CHAR: u8 = 175;

/// Read-only view over a font table
#[derive(Debug, Clone, Copy)]
pub struct Font<'a> {
    table: &'a [u8],
}

impl<'a> Font<'a> {
    /// Wrap a table of packed glyphs
    pub const fn new(table: &'a [u8]) -> Self {
        Self { table }
    }

    /// Number of glyphs in the table
    pub const fn glyph_count(&self) -> usize {
        self.table.len() / GLYPH_BYTES
    }

    /// Glyph for code point `c`, if the table has one
    pub fn glyph(&self, c: u8) -> Option<Glyph<'a>> {
        let index = usize::from(c.checked_sub(FIRST_CHAR)?);
        let start = index * GLYPH_BYTES;
        self.table
            .get(start..start + GLYPH_BYTES)
            .map(|bits| Glyph { bits })
    }
}

/// One glyph bitmap
#[derive(Debug, Clone, Copy)]
pub struct Glyph<'a> {
    bits: &'a [u8],
}

impl Glyph<'_> {
    /// Whether the pixel at `(col, row)` is set
    #[inline]
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        let bit = (row * CHAR_WIDTH + col) as usize;
        self.bits
            .get(bit / 8)
            .map_or(false, |byte| (byte >> (7 - bit % 8)) & 1 != 0)
    }
}
