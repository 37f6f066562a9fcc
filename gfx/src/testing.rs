//! Test doubles shared by the unit and scenario tests

use crate::color::Color;
use crate::config::PanelConfig;
use crate::font::GLYPH_BYTES;
use crate::format::TextSink;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use dragonboot_hal::{DisplayController, PhysAddr};

/// Display hook that remembers every published address
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    published: Vec<PhysAddr>,
}

impl RecordingDisplay {
    pub fn published(&self) -> &[PhysAddr] {
        &self.published
    }
}

impl DisplayController for RecordingDisplay {
    fn set_active_framebuffer(&mut self, addr: PhysAddr) {
        self.published.push(addr);
    }
}

/// A panel small enough to inspect exhaustively
pub fn small_panel() -> PanelConfig {
    PanelConfig::new(32, 24, 24)
}

/// Font table covering codes 32..=175.
///
/// Every glyph is blank except:
/// - `'#'`: all pixels set
/// - `'.'`: only the top-left pixel set
/// - `'|'`: the left column set
pub fn test_font_bytes() -> Vec<u8> {
    let mut table = vec![0u8; GLYPH_BYTES * (176 - 32)];
    let glyph = |c: u8| (c as usize - 32) * GLYPH_BYTES;
    table[glyph(b'#')..glyph(b'#') + GLYPH_BYTES].fill(0xFF);
    table[glyph(b'.')] = 0x80;
    for row in 0..GLYPH_BYTES {
        table[glyph(b'|') + row] = 0x80;
    }
    table
}

/// Text sink that records what the formatter emits
#[derive(Debug)]
pub struct Transcript {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
    pub fill_background: bool,
    pub muted: bool,
    pub scale: u32,
    /// Scale in effect for each emitted character
    pub scales: Vec<u32>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            text: String::new(),
            fg: Color::WHITE,
            bg: Color::BLACK,
            fill_background: false,
            muted: false,
            scale: 2,
            scales: Vec::new(),
        }
    }
}

impl TextSink for Transcript {
    fn put_char(&mut self, c: u8) {
        if self.muted {
            return;
        }
        self.text.push(c as char);
        self.scales.push(self.scale);
    }

    fn set_foreground(&mut self, color: Color) {
        self.fg = color;
    }

    fn set_background(&mut self, color: Color) {
        self.bg = color;
        self.fill_background = true;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn set_scale(&mut self, scale: u32) {
        self.scale = scale;
    }
}
