//! Text Console
//!
//! Cursor, scale and color state layered over a [`Framebuffer`]. Glyphs are
//! rasterized straight into the visible buffer, so console output shows up
//! without a swap. There is no scrollback: when the cursor runs off the
//! bottom it wraps to the top and old text is overdrawn.

use crate::color::Color;
use crate::config::ConsoleConfig;
use crate::draw;
use crate::font::{Font, CHAR_HEIGHT, CHAR_WIDTH, FIRST_CHAR, LAST_CHAR};
use crate::format::{self, Arg, TextSink};
use crate::framebuffer::Framebuffer;
use bitflags::bitflags;
use core::fmt;
use dragonboot_hal::DisplayController;

bitflags! {
    /// Console mode flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConsoleFlags: u8 {
        /// Paint glyph "off" bits with the background color
        const FILL_BACKGROUND = 1 << 0;
        /// Suppress all output
        const MUTED = 1 << 1;
    }
}

/// Text console bound to a framebuffer
#[derive(Debug)]
pub struct Console<'c, 'fb, D: DisplayController> {
    fb: &'c mut Framebuffer<'fb, D>,
    font: Font<'c>,
    x: u32,
    y: u32,
    scale: u32,
    fg: Color,
    bg: Color,
    flags: ConsoleFlags,
}

impl<'c, 'fb, D: DisplayController> Console<'c, 'fb, D> {
    /// Bind a console with the default configuration
    pub fn new(fb: &'c mut Framebuffer<'fb, D>, font: Font<'c>) -> Self {
        Self::with_config(fb, font, ConsoleConfig::DEFAULT)
    }

    /// Bind a console with `config`, cursor at the origin
    pub fn with_config(fb: &'c mut Framebuffer<'fb, D>, font: Font<'c>, config: ConsoleConfig) -> Self {
        let mut flags = ConsoleFlags::empty();
        flags.set(ConsoleFlags::FILL_BACKGROUND, config.fill_background);
        Self {
            fb,
            font,
            x: 0,
            y: 0,
            scale: config.scale.max(1),
            fg: config.fg,
            bg: config.bg,
            flags,
        }
    }

    /// The underlying framebuffer
    pub fn framebuffer(&mut self) -> &mut Framebuffer<'fb, D> {
        &mut *self.fb
    }

    /// Cursor position in pixels
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Move the cursor
    pub fn set_position(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    /// Set both colors and the background fill mode at once
    pub fn set_colors(&mut self, fg: Color, fill_background: bool, bg: Color) {
        self.fg = fg;
        self.bg = bg;
        self.flags.set(ConsoleFlags::FILL_BACKGROUND, fill_background);
    }

    /// Foreground color
    pub fn foreground(&self) -> Color {
        self.fg
    }

    /// Background color
    pub fn background(&self) -> Color {
        self.bg
    }

    /// Current mode flags
    pub fn flags(&self) -> ConsoleFlags {
        self.flags
    }

    /// Glyph magnification
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Change glyph magnification; 0 is treated as 1
    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale.max(1);
    }

    /// Mute or unmute output
    pub fn set_muted(&mut self, muted: bool) {
        self.flags.set(ConsoleFlags::MUTED, muted);
    }

    /// Emit one character.
    ///
    /// Codes 32..=175 are rasterized and advance the cursor, `\n` moves to
    /// the start of the next glyph row, everything else is ignored.
    pub fn put_char(&mut self, c: u8) {
        if self.flags.contains(ConsoleFlags::MUTED) {
            return;
        }
        match c {
            FIRST_CHAR..=LAST_CHAR => {
                self.draw_glyph(c);
                self.x = self.x.saturating_add(CHAR_WIDTH.saturating_mul(self.scale));
            }
            b'\n' => self.newline(),
            _ => {}
        }
    }

    /// Emit a string; absent strings and muted consoles emit nothing
    pub fn put_string(&mut self, s: Option<&str>) {
        TextSink::put_str(self, s);
    }

    /// Render `fmt` with `args` (see [`format::format`])
    pub fn printf(&mut self, fmt: &str, args: &[Arg<'_>]) {
        format::format(self, fmt, args);
    }

    /// Hex dump `buf` labelled from `base` (see [`format::hex_dump`])
    pub fn hex_dump(&mut self, base: u32, buf: &[u8]) {
        format::hex_dump(self, base, buf);
    }

    /// One newline at scale 1
    pub fn small_separator(&mut self) {
        self.separator(1);
    }

    /// One newline at scale 2
    pub fn big_separator(&mut self) {
        self.separator(2);
    }

    fn separator(&mut self, scale: u32) {
        let saved = self.scale;
        self.scale = scale;
        self.put_char(b'\n');
        self.scale = saved;
    }

    fn newline(&mut self) {
        let row = CHAR_HEIGHT.saturating_mul(self.scale);
        self.x = 0;
        self.y = self.y.saturating_add(row);
        // No room for another glyph row.
        if self.y.saturating_add(row) > self.fb.height() {
            self.y = 0;
        }
    }

    fn draw_glyph(&mut self, c: u8) {
        let Some(glyph) = self.font.glyph(c) else {
            log::trace!("console: no glyph for {:#04x}", c);
            return;
        };
        let fill = self.flags.contains(ConsoleFlags::FILL_BACKGROUND);
        let scale = self.scale;

        for row in 0..CHAR_HEIGHT {
            for col in 0..CHAR_WIDTH {
                let color = if glyph.is_set(col, row) {
                    self.fg
                } else if fill {
                    self.bg
                } else {
                    continue;
                };
                let px = self.x.saturating_add(col.saturating_mul(scale));
                let py = self.y.saturating_add(row.saturating_mul(scale));
                for dy in 0..scale {
                    for dx in 0..scale {
                        draw::set_pixel(self.fb, px.saturating_add(dx), py.saturating_add(dy), color);
                    }
                }
            }
        }
    }
}

impl<D: DisplayController> TextSink for Console<'_, '_, D> {
    fn put_char(&mut self, c: u8) {
        Console::put_char(self, c);
    }

    fn set_foreground(&mut self, color: Color) {
        self.fg = color;
    }

    fn set_background(&mut self, color: Color) {
        self.bg = color;
        self.flags.insert(ConsoleFlags::FILL_BACKGROUND);
    }

    fn is_muted(&self) -> bool {
        self.flags.contains(ConsoleFlags::MUTED)
    }

    fn scale(&self) -> u32 {
        Console::scale(self)
    }

    fn set_scale(&mut self, scale: u32) {
        Console::set_scale(self, scale);
    }
}

impl<D: DisplayController> fmt::Write for Console<'_, '_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_string(Some(s));
        Ok(())
    }
}
