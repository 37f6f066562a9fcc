//! Boot Screen
//!
//! The logo mark drawn from the reserved font glyphs, with centered status
//! lines underneath.

use crate::config::LogoLayout;
use crate::console::Console;
use crate::font::CHAR_WIDTH;
use dragonboot_hal::DisplayController;

/// Segment that ends a message line.
///
/// Any segment starting with a newline ends the line; the rest of that
/// segment is not printed.
pub const LINE_BREAK: &str = "\n";

fn is_line_break(segment: &str) -> bool {
    segment.starts_with('\n')
}

/// X that centers `chars` glyphs at `scale` on a panel `panel_width` wide
pub fn centered_x(panel_width: u32, chars: usize, scale: u32) -> u32 {
    let text_width = u32::try_from(chars)
        .unwrap_or(u32::MAX)
        .saturating_mul(CHAR_WIDTH)
        .saturating_mul(scale);
    panel_width.saturating_sub(text_width) / 2
}

/// Draw the logo (if `show_logo`) and print `segments` as centered lines.
///
/// Segments up to a [`LINE_BREAK`] form one line; every line, including
/// the last, ends with a newline. The console scale is restored
/// afterwards. Leave the logo out when a splash image already covers it.
pub fn display_logo_with_message<D: DisplayController>(
    con: &mut Console<'_, '_, D>,
    layout: &LogoLayout,
    show_logo: bool,
    segments: &[&str],
) {
    let saved_scale = con.scale();

    if show_logo {
        con.set_scale(layout.logo_scale);
        con.set_position(layout.origin_x, layout.origin_y);
        let mut glyph = u32::from(layout.first_glyph);
        for _ in 0..layout.rows {
            for _ in 0..layout.columns {
                if let Ok(code) = u8::try_from(glyph) {
                    con.put_char(code);
                }
                glyph += 1;
            }
            con.put_char(b'\n');
            let (_, y) = con.position();
            con.set_position(layout.origin_x, y);
        }
    }

    con.set_scale(layout.message_scale);
    let (x, _) = con.position();
    con.set_position(x, layout.message_y);

    let width = con.framebuffer().width();
    for line in segments.split(|s| is_line_break(s)) {
        let chars: usize = line.iter().map(|s| s.len()).sum();
        let (_, y) = con.position();
        con.set_position(centered_x(width, chars, layout.message_scale), y);
        for &segment in line {
            con.put_string(Some(segment));
        }
        con.put_char(b'\n');
    }

    con.set_scale(saved_scale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::PanelConfig;
    use crate::font::Font;
    use crate::framebuffer::Framebuffer;
    use crate::testing::{test_font_bytes, RecordingDisplay};
    use alloc::vec;

    #[test]
    fn test_centered_x() {
        assert_eq!(centered_x(1280, 10, 1), 600);
        assert_eq!(centered_x(1280, 0, 1), 640);
        assert_eq!(centered_x(1280, 1000, 2), 0);
    }

    #[test]
    fn test_message_lines_centered() {
        let panel = PanelConfig::new(64, 48, 48);
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let table = test_font_bytes();
        let mut con = Console::new(&mut fb, Font::new(&table));
        let layout = LogoLayout {
            message_y: 8,
            ..LogoLayout::DEFAULT
        };

        display_logo_with_message(&mut con, &layout, false, &["#", "##", LINE_BREAK, "#"]);
        assert_eq!(con.scale(), 2);
        assert_eq!(con.position(), (0, 24));
        drop(con);

        // Line one: three glyphs centered at x = (64 - 24) / 2.
        assert_eq!(fb.pixel(19, 8), Some(Color(0)));
        assert_eq!(fb.pixel(20, 8), Some(Color::WHITE));
        assert_eq!(fb.pixel(43, 15), Some(Color::WHITE));
        assert_eq!(fb.pixel(44, 8), Some(Color(0)));
        // Line two: one glyph at x = 28.
        assert_eq!(fb.pixel(28, 16), Some(Color::WHITE));
        assert_eq!(fb.pixel(35, 23), Some(Color::WHITE));
        assert_eq!(fb.pixel(27, 16), Some(Color(0)));
    }

    #[test]
    fn test_newline_led_segment_breaks_line() {
        let panel = PanelConfig::new(64, 48, 48);
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let table = test_font_bytes();
        let mut con = Console::new(&mut fb, Font::new(&table));
        let layout = LogoLayout {
            message_y: 8,
            ..LogoLayout::DEFAULT
        };

        display_logo_with_message(&mut con, &layout, false, &["#", "\n##", "#"]);
        assert_eq!(con.position(), (0, 24));
        drop(con);

        // Two one-glyph lines at x = 28; the text after the newline is dropped.
        assert_eq!(fb.pixel(28, 8), Some(Color::WHITE));
        assert_eq!(fb.pixel(28, 16), Some(Color::WHITE));
        assert_eq!(fb.front().iter().filter(|&&px| px != 0).count(), 2 * 64);
    }

    #[test]
    fn test_logo_glyph_sequence() {
        // Logo glyphs are blank in the test font except the one painted here.
        let mut table = test_font_bytes();
        let first = usize::from(LogoLayout::DEFAULT.first_glyph - 32) * 8;
        let last = first + 47 * 8;
        table[first] = 0x80;
        table[last + 7] = 0x01;

        let panel = PanelConfig::DEFAULT;
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let mut con = Console::new(&mut fb, Font::new(&table));
        let layout = LogoLayout::DEFAULT;

        display_logo_with_message(&mut con, &layout, true, &[]);
        assert_eq!(con.scale(), 2);
        drop(con);

        // First glyph pixel at the origin, scaled by 3.
        assert_eq!(fb.pixel(370, 98), Some(Color::WHITE));
        assert_eq!(fb.pixel(372, 100), Some(Color::WHITE));
        // Last glyph: row 3, column 11, bottom-right pixel.
        let x = 370 + 11 * 24 + 7 * 3;
        let y = 98 + 3 * 24 + 7 * 3;
        assert_eq!(fb.pixel(x, y), Some(Color::WHITE));
        assert_eq!(fb.pixel(x + 2, y + 2), Some(Color::WHITE));
        assert_eq!(fb.front().iter().filter(|&&px| px != 0).count(), 18);
    }
}
