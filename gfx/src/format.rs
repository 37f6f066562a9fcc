//! Text Formatting
//!
//! A small printf-style formatter and a hex dump, both built only on
//! character emission through [`TextSink`].
//!
//! # Verbs
//!
//! | Verb | Argument | Effect |
//! |------|----------|--------|
//! | `%c` | char | one character |
//! | `%s` | string | a string, nothing if absent |
//! | `%d` | unsigned | base 10 |
//! | `%x` `%X` `%p` `%P` | unsigned | base 16, lowercase digits |
//! | `%k` | color | set the foreground color |
//! | `%K` | color | set the background color and enable background fill |
//! | `%%` | | a literal `%` |
//!
//! Anything else after `%` is echoed as `%` followed by that character.
//!
//! # Width and fill
//!
//! A digit or space right after `%` starts a width prefix. If a digit
//! follows it, the first character is the fill byte and the digit is the
//! width (`%08x`). Otherwise the fill is a space and the width is the
//! first character minus `'0'` (`%5d`); a leading space therefore yields a
//! negative width and no padding.

use crate::color::Color;
use arrayvec::ArrayVec;

// =============================================================================
// SINK
// =============================================================================

/// Character output with console-style state
pub trait TextSink {
    /// Emit one character
    fn put_char(&mut self, c: u8);

    /// Set the foreground color
    fn set_foreground(&mut self, color: Color);

    /// Set the background color and enable background fill
    fn set_background(&mut self, color: Color);

    /// Whether output is suppressed
    fn is_muted(&self) -> bool;

    /// Current glyph magnification
    fn scale(&self) -> u32;

    /// Change glyph magnification
    fn set_scale(&mut self, scale: u32);

    /// Emit a string. Nothing is emitted when muted or when `s` is absent.
    fn put_str(&mut self, s: Option<&str>) {
        let Some(s) = s else { return };
        if self.is_muted() {
            return;
        }
        for &c in s.as_bytes() {
            self.put_char(c);
        }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// One positional formatter argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    /// A character code
    Char(u8),
    /// A string, possibly absent
    Str(Option<&'a str>),
    /// An unsigned integer
    Uint(u32),
    /// A color
    Color(Color),
}

impl Arg<'_> {
    fn as_uint(&self) -> Option<u32> {
        match *self {
            Arg::Uint(v) => Some(v),
            Arg::Char(c) => Some(u32::from(c)),
            Arg::Color(c) => Some(c.0),
            Arg::Str(_) => None,
        }
    }

    fn as_char(&self) -> Option<u8> {
        match *self {
            Arg::Char(c) => Some(c),
            // Truncates like a character store would.
            Arg::Uint(v) => Some(v as u8),
            _ => None,
        }
    }

    fn as_color(&self) -> Option<Color> {
        match *self {
            Arg::Color(c) => Some(c),
            Arg::Uint(v) => Some(Color(v)),
            _ => None,
        }
    }
}

impl From<u32> for Arg<'_> {
    fn from(v: u32) -> Self {
        Arg::Uint(v)
    }
}

impl From<u8> for Arg<'_> {
    fn from(c: u8) -> Self {
        Arg::Char(c)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(Some(s))
    }
}

impl<'a> From<Option<&'a str>> for Arg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Arg::Str(s)
    }
}

impl From<Color> for Arg<'_> {
    fn from(c: Color) -> Self {
        Arg::Color(c)
    }
}

// =============================================================================
// FORMATTER
// =============================================================================

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Emit `v` in `base`, left-padded with `fill` up to `width` characters.
///
/// A `fill` of 0 disables padding. Bases outside `2..=36` emit nothing.
pub fn put_number<S: TextSink + ?Sized>(out: &mut S, v: u32, base: u32, fill: u8, width: i32) {
    if !(2..=36).contains(&base) {
        return;
    }

    // Least significant digit first, then padding, emitted in reverse.
    let mut buf: ArrayVec<u8, 65> = ArrayVec::new();
    let mut v = v;
    let mut remaining = width;
    loop {
        remaining -= 1;
        buf.push(DIGITS[(v % base) as usize]);
        v /= base;
        if v == 0 {
            break;
        }
    }
    if fill != 0 {
        while remaining > 0 && buf.try_push(fill).is_ok() {
            remaining -= 1;
        }
    }

    if out.is_muted() {
        return;
    }
    for &c in buf.iter().rev() {
        out.put_char(c);
    }
}

/// Render `fmt` with positional `args`.
///
/// Does nothing when the sink is muted. A missing or mismatched argument
/// renders nothing but still uses up its position.
pub fn format<S: TextSink + ?Sized>(out: &mut S, fmt: &str, args: &[Arg<'_>]) {
    if out.is_muted() {
        return;
    }

    let mut args = args.iter();
    let mut bytes = fmt.bytes();

    while let Some(c) = bytes.next() {
        if c == 0 {
            break;
        }
        if c != b'%' {
            out.put_char(c);
            continue;
        }

        let mut fill = 0u8;
        let mut width = 0i32;
        let mut verb = bytes.next().unwrap_or(0);
        if verb.is_ascii_digit() || verb == b' ' {
            let first = verb;
            verb = bytes.next().unwrap_or(0);
            if verb.is_ascii_digit() {
                fill = first;
                width = i32::from(verb - b'0');
                verb = bytes.next().unwrap_or(0);
            } else {
                fill = b' ';
                width = i32::from(first) - i32::from(b'0');
            }
        }

        match verb {
            b'c' => {
                if let Some(c) = args.next().and_then(Arg::as_char) {
                    out.put_char(c);
                }
            }
            b's' => {
                if let Some(Arg::Str(s)) = args.next() {
                    out.put_str(*s);
                }
            }
            b'd' => {
                if let Some(v) = args.next().and_then(Arg::as_uint) {
                    put_number(out, v, 10, fill, width);
                }
            }
            b'x' | b'X' | b'p' | b'P' => {
                if let Some(v) = args.next().and_then(Arg::as_uint) {
                    put_number(out, v, 16, fill, width);
                }
            }
            b'k' => {
                if let Some(color) = args.next().and_then(Arg::as_color) {
                    out.set_foreground(color);
                }
            }
            b'K' => {
                if let Some(color) = args.next().and_then(Arg::as_color) {
                    out.set_background(color);
                }
            }
            b'%' => out.put_char(b'%'),
            0 => break,
            other => {
                out.put_char(b'%');
                out.put_char(other);
            }
        }
    }
}

// =============================================================================
// HEX DUMP
// =============================================================================

const HEX_DUMP_WIDTH: usize = 16;

/// Dump `buf` as hex with an ASCII sidebar, 16 bytes per line.
///
/// Lines are labelled with `base` plus the line offset. The dump is drawn
/// at scale 1 and the previous scale is restored afterwards.
pub fn hex_dump<S: TextSink + ?Sized>(out: &mut S, base: u32, buf: &[u8]) {
    if out.is_muted() {
        return;
    }

    let saved_scale = out.scale();
    out.set_scale(1);

    for (line, chunk) in buf.chunks(HEX_DUMP_WIDTH).enumerate() {
        let offset = (line * HEX_DUMP_WIDTH) as u32;
        format(out, "%08x: ", &[Arg::Uint(base.wrapping_add(offset))]);
        for &byte in chunk {
            format(out, "%02x ", &[Arg::Uint(u32::from(byte))]);
        }
        for _ in chunk.len()..HEX_DUMP_WIDTH {
            out.put_str(Some("   "));
        }
        out.put_str(Some("| "));
        for &byte in chunk {
            out.put_char(if (32..=126).contains(&byte) { byte } else { b'.' });
        }
        out.put_char(b'\n');
    }

    out.set_scale(saved_scale);
}
