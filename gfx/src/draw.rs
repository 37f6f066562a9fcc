//! Primitive Drawing
//!
//! Pixel, line and rectangle-blit operations over a [`Framebuffer`]. All
//! destination addressing goes through the rotated panel mapping; pixels
//! that fall outside a buffer are dropped.

use crate::color::Color;
use crate::framebuffer::{Framebuffer, Surface};
use dragonboot_hal::DisplayController;

// =============================================================================
// PIXELS AND LINES
// =============================================================================

/// Set one pixel of the visible buffer
#[inline]
pub fn set_pixel<D: DisplayController>(fb: &mut Framebuffer<'_, D>, x: u32, y: u32, color: Color) {
    fb.put(Surface::Front, x, y, color);
}

// Outcode bits for line clipping
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

type Point = (i64, i64);

/// Logical area a line is clipped to: columns `0..=max_x`, rows `0..=max_y`
#[derive(Debug, Clone, Copy)]
struct ClipBox {
    max_x: i64,
    max_y: i64,
}

impl ClipBox {
    fn of<D: DisplayController>(fb: &Framebuffer<'_, D>) -> Self {
        Self {
            max_x: i64::from(fb.width()),
            max_y: i64::from(fb.height()) - 1,
        }
    }

    fn outcode(&self, (x, y): Point) -> u8 {
        let mut code = 0;
        if x < 0 {
            code |= LEFT;
        } else if x > self.max_x {
            code |= RIGHT;
        }
        if y < 0 {
            code |= ABOVE;
        } else if y > self.max_y {
            code |= BELOW;
        }
        code
    }

    fn clamp(&self, (x, y): Point) -> Point {
        (x.clamp(0, self.max_x), y.clamp(0, self.max_y))
    }

    /// Cohen-Sutherland clip of `p0..p1`. `None` if the segment misses the
    /// box entirely. Rounded intersections are clamped back into the box.
    fn clip(&self, mut p0: Point, mut p1: Point) -> Option<(Point, Point)> {
        // Each endpoint crosses at most two edges; rounding may add a retry.
        for _ in 0..8 {
            let (c0, c1) = (self.outcode(p0), self.outcode(p1));
            if c0 | c1 == 0 {
                return Some((p0, p1));
            }
            if c0 & c1 != 0 {
                return None;
            }

            let code = if c0 != 0 { c0 } else { c1 };
            let (x0, y0) = (i128::from(p0.0), i128::from(p0.1));
            let (dx, dy) = (i128::from(p1.0) - x0, i128::from(p1.1) - y0);
            // The edge lies strictly between the endpoints, so the
            // divisor along the crossed axis is never zero.
            let at_y = |y: i64| (x0 + div_round(dx * (i128::from(y) - y0), dy), i128::from(y));
            let at_x = |x: i64| (i128::from(x), y0 + div_round(dy * (i128::from(x) - x0), dx));
            let (x, y) = if code & ABOVE != 0 {
                at_y(0)
            } else if code & BELOW != 0 {
                at_y(self.max_y)
            } else if code & LEFT != 0 {
                at_x(0)
            } else {
                at_x(self.max_x)
            };
            let point = (saturate_i64(x), saturate_i64(y));

            if c0 != 0 {
                p0 = point;
            } else {
                p1 = point;
            }
        }

        if self.outcode(p0) & self.outcode(p1) != 0 {
            return None;
        }
        Some((self.clamp(p0), self.clamp(p1)))
    }
}

/// `n / d` rounded to the nearest integer, halves away from zero
fn div_round(n: i128, d: i128) -> i128 {
    let (q, r) = (n / d, n % d);
    if 2 * r.abs() >= d.abs() {
        if (n < 0) == (d < 0) {
            q + 1
        } else {
            q - 1
        }
    } else {
        q
    }
}

fn saturate_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

/// Draw a line from `(x0, y0)` to `(x1, y1)` inclusive (Bresenham).
///
/// Endpoints are put in a canonical order first, so both directions paint
/// the same pixels. A zero-length line paints its single point. The line
/// is clipped to the panel before stepping, so any `i32` endpoints are
/// accepted and the work is bounded by the panel size.
pub fn line<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
) {
    let (start, end) = if (x0, y0) <= (x1, y1) {
        ((x0, y0), (x1, y1))
    } else {
        ((x1, y1), (x0, y0))
    };
    let start = (i64::from(start.0), i64::from(start.1));
    let end = (i64::from(end.0), i64::from(end.1));

    let Some(((mut x, mut y), (x1, y1))) = ClipBox::of(fb).clip(start, end) else {
        return;
    };

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let (Ok(px), Ok(py)) = (u32::try_from(x), u32::try_from(y)) {
            set_pixel(fb, px, py, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

// =============================================================================
// RECTANGLE BLITS
// =============================================================================

/// Copy `pixels` row-major into the `sx x sy` back-buffer block whose
/// top-left corner is `(px, py)`. Stops early if the source runs out.
fn blit<D, I>(fb: &mut Framebuffer<'_, D>, mut pixels: I, sx: u32, sy: u32, px: u32, py: u32)
where
    D: DisplayController,
    I: Iterator<Item = Color>,
{
    for y in py..py.saturating_add(sy) {
        for x in px..px.saturating_add(sx) {
            match pixels.next() {
                Some(color) => fb.put(Surface::Back, x, y, color),
                None => return,
            }
        }
    }
}

/// Fill a block of the back buffer from 8-bit grayscale samples.
///
/// Each sample is replicated into all four channels, alpha included.
pub fn fill_rect_from_grayscale<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    src: &[u8],
    sx: u32,
    sy: u32,
    px: u32,
    py: u32,
) {
    blit(fb, src.iter().map(|&v| Color::splat(v)), sx, sy, px, py);
}

/// Fill a block of the back buffer from B,G,R byte triplets, fully opaque
pub fn fill_rect_from_rgb24<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    src: &[u8],
    sx: u32,
    sy: u32,
    px: u32,
    py: u32,
) {
    let pixels = src
        .chunks_exact(3)
        .map(|bgr| Color::rgb(bgr[2], bgr[1], bgr[0]));
    blit(fb, pixels, sx, sy, px, py);
}

/// Fill a block of the back buffer from packed ARGB pixels
pub fn fill_rect_from_argb32<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    src: &[u32],
    sx: u32,
    sy: u32,
    px: u32,
    py: u32,
) {
    blit(fb, src.iter().map(|&v| Color(v)), sx, sy, px, py);
}
