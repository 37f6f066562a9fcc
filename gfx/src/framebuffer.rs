//! Double-Buffered Framebuffer
//!
//! Two equally sized pixel buffers: `front` is scanned out by the display
//! controller, `back` is drawn into off screen. [`Framebuffer::swap`]
//! exchanges the two and is the only point where back-buffer content
//! becomes visible.
//!
//! # Coordinate mapping
//!
//! The panel is mounted rotated relative to its storage order. One buffer
//! row of `stride` pixels holds one logical column, walked backwards, so a
//! logical pixel `(x, y)` lives at linear offset `y + (width - x) * stride`
//! (see [`mapped_offset`]). For `x == 0` that offset lies one row past a
//! `width * stride` buffer and the write is dropped.

use crate::color::Color;
use crate::config::PanelConfig;
use crate::error::{GfxError, GfxResult};
use dragonboot_hal::{DisplayController, PhysAddr};

// =============================================================================
// COORDINATE MAPPING
// =============================================================================

/// Linear buffer offset of logical pixel `(x, y)`.
///
/// Returns `None` when `x > width`, where the mapping would run backwards
/// past the start of the buffer.
#[inline]
pub const fn mapped_offset(x: u32, y: u32, width: u32, stride: u32) -> Option<usize> {
    if x > width {
        return None;
    }
    Some(y as usize + (width - x) as usize * stride as usize)
}

/// Linear offset in the buffer's own storage order
#[inline]
pub const fn native_offset(column: u32, row: u32, stride: u32) -> usize {
    column as usize + row as usize * stride as usize
}

/// Which of the two buffers an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// The buffer currently scanned out
    Front,
    /// The off-screen buffer
    Back,
}

// =============================================================================
// FRAMEBUFFER
// =============================================================================

/// Double-buffered 32-bit ARGB framebuffer
#[derive(Debug)]
pub struct Framebuffer<'fb, D: DisplayController> {
    front: &'fb mut [u32],
    back: &'fb mut [u32],
    width: u32,
    height: u32,
    stride: u32,
    display: D,
}

impl<'fb, D: DisplayController> Framebuffer<'fb, D> {
    /// Bind a framebuffer to one memory region holding both buffers.
    ///
    /// The first `width * stride` pixels become the front buffer and the
    /// next `width * stride` the back buffer. The front buffer is
    /// published to `display` before returning.
    pub fn init(memory: &'fb mut [u32], panel: PanelConfig, display: D) -> GfxResult<Self> {
        let len = panel.buffer_len();
        let doubled = len.checked_mul(2).ok_or(GfxError::InvalidGeometry)?;
        let memory = memory.get_mut(..doubled).ok_or(GfxError::InvalidGeometry)?;
        let (front, back) = memory.split_at_mut(len);
        Self::with_buffers(front, back, panel, display)
    }

    /// Bind a framebuffer to two separate buffers
    pub fn with_buffers(
        front: &'fb mut [u32],
        back: &'fb mut [u32],
        panel: PanelConfig,
        display: D,
    ) -> GfxResult<Self> {
        let len = panel.buffer_len();
        if panel.width == 0 || panel.height == 0 || panel.height > panel.stride {
            return Err(GfxError::InvalidGeometry);
        }
        if front.len() < len || back.len() != front.len() {
            return Err(GfxError::InvalidGeometry);
        }

        let mut fb = Self {
            front,
            back,
            width: panel.width,
            height: panel.height,
            stride: panel.stride,
            display,
        };
        log::debug!(
            "gfx: framebuffer {}x{} stride {} front={:#x} back={:#x}",
            fb.width,
            fb.height,
            fb.stride,
            PhysAddr::of_slice(&*fb.front),
            PhysAddr::of_slice(&*fb.back)
        );
        fb.publish();
        Ok(fb)
    }

    /// Bind a framebuffer to a hardware-supplied base address holding two
    /// consecutive buffers.
    ///
    /// # Safety
    ///
    /// `base` must be valid for reads and writes of `2 * width * stride`
    /// pixels for `'fb`, and nothing else may access that memory while the
    /// framebuffer is alive.
    pub unsafe fn from_raw(base: *mut u32, panel: PanelConfig, display: D) -> GfxResult<Self> {
        if base.is_null() {
            return Err(GfxError::InvalidGeometry);
        }
        let len = panel
            .buffer_len()
            .checked_mul(2)
            .ok_or(GfxError::InvalidGeometry)?;
        // SAFETY: guaranteed by the caller.
        let memory = unsafe { core::slice::from_raw_parts_mut(base, len) };
        Self::init(memory, panel, display)
    }

    /// Logical width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixels per buffer row
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Geometry as a panel configuration
    pub fn panel(&self) -> PanelConfig {
        PanelConfig::new(self.width, self.height, self.stride)
    }

    /// The display hook
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Buffer currently scanned out
    pub fn front(&self) -> &[u32] {
        &*self.front
    }

    /// Off-screen buffer
    pub fn back(&self) -> &[u32] {
        &*self.back
    }

    /// Mutable access to one buffer
    pub fn surface_mut(&mut self, surface: Surface) -> &mut [u32] {
        match surface {
            Surface::Front => &mut *self.front,
            Surface::Back => &mut *self.back,
        }
    }

    fn surface(&self, surface: Surface) -> &[u32] {
        match surface {
            Surface::Front => &*self.front,
            Surface::Back => &*self.back,
        }
    }

    /// Write one logical pixel. Out-of-range writes are dropped.
    #[inline]
    pub fn put(&mut self, surface: Surface, x: u32, y: u32, color: Color) {
        let Some(offset) = mapped_offset(x, y, self.width, self.stride) else {
            log::trace!("gfx: dropped pixel ({}, {})", x, y);
            return;
        };
        match self.surface_mut(surface).get_mut(offset) {
            Some(px) => *px = color.0,
            None => log::trace!("gfx: dropped pixel ({}, {})", x, y),
        }
    }

    /// Read one logical pixel of the front buffer.
    ///
    /// Column `x = 0` maps one row past the end of the buffer, so it reads
    /// `None` and writes to it are dropped, even right after [`clear`].
    /// Visible columns are `1..=width`.
    ///
    /// [`clear`]: Self::clear
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.read(Surface::Front, x, y)
    }

    /// Read one logical pixel of the back buffer
    pub fn back_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.read(Surface::Back, x, y)
    }

    fn read(&self, surface: Surface, x: u32, y: u32) -> Option<Color> {
        let offset = mapped_offset(x, y, self.width, self.stride)?;
        self.surface(surface).get(offset).copied().map(Color)
    }

    /// Fill the whole front buffer with `color`
    pub fn clear(&mut self, color: Color) {
        self.front.fill(color.0);
    }

    /// Byte-fill the whole back buffer
    pub fn clear_back(&mut self, value: u8) {
        self.back.fill(Color::splat(value).0);
    }

    /// Byte-fill `row_count` buffer rows of the back buffer starting at
    /// `row_offset`. The range is clipped to the buffer.
    pub fn clear_region(&mut self, value: u8, row_offset: u32, row_count: u32) {
        let stride = self.stride as usize;
        let len = self.back.len();
        let start = (row_offset as usize).saturating_mul(stride).min(len);
        let end = start
            .saturating_add((row_count as usize).saturating_mul(stride))
            .min(len);
        self.back[start..end].fill(Color::splat(value).0);
    }

    /// Exchange front and back and publish the new front buffer.
    ///
    /// Only the two references move; no pixel data is copied.
    pub fn swap(&mut self) {
        core::mem::swap(&mut self.front, &mut self.back);
        log::debug!("gfx: swap, front={:#x}", PhysAddr::of_slice(&*self.front));
        self.publish();
    }

    fn publish(&mut self) {
        let addr = PhysAddr::of_slice(&*self.front);
        self.display.set_active_framebuffer(addr);
    }
}
