//! Fixed-capacity scratch memory for decoded pixel data
//!
//! One buffer is allocated up front and lent out to a single render at a
//! time. The lease is a guard: dropping it releases the buffer, so every
//! exit path of a render gives the memory back.

use crate::error::{BitmapError, GfxError, GfxResult};
use alloc::boxed::Box;
use alloc::vec;

/// Reusable scratch buffer
#[derive(Debug)]
pub struct ScratchBuffer {
    data: Box<[u8]>,
    in_use: bool,
}

impl ScratchBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            in_use: false,
        }
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether a lease is outstanding
    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Lease the buffer
    pub fn acquire(&mut self) -> GfxResult<ScratchLease<'_>> {
        if self.in_use {
            return Err(GfxError::ScratchBusy);
        }
        self.in_use = true;
        Ok(ScratchLease { scratch: self, len: 0 })
    }
}

/// Exclusive use of a [`ScratchBuffer`], released on drop
#[derive(Debug)]
pub struct ScratchLease<'a> {
    scratch: &'a mut ScratchBuffer,
    len: usize,
}

impl ScratchLease<'_> {
    /// Copy `src` to the start of the buffer
    pub fn load(&mut self, src: &[u8]) -> GfxResult<()> {
        let capacity = self.scratch.capacity();
        let dst = self
            .scratch
            .data
            .get_mut(..src.len())
            .ok_or(BitmapError::OversizedPixelData {
                span: src.len(),
                capacity,
            })?;
        dst.copy_from_slice(src);
        self.len = src.len();
        Ok(())
    }

    /// Bytes loaded so far
    pub fn bytes(&self) -> &[u8] {
        &self.scratch.data[..self.len]
    }

    /// Loaded bytes read as little-endian 32-bit pixels
    pub fn pixels(&self) -> PixelWords<'_> {
        PixelWords(self.bytes())
    }
}

impl Drop for ScratchLease<'_> {
    fn drop(&mut self) {
        self.scratch.in_use = false;
    }
}

/// Byte buffer viewed as packed 32-bit pixels.
///
/// Words are assembled from individual bytes so the buffer needs no
/// particular alignment.
#[derive(Debug, Clone, Copy)]
pub struct PixelWords<'a>(&'a [u8]);

impl<'a> PixelWords<'a> {
    /// Wrap a byte buffer
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    /// Number of whole pixels
    pub const fn len(&self) -> usize {
        self.0.len() / 4
    }

    /// Whether no whole pixel is present
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel at `index`
    pub fn get(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(4)?;
        match self.0.get(start..start.checked_add(4)?)? {
            &[b0, b1, b2, b3] => Some(u32::from_le_bytes([b0, b1, b2, b3])),
            _ => None,
        }
    }
}
