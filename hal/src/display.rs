//! Display controller hook
//!
//! The graphics core never programs the panel itself. When it swaps
//! buffers it hands the new front buffer to a [`DisplayController`],
//! which is expected to make that memory the scan-out source.

use crate::PhysAddr;
use core::ptr::NonNull;
use core::sync::atomic::{fence, Ordering};

/// Publishes the active (visible) framebuffer to scan-out hardware
pub trait DisplayController {
    /// Make the buffer at `addr` the one the panel displays
    fn set_active_framebuffer(&mut self, addr: PhysAddr);
}

impl<T: DisplayController + ?Sized> DisplayController for &mut T {
    fn set_active_framebuffer(&mut self, addr: PhysAddr) {
        (**self).set_active_framebuffer(addr);
    }
}

/// A single window-base register of a display controller.
///
/// Writing the register latches the new scan-out address on the next
/// vertical blank.
#[derive(Debug)]
pub struct MmioWindow {
    base: NonNull<u32>,
}

impl MmioWindow {
    /// Bind a window-base register.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped, 32-bit wide device register that is
    /// not aliased by any other live `MmioWindow`.
    pub const unsafe fn new(base: NonNull<u32>) -> Self {
        Self { base }
    }
}

impl DisplayController for MmioWindow {
    fn set_active_framebuffer(&mut self, addr: PhysAddr) {
        // Pixels written before the swap must reach memory before the
        // controller starts scanning the buffer out.
        fence(Ordering::Release);
        log::trace!("display: window base <- {:#x}", addr);
        // SAFETY: `new` guarantees a valid, exclusively owned register.
        unsafe { self.base.as_ptr().write_volatile(addr.as_u64() as u32) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mmio_window_latches_low_word() {
        let mut register = 0u32;
        // SAFETY: the register is a local the window has exclusive use of.
        let mut window = unsafe { MmioWindow::new(NonNull::from(&mut register)) };
        window.set_active_framebuffer(PhysAddr::new(0xC040_0000));
        assert_eq!(register, 0xC040_0000);
    }

    #[test]
    fn test_forwarding_through_reference() {
        struct Last(Option<PhysAddr>);
        impl DisplayController for Last {
            fn set_active_framebuffer(&mut self, addr: PhysAddr) {
                self.0 = Some(addr);
            }
        }

        fn publish<D: DisplayController>(mut display: D) {
            display.set_active_framebuffer(PhysAddr::new(0x1000));
        }

        let mut last = Last(None);
        publish(&mut last);
        assert_eq!(last.0, Some(PhysAddr::new(0x1000)));
    }
}
