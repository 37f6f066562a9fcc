//! # Dragonboot HAL - Collaborator Hooks
//!
//! This crate defines the two seams the graphics core consumes from the
//! rest of the boot stage: the display controller hook that publishes the
//! visible framebuffer, and the storage primitive that loads assets.
//!
//! Everything else the boot stage does with hardware (clocks, power, panel
//! bring-up, buttons, payload hand-off) lives outside of this crate.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod display;
pub mod storage;

pub use display::{DisplayController, MmioWindow};
pub use storage::{RamStorage, Storage};

use core::fmt;

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Errors that can occur in HAL operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// The requested file or resource does not exist
    NotFound,
    /// Hardware reported an error
    DeviceError,
    /// Memory allocation failed
    OutOfMemory,
    /// Invalid parameter provided
    InvalidParameter,
    /// Feature not initialized (e.g. storage not mounted)
    NotInitialized,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::DeviceError => write!(f, "device error"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::NotInitialized => write!(f, "not initialized"),
        }
    }
}

/// Physical address type
///
/// The display controller is programmed with bus addresses, so buffers are
/// published as `PhysAddr` rather than as raw pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PhysAddr(u64);

impl PhysAddr {
    /// Create a new physical address
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Address of the first element of a slice.
    ///
    /// Boot-stage memory is identity mapped, so the pointer value is the
    /// bus address.
    #[inline]
    pub fn of_slice<T>(slice: &[T]) -> Self {
        Self(slice.as_ptr() as usize as u64)
    }

    /// Get the raw address value
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Check if the address is aligned to the given alignment
    #[inline]
    pub const fn is_aligned(self, align: u64) -> bool {
        self.0 % align == 0
    }

    /// Add an offset to the address
    #[inline]
    pub const fn add(self, offset: u64) -> Self {
        Self(self.0 + offset)
    }
}

impl fmt::LowerHex for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
