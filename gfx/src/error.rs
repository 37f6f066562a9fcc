//! Typed rendering failures
//!
//! Nothing here ever reaches the boot sequence: the public entry points log
//! these and render nothing. They exist so every rejection path can be
//! observed in tests.

use core::fmt;
use dragonboot_hal::HalError;

/// Result type for rendering operations
pub type GfxResult<T> = Result<T, GfxError>;

/// Reasons a bitmap is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    /// No buffer was supplied
    Missing,
    /// Buffer ends before the header or the declared pixel data
    Truncated,
    /// First two bytes are not `BM`
    BadSignature,
    /// Bit depth other than 32
    UnsupportedDepth(u8),
    /// Image does not fit the target region
    TooLarge {
        /// Declared image width
        width: u32,
        /// Declared image height
        height: u32,
        /// Region width
        max_width: u32,
        /// Region height
        max_height: u32,
    },
    /// Pixel-data span exceeds the scratch capacity
    OversizedPixelData {
        /// Declared span in bytes
        span: usize,
        /// Scratch capacity in bytes
        capacity: usize,
    },
    /// Header fields contradict each other
    InvalidLayout,
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no bitmap buffer"),
            Self::Truncated => write!(f, "bitmap truncated"),
            Self::BadSignature => write!(f, "bad bitmap signature"),
            Self::UnsupportedDepth(depth) => write!(f, "unsupported bit depth {}", depth),
            Self::TooLarge {
                width,
                height,
                max_width,
                max_height,
            } => write!(
                f,
                "bitmap {}x{} does not fit {}x{}",
                width, height, max_width, max_height
            ),
            Self::OversizedPixelData { span, capacity } => write!(
                f,
                "pixel data of {} bytes exceeds {} byte scratch",
                span, capacity
            ),
            Self::InvalidLayout => write!(f, "inconsistent bitmap header"),
        }
    }
}

/// Graphics error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfxError {
    /// Bitmap rejected
    Bitmap(BitmapError),
    /// Collaborator hook failed
    Hal(HalError),
    /// Buffers too small for the requested geometry
    InvalidGeometry,
    /// Scratch buffer is already held by another render
    ScratchBusy,
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitmap(err) => write!(f, "bitmap: {}", err),
            Self::Hal(err) => write!(f, "hal: {}", err),
            Self::InvalidGeometry => write!(f, "Invalid framebuffer geometry"),
            Self::ScratchBusy => write!(f, "Scratch buffer busy"),
        }
    }
}

impl From<BitmapError> for GfxError {
    fn from(err: BitmapError) -> Self {
        Self::Bitmap(err)
    }
}

impl From<HalError> for GfxError {
    fn from(err: HalError) -> Self {
        Self::Hal(err)
    }
}
