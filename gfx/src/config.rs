//! Rendering Configuration
//!
//! Panel geometry, console defaults, bitmap limits and the boot screen
//! layout. The defaults describe the 1280x720 panel of the target board.

use crate::color::Color;
use crate::font::{CHAR_HEIGHT, CHAR_WIDTH};
use static_assertions::const_assert;

// =============================================================================
// PANEL
// =============================================================================

/// Logical panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Pixels per buffer row (one buffer row holds one logical column)
    pub stride: u32,
}

impl PanelConfig {
    /// Geometry of the target panel
    pub const DEFAULT: Self = Self {
        width: 1280,
        height: 720,
        stride: 720,
    };

    /// Create a panel configuration
    pub const fn new(width: u32, height: u32, stride: u32) -> Self {
        Self { width, height, stride }
    }

    /// Pixels in one buffer
    pub const fn buffer_len(&self) -> usize {
        self.width as usize * self.stride as usize
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// CONSOLE
// =============================================================================

/// Console state applied at bind time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Glyph magnification
    pub scale: u32,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Paint glyph "off" bits with the background color
    pub fill_background: bool,
}

impl ConsoleConfig {
    /// Default console: scale 2, white on black, transparent background
    pub const DEFAULT: Self = Self {
        scale: 2,
        fg: Color::WHITE,
        bg: Color::BLACK,
        fill_background: false,
    };
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// BITMAP
// =============================================================================

/// Scratch capacity used for decoded pixel data
pub const BITMAP_SCRATCH_CAPACITY: usize = 0x40_0000;

/// Bitmap decoding limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapConfig {
    /// Pixel value skipped during compositing
    pub transparent_color: Color,
    /// Maximum pixel-data span accepted
    pub scratch_capacity: usize,
}

impl BitmapConfig {
    /// Default limits
    pub const DEFAULT: Self = Self {
        transparent_color: Color::SPLASH_KEY,
        scratch_capacity: BITMAP_SCRATCH_CAPACITY,
    };
}

impl Default for BitmapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// BOOT SCREEN
// =============================================================================

/// Placement of the logo mark and the status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoLayout {
    /// Top-left corner of the logo
    pub origin_x: u32,
    /// Top-left corner of the logo
    pub origin_y: u32,
    /// Glyph rows in the logo
    pub rows: u8,
    /// Glyphs per logo row
    pub columns: u8,
    /// Code point of the first logo glyph
    pub first_glyph: u8,
    /// Logo magnification
    pub logo_scale: u32,
    /// Y of the first message line
    pub message_y: u32,
    /// Message magnification
    pub message_scale: u32,
}

impl LogoLayout {
    /// Layout used on the target panel
    pub const DEFAULT: Self = Self {
        origin_x: 370,
        origin_y: 98,
        rows: 4,
        columns: 12,
        first_glyph: 0x7F,
        logo_scale: 3,
        message_y: 593,
        message_scale: 1,
    };

    /// Code point one past the last logo glyph
    pub const fn glyph_end(&self) -> u32 {
        self.first_glyph as u32 + self.rows as u32 * self.columns as u32
    }
}

impl Default for LogoLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const_assert!(PanelConfig::DEFAULT.height <= PanelConfig::DEFAULT.stride);
const_assert!(ConsoleConfig::DEFAULT.scale > 0);
const_assert!(BITMAP_SCRATCH_CAPACITY % 4 == 0);
// Logo glyphs must stay inside the 8-bit code space.
const_assert!(LogoLayout::DEFAULT.glyph_end() <= 256);
const_assert!(
    LogoLayout::DEFAULT.origin_x
        + LogoLayout::DEFAULT.columns as u32 * CHAR_WIDTH * LogoLayout::DEFAULT.logo_scale
        <= PanelConfig::DEFAULT.width
);
const_assert!(
    LogoLayout::DEFAULT.message_y + CHAR_HEIGHT * LogoLayout::DEFAULT.message_scale
        <= PanelConfig::DEFAULT.height
);
