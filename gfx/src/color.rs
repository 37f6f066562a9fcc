//! Packed 32-bit ARGB color

use core::fmt;

/// A pixel value in the framebuffer's native `0xAARRGGBB` layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    /// Opaque red
    pub const RED: Self = Self(0xFFFF_0000);
    /// Opaque green
    pub const GREEN: Self = Self(0xFF00_FF00);
    /// Opaque blue
    pub const BLUE: Self = Self(0xFF00_00FF);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self(0);
    /// Default color key of splash bitmaps
    pub const SPLASH_KEY: Self = Self(0xFF1D_1919);

    /// Create a color from its components
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(0xFF, r, g, b)
    }

    /// Replicate one byte into all four channels.
    ///
    /// This is the value a byte-wise fill of `value` produces, so `0x00`
    /// is transparent black rather than opaque black.
    pub const fn splat(value: u8) -> Self {
        Self(u32::from_ne_bytes([value; 4]))
    }

    /// Raw `0xAARRGGBB` value
    pub const fn to_argb(self) -> u32 {
        self.0
    }

    /// Alpha component
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red component
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::LowerHex for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
