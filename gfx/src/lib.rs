//! # Dragonboot Graphics
//!
//! The rendering core of the boot UI. It draws status text, the logo mark
//! and splash images straight into a raw framebuffer, with no operating
//! system or GPU underneath.
//!
//! ## Components
//!
//! - [`framebuffer`]: two pixel buffers, the rotated panel mapping, swap
//! - [`draw`]: pixels, lines and rectangle blits
//! - [`console`]: cursor and color state, glyph rasterization
//! - [`format`]: printf-style formatting and hex dumps
//! - [`bitmap`]: `BM` decoding and color-keyed compositing
//! - [`screen`]: the logo and message boot screen
//!
//! ## Usage
//!
//! ```ignore
//! let mut fb = Framebuffer::init(memory, PanelConfig::DEFAULT, display)?;
//! fb.clear(Color::BLACK);
//! let mut compositor = Compositor::default();
//! compositor.render_splash(&mut fb, Some(&splash));
//! fb.swap();
//!
//! let mut con = Console::new(&mut fb, Font::new(FONT));
//! con.printf("%kBooting %s%k\n", &[Color::GREEN.into(), name.into(), Color::WHITE.into()]);
//! ```
//!
//! Nothing in this crate panics on bad input: malformed images render
//! nothing and out-of-range pixels are dropped.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod bitmap;
pub mod color;
pub mod config;
pub mod console;
pub mod draw;
pub mod error;
pub mod font;
pub mod format;
pub mod framebuffer;
pub mod scratch;
pub mod screen;

#[cfg(test)]
mod testing;

pub use bitmap::{Compositor, Region};
pub use color::Color;
pub use config::{BitmapConfig, ConsoleConfig, LogoLayout, PanelConfig};
pub use console::{Console, ConsoleFlags};
pub use error::{BitmapError, GfxError, GfxResult};
pub use font::{Font, CHAR_HEIGHT, CHAR_WIDTH};
pub use format::{Arg, TextSink};
pub use framebuffer::{Framebuffer, Surface};
