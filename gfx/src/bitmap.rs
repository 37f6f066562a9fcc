//! Bitmap Decoding and Compositing
//!
//! Decodes the one bitmap layout the boot UI ships: a `BM` file with
//! 32-bit bottom-up ARGB pixel data. Validation relies on the signature,
//! the bit depth and size fields only.
//!
//! ## Header fields
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 2 | signature `BM` |
//! | 2 | 4 | file size |
//! | 10 | 4 | pixel data offset |
//! | 18 | 4 | width |
//! | 22 | 4 | height |
//! | 28 | 1 | bit depth (32) |
//!
//! Fields are assembled byte by byte; the pixel data follows a two-byte
//! signature and is not word aligned in the file.
//!
//! Two compositing paths exist. [`Compositor::render_bitmap`] places an
//! image inside any region through the rotated panel mapping.
//! [`Compositor::render_splash`] fills the whole back buffer in its native
//! storage order and expects images stored in that orientation. Both apply
//! the same placement, letterbox and color-key rules.

use crate::color::Color;
use crate::config::{BitmapConfig, PanelConfig};
use crate::draw;
use crate::error::{BitmapError, GfxError, GfxResult};
use crate::framebuffer::{native_offset, Framebuffer, Surface};
use crate::scratch::{PixelWords, ScratchBuffer, ScratchLease};
use dragonboot_hal::{DisplayController, Storage};

// =============================================================================
// HEADER
// =============================================================================

/// File signature
pub const BMP_SIGNATURE: [u8; 2] = *b"BM";
/// Bytes needed to read every header field used
pub const BMP_HEADER_LEN: usize = 30;
/// Only supported bit depth
pub const BMP_DEPTH: u8 = 32;

const OFFSET_FILE_SIZE: usize = 2;
const OFFSET_DATA: usize = 10;
const OFFSET_WIDTH: usize = 18;
const OFFSET_HEIGHT: usize = 22;
const OFFSET_DEPTH: usize = 28;

/// Little-endian 32-bit field at `offset`
fn read_le32(data: &[u8], offset: usize) -> Result<u32, BitmapError> {
    match data.get(offset..offset + 4) {
        Some(&[b0, b1, b2, b3]) => {
            Ok(u32::from(b0) | u32::from(b1) << 8 | u32::from(b2) << 16 | u32::from(b3) << 24)
        }
        _ => Err(BitmapError::Truncated),
    }
}

/// Header fields the decoder relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Declared file size
    pub file_size: u32,
    /// Offset of the pixel data
    pub data_offset: u32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per pixel
    pub bit_depth: u8,
}

impl BitmapHeader {
    /// Parse and check signature and bit depth
    pub fn parse(data: &[u8]) -> Result<Self, BitmapError> {
        match data.get(..2) {
            Some(magic) if magic == BMP_SIGNATURE => {}
            Some(_) => return Err(BitmapError::BadSignature),
            None => return Err(BitmapError::Truncated),
        }
        if data.len() < BMP_HEADER_LEN {
            return Err(BitmapError::Truncated);
        }

        let bit_depth = data[OFFSET_DEPTH];
        if bit_depth != BMP_DEPTH {
            return Err(BitmapError::UnsupportedDepth(bit_depth));
        }

        Ok(Self {
            file_size: read_le32(data, OFFSET_FILE_SIZE)?,
            data_offset: read_le32(data, OFFSET_DATA)?,
            width: read_le32(data, OFFSET_WIDTH)?,
            height: read_le32(data, OFFSET_HEIGHT)?,
            bit_depth,
        })
    }

    /// Bytes between the data offset and the declared end of file
    pub fn pixel_span(&self) -> Result<usize, BitmapError> {
        self.file_size
            .checked_sub(self.data_offset)
            .map(|span| span as usize)
            .ok_or(BitmapError::InvalidLayout)
    }
}

// =============================================================================
// DECODING
// =============================================================================

/// Target rectangle for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Region {
    /// Create a region
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole logical panel
    pub const fn full(panel: PanelConfig) -> Self {
        Self::new(0, 0, panel.width, panel.height)
    }
}

/// Decoded image held in scratch memory
#[derive(Debug)]
pub struct DecodedBitmap<'s> {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Left edge of the centered image
    pub placement_x: u32,
    /// Top edge of the centered image
    pub placement_y: u32,
    pixels: ScratchLease<'s>,
}

impl DecodedBitmap<'_> {
    /// Pixel `index` in file order (bottom row first)
    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.pixels.pixels().get(index).map(Color)
    }

    /// Letterbox color: the first pixel of the file
    pub fn background(&self) -> Option<Color> {
        self.pixel(0)
    }

    fn image(&self) -> Image<'_> {
        Image {
            width: self.width,
            height: self.height,
            pixels: Pixels::Words(self.pixels.pixels()),
        }
    }
}

/// Validate `data` against `region` and copy its pixel data into `scratch`.
///
/// The scratch lease lives in the returned bitmap; on any error it has
/// already been released.
pub fn decode<'s>(
    data: Option<&[u8]>,
    region: Region,
    scratch: &'s mut ScratchBuffer,
) -> GfxResult<DecodedBitmap<'s>> {
    let data = data.ok_or(BitmapError::Missing)?;
    let header = BitmapHeader::parse(data)?;

    if header.width > region.width || header.height > region.height {
        return Err(BitmapError::TooLarge {
            width: header.width,
            height: header.height,
            max_width: region.width,
            max_height: region.height,
        }
        .into());
    }

    let span = header.pixel_span()?;
    let capacity = scratch.capacity();
    if span > capacity {
        return Err(BitmapError::OversizedPixelData { span, capacity }.into());
    }

    let needed = (header.width as usize)
        .checked_mul(header.height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(BitmapError::InvalidLayout)?;
    if span < needed {
        return Err(BitmapError::InvalidLayout.into());
    }

    let start = header.data_offset as usize;
    let src = data
        .get(start..start.saturating_add(span))
        .ok_or(BitmapError::Truncated)?;

    let mut pixels = scratch.acquire()?;
    pixels.load(src)?;

    Ok(DecodedBitmap {
        width: header.width,
        height: header.height,
        placement_x: region.x.saturating_add((region.width - header.width) / 2),
        placement_y: region.y.saturating_add((region.height - header.height) / 2),
        pixels,
    })
}

// =============================================================================
// COMPOSITING
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Pixels<'a> {
    Words(PixelWords<'a>),
    Packed(&'a [u32]),
}

/// Bottom-up pixel block
#[derive(Debug, Clone, Copy)]
struct Image<'a> {
    width: u32,
    height: u32,
    pixels: Pixels<'a>,
}

impl Image<'_> {
    fn get(&self, index: usize) -> Option<u32> {
        match self.pixels {
            Pixels::Words(words) => words.get(index),
            Pixels::Packed(packed) => packed.get(index).copied(),
        }
    }
}

/// Where composited pixels land
#[derive(Debug, Clone, Copy)]
enum Destination {
    /// Visible buffer, logical coordinates through the panel mapping
    Mapped { x: u32, y: u32 },
    /// Back buffer, native storage order
    Linear { column: u32, row: u32 },
}

/// Copy `image` to `dest` flipping it upright and skipping `key`
fn composite<D: DisplayController>(fb: &mut Framebuffer<'_, D>, image: Image<'_>, dest: Destination, key: Color) {
    let stride = fb.stride();
    for row in 0..image.height {
        let src_row = (image.height - 1 - row) as usize;
        for col in 0..image.width {
            let Some(value) = image.get(src_row * image.width as usize + col as usize) else {
                continue;
            };
            if value == key.0 {
                continue;
            }
            match dest {
                Destination::Mapped { x, y } => {
                    draw::set_pixel(fb, x.saturating_add(col), y.saturating_add(row), Color(value));
                }
                Destination::Linear { column, row: top } => {
                    let offset = native_offset(column.saturating_add(col), top.saturating_add(row), stride);
                    if let Some(px) = fb.surface_mut(Surface::Back).get_mut(offset) {
                        *px = value;
                    }
                }
            }
        }
    }
}

/// Composite a bottom-up ARGB block with the default color key
pub fn render_argb<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    pixels: &[u32],
    sx: u32,
    sy: u32,
    px: u32,
    py: u32,
) {
    render_argb_keyed(fb, pixels, sx, sy, px, py, Color::SPLASH_KEY);
}

/// Composite a bottom-up ARGB block at `(px, py)`, skipping `key`
pub fn render_argb_keyed<D: DisplayController>(
    fb: &mut Framebuffer<'_, D>,
    pixels: &[u32],
    sx: u32,
    sy: u32,
    px: u32,
    py: u32,
    key: Color,
) {
    let image = Image {
        width: sx,
        height: sy,
        pixels: Pixels::Packed(pixels),
    };
    composite(fb, image, Destination::Mapped { x: px, y: py }, key);
}

/// Bitmap renderer owning the scratch memory used for decoding
#[derive(Debug)]
pub struct Compositor {
    config: BitmapConfig,
    scratch: ScratchBuffer,
}

impl Compositor {
    /// Allocate the scratch buffer described by `config`
    pub fn new(config: BitmapConfig) -> Self {
        Self {
            config,
            scratch: ScratchBuffer::with_capacity(config.scratch_capacity),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &BitmapConfig {
        &self.config
    }

    /// The scratch buffer
    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }

    /// Decode `data` and composite it centered in `region`.
    ///
    /// An image smaller than the region first has the region cleared to its
    /// first pixel.
    pub fn try_render_bitmap<D: DisplayController>(
        &mut self,
        fb: &mut Framebuffer<'_, D>,
        data: Option<&[u8]>,
        region: Region,
        key: Color,
    ) -> GfxResult<()> {
        let bitmap = decode(data, region, &mut self.scratch)?;

        if bitmap.width < region.width || bitmap.height < region.height {
            if let Some(bg) = bitmap.background() {
                for y in region.y..region.y.saturating_add(region.height) {
                    for x in region.x..region.x.saturating_add(region.width) {
                        draw::set_pixel(fb, x, y, bg);
                    }
                }
            }
        }

        let dest = Destination::Mapped {
            x: bitmap.placement_x,
            y: bitmap.placement_y,
        };
        composite(fb, bitmap.image(), dest, key);
        Ok(())
    }

    /// Render with the configured color key; failures render nothing
    pub fn render_bitmap<D: DisplayController>(&mut self, fb: &mut Framebuffer<'_, D>, data: Option<&[u8]>, region: Region) {
        let key = self.config.transparent_color;
        self.render_bitmap_keyed(fb, data, region, key);
    }

    /// Render with a caller-chosen color key; failures render nothing
    pub fn render_bitmap_keyed<D: DisplayController>(
        &mut self,
        fb: &mut Framebuffer<'_, D>,
        data: Option<&[u8]>,
        region: Region,
        key: Color,
    ) {
        if let Err(err) = self.try_render_bitmap(fb, data, region, key) {
            log::warn!("bitmap: not rendered: {}", err);
        }
    }

    /// Decode a full-panel splash image straight into the back buffer.
    ///
    /// The image is laid out in storage order: its width runs along a
    /// buffer row (at most the panel height) and its height across rows
    /// (at most the panel width). An image smaller than the panel first
    /// has the whole back buffer cleared to its first pixel.
    pub fn try_render_splash<D: DisplayController>(
        &mut self,
        fb: &mut Framebuffer<'_, D>,
        data: Option<&[u8]>,
    ) -> GfxResult<()> {
        let native = Region::new(0, 0, fb.height(), fb.width());
        let key = self.config.transparent_color;
        let bitmap = decode(data, native, &mut self.scratch)?;

        if bitmap.width < native.width || bitmap.height < native.height {
            if let Some(bg) = bitmap.background() {
                fb.surface_mut(Surface::Back).fill(bg.0);
            }
        }

        let dest = Destination::Linear {
            column: bitmap.placement_x,
            row: bitmap.placement_y,
        };
        composite(fb, bitmap.image(), dest, key);
        log::info!(
            "bitmap: splash {}x{} at ({}, {})",
            bitmap.width,
            bitmap.height,
            bitmap.placement_x,
            bitmap.placement_y
        );
        Ok(())
    }

    /// Render a splash image; failures render nothing
    pub fn render_splash<D: DisplayController>(&mut self, fb: &mut Framebuffer<'_, D>, data: Option<&[u8]>) {
        if let Err(err) = self.try_render_splash(fb, data) {
            log::warn!("bitmap: splash not rendered: {}", err);
        }
    }

    /// Load `path` through `storage` and render it into `region`
    pub fn try_render_bitmap_file<D, S>(
        &mut self,
        fb: &mut Framebuffer<'_, D>,
        storage: &mut S,
        path: &str,
        region: Region,
    ) -> GfxResult<()>
    where
        D: DisplayController,
        S: Storage + ?Sized,
    {
        let file = storage.read_file(path).map_err(GfxError::from)?;
        let key = self.config.transparent_color;
        self.try_render_bitmap(fb, Some(file.as_slice()), region, key)
    }

    /// Load and render a bitmap file; failures render nothing
    pub fn render_bitmap_file<D, S>(&mut self, fb: &mut Framebuffer<'_, D>, storage: &mut S, path: &str, region: Region)
    where
        D: DisplayController,
        S: Storage + ?Sized,
    {
        if let Err(err) = self.try_render_bitmap_file(fb, storage, path, region) {
            log::warn!("bitmap: {} not rendered: {}", path, err);
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(BitmapConfig::DEFAULT)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::{small_panel, RecordingDisplay};
    use alloc::vec;
    use alloc::vec::Vec;

    /// Build a 32-bit bitmap file from bottom-up pixels
    pub(crate) fn build_bmp(width: u32, height: u32, pixels: &[u32]) -> Vec<u8> {
        let offset = 54u32;
        let size = offset + pixels.len() as u32 * 4;
        let mut file = vec![0u8; offset as usize];
        file[0..2].copy_from_slice(b"BM");
        file[2..6].copy_from_slice(&size.to_le_bytes());
        file[10..14].copy_from_slice(&offset.to_le_bytes());
        file[18..22].copy_from_slice(&width.to_le_bytes());
        file[22..26].copy_from_slice(&height.to_le_bytes());
        file[28] = 32;
        for px in pixels {
            file.extend_from_slice(&px.to_le_bytes());
        }
        file
    }

    fn small_compositor() -> Compositor {
        Compositor::new(BitmapConfig {
            scratch_capacity: 4096,
            ..BitmapConfig::DEFAULT
        })
    }

    #[test]
    fn test_header_parse() {
        let file = build_bmp(3, 2, &[0; 6]);
        let header = BitmapHeader::parse(&file).unwrap();
        assert_eq!(header.width, 3);
        assert_eq!(header.height, 2);
        assert_eq!(header.data_offset, 54);
        assert_eq!(header.pixel_span(), Ok(24));
    }

    #[test]
    fn test_header_rejections() {
        let mut file = build_bmp(1, 1, &[0]);
        assert_eq!(BitmapHeader::parse(&file[..1]), Err(BitmapError::Truncated));
        assert_eq!(BitmapHeader::parse(&file[..20]), Err(BitmapError::Truncated));
        file[28] = 24;
        assert_eq!(BitmapHeader::parse(&file), Err(BitmapError::UnsupportedDepth(24)));
        file[0] = b'P';
        assert_eq!(BitmapHeader::parse(&file), Err(BitmapError::BadSignature));
    }

    #[test]
    fn test_decode_rejections_release_scratch() {
        let mut scratch = ScratchBuffer::with_capacity(64);
        let region = Region::new(0, 0, 4, 4);

        assert!(matches!(
            decode(None, region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::Missing))
        ));

        let wide = build_bmp(5, 1, &[0; 5]);
        assert!(matches!(
            decode(Some(wide.as_slice()), region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::TooLarge { width: 5, .. }))
        ));

        let big = build_bmp(4, 4, &[0; 32]);
        assert!(matches!(
            decode(Some(big.as_slice()), region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::OversizedPixelData { span: 128, capacity: 64 }))
        ));

        let mut short = build_bmp(2, 2, &[0; 4]);
        short.truncate(60);
        assert!(matches!(
            decode(Some(short.as_slice()), region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::Truncated))
        ));

        let mut lying = build_bmp(2, 2, &[0; 4]);
        lying[2..6].copy_from_slice(&58u32.to_le_bytes());
        assert!(matches!(
            decode(Some(lying.as_slice()), region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::InvalidLayout))
        ));

        let mut inverted = build_bmp(2, 2, &[0; 4]);
        inverted[10..14].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            decode(Some(inverted.as_slice()), region, &mut scratch),
            Err(GfxError::Bitmap(BitmapError::InvalidLayout))
        ));

        assert!(!scratch.in_use());
    }

    #[test]
    fn test_decode_placement() {
        let mut scratch = ScratchBuffer::with_capacity(64);
        let file = build_bmp(2, 1, &[0xFF11_2233, 0xFF44_5566]);
        let bitmap = decode(Some(file.as_slice()), Region::new(10, 20, 7, 4), &mut scratch).unwrap();
        assert_eq!((bitmap.placement_x, bitmap.placement_y), (12, 21));
        assert_eq!(bitmap.background(), Some(Color(0xFF11_2233)));
        assert_eq!(bitmap.pixel(1), Some(Color(0xFF44_5566)));
        assert_eq!(bitmap.pixel(2), None);
    }

    #[test]
    fn test_render_flips_and_keys() {
        let panel = small_panel();
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let mut compositor = small_compositor();

        // Bottom row: A, key. Top row: C, D.
        let (a, c, d) = (0xFF00_000A, 0xFF00_000C, 0xFF00_000D);
        let file = build_bmp(2, 2, &[a, Color::SPLASH_KEY.0, c, d]);
        let region = Region::new(4, 4, 2, 2);
        compositor.try_render_bitmap(&mut fb, Some(file.as_slice()), region, Color::SPLASH_KEY).unwrap();

        assert_eq!(fb.pixel(4, 4), Some(Color(c)));
        assert_eq!(fb.pixel(5, 4), Some(Color(d)));
        assert_eq!(fb.pixel(4, 5), Some(Color(a)));
        assert_eq!(fb.pixel(5, 5), Some(Color(0)));
        assert!(!compositor.scratch().in_use());
    }

    #[test]
    fn test_render_letterboxes_smaller_image() {
        let panel = small_panel();
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let mut compositor = small_compositor();

        let bg = 0xFF20_2020;
        let file = build_bmp(1, 1, &[bg]);
        compositor.render_bitmap(&mut fb, Some(file.as_slice()), Region::new(2, 2, 3, 3));
        for x in 2..5 {
            for y in 2..5 {
                assert_eq!(fb.pixel(x, y), Some(Color(bg)));
            }
        }
        assert_eq!(fb.front().iter().filter(|&&px| px != 0).count(), 9);
    }

    #[test]
    fn test_rejected_bitmap_writes_nothing() {
        let panel = small_panel();
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let mut compositor = small_compositor();

        let mut file = build_bmp(2, 2, &[Color::RED.0; 4]);
        file[1] = b'X';
        compositor.render_bitmap(&mut fb, Some(file.as_slice()), Region::new(1, 1, 8, 8));
        let wide = build_bmp(9, 1, &[Color::RED.0; 9]);
        compositor.render_bitmap(&mut fb, Some(wide.as_slice()), Region::new(1, 1, 8, 8));
        compositor.render_splash(&mut fb, None);

        assert!(fb.front().iter().all(|&px| px == 0));
        assert!(fb.back().iter().all(|&px| px == 0));
        assert!(!compositor.scratch().in_use());
    }

    #[test]
    fn test_render_argb_keyed() {
        let panel = small_panel();
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let key = Color::GREEN;
        render_argb_keyed(&mut fb, &[Color::RED.0, key.0], 1, 2, 3, 3, key);
        assert_eq!(fb.pixel(3, 3), Some(Color(0)));
        assert_eq!(fb.pixel(3, 4), Some(Color::RED));

        render_argb(&mut fb, &[Color::SPLASH_KEY.0, Color::BLUE.0], 2, 1, 6, 6);
        assert_eq!(fb.pixel(6, 6), Some(Color(0)));
        assert_eq!(fb.pixel(7, 6), Some(Color::BLUE));
    }

    #[test]
    fn test_splash_native_layout() {
        let panel = small_panel();
        let mut memory = vec![0u32; panel.buffer_len() * 2];
        let mut fb = Framebuffer::init(&mut memory, panel, RecordingDisplay::default()).unwrap();
        let mut compositor = small_compositor();

        // 22 columns (<= height 24) by 32 rows (= width 32).
        let (w, h) = (22u32, 32u32);
        let mut pixels = vec![0xFF55_5555u32; (w * h) as usize];
        pixels[0] = 0xFF01_0101;
        let last = pixels.len() - 1;
        pixels[last] = Color::SPLASH_KEY.0;
        let file = build_bmp(w, h, &pixels);
        compositor.try_render_splash(&mut fb, Some(file.as_slice())).unwrap();

        let stride = panel.stride as usize;
        let back = fb.back();
        // Centered one column in; the first file pixel lands on the last row.
        assert_eq!(back[1 + (h as usize - 1) * stride], 0xFF01_0101);
        // Letterbox columns take the first pixel.
        assert_eq!(back[0], 0xFF01_0101);
        assert_eq!(back[23], 0xFF01_0101);
        // Keyed top-right pixel keeps the letterbox color.
        assert_eq!(back[w as usize], 0xFF01_0101);
        assert_eq!(back[2], 0xFF55_5555);
        assert!(fb.front().iter().all(|&px| px == 0));
    }
}
