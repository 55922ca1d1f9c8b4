//! NES graphics hardware emulation
//!
//! The PPU outputs one [`Pixel`] per visible dot. What to do with them is up
//! to a [`PixelSink`]: [`Frame`] keeps the whole picture as palette color
//! indices, converting them to RGB belongs to whoever presents it.

pub mod graphics_bus;
pub mod oam;
pub mod palette_memory;
pub mod pattern_table;
pub mod pixel_producer;
pub mod ppu;
pub mod ppu_registers;
pub mod render_address;
pub mod timing;
pub mod vram;

use crate::hardware::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Resolved pixel at screen position (`x`, `y`)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub x: u8,
    pub y: u8,

    /// NES system palette color ($00-$3F)
    pub color_index: u8,

    /// PPUMASK color emphasis bits: red (bit 0), green (bit 1) and blue (bit 2)
    pub emphasis: u8,
}

/// Video output boundary. Receives pixels in raster order
pub trait PixelSink {
    fn put_pixel(&mut self, pixel: Pixel);
}

impl PixelSink for Vec<Pixel> {
    fn put_pixel(&mut self, pixel: Pixel) {
        self.push(pixel);
    }
}

/// NES screen frame representation. It sizes are the same as the NES screen
/// (see hardware module)
pub struct Frame {
    pub inner: InnerFrame,
}

type InnerFrame = Vec<Vec<u8>>;

impl Frame {
    pub fn new(color_index: u8) -> Self {
        Self {
            inner: vec![vec![color_index; SCREEN_WIDTH]; SCREEN_HEIGHT],
        }
    }

    pub fn color_index(&self, x: usize, y: usize) -> u8 {
        self.inner[y][x]
    }

    pub fn set_pixel(&mut self, pixel: Pixel) {
        self.inner[pixel.y as usize][pixel.x as usize] = pixel.color_index;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::ops::Deref for Frame {
    type Target = InnerFrame;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl PixelSink for Frame {
    fn put_pixel(&mut self, pixel: Pixel) {
        self.set_pixel(pixel);
    }
}
