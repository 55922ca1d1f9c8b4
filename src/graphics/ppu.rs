//! PPU module
//!
//! This module emulates the NES Picture Processing Unit (PPU)
//!
//! NES PPU registers ($2000-$2007) are mirrored from $2008 to $3FFF. That's
//! because it's address is not completely decoded, that is, the chip ignores
//! one or more address lines. The main bus folds the window down to 8 bytes
//! before reaching [`Ppu`].
//!
//! The PPU is advanced one dot at a time with [`Ppu::tick`]. Each dot it may
//! fetch background or sprite data through its own [`GraphicsBus`], update the
//! scroll registers and output one [`Pixel`] on visible dots.

use log::{debug, trace};

use crate::hardware::{
    GRAPHICS_ADDRESS_MASK, OAM_SPRITES, PALETTE_MEMORY_START, PPU_REGISTERS_SIZE,
    SPRITES_PER_LINE, TALL_SPRITE_HEIGHT,
};
use crate::interfaces::{Bus, Memory};
use crate::settings::FrameTiming;
use crate::types::SharedCartridge;
use crate::utils;

use super::graphics_bus::GraphicsBus;
use super::oam::{Oam, OamSprite};
use super::pattern_table::PatternTableAddress;
use super::pixel_producer::{PixelProducer, SpriteUnit};
use super::ppu_registers::{PpuCtrl, PpuMask, PpuRegisters, PpuStatus};
use super::render_address::{RenderAddress, Scroll, WriteLatch};
use super::timing::RasterPosition;
use super::Pixel;

/// Palette reads through PPUDATA refill the buffer with the nametable byte
/// "underneath" the palette
const PALETTE_UNDERLYING_OFFSET: u16 = 0x1000;

const GRAYSCALE_MASK: u8 = 0x30;

pub struct Ppu {
    registers: PpuRegisters,
    scroll: Scroll,

    bus: GraphicsBus,
    oam: Oam,
    producer: PixelProducer,

    timing: FrameTiming,
    position: RasterPosition,

    nmi_requested: bool,
    frame_ready: bool,
}

impl Ppu {
    pub fn new(cartridge: SharedCartridge, timing: FrameTiming) -> Self {
        Self {
            registers: PpuRegisters::default(),
            scroll: Scroll::default(),
            bus: GraphicsBus::new(cartridge),
            oam: Oam::new(),
            producer: PixelProducer::new(),
            timing,
            position: RasterPosition::default(),
            nmi_requested: false,
            frame_ready: false,
        }
    }

    /// Reset signal. Registers and latches go back to power-on state, memory
    /// contents are kept
    pub fn reset(&mut self) {
        self.registers.reset();
        self.scroll = Scroll::default();
        self.producer = PixelProducer::new();
        self.position = RasterPosition::default();
        self.nmi_requested = false;
        self.frame_ready = false;
        debug!("PPU reset");
    }

    /// Advance one dot. Returns the pixel output on this dot, if any
    pub fn tick(&mut self) -> Option<Pixel> {
        let dot = self.position.dot;
        let visible = self.position.is_visible_line();
        let prerender = self.position.is_prerender_line(&self.timing);
        let rendering = (visible || prerender) && self.registers.rendering_enabled();

        if rendering {
            self.rendering_cycle();
        }

        let pixel = (visible && (1..=256).contains(&dot)).then(|| self.output_pixel());

        if rendering && is_fetch_dot(dot) {
            self.producer.update_shifters();
        }

        if dot == 1 {
            if self.position.scanline == self.timing.vblank_scanline {
                self.enter_vertical_blank();
            } else if prerender {
                self.registers.status = PpuStatus::empty();
            }
        }

        let short_frame = self.timing.odd_frame_skip
            && self.position.is_odd_frame()
            && self.registers.rendering_enabled();
        self.position.advance(&self.timing, short_frame);

        pixel
    }

    pub fn is_nmi_requested(&self) -> bool {
        self.nmi_requested
    }

    pub fn nmi_accepted(&mut self) {
        self.nmi_requested = false;
    }

    /// A frame has been completed (vblank started) and not yet accepted
    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn frame_accepted(&mut self) {
        self.frame_ready = false;
    }

    pub fn scanline(&self) -> u16 {
        self.position.scanline
    }

    pub fn dot(&self) -> u16 {
        self.position.dot
    }

    pub fn frame_count(&self) -> u64 {
        self.position.frame
    }

    pub fn registers(&self) -> &PpuRegisters {
        &self.registers
    }

    pub fn scroll(&self) -> &Scroll {
        &self.scroll
    }

    pub fn write_latch(&self) -> WriteLatch {
        self.scroll.latch
    }

    pub fn oam(&self) -> &Oam {
        &self.oam
    }

    /// OAM DMA writes go through OAMDATA
    pub fn oam_dma_write(&mut self, data: u8) {
        self.write_oam_data(data);
    }

    fn enter_vertical_blank(&mut self) {
        self.registers.set_vertical_blank(true);
        self.frame_ready = true;
        if self.registers.nmi_enabled() {
            self.nmi_requested = true;
        }
        trace!("PPU vblank start, frame {}", self.position.frame);
    }

    // Background fetches and scroll updates of rendering lines
    fn rendering_cycle(&mut self) {
        let dot = self.position.dot;

        if is_fetch_dot(dot) {
            match dot & 0b111 {
                1 => {
                    self.producer.load_shifters();
                    self.fetch_nametable();
                }
                3 => self.fetch_attribute(),
                5 => self.fetch_pattern_low(),
                7 => self.fetch_pattern_high(),
                0 => self.scroll.v.increment_x(),
                _ => {}
            }
        }

        match dot {
            256 => self.scroll.v.increment_y(),
            257 => {
                self.scroll.v.copy_horizontal(&self.scroll.t);
                self.evaluate_sprites();
            }
            280..=304 if self.position.is_prerender_line(&self.timing) => {
                self.scroll.v.copy_vertical(&self.scroll.t)
            }
            // unused nametable fetches
            337 | 339 => self.fetch_nametable(),
            _ => {}
        }
    }

    fn fetch_nametable(&mut self) {
        self.producer.buffers.next_tile_number = self.bus.read(self.scroll.v.tile_address());
    }

    fn fetch_attribute(&mut self) {
        let attributes = self.bus.read(self.scroll.v.attribute_address());
        self.producer.buffers.next_attributes =
            (attributes >> self.scroll.v.attribute_shift()) & 0b11;
    }

    fn background_pattern_address(&self) -> PatternTableAddress {
        PatternTableAddress::new(
            self.registers.background_pattern_table(),
            self.producer.buffers.next_tile_number,
            self.scroll.v.get(RenderAddress::FINE_Y_SCROLL),
        )
    }

    fn fetch_pattern_low(&mut self) {
        let address = self.background_pattern_address().low_plane();
        self.producer.buffers.next_bit_plane_low = self.bus.read(address);
    }

    fn fetch_pattern_high(&mut self) {
        let address = self.background_pattern_address().high_plane();
        self.producer.buffers.next_bit_plane_high = self.bus.read(address);
    }

    // Secondary OAM for the next scanline. The pre-render line loads nothing,
    // that's why sprites can't appear on scanline 0
    fn evaluate_sprites(&mut self) {
        if self.position.is_prerender_line(&self.timing) {
            self.producer.clear_sprites();
            return;
        }

        let scanline = self.position.scanline;
        let height = self.registers.sprite_height();

        let mut units = [SpriteUnit::default(); SPRITES_PER_LINE];
        let mut count = 0;
        for index in 0..OAM_SPRITES {
            let sprite = self.oam.sprite(index);
            let Some(row) = sprite.row_on(scanline, height) else {
                continue;
            };

            if count == SPRITES_PER_LINE {
                self.registers.set_sprite_overflow();
                break;
            }
            units[count] = self.fetch_sprite(sprite, row, index == 0);
            count += 1;
        }

        self.producer.load_sprites(&units[..count]);
    }

    fn fetch_sprite(&mut self, sprite: OamSprite, row: u16, sprite_zero: bool) -> SpriteUnit {
        let height = self.registers.sprite_height();
        let row = if sprite.flip_vertically() {
            height - 1 - row
        } else {
            row
        };

        let address = if height == TALL_SPRITE_HEIGHT {
            PatternTableAddress::tall_sprite(sprite.tile, row)
        } else {
            PatternTableAddress::new(self.registers.sprite_pattern_table(), sprite.tile, row)
        };

        let mut pattern_low = self.bus.read(address.low_plane());
        let mut pattern_high = self.bus.read(address.high_plane());
        if sprite.flip_horizontally() {
            pattern_low = utils::reverse_bits(pattern_low);
            pattern_high = utils::reverse_bits(pattern_high);
        }

        SpriteUnit {
            x: sprite.x,
            pattern_low,
            pattern_high,
            palette: sprite.palette(),
            behind_background: sprite.behind_background(),
            sprite_zero,
        }
    }

    fn output_pixel(&mut self) -> Pixel {
        let x = self.position.dot - 1;
        let palette_index = if self.registers.rendering_enabled() {
            self.mix_pixel(x)
        } else {
            self.backdrop()
        };

        let mut color_index = self.bus.read(PALETTE_MEMORY_START + palette_index as u16);
        if self.registers.grayscale() {
            color_index &= GRAYSCALE_MASK;
        }

        Pixel {
            x: x as u8,
            y: self.position.scanline as u8,
            color_index,
            emphasis: self.registers.emphasis(),
        }
    }

    // Background and sprite priority multiplexer. Returns a palette memory
    // offset
    fn mix_pixel(&mut self, x: u16) -> u8 {
        let background = if self.registers.background_visible_at(x) {
            self.producer.background_pixel(self.scroll.fine_x)
        } else {
            0
        };

        let sprite = if self.registers.sprites_visible_at(x) {
            self.producer.sprite_pixel(x)
        } else {
            None
        };

        let Some(sprite) = sprite else {
            return background;
        };

        if sprite.sprite_zero && background != 0 && x != 255 {
            if !self.registers.sprite_0_hit() {
                trace!(
                    "Sprite 0 hit at scanline {} dot {}",
                    self.position.scanline,
                    self.position.dot
                );
            }
            self.registers.set_sprite_0_hit();
        }

        if sprite.behind_background && background != 0 {
            background
        } else {
            sprite.palette_index
        }
    }

    // With rendering off the PPU outputs the backdrop color, unless `v` points
    // into palette memory
    fn backdrop(&self) -> u8 {
        let address = self.scroll.v.value() & GRAPHICS_ADDRESS_MASK;
        if address >= PALETTE_MEMORY_START {
            (address & 0x1F) as u8
        } else {
            0
        }
    }

    fn is_rendering(&self) -> bool {
        self.registers.rendering_enabled()
            && (self.position.is_visible_line() || self.position.is_prerender_line(&self.timing))
    }

    fn write_control(&mut self, data: u8) {
        let nmi_was_enabled = self.registers.nmi_enabled();
        self.registers.ctrl = PpuCtrl::from_bits_truncate(data);
        self.scroll.write_control(self.registers.base_nametable());

        if !nmi_was_enabled && self.registers.nmi_enabled() && self.registers.in_vertical_blank() {
            self.nmi_requested = true;
        }
    }

    fn read_status(&mut self) -> u8 {
        let status = self.registers.status_value();
        self.registers.set_vertical_blank(false);
        self.scroll.reset_latch();
        status
    }

    fn write_oam_data(&mut self, data: u8) {
        self.oam.write(self.registers.oam_addr as u16, data);
        self.registers.oam_addr = self.registers.oam_addr.wrapping_add(1);
    }

    fn read_data(&mut self) -> u8 {
        let address = self.scroll.v.value() & GRAPHICS_ADDRESS_MASK;
        let data = if address >= PALETTE_MEMORY_START {
            self.registers.data_buffer = self.bus.read(address - PALETTE_UNDERLYING_OFFSET);
            self.bus.read(address)
        } else {
            let data = self.registers.data_buffer;
            self.registers.data_buffer = self.bus.read(address);
            data
        };
        self.increment_vram_address();
        data
    }

    fn write_data(&mut self, data: u8) {
        let address = self.scroll.v.value() & GRAPHICS_ADDRESS_MASK;
        self.bus.write(address, data);
        self.increment_vram_address();
    }

    // Accessing PPUDATA while rendering triggers both coarse X and Y
    // increments instead of the regular one
    fn increment_vram_address(&mut self) {
        if self.is_rendering() {
            self.scroll.v.increment_x();
            self.scroll.v.increment_y();
        } else {
            self.scroll.v.increment(self.registers.vram_address_increment());
        }
    }
}

fn is_fetch_dot(dot: u16) -> bool {
    (1..=256).contains(&dot) || (321..=336).contains(&dot)
}

impl Memory for Ppu {
    fn read(&mut self, address: u16) -> u8 {
        match address & 0b111 {
            2 => self.read_status(),
            4 => self.oam.read(self.registers.oam_addr as u16),
            7 => self.read_data(),
            // write-only registers
            _ => self.registers.open_bus,
        }
    }

    fn write(&mut self, address: u16, data: u8) {
        trace!("PPU register write: {:0>4X} <- {data:0>2X}", address & 0b111);
        self.registers.open_bus = data;

        match address & 0b111 {
            0 => self.write_control(data),
            1 => self.registers.mask = PpuMask::from_bits_truncate(data),
            2 => {}
            3 => self.registers.oam_addr = data,
            4 => self.write_oam_data(data),
            5 => self.scroll.write_scroll(data),
            6 => self.scroll.write_address(data),
            7 => self.write_data(data),
            _ => unreachable!("masked to 3 bits"),
        }
    }

    fn size(&self) -> usize {
        PPU_REGISTERS_SIZE as usize
    }
}
