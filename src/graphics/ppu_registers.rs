//! PPU registers
//!
//! Control, mask and status bits as flag sets, plus the small latches the CPU
//! can reach through $2000-$2007

use bitflags::bitflags;

use crate::hardware::{PATTERN_TABLE_SIZE, SPRITE_HEIGHT, TALL_SPRITE_HEIGHT};

#[derive(Debug)]
pub struct PpuRegisters {
    pub ctrl: PpuCtrl,
    pub mask: PpuMask,
    pub status: PpuStatus,
    pub oam_addr: u8,
    /// PPUDATA read buffer, one read behind for everything below palettes
    pub data_buffer: u8,
    /// Last value written to any register. Write-only registers read it back
    pub open_bus: u8,
}

impl Default for PpuRegisters {
    fn default() -> Self {
        Self {
            ctrl: PpuCtrl::empty(),
            mask: PpuMask::empty(),
            status: PpuStatus::empty(),
            oam_addr: 0,
            data_buffer: 0,
            open_bus: 0,
        }
    }
}

impl PpuRegisters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // PPUCTRL

    #[inline]
    pub fn nmi_enabled(&self) -> bool {
        self.ctrl.contains(PpuCtrl::NMI_ENABLE)
    }

    #[inline]
    pub fn sprite_height(&self) -> u16 {
        if self.ctrl.contains(PpuCtrl::SPRITE_SIZE) {
            TALL_SPRITE_HEIGHT
        } else {
            SPRITE_HEIGHT
        }
    }

    /// Base address of the pattern table holding background tiles
    #[inline]
    pub fn background_pattern_table(&self) -> u16 {
        if self.ctrl.contains(PpuCtrl::BACKGROUND_PATTERN_TABLE) {
            PATTERN_TABLE_SIZE
        } else {
            0
        }
    }

    /// Base address of the pattern table holding 8x8 sprites. Ignored in 8x16
    /// mode, where the tile number picks the table
    #[inline]
    pub fn sprite_pattern_table(&self) -> u16 {
        if self.ctrl.contains(PpuCtrl::SPRITE_PATTERN_TABLE) {
            PATTERN_TABLE_SIZE
        } else {
            0
        }
    }

    #[inline]
    pub fn vram_address_increment(&self) -> u16 {
        match self.ctrl.contains(PpuCtrl::VRAM_ADDRESS_INCREMENT) {
            false => 1, // going across
            true => 32, // going down
        }
    }

    #[inline]
    pub fn base_nametable(&self) -> u8 {
        (self.ctrl & PpuCtrl::BASE_NAMETABLE_ADDRESS).bits()
    }

    // PPUMASK

    #[inline]
    pub fn rendering_enabled(&self) -> bool {
        self.background_rendering_enabled() || self.sprite_rendering_enabled()
    }

    #[inline]
    pub fn background_rendering_enabled(&self) -> bool {
        self.mask.contains(PpuMask::BACKGROUND_RENDERING_ENABLE)
    }

    #[inline]
    pub fn sprite_rendering_enabled(&self) -> bool {
        self.mask.contains(PpuMask::SPRITE_RENDERING_ENABLE)
    }

    /// Background shown at column `x`, taking the left 8 pixels clipping into
    /// account
    #[inline]
    pub fn background_visible_at(&self, x: u16) -> bool {
        self.background_rendering_enabled()
            && (x >= 8 || self.mask.contains(PpuMask::SHOW_BACKGROUND_IN_LEFTMOST_8_PIXELS))
    }

    #[inline]
    pub fn sprites_visible_at(&self, x: u16) -> bool {
        self.sprite_rendering_enabled()
            && (x >= 8 || self.mask.contains(PpuMask::SHOW_SPRITES_IN_LEFTMOST_8_PIXELS))
    }

    #[inline]
    pub fn grayscale(&self) -> bool {
        self.mask.contains(PpuMask::GRAYSCALE)
    }

    /// Color emphasis bits (red, green, blue) shifted down to bits 0-2
    #[inline]
    pub fn emphasis(&self) -> u8 {
        (self.mask & PpuMask::EMPHASIS).bits() >> 5
    }

    // PPUSTATUS

    #[inline]
    pub fn in_vertical_blank(&self) -> bool {
        self.status.contains(PpuStatus::VERTICAL_BLANK)
    }

    #[inline]
    pub fn set_vertical_blank(&mut self, value: bool) {
        self.status.set(PpuStatus::VERTICAL_BLANK, value);
    }

    #[inline]
    pub fn set_sprite_0_hit(&mut self) {
        self.status.insert(PpuStatus::SPRITE_0_HIT);
    }

    #[inline]
    pub fn sprite_0_hit(&self) -> bool {
        self.status.contains(PpuStatus::SPRITE_0_HIT)
    }

    #[inline]
    pub fn set_sprite_overflow(&mut self) {
        self.status.insert(PpuStatus::SPRITE_OVERFLOW);
    }

    /// Status as seen by the CPU: flags in bits 7-5, stale bus contents below
    #[inline]
    pub fn status_value(&self) -> u8 {
        self.status.bits() | (self.open_bus & 0x1F)
    }
}

bitflags! {
    pub struct PpuCtrl: u8 {
        /// Generate an NMI at the start of the vertical blanking interval
        const NMI_ENABLE = 0b1000_0000;

        /// PPU master/slave select, unused on a stock console
        const MASTER_SLAVE = 0b0100_0000;

        /// 0: 8x8 pixels; 1: 8x16 pixels
        const SPRITE_SIZE = 0b0010_0000;

        /// Background pattern table address (0 = $0000; 1 = $1000)
        const BACKGROUND_PATTERN_TABLE = 0b0001_0000;

        /// Sprite pattern table address for 8x8 sprites (0: $0000; 1: $1000;
        /// ignored in 8x16 mode)
        const SPRITE_PATTERN_TABLE = 0b0000_1000;

        /// VRAM address increment per CPU read/write of PPUDATA (0: add 1,
        /// going across; 1: add 32, going down)
        const VRAM_ADDRESS_INCREMENT = 0b0000_0100;

        /// Base nametable address (0 = $2000; 1 = $2400; 2 = $2800; 3 = $2C00)
        const BASE_NAMETABLE_ADDRESS = 0b0000_0011;
    }
}

bitflags! {
    pub struct PpuMask: u8 {
        const GRAYSCALE = 0b0000_0001;

        const SHOW_BACKGROUND_IN_LEFTMOST_8_PIXELS = 0b0000_0010;

        const SHOW_SPRITES_IN_LEFTMOST_8_PIXELS = 0b0000_0100;

        const BACKGROUND_RENDERING_ENABLE = 0b0000_1000;

        const SPRITE_RENDERING_ENABLE = 0b0001_0000;

        const EMPHASIZE_RED = 0b0010_0000;

        const EMPHASIZE_GREEN = 0b0100_0000;

        const EMPHASIZE_BLUE = 0b1000_0000;

        const EMPHASIS = Self::EMPHASIZE_RED.bits
            | Self::EMPHASIZE_GREEN.bits
            | Self::EMPHASIZE_BLUE.bits;
    }
}

bitflags! {
    pub struct PpuStatus: u8 {
        /// PPU is in vertical blank (VBL) status
        const VERTICAL_BLANK = 0b1000_0000;

        const SPRITE_0_HIT = 0b0100_0000;

        /// More than 8 sprites found on a scanline. Evaluated by count, the
        /// hardware's false positives and negatives aren't reproduced
        const SPRITE_OVERFLOW = 0b0010_0000;
    }
}
