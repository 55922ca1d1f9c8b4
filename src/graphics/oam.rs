//! Object Attribute Memory (OAM)
//!
//! 64 sprites of 4 bytes each: Y, tile, attributes and X

use crate::hardware::{OAM_SIZE, OAM_SPRITES};
use crate::interfaces::Memory;
use crate::utils;

/// Attribute bits 2-4 aren't implemented in hardware and read back as 0
const ATTRIBUTE_MASK: u8 = 0b1110_0011;

pub struct Oam {
    memory: [u8; OAM_SIZE],
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OamSprite {
    pub y: u8,
    pub tile: u8,
    pub attributes: u8,
    pub x: u8,
}

impl OamSprite {
    /// Sprite palette (4-7), as an offset into palette memory
    pub fn palette(&self) -> u8 {
        0x10 | ((self.attributes & 0b11) << 2)
    }

    pub fn behind_background(&self) -> bool {
        utils::bv(self.attributes, 5) == 1
    }

    pub fn flip_horizontally(&self) -> bool {
        utils::bv(self.attributes, 6) == 1
    }

    pub fn flip_vertically(&self) -> bool {
        utils::bv(self.attributes, 7) == 1
    }

    /// Row of the sprite drawn on the line after `scanline`, if any
    pub fn row_on(&self, scanline: u16, height: u16) -> Option<u16> {
        let row = scanline.wrapping_sub(self.y as u16);
        (row < height).then_some(row)
    }
}

impl Oam {
    pub fn new() -> Self {
        Self {
            memory: [0; OAM_SIZE],
        }
    }

    pub fn sprite(&self, sprite: usize) -> OamSprite {
        let base = (sprite % OAM_SPRITES) * 4;
        OamSprite {
            y: self.memory[base],
            tile: self.memory[base + 1],
            attributes: self.memory[base + 2],
            x: self.memory[base + 3],
        }
    }

    pub fn sprites(&self) -> impl Iterator<Item = OamSprite> + '_ {
        (0..OAM_SPRITES).map(|sprite| self.sprite(sprite))
    }
}

impl Default for Oam {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Oam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sprites()).finish()
    }
}

impl Memory for Oam {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[address as usize % OAM_SIZE]
    }

    fn write(&mut self, address: u16, data: u8) {
        let data = if address % 4 == 2 {
            data & ATTRIBUTE_MASK
        } else {
            data
        };
        self.memory[address as usize % OAM_SIZE] = data;
    }

    fn size(&self) -> usize {
        OAM_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_layout() {
        let mut oam = Oam::new();
        for (i, byte) in [0x10, 0x22, 0b1100_0001, 0x40].into_iter().enumerate() {
            oam.write(4 + i as u16, byte);
        }

        let sprite = oam.sprite(1);
        assert_eq!(sprite.y, 0x10);
        assert_eq!(sprite.tile, 0x22);
        assert_eq!(sprite.x, 0x40);
        assert_eq!(sprite.palette(), 0x14);
        assert!(sprite.flip_horizontally());
        assert!(sprite.flip_vertically());
        assert!(!sprite.behind_background());
    }

    #[test]
    fn test_unimplemented_attribute_bits_read_as_zero() {
        let mut oam = Oam::new();
        oam.write(2, 0xFF);
        assert_eq!(oam.read(2), 0xE3);
        // other bytes are stored as is
        oam.write(3, 0xFF);
        assert_eq!(oam.read(3), 0xFF);
    }

    #[test]
    fn test_sprite_row_on_scanline() {
        let sprite = OamSprite {
            y: 20,
            ..Default::default()
        };
        assert_eq!(sprite.row_on(19, 8), None);
        assert_eq!(sprite.row_on(20, 8), Some(0));
        assert_eq!(sprite.row_on(27, 8), Some(7));
        assert_eq!(sprite.row_on(28, 8), None);
        assert_eq!(sprite.row_on(28, 16), Some(8));
    }
}
