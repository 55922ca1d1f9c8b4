//! PPU hardware to produce pixel data, mixing background and sprites
//!
//! Refer to https://www.nesdev.org/wiki/PPU_rendering for more information
//! about this module

use crate::hardware::SPRITES_PER_LINE;
use crate::utils;

/// PPU's internal set of shift registers responsible of producing pixel data.
///
/// It consists of shifters for background tile pattern and attributes as well
/// as 8 sprite units loaded during sprite evaluation. Priority between both is
/// decided by the PPU
#[derive(Default)]
pub struct PixelProducer {
    // Background
    pub buffers: Buffers,
    shifters: Shifters,

    // Sprites
    sprites: [SpriteUnit; SPRITES_PER_LINE],
    sprite_count: usize,
}

/// Internal PPU latches that store the next tile while the current one is
/// being drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buffers {
    pub next_tile_number: u8,
    /// 2-bit background palette of the next tile
    pub next_attributes: u8,
    pub next_bit_plane_low: u8,
    pub next_bit_plane_high: u8,
}

/// Shifters are 16-bit wide, the high 8 bits are used in the current pixels
/// being drawn while the low 8 bits hold the next tile
#[derive(Clone, Copy, Debug, Default)]
struct Shifters {
    attributes: (u16, u16),
    tile_pattern: (u16, u16),
}

/// One sprite ready to be drawn on the current scanline. Patterns are stored
/// with the leftmost pixel in bit 7, horizontal flip already applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteUnit {
    pub x: u8,
    pub pattern_low: u8,
    pub pattern_high: u8,
    pub palette: u8,
    pub behind_background: bool,
    pub sprite_zero: bool,
}

/// Opaque sprite pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpritePixel {
    /// Palette memory offset ($10-$1F)
    pub palette_index: u8,
    pub behind_background: bool,
    pub sprite_zero: bool,
}

impl PixelProducer {
    pub fn new() -> Self {
        Self::default()
    }

    // Load shift registers from internal latches (buffers) so next 8 pixels can
    // be drawn by the PPU in the next clock cycles
    pub fn load_shifters(&mut self) {
        let buffers = &self.buffers;
        let shifters = &mut self.shifters;

        shifters.tile_pattern.0 =
            (shifters.tile_pattern.0 & 0xFF00) | buffers.next_bit_plane_low as u16;
        shifters.tile_pattern.1 =
            (shifters.tile_pattern.1 & 0xFF00) | buffers.next_bit_plane_high as u16;

        let expand = |bit: u8| if bit == 0 { 0x00 } else { 0xFF };
        shifters.attributes.0 =
            (shifters.attributes.0 & 0xFF00) | expand(utils::bv(buffers.next_attributes, 0));
        shifters.attributes.1 =
            (shifters.attributes.1 & 0xFF00) | expand(utils::bv(buffers.next_attributes, 1));
    }

    pub fn update_shifters(&mut self) {
        self.shifters.tile_pattern.0 <<= 1;
        self.shifters.tile_pattern.1 <<= 1;
        self.shifters.attributes.0 <<= 1;
        self.shifters.attributes.1 <<= 1;
    }

    /// Background palette offset ($00-$0F) under the current dot. Transparent
    /// pixels are always 0, the universal background color
    pub fn background_pixel(&self, fine_x: u8) -> u8 {
        let bit = 15 - fine_x as u16;
        let pick = |shifter: u16| ((shifter >> bit) & 1) as u8;

        let color = (pick(self.shifters.tile_pattern.1) << 1) | pick(self.shifters.tile_pattern.0);
        if color == 0 {
            return 0;
        }

        let palette = (pick(self.shifters.attributes.1) << 1) | pick(self.shifters.attributes.0);
        (palette << 2) | color
    }

    /// Replace the sprites drawn on the current scanline
    pub fn load_sprites(&mut self, sprites: &[SpriteUnit]) {
        self.sprite_count = sprites.len().min(SPRITES_PER_LINE);
        self.sprites[..self.sprite_count].copy_from_slice(&sprites[..self.sprite_count]);
    }

    pub fn clear_sprites(&mut self) {
        self.sprite_count = 0;
    }

    /// First opaque sprite pixel at column `x`, in OAM order
    pub fn sprite_pixel(&self, x: u16) -> Option<SpritePixel> {
        self.sprites[..self.sprite_count].iter().find_map(|sprite| {
            let column = x.checked_sub(sprite.x as u16).filter(|column| *column < 8)?;
            let bit = 7 - column as u8;
            let color =
                (utils::bv(sprite.pattern_high, bit) << 1) | utils::bv(sprite.pattern_low, bit);

            (color != 0).then_some(SpritePixel {
                palette_index: sprite.palette | color,
                behind_background: sprite.behind_background,
                sprite_zero: sprite.sprite_zero,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producer_with_tile(low: u8, high: u8, attributes: u8) -> PixelProducer {
        let mut producer = PixelProducer::new();
        producer.buffers = Buffers {
            next_tile_number: 0,
            next_attributes: attributes,
            next_bit_plane_low: low,
            next_bit_plane_high: high,
        };
        producer.load_shifters();
        // move the tile to the high byte, where pixels are taken from
        for _ in 0..8 {
            producer.update_shifters();
        }
        producer
    }

    #[test]
    fn test_background_pixel_uses_fine_x() {
        let producer = producer_with_tile(0b1000_0000, 0b0100_0000, 0b10);

        // pixel 0: low plane only -> color 1, palette 2
        assert_eq!(producer.background_pixel(0), 0b1001);
        // pixel 1: high plane only -> color 2
        assert_eq!(producer.background_pixel(1), 0b1010);
        // pixel 2: transparent, palette is dropped
        assert_eq!(producer.background_pixel(2), 0);
    }

    #[test]
    fn test_shifting_moves_to_the_next_pixel() {
        let mut producer = producer_with_tile(0b0100_0000, 0, 0);
        assert_eq!(producer.background_pixel(0), 0);
        producer.update_shifters();
        assert_eq!(producer.background_pixel(0), 1);
    }

    #[test]
    fn test_sprite_pixel_priority_in_oam_order() {
        let mut producer = PixelProducer::new();
        producer.load_sprites(&[
            SpriteUnit {
                x: 10,
                pattern_low: 0b0000_0001,
                palette: 0x14,
                sprite_zero: true,
                ..Default::default()
            },
            SpriteUnit {
                x: 12,
                pattern_low: 0xFF,
                pattern_high: 0xFF,
                palette: 0x18,
                behind_background: true,
                ..Default::default()
            },
        ]);

        assert_eq!(producer.sprite_pixel(9), None);
        // first sprite is transparent at 12, second one shows
        let pixel = producer.sprite_pixel(12).unwrap();
        assert_eq!(pixel.palette_index, 0x1B);
        assert!(pixel.behind_background);
        // first sprite wins where both are opaque
        let pixel = producer.sprite_pixel(17).unwrap();
        assert_eq!(pixel.palette_index, 0x15);
        assert!(pixel.sprite_zero);
        assert_eq!(producer.sprite_pixel(20), None);

        producer.clear_sprites();
        assert_eq!(producer.sprite_pixel(12), None);
    }
}
