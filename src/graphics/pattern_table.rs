use crate::utils::BitGroup;

/// A pattern table address points to a specific pattern table section (left or
/// right), a tile number, a bit plane and a row inside the tile. The column to
/// use is decided by users of this abstraction
#[derive(Clone, Copy, Debug)]
pub struct PatternTableAddress {
    value: BitGroup<u16>,
}

impl PatternTableAddress {
    /// Select with pattern table to use (left or right one)
    pub const PATTERN_TABLE: u16 = 0b0001_0000_0000_0000;

    pub const TILE_NUMBER: u16 = 0b0000_1111_1111_0000;

    pub const BIT_PLANE: u16 = 0b0000_0000_0000_1000;

    /// Row number inside a tile
    pub const FINE_Y_OFFSET: u16 = 0b0000_0000_0000_0111;

    /// `table_base` is $0000 or $1000
    pub fn new(table_base: u16, tile: u8, row: u16) -> Self {
        let mut value = BitGroup::new(table_base & Self::PATTERN_TABLE);
        value.set(Self::TILE_NUMBER, tile.into());
        value.set(Self::FINE_Y_OFFSET, row);
        Self { value }
    }

    /// Address for an 8x16 sprite row. Bit 0 of the tile picks the table and
    /// rows 8-15 come from the next tile
    pub fn tall_sprite(tile: u8, row: u16) -> Self {
        let table_base = if tile & 1 == 1 { Self::PATTERN_TABLE } else { 0 };
        let tile = (tile & 0xFE) + (row >= 8) as u8;
        Self::new(table_base, tile, row & 0b111)
    }

    pub fn low_plane(mut self) -> u16 {
        self.value.set(Self::BIT_PLANE, 0);
        self.value.into()
    }

    pub fn high_plane(mut self) -> u16 {
        self.value.set(Self::BIT_PLANE, 1);
        self.value.into()
    }
}
