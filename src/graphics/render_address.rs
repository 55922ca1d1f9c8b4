use crate::hardware::{ATTRIBUTE_TABLE_OFFSET, NAMETABLES_START};
use crate::utils::BitGroup;

/// [`RenderAddress`] represents the loopy registers `v` and `t` (from NES
/// wiki), a VRAM address maintained internally by the PPU while rendering.
///
/// It's a 15-bit address used for both reading and writing PPU memory through
/// PPUDATA ($2007) register
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderAddress {
    value: BitGroup<u16>,
}

impl RenderAddress {
    pub const FINE_Y_SCROLL: u16 = 0b0111_0000_0000_0000;
    pub const NAMETABLES_SELECT: u16 = 0b0000_1100_0000_0000;
    pub const VERTICAL_NAMETABLE: u16 = 0b0000_1000_0000_0000;
    pub const HORIZONTAL_NAMETABLE: u16 = 0b0000_0100_0000_0000;
    pub const COARSE_Y_SCROLL: u16 = 0b0000_0011_1110_0000;
    pub const COARSE_X_SCROLL: u16 = 0b0000_0000_0001_1111;

    /// Bits copied from `t` at dot 257 of each rendering line
    const HORIZONTAL_BITS: u16 = Self::HORIZONTAL_NAMETABLE | Self::COARSE_X_SCROLL;
    /// Bits copied from `t` during the pre-render line
    const VERTICAL_BITS: u16 =
        Self::FINE_Y_SCROLL | Self::VERTICAL_NAMETABLE | Self::COARSE_Y_SCROLL;

    const MASK: u16 = 0x7FFF;

    pub fn value(&self) -> u16 {
        self.value.into()
    }

    pub fn get(&self, group: u16) -> u16 {
        self.value.get(group)
    }

    pub fn set(&mut self, group: u16, value: u16) {
        self.value.set(group, value);
    }

    /// Add `amount` as PPUDATA accesses do outside rendering
    pub fn increment(&mut self, amount: u16) {
        self.value = BitGroup::new(self.value().wrapping_add(amount) & Self::MASK);
    }

    pub fn increment_x(&mut self) {
        let coarse_x = self.get(Self::COARSE_X_SCROLL);
        if coarse_x == 31 {
            self.set(Self::COARSE_X_SCROLL, 0);
            self.toggle(Self::HORIZONTAL_NAMETABLE);
        } else {
            self.set(Self::COARSE_X_SCROLL, coarse_x + 1);
        }
    }

    pub fn increment_y(&mut self) {
        let fine_y = self.get(Self::FINE_Y_SCROLL);
        if fine_y != 7 {
            self.set(Self::FINE_Y_SCROLL, fine_y + 1);
            return;
        }

        self.set(Self::FINE_Y_SCROLL, 0);

        let coarse_y = self.get(Self::COARSE_Y_SCROLL);
        if coarse_y == 29 {
            self.set(Self::COARSE_Y_SCROLL, 0);
            self.toggle(Self::VERTICAL_NAMETABLE);
        } else if coarse_y == 31 {
            // out of bounds rows wrap without switching nametable
            self.set(Self::COARSE_Y_SCROLL, 0);
        } else {
            self.set(Self::COARSE_Y_SCROLL, coarse_y + 1);
        }
    }

    pub fn copy_horizontal(&mut self, from: &RenderAddress) {
        self.copy_bits(from, Self::HORIZONTAL_BITS);
    }

    pub fn copy_vertical(&mut self, from: &RenderAddress) {
        self.copy_bits(from, Self::VERTICAL_BITS);
    }

    /// Address of the nametable byte for the current tile
    pub fn tile_address(&self) -> u16 {
        NAMETABLES_START | (self.value() & 0x0FFF)
    }

    /// Address of the attribute byte covering the current tile
    pub fn attribute_address(&self) -> u16 {
        let value = self.value();
        NAMETABLES_START
            | ATTRIBUTE_TABLE_OFFSET
            | (value & Self::NAMETABLES_SELECT)
            | ((value >> 4) & 0x38)
            | ((value >> 2) & 0x07)
    }

    /// Position of the current tile's 2-bit palette inside its attribute byte
    pub fn attribute_shift(&self) -> u8 {
        let coarse_x = self.get(Self::COARSE_X_SCROLL);
        let coarse_y = self.get(Self::COARSE_Y_SCROLL);
        (((coarse_y & 0b10) << 1) | (coarse_x & 0b10)) as u8
    }

    fn toggle(&mut self, group: u16) {
        self.value = BitGroup::new(self.value() ^ group);
    }

    fn copy_bits(&mut self, from: &RenderAddress, mask: u16) {
        let value = (self.value() & !mask) | (from.value() & mask);
        self.value = BitGroup::new(value);
    }
}

impl std::fmt::Debug for RenderAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:0>4X}", self.value())
    }
}

impl From<RenderAddress> for u16 {
    fn from(value: RenderAddress) -> Self {
        value.value.into()
    }
}

impl From<u16> for RenderAddress {
    fn from(value: u16) -> Self {
        Self {
            value: BitGroup::new(value & Self::MASK),
        }
    }
}

/// Shared toggle of PPUSCROLL and PPUADDR. Which half of a two-write register
/// the next CPU write goes to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteLatch {
    #[default]
    First,
    Second,
}

impl WriteLatch {
    fn toggle(&mut self) {
        *self = match self {
            WriteLatch::First => WriteLatch::Second,
            WriteLatch::Second => WriteLatch::First,
        };
    }
}

/// Scrolling state: current address `v`, temporary address `t`, fine X and
/// the write latch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scroll {
    pub v: RenderAddress,
    pub t: RenderAddress,
    pub fine_x: u8,
    pub latch: WriteLatch,
}

impl Scroll {
    /// PPUCTRL write: nametable select goes to `t`
    pub fn write_control(&mut self, nametable: u8) {
        self.t.set(RenderAddress::NAMETABLES_SELECT, nametable as u16);
    }

    /// PPUSCROLL write. X first, then Y
    pub fn write_scroll(&mut self, data: u8) {
        match self.latch {
            WriteLatch::First => {
                self.t.set(RenderAddress::COARSE_X_SCROLL, (data >> 3) as u16);
                self.fine_x = data & 0b111;
            }
            WriteLatch::Second => {
                self.t.set(RenderAddress::COARSE_Y_SCROLL, (data >> 3) as u16);
                self.t.set(RenderAddress::FINE_Y_SCROLL, (data & 0b111) as u16);
            }
        }
        self.latch.toggle();
    }

    /// PPUADDR write. High byte first, `v` is updated after the low byte
    pub fn write_address(&mut self, data: u8) {
        match self.latch {
            WriteLatch::First => {
                // bit 14 is cleared by the first write
                let value = (self.t.value() & 0x00FF) | (((data & 0x3F) as u16) << 8);
                self.t = RenderAddress::from(value);
            }
            WriteLatch::Second => {
                let value = (self.t.value() & 0xFF00) | data as u16;
                self.t = RenderAddress::from(value);
                self.v = self.t;
            }
        }
        self.latch.toggle();
    }

    /// PPUSTATUS read side effect
    pub fn reset_latch(&mut self) {
        self.latch = WriteLatch::First;
    }

    /// Horizontal scroll position in pixels, as last written through `t`
    pub fn x(&self) -> u16 {
        (self.t.get(RenderAddress::COARSE_X_SCROLL) << 3) | self.fine_x as u16
    }

    /// Vertical scroll position in pixels, as last written through `t`
    pub fn y(&self) -> u16 {
        let coarse = self.t.get(RenderAddress::COARSE_Y_SCROLL);
        (coarse << 3) | self.t.get(RenderAddress::FINE_Y_SCROLL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_15_bits() {
        assert_eq!(RenderAddress::from(0).value(), 0);
        assert_eq!(RenderAddress::from(0x71A2).value(), 0x71A2);
        assert_eq!(RenderAddress::from(0xF1A2).value(), 0x71A2);
    }

    mod test_get_and_set {
        use super::*;

        #[test]
        fn test_fine_y_scroll() {
            let mut addr = RenderAddress::from(0);
            addr.set(RenderAddress::FINE_Y_SCROLL, 0b101);
            assert_eq!(addr.get(RenderAddress::FINE_Y_SCROLL), 0b101);
            assert_eq!(addr.value(), 0b0101_0000_0000_0000);
        }

        #[test]
        fn test_nametables_select() {
            let mut addr = RenderAddress::from(0);
            addr.set(RenderAddress::NAMETABLES_SELECT, 0b11);
            assert_eq!(addr.get(RenderAddress::NAMETABLES_SELECT), 0b11);
            assert_eq!(addr.value(), 0b0000_1100_0000_0000);

            let mut addr = RenderAddress::from(0);
            addr.set(RenderAddress::VERTICAL_NAMETABLE, 1);
            assert_eq!(addr.value(), 0b0000_1000_0000_0000);
        }

        #[test]
        fn test_coarse_scroll() {
            let mut addr = RenderAddress::from(0);
            addr.set(RenderAddress::COARSE_Y_SCROLL, 0b10101);
            addr.set(RenderAddress::COARSE_X_SCROLL, 0b01010);
            assert_eq!(addr.get(RenderAddress::COARSE_Y_SCROLL), 0b10101);
            assert_eq!(addr.value(), 0b0000_0010_1010_1010);
        }
    }

    #[test]
    fn test_increment_x() {
        // https://www.nesdev.org/wiki/PPU_scrolling#Coarse_X_increment
        let mut addr = RenderAddress::from(0);

        addr.increment_x();
        assert_eq!(addr.get(RenderAddress::COARSE_X_SCROLL), 1);
        assert_eq!(addr.get(RenderAddress::HORIZONTAL_NAMETABLE), 0);

        addr.set(RenderAddress::COARSE_X_SCROLL, 31);
        addr.increment_x();
        assert_eq!(addr.get(RenderAddress::COARSE_X_SCROLL), 0);
        assert_eq!(addr.get(RenderAddress::HORIZONTAL_NAMETABLE), 1);

        addr.set(RenderAddress::COARSE_X_SCROLL, 31);
        addr.increment_x();
        assert_eq!(addr.get(RenderAddress::HORIZONTAL_NAMETABLE), 0);
    }

    #[test]
    fn test_increment_y() {
        // https://www.nesdev.org/wiki/PPU_scrolling#Y_increment
        let mut addr = RenderAddress::from(0);

        addr.increment_y();
        assert_eq!(addr.get(RenderAddress::FINE_Y_SCROLL), 1);
        assert_eq!(addr.get(RenderAddress::COARSE_Y_SCROLL), 0);

        // fine Y overflows into coarse Y
        addr.set(RenderAddress::FINE_Y_SCROLL, 7);
        addr.increment_y();
        assert_eq!(addr.get(RenderAddress::FINE_Y_SCROLL), 0);
        assert_eq!(addr.get(RenderAddress::COARSE_Y_SCROLL), 1);

        // row 29 switches vertical nametable
        addr.set(RenderAddress::FINE_Y_SCROLL, 7);
        addr.set(RenderAddress::COARSE_Y_SCROLL, 29);
        addr.increment_y();
        assert_eq!(addr.get(RenderAddress::COARSE_Y_SCROLL), 0);
        assert_eq!(addr.get(RenderAddress::VERTICAL_NAMETABLE), 1);

        // rows 30 and 31 are attribute data, wrapping there keeps the table
        addr.set(RenderAddress::FINE_Y_SCROLL, 7);
        addr.set(RenderAddress::COARSE_Y_SCROLL, 31);
        addr.increment_y();
        assert_eq!(addr.get(RenderAddress::COARSE_Y_SCROLL), 0);
        assert_eq!(addr.get(RenderAddress::VERTICAL_NAMETABLE), 1);
    }

    #[test]
    fn test_copies_between_t_and_v() {
        let t = RenderAddress::from(0x7FFF);

        let mut v = RenderAddress::from(0);
        v.copy_horizontal(&t);
        assert_eq!(v.value(), 0x041F);

        let mut v = RenderAddress::from(0);
        v.copy_vertical(&t);
        assert_eq!(v.value(), 0x7BE0);
    }

    #[test]
    fn test_fetch_addresses() {
        // nametable 1, coarse X 5, coarse Y 6
        let mut addr = RenderAddress::from(0);
        addr.set(RenderAddress::NAMETABLES_SELECT, 1);
        addr.set(RenderAddress::COARSE_X_SCROLL, 5);
        addr.set(RenderAddress::COARSE_Y_SCROLL, 6);

        assert_eq!(addr.tile_address(), 0x2400 + 6 * 32 + 5);
        assert_eq!(addr.attribute_address(), 0x27C0 + 8 + 1);
        // bottom-left quadrant of the attribute byte
        assert_eq!(addr.attribute_shift(), 4);
    }

    #[test]
    fn test_scroll_writes_share_latch() {
        let mut scroll = Scroll::default();

        scroll.write_scroll(0b0111_1101);
        assert_eq!(scroll.latch, WriteLatch::Second);
        assert_eq!(scroll.fine_x, 0b101);
        assert_eq!(scroll.t.get(RenderAddress::COARSE_X_SCROLL), 0b01111);

        scroll.write_scroll(0b0101_1110);
        assert_eq!(scroll.latch, WriteLatch::First);
        assert_eq!(scroll.t.get(RenderAddress::COARSE_Y_SCROLL), 0b01011);
        assert_eq!(scroll.t.get(RenderAddress::FINE_Y_SCROLL), 0b110);
        assert_eq!((scroll.x(), scroll.y()), (0x7D, 0x5E));
    }

    #[test]
    fn test_address_writes_update_v_on_second_write() {
        let mut scroll = Scroll::default();

        scroll.write_address(0xFF);
        assert_eq!(scroll.t.value(), 0x3F00);
        assert_eq!(scroll.v.value(), 0);

        scroll.write_address(0x10);
        assert_eq!(scroll.v.value(), 0x3F10);
    }

    #[test]
    fn test_reset_latch() {
        let mut scroll = Scroll::default();
        scroll.write_address(0x21);
        scroll.reset_latch();
        scroll.write_address(0x23);
        scroll.write_address(0x45);
        assert_eq!(scroll.v.value(), 0x2345);
    }
}
