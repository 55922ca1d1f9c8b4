use std::ops::{BitAnd, BitOr, Not, Shl, Shr};

/// Return the bit value for `value` at bit position `bit`
pub fn bv(value: u8, bit: u8) -> u8 {
    (value >> bit) & 1
}

/// True when `a` and `b` live in different 256-byte pages
pub fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Return the bitwise reverse of `value`. Used to flip sprite patterns
/// horizontally
pub fn reverse_bits(value: u8) -> u8 {
    value.reverse_bits()
}

/// A value split in groups of bits described by masks. Reading a group shifts
/// it down to bit 0, writing a group shifts the value up to the mask position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitGroup<T> {
    value: T,
}

impl<T> BitGroup<T>
where
    T: Copy
        + PartialEq
        + From<u8>
        + BitAnd<Output = T>
        + BitOr<Output = T>
        + Not<Output = T>
        + Shl<u32, Output = T>
        + Shr<u32, Output = T>,
{
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self, mask: T) -> T {
        (self.value & mask) >> Self::offset(mask)
    }

    pub fn set(&mut self, mask: T, value: T) {
        let value = (value << Self::offset(mask)) & mask;
        self.value = (self.value & !mask) | value;
    }

    pub fn value(&self) -> T {
        self.value
    }

    fn offset(mask: T) -> u32 {
        let zero = T::from(0);
        let one = T::from(1);
        let mut offset = 0;
        while offset < 32 && (mask >> offset) & one == zero && (mask >> offset) != zero {
            offset += 1;
        }
        offset
    }
}

impl From<BitGroup<u16>> for u16 {
    fn from(group: BitGroup<u16>) -> Self {
        group.value
    }
}
