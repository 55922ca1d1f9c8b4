use std::fmt;

/// Inclusive range of addresses owned by a device
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub start: u16,
    pub end: u16,
}

impl AddressRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, address: u16) -> bool {
        address >= self.start && address <= self.end
    }

    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn len(&self) -> usize {
        (self.end as usize) - (self.start as usize) + 1
    }
}

impl fmt::Debug for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:0>4X}-${:0>4X}", self.start, self.end)
    }
}

/// CPU view of the address space. Every access resolves to exactly one
/// device.
pub trait Bus {
    /// Read a byte from the device attached to the specified `address`
    fn read(&mut self, address: u16) -> u8;

    /// Writes a byte to the device attached to the specified `address`
    fn write(&mut self, address: u16, data: u8);
}

/// Anything that can be attached to a bus. Addresses are already relative to
/// the device (folded by the bus).
pub trait Memory {
    /// Read a byte from the specified `address`. Reads take `&mut self` as
    /// several devices change state when read
    fn read(&mut self, address: u16) -> u8;

    /// Write a byte of `data` to the specified `address`
    fn write(&mut self, address: u16, data: u8);

    /// Memory size in bytes
    fn size(&self) -> usize;
}
