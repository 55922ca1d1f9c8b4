use crate::hardware::PALETTE_MEMORY_SIZE;
use crate::interfaces::Memory;
use crate::processor::memory::Ram;
use crate::settings::RamPowerOn;

/// 32 palette entries, 6 bits each. The transparent slot of every sprite
/// palette is shared with the matching background palette
pub struct PaletteMemory {
    memory: Ram,
}

impl PaletteMemory {
    pub fn new() -> Self {
        Self {
            memory: Ram::new(PALETTE_MEMORY_SIZE.into(), RamPowerOn::Zeroed),
        }
    }

    fn index(address: u16) -> u16 {
        match address & 0x1F {
            0x10 => 0x00,
            0x14 => 0x04,
            0x18 => 0x08,
            0x1C => 0x0C,
            address => address,
        }
    }
}

impl Default for PaletteMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for PaletteMemory {
    fn read(&mut self, address: u16) -> u8 {
        self.memory.read(Self::index(address)) & 0x3F
    }

    fn write(&mut self, address: u16, data: u8) {
        self.memory.write(Self::index(address), data);
    }

    fn size(&self) -> usize {
        PALETTE_MEMORY_SIZE.into()
    }
}
