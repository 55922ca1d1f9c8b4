//! Nametable memory
//!
//! The PPU addresses four 1 kB nametables but the console only has 2 kB of
//! RAM for them. The cartridge decides how the four logical tables map onto
//! the physical ones.

use crate::hardware::NAMETABLE_SIZE;
use crate::interfaces::Memory;
use crate::processor::memory::Ram;
use crate::settings::RamPowerOn;

/// How logical nametables ($2000, $2400, $2800, $2C00) fold onto VRAM
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000 = $2400 and $2800 = $2C00. Used by vertically scrolling games
    #[default]
    Horizontal,
    /// $2000 = $2800 and $2400 = $2C00. Used by horizontally scrolling games
    Vertical,
    /// Every table is the first physical one
    SingleScreenLower,
    /// Every table is the second physical one
    SingleScreenUpper,
    /// Extra cartridge RAM, all four tables are distinct
    FourScreen,
}

impl Mirroring {
    /// Physical table backing logical table `table` (0-3)
    fn physical_table(&self, table: u16) -> u16 {
        match self {
            Mirroring::Horizontal => table >> 1,
            Mirroring::Vertical => table & 1,
            Mirroring::SingleScreenLower => 0,
            Mirroring::SingleScreenUpper => 1,
            Mirroring::FourScreen => table,
        }
    }

    /// Bytes of RAM needed to back the physical tables
    fn ram_size(&self) -> usize {
        match self {
            Mirroring::FourScreen => 4 * NAMETABLE_SIZE as usize,
            _ => 2 * NAMETABLE_SIZE as usize,
        }
    }
}

pub struct Vram {
    memory: Ram,
    mirroring: Mirroring,
}

impl Vram {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            memory: Ram::new(mirroring.ram_size(), RamPowerOn::Zeroed),
            mirroring,
        }
    }

    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Switching to four screen adds the cartridge tables, the console
    /// tables keep their contents
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        if mirroring.ram_size() > self.memory.size() {
            let mut memory = Ram::new(mirroring.ram_size(), RamPowerOn::Zeroed);
            for index in 0..self.memory.size() as u16 {
                memory.write(index, self.memory.read(index));
            }
            self.memory = memory;
        }
        self.mirroring = mirroring;
    }

    /// Physical offset for a nametable address. Anything above $2FFF folds
    /// back, so $3000-$3EFF mirrors $2000-$2EFF
    fn index(&self, address: u16) -> u16 {
        let address = address & 0x0FFF;
        let table = address / NAMETABLE_SIZE;
        let offset = address % NAMETABLE_SIZE;
        self.mirroring.physical_table(table) * NAMETABLE_SIZE + offset
    }
}

impl Memory for Vram {
    fn read(&mut self, address: u16) -> u8 {
        let index = self.index(address);
        self.memory.read(index)
    }

    fn write(&mut self, address: u16, data: u8) {
        let index = self.index(address);
        self.memory.write(index, data);
    }

    fn size(&self) -> usize {
        self.mirroring.ram_size()
    }
}
