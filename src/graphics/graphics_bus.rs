//! PPU address space
//!
//! 14-bit address space, completely separated from the main bus:
//!
//! - $0000-$1FFF: pattern tables (cartridge graphics memory)
//! - $2000-$3EFF: nametables (VRAM, mirrored as the cartridge says)
//! - $3F00-$3FFF: palette memory

use log::trace;

use crate::hardware::{
    GRAPHICS_ADDRESS_MASK, NAMETABLES_END, NAMETABLES_START, PATTERN_TABLES_END,
    PATTERN_TABLES_START,
};
use crate::interfaces::{Bus, Memory};
use crate::types::SharedCartridge;

use super::palette_memory::PaletteMemory;
use super::vram::Vram;

pub struct GraphicsBus {
    cartridge: SharedCartridge,
    vram: Vram,
    palette: PaletteMemory,
}

impl GraphicsBus {
    pub fn new(cartridge: SharedCartridge) -> Self {
        let mirroring = cartridge.borrow().mirroring();
        Self {
            cartridge,
            vram: Vram::new(mirroring),
            palette: PaletteMemory::new(),
        }
    }

    pub fn vram(&self) -> &Vram {
        &self.vram
    }

    // mappers may switch mirroring at any time
    fn sync_mirroring(&mut self) {
        let mirroring = self.cartridge.borrow().mirroring();
        self.vram.set_mirroring(mirroring);
    }
}

impl Bus for GraphicsBus {
    fn read(&mut self, address: u16) -> u8 {
        let address = address & GRAPHICS_ADDRESS_MASK;
        match address {
            PATTERN_TABLES_START..=PATTERN_TABLES_END => {
                self.cartridge.borrow_mut().read_graphics(address)
            }
            NAMETABLES_START..=NAMETABLES_END => {
                self.sync_mirroring();
                self.vram.read(address)
            }
            _ => self.palette.read(address),
        }
    }

    fn write(&mut self, address: u16, data: u8) {
        let address = address & GRAPHICS_ADDRESS_MASK;
        trace!("Graphics bus write to: {address:0>4X} <- {data:0>2X}");
        match address {
            PATTERN_TABLES_START..=PATTERN_TABLES_END => {
                self.cartridge.borrow_mut().write_graphics(address, data)
            }
            NAMETABLES_START..=NAMETABLES_END => {
                self.sync_mirroring();
                self.vram.write(address, data);
            }
            _ => self.palette.write(address, data),
        }
    }
}
