//! Cartridge
//!
//! A cartridge is built from a [`CartridgeImage`], the already decoded
//! contents of a game: program ROM, graphics memory, program RAM size, mapper
//! number and nametable mirroring. Parsing container formats (iNES, NES 2.0)
//! happens before this point.
//!
//! The cartridge is shared by the two buses. The CPU reaches it through
//! [`ProgramSpace`] at $4020-$FFFF and the PPU through the graphics bus at
//! $0000-$1FFF.

use log::info;

use crate::errors::{CartridgeError, NesError};
use crate::hardware::{CARTRIDGE_START, CHR_MEMORY_SIZE};
use crate::interfaces::Memory;
use crate::mappers::{self, Mapper};
use crate::types::SharedCartridge;

pub use crate::graphics::vram::Mirroring;

/// Pattern table memory provided by the cartridge
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphicsMemory {
    /// CHR ROM contents
    Rom(Vec<u8>),
    /// CHR RAM of the given size, zeroed at power-on
    Ram(usize),
}

impl GraphicsMemory {
    pub fn len(&self) -> usize {
        match self {
            GraphicsMemory::Rom(contents) => contents.len(),
            GraphicsMemory::Ram(size) => *size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GraphicsMemory {
    fn default() -> Self {
        GraphicsMemory::Ram(CHR_MEMORY_SIZE)
    }
}

/// Decoded cartridge contents, the boundary with ROM loaders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeImage {
    pub program_rom: Vec<u8>,
    pub graphics: GraphicsMemory,
    pub program_ram_size: usize,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
}

impl CartridgeImage {
    /// NROM image with CHR RAM and no program RAM
    pub fn new(program_rom: Vec<u8>) -> Self {
        Self {
            program_rom,
            graphics: GraphicsMemory::default(),
            program_ram_size: 0,
            mapper_id: 0,
            mirroring: Mirroring::default(),
        }
    }

    pub fn with_graphics(mut self, graphics: GraphicsMemory) -> Self {
        self.graphics = graphics;
        self
    }

    pub fn with_program_ram(mut self, size: usize) -> Self {
        self.program_ram_size = size;
        self
    }

    pub fn with_mirroring(mut self, mirroring: Mirroring) -> Self {
        self.mirroring = mirroring;
        self
    }
}

pub struct Cartridge {
    mapper: Box<dyn Mapper>,
    mirroring: Mirroring,
}

impl Cartridge {
    pub fn new(image: CartridgeImage) -> Result<Self, NesError> {
        if image.program_rom.is_empty() {
            return Err(CartridgeError::MissingProgramRom.into());
        }

        info!(
            "Cartridge: mapper {}, {} kB PRG ROM, {} kB CHR {}, {} kB PRG RAM, {:?} mirroring",
            image.mapper_id,
            image.program_rom.len() / 1024,
            image.graphics.len() / 1024,
            match image.graphics {
                GraphicsMemory::Rom(_) => "ROM",
                GraphicsMemory::Ram(_) => "RAM",
            },
            image.program_ram_size / 1024,
            image.mirroring,
        );

        let mirroring = image.mirroring;
        let mapper = mappers::mapper_for(image)?;

        Ok(Self { mapper, mirroring })
    }

    pub fn mapper_id(&self) -> u8 {
        self.mapper.id()
    }

    /// Current nametable mirroring. Mappers able to switch it take precedence
    /// over the image setting
    pub fn mirroring(&self) -> Mirroring {
        self.mapper.mirroring().unwrap_or(self.mirroring)
    }

    pub fn read_program(&mut self, address: u16) -> u8 {
        self.mapper.read_program(address)
    }

    pub fn write_program(&mut self, address: u16, data: u8) {
        self.mapper.write_program(address, data);
    }

    pub fn read_graphics(&mut self, address: u16) -> u8 {
        self.mapper.read_graphics(address)
    }

    pub fn write_graphics(&mut self, address: u16, data: u8) {
        self.mapper.write_graphics(address, data);
    }
}

/// CPU side of a shared cartridge, attached to the main bus at $4020-$FFFF.
/// Bus offsets are turned back into CPU addresses for the mapper
pub struct ProgramSpace {
    cartridge: SharedCartridge,
}

impl ProgramSpace {
    pub fn new(cartridge: SharedCartridge) -> Self {
        Self { cartridge }
    }
}

impl Memory for ProgramSpace {
    fn read(&mut self, address: u16) -> u8 {
        self.cartridge
            .borrow_mut()
            .read_program(CARTRIDGE_START.wrapping_add(address))
    }

    fn write(&mut self, address: u16, data: u8) {
        self.cartridge
            .borrow_mut()
            .write_program(CARTRIDGE_START.wrapping_add(address), data);
    }

    fn size(&self) -> usize {
        (u16::MAX - CARTRIDGE_START) as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_missing_program_rom() {
        let result = Cartridge::new(CartridgeImage::new(vec![]));
        assert!(matches!(
            result,
            Err(NesError::Cartridge(CartridgeError::MissingProgramRom))
        ));
    }

    #[test]
    fn test_unknown_mapper() {
        let mut image = CartridgeImage::new(vec![0; 0x4000]);
        image.mapper_id = 4;
        assert!(matches!(
            Cartridge::new(image),
            Err(NesError::UnsupportedMapper(4))
        ));
    }

    #[test]
    fn test_program_space_offsets() {
        let mut rom = vec![0; 0x8000];
        rom[0] = 0x11;
        rom[0x7FFC] = 0x22;
        let cartridge = Rc::new(RefCell::new(Cartridge::new(CartridgeImage::new(rom)).unwrap()));
        let mut space = ProgramSpace::new(cartridge);

        // bus offsets are relative to $4020
        assert_eq!(space.read(0x8000 - CARTRIDGE_START), 0x11);
        assert_eq!(space.read(0xFFFC - CARTRIDGE_START), 0x22);
        assert_eq!(space.size(), 0xBFE0);
    }

    #[test]
    fn test_image_mirroring() {
        let image = CartridgeImage::new(vec![0; 0x4000]).with_mirroring(Mirroring::Vertical);
        let cartridge = Cartridge::new(image).unwrap();
        assert_eq!(cartridge.mirroring(), Mirroring::Vertical);
        assert_eq!(cartridge.mapper_id(), 0);
    }
}
