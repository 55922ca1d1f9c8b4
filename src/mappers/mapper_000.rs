use log::{trace, warn};

use crate::cartridge::{CartridgeImage, GraphicsMemory};
use crate::errors::CartridgeError;
use crate::hardware::{
    CARTRIDGE_RAM_END, CARTRIDGE_RAM_START, CARTRIDGE_ROM_START, CHR_MEMORY_SIZE,
    PATTERN_TABLES_END,
};
use crate::interfaces::Memory;
use crate::processor::memory::Ram;
use crate::settings::RamPowerOn;

use super::Mapper;

const MAPPER_ID: u8 = 0;

const PROGRAM_ROM_BANK: usize = 0x4000;
const PROGRAM_RAM_MAX: usize = 0x2000;

/// NROM. No bank switching at all: 16 or 32 kB of program ROM, 8 kB of
/// graphics memory and optional program RAM (Family BASIC)
pub struct Mapper000 {
    // Program memory (ROM) -- CPU $8000-$FFFF. 16 kB images are mirrored into
    // $C000-$FFFF
    program_rom: Vec<u8>,

    // Program memory (RAM) -- CPU $6000-$7FFF, mirrored when smaller
    program_ram: Option<Ram>,

    // Character memory, stores patterns and graphics for the PPU -- PPU
    // $0000-$1FFF (pattern tables)
    graphics: CharacterMemory,
}

enum CharacterMemory {
    Rom(Vec<u8>),
    Ram(Ram),
}

impl Mapper000 {
    pub fn new(image: CartridgeImage) -> Result<Self, CartridgeError> {
        let size = image.program_rom.len();
        if size != PROGRAM_ROM_BANK && size != 2 * PROGRAM_ROM_BANK {
            return Err(CartridgeError::InvalidProgramRomSize {
                mapper: MAPPER_ID,
                size,
            });
        }

        if image.graphics.len() != CHR_MEMORY_SIZE {
            return Err(CartridgeError::InvalidGraphicsSize {
                mapper: MAPPER_ID,
                size: image.graphics.len(),
            });
        }

        let program_ram = match image.program_ram_size {
            0 => None,
            size if size <= PROGRAM_RAM_MAX && size.is_power_of_two() => {
                Some(Ram::new(size, RamPowerOn::Zeroed))
            }
            size => {
                return Err(CartridgeError::InvalidProgramRamSize {
                    mapper: MAPPER_ID,
                    size,
                })
            }
        };

        let graphics = match image.graphics {
            GraphicsMemory::Rom(contents) => CharacterMemory::Rom(contents),
            GraphicsMemory::Ram(size) => CharacterMemory::Ram(Ram::new(size, RamPowerOn::Zeroed)),
        };

        Ok(Self {
            program_rom: image.program_rom,
            program_ram,
            graphics,
        })
    }
}

impl Mapper for Mapper000 {
    fn id(&self) -> u8 {
        MAPPER_ID
    }

    fn read_program(&mut self, address: u16) -> u8 {
        match address {
            CARTRIDGE_ROM_START..=u16::MAX => {
                let offset = (address - CARTRIDGE_ROM_START) as usize;
                self.program_rom[offset % self.program_rom.len()]
            }
            CARTRIDGE_RAM_START..=CARTRIDGE_RAM_END => match self.program_ram {
                Some(ref mut ram) => ram.read(address - CARTRIDGE_RAM_START),
                None => 0,
            },
            // expansion area, nothing there on NROM boards
            _ => 0,
        }
    }

    fn write_program(&mut self, address: u16, data: u8) {
        match (address, self.program_ram.as_mut()) {
            (CARTRIDGE_RAM_START..=CARTRIDGE_RAM_END, Some(ram)) => {
                ram.write(address - CARTRIDGE_RAM_START, data)
            }
            _ => warn!("NROM: write to read-only ${address:0>4X} <- {data:0>2X} dropped"),
        }
    }

    fn read_graphics(&mut self, address: u16) -> u8 {
        let address = address & PATTERN_TABLES_END;
        match self.graphics {
            CharacterMemory::Rom(ref contents) => contents[address as usize],
            CharacterMemory::Ram(ref mut ram) => ram.read(address),
        }
    }

    fn write_graphics(&mut self, address: u16, data: u8) {
        let address = address & PATTERN_TABLES_END;
        match self.graphics {
            CharacterMemory::Rom(_) => {
                trace!("NROM: write to CHR ROM ${address:0>4X} <- {data:0>2X} dropped")
            }
            CharacterMemory::Ram(ref mut ram) => ram.write(address, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program_rom(size: usize) -> Vec<u8> {
        (0..size).map(|i| (i / PROGRAM_ROM_BANK) as u8 + 1).collect()
    }

    #[test]
    fn test_16k_program_rom_is_mirrored() {
        let mut mapper = Mapper000::new(CartridgeImage::new(program_rom(0x4000))).unwrap();
        assert_eq!(mapper.read_program(0x8000), 1);
        assert_eq!(mapper.read_program(0xC000), 1);
        assert_eq!(mapper.read_program(0xFFFF), 1);
    }

    #[test]
    fn test_32k_program_rom() {
        let mut mapper = Mapper000::new(CartridgeImage::new(program_rom(0x8000))).unwrap();
        assert_eq!(mapper.read_program(0xBFFF), 1);
        assert_eq!(mapper.read_program(0xC000), 2);
    }

    #[test]
    fn test_program_rom_writes_are_dropped() {
        let mut mapper = Mapper000::new(CartridgeImage::new(program_rom(0x8000))).unwrap();
        mapper.write_program(0x8000, 0xFF);
        assert_eq!(mapper.read_program(0x8000), 1);
    }

    #[test]
    fn test_program_ram() {
        let image = CartridgeImage::new(program_rom(0x4000)).with_program_ram(0x800);
        let mut mapper = Mapper000::new(image).unwrap();

        mapper.write_program(0x6001, 0x42);
        assert_eq!(mapper.read_program(0x6001), 0x42);
        // 2 kB mirrored across the window
        assert_eq!(mapper.read_program(0x6801), 0x42);
    }

    #[test]
    fn test_no_program_ram_and_expansion_area_read_zero() {
        let mut mapper = Mapper000::new(CartridgeImage::new(program_rom(0x4000))).unwrap();
        mapper.write_program(0x6000, 0x42);
        assert_eq!(mapper.read_program(0x6000), 0);
        assert_eq!(mapper.read_program(0x4020), 0);
        assert_eq!(mapper.read_program(0x5FFF), 0);
    }

    #[test]
    fn test_graphics_rom_and_ram() {
        let mut chr = vec![0; CHR_MEMORY_SIZE];
        chr[0x1234] = 0x56;
        let image =
            CartridgeImage::new(program_rom(0x4000)).with_graphics(GraphicsMemory::Rom(chr));
        let mut mapper = Mapper000::new(image).unwrap();
        mapper.write_graphics(0x1234, 0xFF);
        assert_eq!(mapper.read_graphics(0x1234), 0x56);

        let mut mapper = Mapper000::new(CartridgeImage::new(program_rom(0x4000))).unwrap();
        mapper.write_graphics(0x1234, 0xFF);
        assert_eq!(mapper.read_graphics(0x1234), 0xFF);
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(
            Mapper000::new(CartridgeImage::new(program_rom(0x2000))).err(),
            Some(CartridgeError::InvalidProgramRomSize {
                mapper: 0,
                size: 0x2000
            })
        );

        let image =
            CartridgeImage::new(program_rom(0x4000)).with_graphics(GraphicsMemory::Ram(0x1000));
        assert_eq!(
            Mapper000::new(image).err(),
            Some(CartridgeError::InvalidGraphicsSize {
                mapper: 0,
                size: 0x1000
            })
        );

        let image = CartridgeImage::new(program_rom(0x4000)).with_program_ram(0x3000);
        assert_eq!(
            Mapper000::new(image).err(),
            Some(CartridgeError::InvalidProgramRamSize {
                mapper: 0,
                size: 0x3000
            })
        );
    }
}
