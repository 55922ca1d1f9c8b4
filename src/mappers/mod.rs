//! Mappers
//!
//! NES mappers are circuits and hardware found in cartridges that allow
//! extending the capabilities and bypass some NES limitations.
//!
//! They are commonly used to extend the NES memory limitations but they can
//! also add more RAM or even extend sound channels. Only the board without any
//! of that (NROM) is implemented, the trait is the seam for the rest.

mod mapper_000;

use crate::cartridge::{CartridgeImage, Mirroring};
use crate::errors::NesError;

pub use mapper_000::Mapper000;

pub trait Mapper {
    /// iNES mapper number
    fn id(&self) -> u8;

    /// CPU read in $4020-$FFFF. `address` is the CPU address
    fn read_program(&mut self, address: u16) -> u8;

    /// CPU write in $4020-$FFFF. Bank switching mappers listen here
    fn write_program(&mut self, address: u16, data: u8);

    /// PPU read in $0000-$1FFF
    fn read_graphics(&mut self, address: u16) -> u8;

    /// PPU write in $0000-$1FFF
    fn write_graphics(&mut self, address: u16, data: u8);

    /// Nametable mirroring selected by the mapper. `None` keeps the one the
    /// cartridge was built with
    fn mirroring(&self) -> Option<Mirroring> {
        None
    }
}

/// Build the mapper an image asks for
pub fn mapper_for(image: CartridgeImage) -> Result<Box<dyn Mapper>, NesError> {
    match image.mapper_id {
        0 => Ok(Box::new(Mapper000::new(image)?)),
        id => Err(NesError::UnsupportedMapper(id)),
    }
}
