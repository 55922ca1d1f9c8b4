//! NES errors
//!
//! All errors the NES core can produce. Configuration errors are raised while
//! building the machine, before any cycle runs. Unsupported conditions are
//! reported by the CPU step that hits them.

use thiserror::Error;

/// NES error type
///
/// All NES errors are encapsuled inside this error type
#[derive(Debug, Error)]
pub enum NesError {
    #[error("Bus error: {details}")]
    Bus {
        details: String,
        #[source]
        source: BusError,
    },

    #[error("Invalid cartridge image")]
    Cartridge(#[from] CartridgeError),

    #[error("Opcode table has no entry for opcode ${opcode:0>2X}")]
    IncompleteOpcodeTable { opcode: u8 },

    #[error("Opcode table defines opcode ${opcode:0>2X} more than once")]
    DuplicateOpcode { opcode: u8 },

    #[error("Unsupported opcode ${opcode:0>2X} at ${address:0>4X}")]
    UnsupportedOpcode { opcode: u8, address: u16 },

    #[error("CPU jammed by opcode ${opcode:0>2X} at ${address:0>4X}")]
    CpuJammed { opcode: u8, address: u16 },

    #[error("Unsupported mapper {0}")]
    UnsupportedMapper(u8),
}

/// Bus errors
///
/// An address map must be disjoint and exhaustive, these errors describe why it
/// isn't
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("Device {device_id} already attached to bus {bus_id}")]
    AlreadyAttached {
        bus_id: &'static str,
        device_id: &'static str,
    },

    #[error("Bus '{bus_id}': device '{device_id}' (${start:0>4X}-${end:0>4X}) overlaps with '{other_id}'")]
    Overlap {
        bus_id: &'static str,
        device_id: &'static str,
        other_id: &'static str,
        start: u16,
        end: u16,
    },

    #[error("Bus '{bus_id}' doesn't have an attached device for addresses ${start:0>4X}-${end:0>4X}")]
    Gap {
        bus_id: &'static str,
        start: u16,
        end: u16,
    },

    #[error("Bus '{bus_id}': device '{device_id}' has an empty address range ${start:0>4X}-${end:0>4X}")]
    InvalidRange {
        bus_id: &'static str,
        device_id: &'static str,
        start: u16,
        end: u16,
    },
}

impl From<BusError> for NesError {
    fn from(source: BusError) -> Self {
        NesError::Bus {
            details: source.to_string(),
            source,
        }
    }
}

/// Cartridge image errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("Cartridge has no program ROM")]
    MissingProgramRom,

    #[error("Mapper {mapper} can't use {size} bytes of program ROM")]
    InvalidProgramRomSize { mapper: u8, size: usize },

    #[error("Mapper {mapper} can't use {size} bytes of graphics memory")]
    InvalidGraphicsSize { mapper: u8, size: usize },

    #[error("Mapper {mapper} can't use {size} bytes of program RAM")]
    InvalidProgramRamSize { mapper: u8, size: usize },
}
